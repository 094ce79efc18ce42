//! Dataset loading and the in-memory table.

pub mod source;
pub mod table;

pub use source::{DatasetClient, resolve_source, source_from_env};
pub use table::SalesTable;
