//! Input/output helpers.
//!
//! - CSV ingest + column normalization (`ingest`)
//! - report exports (JSON + SVG) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
