//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the loaded row type (`SalesRecord`) and its column catalogue (`Column`)
//! - grouping keys (`GroupKey`)
//! - the report selector (`ReportMode`) and runtime configuration

pub mod types;

pub use types::*;
