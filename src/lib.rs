//! `autosales-dash` library crate.
//!
//! The binary (`autosales`) is a thin wrapper around this library so that:
//!
//! - the report rules and the controller are testable without spawning processes
//! - the terminal UI and the HTTP server share one implementation

pub mod aggregate;
pub mod app;
pub mod chart;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
pub mod web;
