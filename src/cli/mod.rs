//! Command-line parsing for the automobile sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! dashboard logic; `crate::app` does the dispatch.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::DEFAULT_LOG_FILE;
use crate::web::DEFAULT_ADDR;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autosales", version, about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal dashboard (default).
    Tui(TuiArgs),
    /// Render one report (recession or yearly) and print or export it.
    Report(ReportArgs),
    /// List the years available in the dataset.
    Years(DataArgs),
    /// Serve the dashboard over HTTP.
    Serve(ServeArgs),
}

/// Dataset location options shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// CSV URL or local path. Overrides `AUTOSALES_DATA`.
    #[arg(short = 'd', long, value_name = "URL|PATH")]
    pub data: Option<String>,

    /// Pick a local CSV interactively from the working directory tree.
    #[arg(long, conflicts_with = "data")]
    pub pick: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// File that receives log output while the terminal UI is running.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Report type value, e.g. "Recession Statistics" or "Yearly Statistics".
    #[arg(short = 's', long, value_name = "VALUE")]
    pub statistics: String,

    /// Year to report on.
    #[arg(short = 'y', long)]
    pub year: i32,

    /// Print the output container as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write `report.json` plus one SVG per chart into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Address to listen on.
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_flags() {
        let cli = Cli::parse_from([
            "autosales",
            "report",
            "--statistics",
            "Yearly Statistics",
            "--year",
            "1990",
            "--json",
        ]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.statistics, "Yearly Statistics");
        assert_eq!(args.year, 1990);
        assert!(args.json);
        assert!(args.export_dir.is_none());
    }

    #[test]
    fn serve_and_tui_defaults() {
        let Command::Serve(serve) = Cli::parse_from(["autosales", "serve"]).command else {
            panic!("expected serve");
        };
        assert_eq!(serve.addr.to_string(), DEFAULT_ADDR);

        let Command::Tui(tui) = Cli::parse_from(["autosales", "tui", "-d", "sales.csv"]).command else {
            panic!("expected tui");
        };
        assert_eq!(tui.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(tui.data.data.as_deref(), Some("sales.csv"));
    }

    #[test]
    fn pick_conflicts_with_data() {
        let result = Cli::try_parse_from(["autosales", "years", "--pick", "--data", "x.csv"]);
        assert!(result.is_err());
    }
}
