//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads the dataset
//! - hands the table to the selected front-end

use clap::Parser;

use crate::cli::{Command, DataArgs, ReportArgs, ServeArgs, TuiArgs};
use crate::domain::ReportMode;
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

/// Entry point for the `autosales` binary.
pub fn run() -> Result<(), AppError> {
    // `autosales` and `autosales --data x.csv` behave like `autosales tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Years(args) => handle_years(args),
        Command::Serve(args) => handle_serve(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    // The picker talks to stdin/stdout, so resolve the source first.
    let config = pipeline::config_from_args(&args.data)?;
    let _log_guard = crate::logging::init(LogTarget::File(args.log_file.clone()))?;

    let table = pipeline::load_table(&config)?;
    crate::tui::run(&table)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    crate::logging::init(LogTarget::Stderr)?;
    let config = pipeline::config_from_args(&args.data)?;
    let table = pipeline::load_table(&config)?;

    if ReportMode::from_value(&args.statistics).is_none() {
        tracing::warn!(statistics = %args.statistics, "unrecognized report type; nothing to render");
    }

    let output = crate::report::render_report_for(&table, args.year, Some(args.statistics.as_str()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| AppError::new(4, format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_report(&output));
    }

    if let Some(dir) = &args.export_dir {
        let files = crate::io::export::export_report(dir, &output)?;
        for path in files {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn handle_years(args: DataArgs) -> Result<(), AppError> {
    crate::logging::init(LogTarget::Stderr)?;
    let config = pipeline::config_from_args(&args)?;
    let table = pipeline::load_table(&config)?;

    print!("{}", crate::report::format_years(table.years()));
    Ok(())
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    crate::logging::init(LogTarget::Stderr)?;
    let config = pipeline::config_from_args(&args.data)?;
    let table = pipeline::load_table(&config)?;
    let state = crate::web::AppState::new(table);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(crate::web::serve(args.addr, state))
}

/// Rewrite argv so `autosales` defaults to `autosales tui`.
///
/// Rules:
/// - `autosales`                     -> `autosales tui`
/// - `autosales --data x.csv ...`    -> `autosales tui --data x.csv ...`
/// - `autosales --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "years" | "serve");
    if is_subcommand {
        return argv;
    }

    // A leading flag means "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
