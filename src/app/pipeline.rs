//! Shared startup logic used by every front-end.
//!
//! resolve source -> fetch/read CSV -> normalize -> table
//!
//! The CLI, the TUI and the HTTP server then only differ in presentation.

use crate::cli::DataArgs;
use crate::cli::picker::prompt_for_dataset;
use crate::data::{DatasetClient, SalesTable, source_from_env};
use crate::domain::{DashboardConfig, DataSource};
use crate::error::AppError;

/// Build the run configuration from the data flags.
///
/// `--pick` prompts on stdin, so it must run before any terminal UI starts.
pub fn config_from_args(args: &DataArgs) -> Result<DashboardConfig, AppError> {
    let source = if args.pick {
        DataSource::Path(prompt_for_dataset()?)
    } else {
        source_from_env(args.data.as_deref())
    };

    Ok(DashboardConfig { source })
}

/// Load the dataset once. Failure is fatal for the caller.
pub fn load_table(config: &DashboardConfig) -> Result<SalesTable, AppError> {
    tracing::info!(source = %config.source, "loading dataset");

    let client = DatasetClient::new()?;
    let table = client.load(&config.source)?;

    let (first, last) = table.year_range();
    tracing::info!(rows = table.len(), first_year = first, last_year = last, "dataset ready");
    Ok(table)
}
