//! Dataset retrieval (remote CSV over HTTP or a local file).

use std::fs::File;
use std::io::Cursor;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::data::table::SalesTable;
use crate::domain::{DATA_ENV_VAR, DEFAULT_DATA_URL, DataSource};
use crate::error::AppError;
use crate::io::ingest::read_sales_table;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client used for the single startup load.
pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Load and normalize the dataset. Any failure is fatal; there is no retry.
    pub fn load(&self, source: &DataSource) -> Result<SalesTable, AppError> {
        match source {
            DataSource::Url(url) => {
                let body = self.fetch_text(url)?;
                read_sales_table(Cursor::new(body))
            }
            DataSource::Path(path) => {
                let file = File::open(path).map_err(|e| {
                    AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
                })?;
                read_sales_table(file)
            }
        }
    }

    fn fetch_text(&self, url: &str) -> Result<String, AppError> {
        tracing::info!(url, "fetching dataset");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::new(4, format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Dataset request failed with status {}.", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| AppError::new(4, format!("Failed to read dataset response: {e}")))
    }
}

/// Resolve the dataset location.
///
/// Precedence: explicit flag, then `AUTOSALES_DATA` (environment or `.env`),
/// then the public default URL.
pub fn resolve_source(flag: Option<&str>, env_value: Option<String>) -> DataSource {
    if let Some(raw) = flag.filter(|s| !s.trim().is_empty()) {
        return DataSource::parse(raw);
    }
    if let Some(raw) = env_value.filter(|s| !s.trim().is_empty()) {
        return DataSource::parse(&raw);
    }
    DataSource::Url(DEFAULT_DATA_URL.to_string())
}

/// Read `AUTOSALES_DATA` after loading `.env` (if present).
pub fn source_from_env(flag: Option<&str>) -> DataSource {
    dotenvy::dotenv().ok();
    resolve_source(flag, std::env::var(DATA_ENV_VAR).ok())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let source = resolve_source(Some("local.csv"), Some("https://example.com/x.csv".to_string()));
        assert_eq!(source, DataSource::Path(PathBuf::from("local.csv")));
    }

    #[test]
    fn environment_wins_over_default() {
        let source = resolve_source(None, Some("https://example.com/x.csv".to_string()));
        assert_eq!(source, DataSource::Url("https://example.com/x.csv".to_string()));
    }

    #[test]
    fn blank_values_fall_back_to_default_url() {
        let source = resolve_source(Some("  "), Some(String::new()));
        assert_eq!(source, DataSource::Url(DEFAULT_DATA_URL.to_string()));
    }

    #[test]
    fn loads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Year,Month,Recession,Vehicle_Type,Automobile_Sales,Advertising_Expenditure,unemployment_rate"
        )
        .unwrap();
        writeln!(file, "1980,Jan,1,Supperminicar,456.0,1558,5.4").unwrap();
        file.flush().unwrap();

        let client = DatasetClient::new().unwrap();
        let table = client
            .load(&DataSource::Path(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.years(), &[1980]);
    }

    #[test]
    fn missing_local_file_is_an_input_error() {
        let client = DatasetClient::new().unwrap();
        let err = client
            .load(&DataSource::Path(PathBuf::from("does/not/exist.csv")))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
