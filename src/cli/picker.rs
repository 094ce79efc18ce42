//! Interactive dataset picker behind `--pick`.
//!
//! Walks the working directory for `*.csv` files and offers only the ones
//! whose header carries every sales column the dashboard needs, so the choice
//! cannot fail on schema validation later. Files that do not qualify are
//! counted and reported, not listed.

use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::io::ingest::read_schema;

/// How many directory levels below the working directory are searched.
const MAX_DEPTH: usize = 4;

/// Directories never searched.
const SKIP_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// Result of scanning a directory tree for sales datasets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Loadable datasets, sorted by display path.
    pub datasets: Vec<PathBuf>,
    /// CSV files rejected by the schema check.
    pub rejected: usize,
}

/// Prompt on the terminal for a dataset under the working directory.
pub fn prompt_for_dataset() -> Result<PathBuf, AppError> {
    let scan = scan_datasets(Path::new("."));
    let stdin = io::stdin();
    choose_dataset(&scan, stdin.lock(), io::stdout())
}

/// Find sales datasets under `root`.
pub fn scan_datasets(root: &Path) -> Scan {
    let mut scan = Scan::default();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if depth < MAX_DEPTH && !is_skipped_dir(&path) {
                    pending.push((path, depth + 1));
                }
            } else if file_type.is_file() && has_csv_extension(&path) {
                match check_dataset(&path) {
                    Ok(()) => scan.datasets.push(path),
                    Err(err) => {
                        tracing::debug!(path = %path.display(), error = %err, "skipping CSV");
                        scan.rejected += 1;
                    }
                }
            }
        }
    }

    scan.datasets.sort_by_key(|p| display_path(p));
    scan
}

/// Check that `path` is a readable CSV whose header has the sales schema.
pub fn check_dataset(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a CSV file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file: {}", path.display()),
        ));
    }

    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_schema(file)
        .map(|_| ())
        .map_err(|e| AppError::new(2, format!("{}: {}", display_path(path), e.message())))
}

/// Selection loop: a list number or an explicit path, `q` cancels.
///
/// Generic over the streams so the loop runs against in-memory buffers in tests.
pub fn choose_dataset<R: BufRead, W: Write>(
    scan: &Scan,
    mut input: R,
    mut output: W,
) -> Result<PathBuf, AppError> {
    let write_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));

    if scan.datasets.is_empty() {
        return Err(AppError::new(
            2,
            format!(
                "No sales datasets found ({} CSV file(s) lacked the required columns). \
                 Provide one with `--data <URL|PATH>`.",
                scan.rejected
            ),
        ));
    }

    writeln!(output, "Sales datasets:").map_err(write_err)?;
    for (idx, path) in scan.datasets.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, display_path(path)).map_err(write_err)?;
    }
    if scan.rejected > 0 {
        writeln!(output, "({} other CSV file(s) skipped: missing sales columns)", scan.rejected)
            .map_err(write_err)?;
    }

    let count = scan.datasets.len();
    loop {
        write!(output, "Dataset number (1-{count}) or path, q to quit: ").map_err(write_err)?;
        output.flush().map_err(write_err)?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if read == 0 {
            return Err(AppError::new(2, "No dataset chosen (end of input)."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(n) = answer.parse::<usize>() {
            match scan.datasets.get(n.wrapping_sub(1)) {
                Some(path) => return Ok(path.clone()),
                None => {
                    writeln!(output, "No dataset numbered {n}.").map_err(write_err)?;
                    continue;
                }
            }
        }

        let candidate = PathBuf::from(answer);
        match check_dataset(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(err) => writeln!(output, "{err}").map_err(write_err)?,
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const SALES_HEADER: &str =
        "Year,Month,Recession,Vehicle_Type,Automobile_Sales,Advertising_Expenditure,Unemployment_Rate\n";

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("data/sales.CSV"), SALES_HEADER).unwrap();
        fs::write(dir.path().join("prices.csv"), "Date,Price\n").unwrap();
        fs::write(dir.path().join("target/sales.csv"), SALES_HEADER).unwrap();
        fs::write(dir.path().join("notes.txt"), SALES_HEADER).unwrap();
        dir
    }

    #[test]
    fn scan_lists_only_sales_datasets() {
        let dir = workspace();
        let scan = scan_datasets(dir.path());

        assert_eq!(scan.datasets.len(), 1);
        assert!(scan.datasets[0].ends_with("data/sales.CSV"));
        assert_eq!(scan.rejected, 1);
    }

    #[test]
    fn check_rejects_wrong_schema_and_non_csv() {
        let dir = workspace();

        let err = check_dataset(&dir.path().join("prices.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Vehicle Type"));

        assert!(check_dataset(&dir.path().join("notes.txt")).is_err());
        assert!(check_dataset(&dir.path().join("missing.csv")).is_err());
        assert!(check_dataset(dir.path()).is_err());
        assert!(check_dataset(&dir.path().join("data/sales.CSV")).is_ok());
    }

    #[test]
    fn choose_by_number_after_bad_answers() {
        let dir = workspace();
        let scan = scan_datasets(dir.path());
        let mut shown = Vec::new();

        let picked = choose_dataset(&scan, Cursor::new("7\nprices.csv\n1\n"), &mut shown).unwrap();

        assert_eq!(picked, scan.datasets[0]);
        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("1 other CSV file(s) skipped"));
        assert!(shown.contains("No dataset numbered 7."));
    }

    #[test]
    fn quit_and_end_of_input_cancel() {
        let dir = workspace();
        let scan = scan_datasets(dir.path());

        let err = choose_dataset(&scan, Cursor::new("q\n"), Vec::new()).unwrap_err();
        assert_eq!(err.message(), "Canceled.");

        assert!(choose_dataset(&scan, Cursor::new(""), Vec::new()).is_err());
    }

    #[test]
    fn empty_scan_is_an_input_error() {
        let err = choose_dataset(&Scan::default(), Cursor::new("1\n"), Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("--data"));
    }
}
