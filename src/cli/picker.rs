//! CSV file picking.
//!
//! Two front ends share the same discovery:
//! - [`prompt_for_csv_path`] is a numbered stdin prompt for the CLI subcommands
//! - [`CsvPicker`] is the selection state behind the TUI's open overlay
//!
//! Discovery searches for `*.csv` files under a root directory (the working
//! directory by default), skipping build and VCS folders.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Accepts either a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::Usage(
            "No .csv files found. Provide one with `-f <file.csv>` or SALES_CSV.".to_string(),
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::Usage(format!("Failed to write prompt: {e}")))?;

        input.clear();
        let bytes = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|e| AppError::Usage(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::Usage(
                "No input received. Provide a CSV path with `-f <file.csv>`.".to_string(),
            ));
        }

        match resolve_choice(input.trim(), &files) {
            Ok(Some(path)) => return Ok(path),
            Ok(None) => return Err(AppError::Usage("Canceled.".to_string())),
            Err(err) => println!("{err}"),
        }
    }
}

/// Interpret one line of prompt input against the discovered files.
///
/// `Ok(None)` means the user canceled.
fn resolve_choice(input: &str, files: &[PathBuf]) -> Result<Option<PathBuf>, AppError> {
    if input.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    if let Ok(choice) = input.parse::<usize>() {
        if (1..=files.len()).contains(&choice) {
            return validate_csv_path(&files[choice - 1]).map(Some);
        }
        return Err(AppError::Usage(format!(
            "Invalid choice: {choice}. Enter a number between 1 and {}.",
            files.len()
        )));
    }
    validate_csv_path(Path::new(input)).map(Some)
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::Usage(format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::Usage(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !has_csv_extension(path) {
        return Err(AppError::Usage(format!(
            "Expected a .csv file (got: {}). Use -f to pass a CSV path.",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under `root` (deterministic order).
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

pub fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

/// Selection state for the TUI file list.
#[derive(Debug, Clone, Default)]
pub struct CsvPicker {
    files: Vec<PathBuf>,
    selected: usize,
}

impl CsvPicker {
    pub fn scan(root: &Path) -> Self {
        Self::with_files(discover_csv_files(root))
    }

    pub fn with_files(files: Vec<PathBuf>) -> Self {
        Self { files, selected: 0 }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.files.len() {
            self.selected += 1;
        }
    }

    pub fn selected(&self) -> Option<&Path> {
        self.files.get(self.selected).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_finds_nested_csv_and_skips_target() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data/2024")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("b.csv"), "Daily_Revenue\n1\n").unwrap();
        fs::write(root.join("data/2024/a.CSV"), "Daily_Revenue\n1\n").unwrap();
        fs::write(root.join("target/skip.csv"), "x\n").unwrap();
        fs::write(root.join("notes.txt"), "x\n").unwrap();

        let files = discover_csv_files(root);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["b.csv".to_string(), "data/2024/a.CSV".to_string()]);
    }

    #[test]
    fn validate_rejects_non_csv_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("x.txt");
        fs::write(&txt, "x").unwrap();

        assert!(validate_csv_path(&txt).is_err());
        assert!(validate_csv_path(dir.path()).is_err());
        assert!(validate_csv_path(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn resolve_choice_handles_numbers_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sales.csv");
        fs::write(&csv, "Daily_Revenue\n1\n").unwrap();
        let files = vec![csv.clone()];

        assert_eq!(resolve_choice("1", &files).unwrap(), Some(csv));
        assert_eq!(resolve_choice("Q", &files).unwrap(), None);
        assert!(resolve_choice("2", &files).is_err());
    }

    #[test]
    fn picker_selection_stays_in_range() {
        let mut picker = CsvPicker::with_files(vec!["a.csv".into(), "b.csv".into()]);
        picker.up();
        assert_eq!(picker.selected_index(), 0);
        picker.down();
        picker.down();
        assert_eq!(picker.selected(), Some(Path::new("b.csv")));

        let empty = CsvPicker::default();
        assert!(empty.selected().is_none());
    }
}
