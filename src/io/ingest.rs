//! CSV ingest.
//!
//! Turns a daily-revenue CSV into a bounded [`RevenueSeries`].
//!
//! Design goals:
//! - **Strict schema** for the revenue column (clear error, exit code 2)
//! - **All-or-nothing**: a bad record fails the whole load, no partial dataset
//! - **Bounded memory**: only the most recent `max_rows` rows are ever held
//! - **Separation of concerns**: no aggregation or fitting logic here

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{RevenueSeries, SalesConfig};
use crate::error::AppError;

/// Summary stats about the retained rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_days: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Loader output: the bounded series plus what we learned while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub source: PathBuf,
    pub series: RevenueSeries,
    /// Data rows in the file, before truncation.
    pub rows_read: usize,
    /// `None` for an empty series.
    pub stats: Option<DatasetStats>,
    /// First and last retained dates, when the file has a parseable date column.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl LoadedDataset {
    pub fn rows_kept(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Load the revenue series from a CSV file.
pub fn load_revenue_csv(path: &Path, config: &SalesConfig) -> Result<LoadedDataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::Format(format!("cannot open '{}': {e}", path.display()))
    })?;
    read_revenue_csv(file, path, config)
}

/// Load the revenue series from any reader (`source` is used for reporting only).
pub fn read_revenue_csv<R: Read>(
    input: R,
    source: &Path,
    config: &SalesConfig,
) -> Result<LoadedDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Format(format!("cannot read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let revenue_idx = *header_map
        .get(config.revenue_column.trim())
        .ok_or_else(|| AppError::MissingColumn(config.revenue_column.clone()))?;
    let date_idx = header_map.get(config.date_column.trim()).copied();

    let capacity = config.max_rows.max(1);
    let mut window: VecDeque<(f64, Option<String>)> = VecDeque::with_capacity(capacity);
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = result.map_err(|e| AppError::Format(format!("line {line}: {e}")))?;
        let revenue = parse_revenue(record.get(revenue_idx))
            .map_err(|msg| AppError::Format(format!("line {line}: {msg}")))?;
        let date = date_idx.and_then(|i| record.get(i)).map(str::to_string);

        if window.len() == capacity {
            window.pop_front();
        }
        window.push_back((revenue, date));
    }

    let date_range = match (window.front(), window.back()) {
        (Some((_, Some(first))), Some((_, Some(last)))) => {
            match (parse_date(first), parse_date(last)) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            }
        }
        _ => None,
    };

    let series = RevenueSeries::from_amounts(window.into_iter().map(|(revenue, _)| revenue));
    let stats = compute_stats(&series);

    log::info!(
        "loaded '{}': {} row(s) read, {} kept",
        source.display(),
        rows_read,
        series.len()
    );

    Ok(LoadedDataset {
        source: source.to_path_buf(),
        series,
        rows_read,
        stats,
        date_range,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report a missing column.
    name.trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_revenue(value: Option<&str>) -> Result<f64, String> {
    let raw = value.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Err("missing revenue value".to_string());
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid revenue value '{raw}'")),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn compute_stats(series: &RevenueSeries) -> Option<DatasetStats> {
    if series.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in series.amounts() {
        total += v;
        min = min.min(v);
        max = max.max(v);
    }

    Some(DatasetStats {
        n_days: series.len(),
        total,
        mean: total / series.len() as f64,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn read(csv: &str, config: &SalesConfig) -> Result<LoadedDataset, AppError> {
        read_revenue_csv(csv.as_bytes(), Path::new("test.csv"), config)
    }

    fn csv_with_rows(n: usize) -> String {
        let mut out = String::from("Date,Daily_Revenue,Orders\n");
        for i in 0..n {
            out.push_str(&format!("2024-01-01,{},{}\n", i + 1, i % 5));
        }
        out
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read("Date,Revenue\n2024-01-01,10\n", &SalesConfig::default()).unwrap_err();
        assert_eq!(err, AppError::MissingColumn("Daily_Revenue".to_string()));
    }

    #[test]
    fn keeps_most_recent_rows_in_order() {
        let loaded = read(&csv_with_rows(1000), &SalesConfig::default()).unwrap();

        assert_eq!(loaded.rows_read, 1000);
        assert_eq!(loaded.rows_kept(), 730);
        let amounts: Vec<f64> = loaded.series.amounts().collect();
        assert_eq!(amounts.first(), Some(&271.0));
        assert_eq!(amounts.last(), Some(&1000.0));
        assert!(amounts.windows(2).all(|w| w[1] == w[0] + 1.0));
        assert_eq!(loaded.series.points()[0].day, 1);
        assert_eq!(loaded.series.last_day(), 730);
    }

    #[test]
    fn short_files_are_kept_whole() {
        let loaded = read(&csv_with_rows(12), &SalesConfig::default()).unwrap();
        assert_eq!(loaded.rows_kept(), 12);
        let stats = loaded.stats.unwrap();
        assert_eq!(stats.total, 78.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 12.0);
    }

    #[test]
    fn header_only_file_loads_empty() {
        let loaded = read("Daily_Revenue\n", &SalesConfig::default()).unwrap();
        assert!(loaded.is_empty());
        assert!(loaded.stats.is_none());
    }

    #[test]
    fn bom_and_whitespace_in_header_are_ignored() {
        let loaded = read("\u{feff} Daily_Revenue ,x\n5,a\n6,b\n", &SalesConfig::default()).unwrap();
        assert_eq!(loaded.series.amounts().collect::<Vec<_>>(), vec![5.0, 6.0]);
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let err = read("daily_revenue\n5\n", &SalesConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(_)));
    }

    #[test]
    fn bad_revenue_cell_fails_whole_load() {
        let err = read("Daily_Revenue\n5\nabc\n7\n", &SalesConfig::default()).unwrap_err();
        match err {
            AppError::Format(msg) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = read("Daily_Revenue,x\n5,1\n,2\n", &SalesConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }

    #[test]
    fn date_range_reflects_retained_rows() {
        let csv = "Date,Daily_Revenue\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n";
        let config = SalesConfig {
            max_rows: 2,
            ..SalesConfig::default()
        };
        let loaded = read(csv, &config).unwrap();
        let (first, last) = loaded.date_range.unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn unparseable_dates_are_ignored() {
        let loaded = read("Date,Daily_Revenue\nMonday,1\nTuesday,2\n", &SalesConfig::default()).unwrap();
        assert!(loaded.date_range.is_none());
        assert_eq!(loaded.rows_kept(), 2);
    }

    #[test]
    fn custom_revenue_column() {
        let config = SalesConfig {
            revenue_column: "sales".to_string(),
            ..SalesConfig::default()
        };
        let loaded = read("day,sales\n1,10.5\n2,11.5\n", &config).unwrap();
        assert_eq!(loaded.stats.unwrap().total, 22.0);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", csv_with_rows(3)).unwrap();

        let loaded = load_revenue_csv(file.path(), &SalesConfig::default()).unwrap();
        assert_eq!(loaded.rows_kept(), 3);
        assert_eq!(loaded.source, file.path());
    }

    #[test]
    fn unreadable_file_is_a_format_error() {
        let err = load_revenue_csv(Path::new("/definitely/not/here.csv"), &SalesConfig::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Format(_)));
    }
}
