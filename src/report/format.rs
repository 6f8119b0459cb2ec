//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized

use crate::chart::ChartSpec;
use crate::domain::{ForecastResult, SalesConfig};
use crate::io::ingest::LoadedDataset;

/// One-line notice shown after a successful load.
pub fn format_load_notice(dataset: &LoadedDataset, config: &SalesConfig) -> String {
    let mut out = format!(
        "CSV loaded successfully! {} of {} row(s) kept",
        dataset.rows_kept(),
        dataset.rows_read
    );
    if dataset.rows_read > config.max_rows {
        out.push_str(&format!(" (last {} days)", config.max_rows));
    }
    if let Some((first, last)) = dataset.date_range {
        out.push_str(&format!(" | {first} → {last}"));
    }
    out
}

/// Dataset overview: source, size and revenue stats.
pub fn format_dataset_summary(dataset: &LoadedDataset, config: &SalesConfig) -> String {
    let mut out = String::new();

    out.push_str("=== sales - Revenue Trends ===\n");
    out.push_str(&format!("Source: {}\n", dataset.source.display()));
    out.push_str(&format!(
        "Rows: read={} | kept={} (max {})\n",
        dataset.rows_read,
        dataset.rows_kept(),
        config.max_rows
    ));
    if let Some((first, last)) = dataset.date_range {
        out.push_str(&format!("Dates: {first} → {last}\n"));
    }

    match &dataset.stats {
        Some(stats) => {
            let sym = &config.currency_symbol;
            out.push_str(&format!(
                "Revenue: total={sym}{:.2} | mean={sym}{:.2} | min={sym}{:.2} | max={sym}{:.2}\n",
                stats.total, stats.mean, stats.min, stats.max
            ));
        }
        None => out.push_str("Revenue: (no rows)\n"),
    }

    out
}

/// Fit line plus a table of projected days.
pub fn format_forecast_table(result: &ForecastResult, config: &SalesConfig) -> String {
    let mut out = String::new();
    let sym = &config.currency_symbol;

    out.push_str(&format!(
        "Trend: revenue ≈ {:.4} + {:.4} × day\n",
        result.fit.intercept, result.fit.slope
    ));
    out.push_str(&format!(
        "Band: ±{:.0}% of prediction (heuristic, not a statistical interval)\n",
        config.forecast.band_fraction * 100.0
    ));

    out.push_str(&format!(
        "\n{:>6} {:>6} {:>14} {:>14} {:>14}\n",
        "day", "x", "predicted", "lower", "upper"
    ));
    for (i, &day) in result.future_days.iter().enumerate() {
        out.push_str(&format!(
            "{:>6} {:>6.0} {:>14} {:>14} {:>14}\n",
            day,
            result.display_x(day),
            format!("{sym}{:.2}", result.predicted[i]),
            format!("{sym}{:.2}", result.lower[i]),
            format!("{sym}{:.2}", result.upper[i]),
        ));
    }

    out
}

/// Short description of a chart for status lines.
pub fn format_chart_caption(chart: &ChartSpec) -> String {
    format!("{} | {} point(s)", chart.title, chart.point_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use crate::analysis::forecast;
    use crate::domain::RevenueSeries;

    fn dataset(n: usize, rows_read: usize) -> LoadedDataset {
        let series = RevenueSeries::from_amounts((1..=n).map(|d| d as f64));
        LoadedDataset {
            source: PathBuf::from("sales.csv"),
            stats: None,
            rows_read,
            series,
            date_range: None,
        }
    }

    #[test]
    fn load_notice_mentions_truncation() {
        let config = SalesConfig::default();
        let notice = format_load_notice(&dataset(730, 900), &config);
        assert_eq!(notice, "CSV loaded successfully! 730 of 900 row(s) kept (last 730 days)");

        let mut small = dataset(3, 3);
        small.date_range = Some((
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        ));
        assert_eq!(
            format_load_notice(&small, &config),
            "CSV loaded successfully! 3 of 3 row(s) kept | 2024-01-01 → 2024-01-03"
        );
    }

    #[test]
    fn forecast_table_lists_every_projected_day() {
        let config = SalesConfig::default();
        let series = RevenueSeries::from_amounts((1..=8).map(|d| 10.0 * d as f64));
        let result = forecast(&series, &config.forecast).unwrap();

        let table = format_forecast_table(&result, &config);
        assert!(table.starts_with("Trend: revenue ≈ "));
        // 2 header lines + blank + column header + 30 rows.
        assert_eq!(table.lines().count(), 34);
        assert!(table.contains("₹90.00"));
    }

    #[test]
    fn summary_handles_empty_dataset() {
        let text = format_dataset_summary(&dataset(0, 0), &SalesConfig::default());
        assert!(text.contains("Revenue: (no rows)"));
    }
}
