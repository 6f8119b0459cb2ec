//! Exports: forecast rows to CSV and chart descriptions to JSON.
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::chart::ChartSpec;
use crate::domain::ForecastResult;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ForecastRow {
    day: usize,
    display_x: f64,
    predicted: f64,
    lower: f64,
    upper: f64,
}

/// Write one row per projected day.
pub fn write_forecast_csv(path: &Path, result: &ForecastResult) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::Export(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    for (i, &day) in result.future_days.iter().enumerate() {
        writer
            .serialize(ForecastRow {
                day,
                display_x: result.display_x(day),
                predicted: result.predicted[i],
                lower: result.lower[i],
                upper: result.upper[i],
            })
            .map_err(|e| AppError::Export(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Export(format!("Failed to flush export CSV: {e}")))?;
    log::info!("wrote {} forecast row(s) to '{}'", result.future_days.len(), path.display());
    Ok(())
}

/// Write a chart description as pretty JSON.
pub fn write_chart_json(path: &Path, chart: &ChartSpec) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::Export(format!("Failed to create chart JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::Export(format!("Failed to write chart JSON: {e}")))?;
    log::info!("wrote {:?} chart to '{}'", chart.kind, path.display());
    Ok(())
}

/// Read a chart description written by [`write_chart_json`].
pub fn read_chart_json(path: &Path) -> Result<ChartSpec, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::Usage(format!("Failed to open chart JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file).map_err(|e| AppError::Usage(format!("Invalid chart JSON: {e}")))
}
