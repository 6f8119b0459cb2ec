//! Linear trend forecast.
//!
//! The day index is the only predictor. We fit revenue on `1..=N`, project the
//! line over the next `horizon` days and wrap each prediction in a fixed
//! percentage envelope.
//!
//! For display only the most recent slice of actuals is kept, and positions are
//! shifted so that slice starts at 1. The shift never touches the fit.

use crate::domain::{ForecastParams, ForecastResult, MAX_FORECAST_HORIZON, RevenueSeries};
use crate::error::AppError;
use crate::math::fit_line;

/// Fit the trend and project it forward.
///
/// # Errors
/// - [`AppError::EmptyDataset`] for an empty series.
/// - [`AppError::Data`] when fewer than two distinct day indices exist, the
///   horizon is outside `1..=MAX_FORECAST_HORIZON`, or the fit is numerically unusable.
pub fn forecast(series: &RevenueSeries, params: &ForecastParams) -> Result<ForecastResult, AppError> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset);
    }
    if params.horizon == 0 || params.horizon > MAX_FORECAST_HORIZON {
        return Err(AppError::Data(format!(
            "Forecast horizon must be between 1 and {MAX_FORECAST_HORIZON} days (got {}).",
            params.horizon
        )));
    }
    if series.len() < 2 {
        return Err(AppError::Data(format!(
            "Forecast needs at least 2 distinct days of data (got {}).",
            series.len()
        )));
    }

    let xs: Vec<f64> = series.points().iter().map(|p| p.day as f64).collect();
    let ys: Vec<f64> = series.amounts().collect();

    let fit = fit_line(&xs, &ys).ok_or_else(|| {
        AppError::Data("Could not fit a trend line to the revenue series.".to_string())
    })?;
    log::debug!(
        "trend fit over {} day(s): slope={:.6}, intercept={:.6}",
        series.len(),
        fit.slope,
        fit.intercept
    );

    let last_day = series.last_day();
    let future_days: Vec<usize> = (last_day + 1..=last_day + params.horizon).collect();
    let predicted: Vec<f64> = future_days.iter().map(|&d| fit.predict(d as f64)).collect();

    if predicted.iter().any(|v| !v.is_finite()) {
        return Err(AppError::Data("Non-finite forecast value.".to_string()));
    }

    let lower = predicted.iter().map(|v| v * (1.0 - params.band_fraction)).collect();
    let upper = predicted.iter().map(|v| v * (1.0 + params.band_fraction)).collect();

    let keep = recent_window_len(series.len(), params.recent_fraction);
    let recent = series.points()[series.len() - keep..].to_vec();
    let display_origin = recent.first().map(|p| p.day).unwrap_or(1);

    Ok(ForecastResult {
        fit,
        recent,
        future_days,
        predicted,
        lower,
        upper,
        display_origin,
    })
}

/// Number of trailing actuals shown next to the projection.
///
/// `floor(len * fraction)`; when that rounds down to zero the whole series is shown.
pub fn recent_window_len(len: usize, fraction: f64) -> usize {
    let keep = (len as f64 * fraction).floor() as usize;
    if keep == 0 { len } else { keep.min(len) }
}
