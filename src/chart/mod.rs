//! Render-ready chart descriptions.
//!
//! A [`ChartSpec`] is the one-way command handed to a presentation sink (the
//! ASCII plotter, the TUI widget, or the JSON exporter). Building one runs the
//! analysis steps; drawing one never computes anything beyond bounds.

use serde::{Deserialize, Serialize};

use crate::analysis::{aggregate, downsample, forecast};
use crate::domain::{Bucket, BucketSize, ForecastResult, RevenueSeries, SalesConfig};
use crate::error::AppError;

/// The four views the tool can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    DailyLine,
    WeeklyLine,
    MonthlyBar,
    Forecast,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Line,
    Bar,
}

/// What a series represents; sinks pick colors/glyphs from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesRole {
    Actual,
    Predicted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub mark: Mark,
    pub role: SeriesRole,
    pub points: Vec<(f64, f64)>,
}

/// Shaded envelope: `(x, lower, upper)` triples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub label: String,
    pub points: Vec<(f64, f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub band: Option<Band>,
    /// Explicit x positions that get a label.
    pub x_ticks: Vec<f64>,
}

impl ChartSpec {
    /// X range covering every series and the band, padded by half a step for bars.
    pub fn x_bounds(&self) -> [f64; 2] {
        let xs = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .chain(self.band.iter().flat_map(|b| b.points.iter().map(|p| p.0)));
        let (mut lo, mut hi) = min_max(xs).unwrap_or((0.0, 1.0));

        if self.has_bars() {
            lo -= 0.5;
            hi += 0.5;
        }
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }
        [lo, hi]
    }

    /// Y range covering every series and the band with 5% padding; bar charts include 0.
    pub fn y_bounds(&self) -> [f64; 2] {
        let ys = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(
                self.band
                    .iter()
                    .flat_map(|b| b.points.iter().flat_map(|p| [p.1, p.2])),
            );
        let (mut lo, mut hi) = min_max(ys).unwrap_or((0.0, 1.0));

        if self.has_bars() {
            lo = lo.min(0.0);
            hi = hi.max(0.0);
        }
        if hi <= lo {
            let pad = lo.abs().max(1.0) * 0.5;
            return [lo - pad, hi + pad];
        }

        let pad = (hi - lo) * 0.05;
        [lo - pad, hi + pad]
    }

    pub fn has_bars(&self) -> bool {
        self.series.iter().any(|s| s.mark == Mark::Bar)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo <= hi).then_some((lo, hi))
}

/// Label every `max(1, len / target)`-th plotted x, starting with the first.
pub fn thinned_ticks(xs: &[f64], target: usize) -> Vec<f64> {
    downsample(xs, target)
}

/// `1, 1+s, 1+2s, ...` up to `max_x`, with `s = max(1, max_x / target)`.
pub fn stepped_ticks(max_x: usize, target: usize) -> Vec<f64> {
    let step = (max_x / target.max(1)).max(1);
    (1..=max_x).step_by(step).map(|x| x as f64).collect()
}

/// Daily revenue line over the whole loaded window.
pub fn daily_chart(series: &RevenueSeries, config: &SalesConfig) -> Result<ChartSpec, AppError> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    let points: Vec<(f64, f64)> = series
        .points()
        .iter()
        .map(|p| (p.day as f64, p.revenue))
        .collect();
    let points = downsample(&points, config.daily_display_points);
    log::debug!("daily view: {} of {} point(s) plotted", points.len(), series.len());

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    Ok(ChartSpec {
        kind: ChartKind::DailyLine,
        title: "Daily Sales Trend of last 2 years".to_string(),
        x_label: "Days".to_string(),
        y_label: config.y_label(),
        series: vec![Series {
            label: "Daily Revenue".to_string(),
            mark: Mark::Line,
            role: SeriesRole::Actual,
            points,
        }],
        band: None,
        x_ticks: thinned_ticks(&xs, config.daily_tick_target),
    })
}

/// Weekly sums over the configured window.
pub fn weekly_chart(series: &RevenueSeries, config: &SalesConfig) -> Result<ChartSpec, AppError> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    let window = series.tail(config.weekly_window_weeks * BucketSize::Week.days());
    let buckets = aggregate(&window, BucketSize::Week);
    let points = downsample(&bucket_points(&buckets), config.weekly_display_points);

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    Ok(ChartSpec {
        kind: ChartKind::WeeklyLine,
        title: format!(
            "Weekly Sales Trend of last {} months",
            config.weekly_window_weeks * 12 / 52
        ),
        x_label: "Weeks".to_string(),
        y_label: config.y_label(),
        series: vec![Series {
            label: "Weekly Revenue".to_string(),
            mark: Mark::Line,
            role: SeriesRole::Actual,
            points,
        }],
        band: None,
        x_ticks: thinned_ticks(&xs, config.weekly_tick_target),
    })
}

/// Monthly (30-day) sums over the configured window, drawn as bars.
pub fn monthly_chart(series: &RevenueSeries, config: &SalesConfig) -> Result<ChartSpec, AppError> {
    if series.is_empty() {
        return Err(AppError::EmptyDataset);
    }

    let window = series.tail(config.monthly_window_months * BucketSize::Month.days());
    let buckets = aggregate(&window, BucketSize::Month);
    let points = downsample(&bucket_points(&buckets), config.monthly_display_points);

    let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    Ok(ChartSpec {
        kind: ChartKind::MonthlyBar,
        title: "Monthly Sales Trend of last 2 years".to_string(),
        x_label: "Months".to_string(),
        y_label: config.y_label(),
        series: vec![Series {
            label: "Monthly Revenue".to_string(),
            mark: Mark::Bar,
            role: SeriesRole::Actual,
            points,
        }],
        band: None,
        x_ticks: thinned_ticks(&xs, config.monthly_tick_target),
    })
}

/// Run the forecaster and describe the result on the rescaled display axis.
pub fn forecast_chart(
    series: &RevenueSeries,
    config: &SalesConfig,
) -> Result<(ChartSpec, ForecastResult), AppError> {
    let result = forecast(series, &config.forecast)?;
    let spec = forecast_spec(&result, config);
    Ok((spec, result))
}

/// Chart description for an existing forecast.
pub fn forecast_spec(result: &ForecastResult, config: &SalesConfig) -> ChartSpec {
    let recent: Vec<(f64, f64)> = result
        .recent
        .iter()
        .map(|p| (result.display_x(p.day), p.revenue))
        .collect();

    let future_x: Vec<f64> = result.future_days.iter().map(|&d| result.display_x(d)).collect();
    let predicted: Vec<(f64, f64)> = future_x
        .iter()
        .copied()
        .zip(result.predicted.iter().copied())
        .collect();
    let band: Vec<(f64, f64, f64)> = future_x
        .iter()
        .zip(result.lower.iter().zip(&result.upper))
        .map(|(&x, (&lo, &hi))| (x, lo, hi))
        .collect();

    let max_x = future_x.last().copied().unwrap_or(1.0).max(1.0) as usize;

    ChartSpec {
        kind: ChartKind::Forecast,
        title: format!("Sales Forecast (Next {} Days)", result.future_days.len()),
        x_label: "Days".to_string(),
        y_label: config.y_label(),
        series: vec![
            Series {
                label: "Recent Sales Data".to_string(),
                mark: Mark::Line,
                role: SeriesRole::Actual,
                points: recent,
            },
            Series {
                label: "Predicted Sales".to_string(),
                mark: Mark::Line,
                role: SeriesRole::Predicted,
                points: predicted,
            },
        ],
        band: Some(Band {
            label: "Confidence Range".to_string(),
            points: band,
        }),
        x_ticks: stepped_ticks(max_x, config.forecast_tick_target),
    }
}

fn bucket_points(buckets: &[Bucket]) -> Vec<(f64, f64)> {
    buckets.iter().map(|b| (b.index as f64, b.revenue)).collect()
}
