//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the loader, the analysis steps and the chart builders
//! - exported to JSON/CSV
//! - rendered by any presentation sink (ASCII, TUI)

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the revenue column the loader looks for by default.
pub const DEFAULT_REVENUE_COLUMN: &str = "Daily_Revenue";

/// Optional column used only to annotate the load summary with a date range.
pub const DEFAULT_DATE_COLUMN: &str = "Date";

/// Rows kept after loading ("last 2 years").
pub const DEFAULT_MAX_ROWS: usize = 730;

/// Longest projection a forecast may request, in days.
pub const MAX_FORECAST_HORIZON: usize = 3650;

/// One observation: 1-based day index and the revenue booked that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRevenue {
    pub day: usize,
    pub revenue: f64,
}

/// Ordered daily revenue, indexed `1..=len` with no gaps.
///
/// The series is immutable once built. Derived series (see [`RevenueSeries::tail`])
/// are new values renumbered from day 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    points: Vec<DayRevenue>,
}

impl RevenueSeries {
    /// Build a series from revenue amounts in chronological order.
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let points = amounts
            .into_iter()
            .enumerate()
            .map(|(idx, revenue)| DayRevenue { day: idx + 1, revenue })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[DayRevenue] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the most recent day, or 0 for an empty series.
    pub fn last_day(&self) -> usize {
        self.points.last().map(|p| p.day).unwrap_or(0)
    }

    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.revenue)
    }

    /// The last `n` days as a new series renumbered from 1.
    pub fn tail(&self, n: usize) -> RevenueSeries {
        let start = self.points.len().saturating_sub(n);
        Self::from_amounts(self.points[start..].iter().map(|p| p.revenue))
    }
}

/// Bucket width for the aggregated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketSize {
    Week,
    Month,
}

impl BucketSize {
    pub fn days(self) -> usize {
        match self {
            BucketSize::Week => 7,
            BucketSize::Month => 30,
        }
    }
}

/// Summed revenue over a contiguous run of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// 1-based bucket number.
    pub index: usize,
    pub revenue: f64,
    /// Days actually covered; the final bucket may be shorter than the bucket size.
    pub days: usize,
}

/// `revenue = intercept + slope * day`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, day: f64) -> f64 {
        self.intercept + self.slope * day
    }
}

/// Output of a forecast request.
///
/// The band is a fixed percentage envelope around each prediction. It is a visual
/// guide only and carries no statistical meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub fit: LinearFit,
    /// Most recent actual observations kept for display.
    pub recent: Vec<DayRevenue>,
    /// Day indices immediately after the last observed day.
    pub future_days: Vec<usize>,
    pub predicted: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// First retained actual day; display positions are shifted so it maps to 1.
    pub display_origin: usize,
}

impl ForecastResult {
    /// Map a day index onto the rescaled display axis.
    pub fn display_x(&self, day: usize) -> f64 {
        day as f64 - self.display_origin as f64 + 1.0
    }
}

/// Forecaster knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Number of future days to project.
    pub horizon: usize,
    /// Share of the most recent observations shown next to the projection.
    pub recent_fraction: f64,
    /// Half-width of the envelope as a fraction of the prediction.
    pub band_fraction: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon: 30,
            recent_fraction: 0.25,
            band_fraction: 0.10,
        }
    }
}

/// Run configuration shared by the CLI and the TUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesConfig {
    pub revenue_column: String,
    pub date_column: String,
    /// Rows retained after loading (oldest dropped first).
    pub max_rows: usize,

    /// Weekly view window, in weeks.
    pub weekly_window_weeks: usize,
    /// Monthly view window, in 30-day months.
    pub monthly_window_months: usize,

    pub daily_display_points: usize,
    pub weekly_display_points: usize,
    pub monthly_display_points: usize,

    /// Roughly how many x-axis labels each view shows.
    pub daily_tick_target: usize,
    pub weekly_tick_target: usize,
    pub monthly_tick_target: usize,
    pub forecast_tick_target: usize,

    pub forecast: ForecastParams,
    pub currency_symbol: String,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            revenue_column: DEFAULT_REVENUE_COLUMN.to_string(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            weekly_window_weeks: 104,
            monthly_window_months: 24,
            daily_display_points: 50,
            weekly_display_points: 50,
            monthly_display_points: 15,
            daily_tick_target: 20,
            weekly_tick_target: 10,
            monthly_tick_target: 10,
            forecast_tick_target: 10,
            forecast: ForecastParams::default(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl SalesConfig {
    /// Reject settings that would make an action meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.revenue_column.trim().is_empty() {
            return Err(AppError::Usage("Revenue column name must not be empty.".to_string()));
        }
        if self.max_rows == 0 {
            return Err(AppError::Usage("`--max-rows` must be at least 1.".to_string()));
        }
        if self.weekly_window_weeks == 0 || self.monthly_window_months == 0 {
            return Err(AppError::Usage("View windows must be at least 1 bucket.".to_string()));
        }
        if self.forecast.horizon == 0 || self.forecast.horizon > MAX_FORECAST_HORIZON {
            return Err(AppError::Usage(format!(
                "`--horizon` must be between 1 and {MAX_FORECAST_HORIZON} days."
            )));
        }
        let recent = self.forecast.recent_fraction;
        if !recent.is_finite() || recent <= 0.0 || recent > 1.0 {
            return Err(AppError::Usage("`--recent` must be in (0, 1].".to_string()));
        }
        let band = self.forecast.band_fraction;
        if !band.is_finite() || !(0.0..1.0).contains(&band) {
            return Err(AppError::Usage("`--band` must be in [0, 1).".to_string()));
        }
        Ok(())
    }

    pub fn y_label(&self) -> String {
        format!("Revenue ({})", self.currency_symbol)
    }
}
