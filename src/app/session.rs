//! Session state and the action dispatcher shared by the CLI and TUI front ends.
//!
//! Every user action is a function of `(session, action)` producing the next
//! session and a response for the front end to show:
//!
//! load-file -> ingest, show-* -> aggregate/downsample, forecast -> fit/project.
//!
//! Only [`Action::Load`] may replace the dataset. Errors never escape
//! [`Session::dispatch`]; they come back as [`Response::Failed`].

use std::path::PathBuf;

use crate::chart::{self, ChartSpec};
use crate::domain::{ForecastResult, SalesConfig};
use crate::error::AppError;
use crate::io::ingest::{LoadedDataset, load_revenue_csv};

/// A user-triggered action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Load(PathBuf),
    ShowDaily,
    ShowWeekly,
    ShowMonthly,
    Forecast,
}

/// What a front end should render after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A dataset was loaded; `rows_kept` is the retained series length.
    Loaded { source: PathBuf, rows_read: usize, rows_kept: usize },
    Render(RenderCommand),
    Failed(AppError),
}

/// A chart to draw, plus the forecast it came from when applicable.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand {
    pub chart: ChartSpec,
    pub forecast: Option<ForecastResult>,
}

/// The loaded dataset, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    dataset: Option<LoadedDataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Run one action to completion.
    pub fn dispatch(self, action: Action, config: &SalesConfig) -> (Session, Response) {
        match action {
            Action::Load(path) => self.load(path, config),
            Action::ShowDaily => self.render(config, |s, c| chart::daily_chart(s, c).map(plain)),
            Action::ShowWeekly => self.render(config, |s, c| chart::weekly_chart(s, c).map(plain)),
            Action::ShowMonthly => self.render(config, |s, c| chart::monthly_chart(s, c).map(plain)),
            Action::Forecast => self.render(config, |s, c| {
                chart::forecast_chart(s, c).map(|(chart, result)| RenderCommand {
                    chart,
                    forecast: Some(result),
                })
            }),
        }
    }

    fn load(self, path: PathBuf, config: &SalesConfig) -> (Session, Response) {
        match load_revenue_csv(&path, config) {
            Ok(dataset) => {
                let response = Response::Loaded {
                    source: dataset.source.clone(),
                    rows_read: dataset.rows_read,
                    rows_kept: dataset.rows_kept(),
                };
                (Session { dataset: Some(dataset) }, response)
            }
            // A file without the revenue column clears the dataset.
            Err(err @ AppError::MissingColumn(_)) => {
                log::warn!("load of '{}' rejected: {err}", path.display());
                (Session { dataset: None }, Response::Failed(err))
            }
            Err(err) => {
                log::warn!("load of '{}' failed: {err}", path.display());
                (self, Response::Failed(err))
            }
        }
    }

    fn render<F>(self, config: &SalesConfig, build: F) -> (Session, Response)
    where
        F: FnOnce(&crate::domain::RevenueSeries, &SalesConfig) -> Result<RenderCommand, AppError>,
    {
        let result = match &self.dataset {
            Some(dataset) if !dataset.is_empty() => build(&dataset.series, config),
            _ => Err(AppError::EmptyDataset),
        };

        let response = match result {
            Ok(command) => Response::Render(command),
            Err(err) => {
                log::warn!("action failed: {err}");
                Response::Failed(err)
            }
        };
        (self, response)
    }
}

fn plain(chart: ChartSpec) -> RenderCommand {
    RenderCommand { chart, forecast: None }
}
