//! Command-line parsing for the revenue trend tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analysis code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sales", version, about = "Daily revenue trends and 30-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot daily revenue over the loaded window.
    Daily(ViewArgs),
    /// Plot weekly revenue sums.
    Weekly(ViewArgs),
    /// Plot monthly (30-day) revenue sums as bars.
    Monthly(ViewArgs),
    /// Fit a linear trend and project the next days.
    Forecast(ForecastArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// The TUI runs the same actions as the subcommands, but keeps the loaded
    /// dataset around between them.
    Tui(DataArgs),
}

/// Where to read data from and how much of it to keep.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Revenue CSV (falls back to `SALES_CSV`, then an interactive picker).
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Name of the daily revenue column [env: SALES_COLUMN] [default: Daily_Revenue].
    #[arg(long)]
    pub column: Option<String>,

    /// Keep only the most recent N rows after loading [env: SALES_MAX_ROWS] [default: 730].
    #[arg(long)]
    pub max_rows: Option<usize>,
}

/// Options shared by the chart subcommands.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Also print the dataset summary.
    #[arg(long)]
    pub summary: bool,

    /// Export the rendered chart description to JSON.
    #[arg(long = "export-chart", value_name = "JSON")]
    pub export_chart: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Days to project past the last observation.
    #[arg(long, default_value_t = 30)]
    pub horizon: usize,

    /// Share of the most recent actuals shown next to the projection.
    #[arg(long, default_value_t = 0.25)]
    pub recent: f64,

    /// Half-width of the shaded band as a fraction of each prediction.
    #[arg(long, default_value_t = 0.10)]
    pub band: f64,

    /// Export projected days to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved chart.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Chart JSON file produced by `--export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_flags_parse() {
        let cli = Cli::parse_from([
            "sales", "forecast", "-f", "data.csv", "--horizon", "14", "--band", "0.2", "--export", "out.csv",
        ]);
        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.view.data.file, Some(PathBuf::from("data.csv")));
                assert_eq!(args.horizon, 14);
                assert_eq!(args.band, 0.2);
                assert_eq!(args.recent, 0.25);
                assert_eq!(args.export, Some(PathBuf::from("out.csv")));
                assert!(args.view.data.column.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn view_defaults() {
        let cli = Cli::parse_from(["sales", "monthly"]);
        match cli.command {
            Command::Monthly(args) => {
                assert!(args.data.file.is_none());
                assert!(args.data.max_rows.is_none());
                assert_eq!((args.width, args.height), (100, 25));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
