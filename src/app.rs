//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the CSV to load
//! - runs one action through the session dispatcher
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, DataArgs, ForecastArgs, PlotArgs, ViewArgs};
use crate::domain::SalesConfig;
use crate::error::AppError;

pub mod session;

use session::{Action, Response, Session};

/// Environment variable naming a default CSV (also read from `.env`).
pub const CSV_ENV_VAR: &str = "SALES_CSV";
/// Revenue column used when `--column` is absent.
pub const COLUMN_ENV_VAR: &str = "SALES_COLUMN";
/// Row cap used when `--max-rows` is absent.
pub const MAX_ROWS_ENV_VAR: &str = "SALES_MAX_ROWS";

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `sales` and `sales -f data.csv` to behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Daily(args) => handle_view(args, Action::ShowDaily),
        Command::Weekly(args) => handle_view(args, Action::ShowWeekly),
        Command::Monthly(args) => handle_view(args, Action::ShowMonthly),
        Command::Forecast(args) => handle_forecast(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_view(args: ViewArgs, action: Action) -> Result<(), AppError> {
    let config = config_from_data_args(&args.data)?;
    run_view(&args, action, &config).map(|_| ())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = config_from_forecast_args(&args)?;
    let forecast = run_view(&args.view, Action::Forecast, &config)?;

    if let Some(path) = &args.export {
        let result = forecast.ok_or_else(|| AppError::Data("No forecast to export.".to_string()))?;
        crate::io::export::write_forecast_csv(path, &result)?;
    }
    Ok(())
}

/// Load, run `action`, print the chart; returns the forecast when there is one.
fn run_view(
    args: &ViewArgs,
    action: Action,
    config: &SalesConfig,
) -> Result<Option<crate::domain::ForecastResult>, AppError> {
    config.validate()?;
    let path = resolve_csv_path(&args.data, true)?
        .ok_or_else(|| AppError::Usage("No CSV given.".to_string()))?;

    let session = load_session(path, config)?;
    if args.summary {
        if let Some(dataset) = session.dataset() {
            println!("{}", crate::report::format_dataset_summary(dataset, config));
        }
    }

    let (_, response) = session.dispatch(action, config);
    let command = match response {
        Response::Render(command) => command,
        Response::Failed(err) => return Err(err),
        Response::Loaded { .. } => return Ok(None),
    };

    println!("{}", crate::plot::render_chart(&command.chart, args.width, args.height));
    if let Some(result) = &command.forecast {
        println!("{}", crate::report::format_forecast_table(result, config));
    }

    if let Some(path) = &args.export_chart {
        crate::io::export::write_chart_json(path, &command.chart)?;
    }

    Ok(command.forecast)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::export::read_chart_json(&args.chart)?;
    println!("{}", crate::plot::render_chart(&chart, args.width, args.height));
    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    let config = config_from_data_args(&args)?;
    config.validate()?;
    let initial = resolve_csv_path(&args, false)?;
    crate::tui::run(config, initial)
}

/// Load `path` into a fresh session, turning a failed load into an error.
pub fn load_session(path: PathBuf, config: &SalesConfig) -> Result<Session, AppError> {
    let (session, response) = Session::new().dispatch(Action::Load(path), config);
    match response {
        Response::Failed(err) => Err(err),
        _ => {
            if let Some(dataset) = session.dataset() {
                eprintln!("{}", crate::report::format_load_notice(dataset, config));
            }
            Ok(session)
        }
    }
}

/// `-f`, then `SALES_CSV`, then (if allowed) the interactive picker.
fn resolve_csv_path(args: &DataArgs, allow_prompt: bool) -> Result<Option<PathBuf>, AppError> {
    if let Some(path) = &args.file {
        return Ok(Some(path.clone()));
    }
    if let Some(value) = env_value(&|key: &str| std::env::var(key).ok(), CSV_ENV_VAR) {
        return Ok(Some(PathBuf::from(value)));
    }
    if allow_prompt {
        return crate::cli::picker::prompt_for_csv_path().map(Some);
    }
    Ok(None)
}

/// Flags first, then `SALES_COLUMN` / `SALES_MAX_ROWS`, then defaults.
pub fn config_from_data_args(args: &DataArgs) -> Result<SalesConfig, AppError> {
    config_with_env(args, |key| std::env::var(key).ok())
}

pub fn config_from_forecast_args(args: &ForecastArgs) -> Result<SalesConfig, AppError> {
    let mut config = config_from_data_args(&args.view.data)?;
    config.forecast.horizon = args.horizon;
    config.forecast.recent_fraction = args.recent;
    config.forecast.band_fraction = args.band;
    Ok(config)
}

fn config_with_env<F>(args: &DataArgs, env: F) -> Result<SalesConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SalesConfig::default();

    if let Some(column) = args.column.clone().or_else(|| env_value(&env, COLUMN_ENV_VAR)) {
        config.revenue_column = column;
    }

    match args.max_rows {
        Some(rows) => config.max_rows = rows,
        None => {
            if let Some(raw) = env_value(&env, MAX_ROWS_ENV_VAR) {
                config.max_rows = raw.parse().map_err(|_| {
                    AppError::Usage(format!("{MAX_ROWS_ENV_VAR} must be a whole number (got '{raw}')."))
                })?;
            }
        }
    }

    Ok(config)
}

/// Trimmed, non-empty value of `key`.
fn env_value<F>(env: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                      -> `sales tui`
/// - `sales -f data.csv ...`      -> `sales tui -f data.csv ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["sales"])), args(&["sales", "tui"]));
        assert_eq!(
            rewrite_args(args(&["sales", "-f", "x.csv"])),
            args(&["sales", "tui", "-f", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(args(&["sales", "--help"])), args(&["sales", "--help"]));
        assert_eq!(
            rewrite_args(args(&["sales", "weekly", "-f", "x.csv"])),
            args(&["sales", "weekly", "-f", "x.csv"])
        );
    }

    #[test]
    fn forecast_args_flow_into_config() {
        let cli = crate::cli::Cli::parse_from([
            "sales", "forecast", "--column", "Revenue", "--max-rows", "365", "--horizon", "7", "--recent", "0.5",
        ]);
        let Command::Forecast(fa) = cli.command else {
            panic!("expected forecast");
        };
        let config = config_from_forecast_args(&fa).unwrap();
        assert_eq!(config.revenue_column, "Revenue");
        assert_eq!(config.max_rows, 365);
        assert_eq!(config.forecast.horizon, 7);
        assert_eq!(config.forecast.recent_fraction, 0.5);
        assert_eq!(config.forecast.band_fraction, 0.10);
    }

    #[test]
    fn env_fills_data_settings_missing_from_flags() {
        let env = |key: &str| match key {
            COLUMN_ENV_VAR => Some(" Revenue ".to_string()),
            MAX_ROWS_ENV_VAR => Some("90".to_string()),
            _ => None,
        };

        let Command::Daily(args) = crate::cli::Cli::parse_from(["sales", "daily"]).command else {
            panic!("expected daily");
        };
        let config = config_with_env(&args.data, env).unwrap();
        assert_eq!(config.revenue_column, "Revenue");
        assert_eq!(config.max_rows, 90);

        let Command::Daily(args) =
            crate::cli::Cli::parse_from(["sales", "daily", "--column", "Sales", "--max-rows", "10"]).command
        else {
            panic!("expected daily");
        };
        let config = config_with_env(&args.data, env).unwrap();
        assert_eq!(config.revenue_column, "Sales");
        assert_eq!(config.max_rows, 10);
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let Command::Daily(args) = crate::cli::Cli::parse_from(["sales", "daily"]).command else {
            panic!("expected daily");
        };
        assert_eq!(config_with_env(&args.data, |_| None).unwrap(), SalesConfig::default());

        let bad = config_with_env(&args.data, |key| (key == MAX_ROWS_ENV_VAR).then(|| "lots".to_string()));
        assert!(matches!(bad, Err(AppError::Usage(_))));
    }

    fn view_args(list: &[&str]) -> ViewArgs {
        match crate::cli::Cli::parse_from(list).command {
            Command::Daily(args) | Command::Weekly(args) | Command::Monthly(args) => args,
            Command::Forecast(fa) => fa.view,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn run_view_renders_views_and_returns_forecast() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("sales.csv");
        let body: String = std::iter::once("Daily_Revenue\n".to_string())
            .chain((1..=60).map(|d| format!("{}\n", 100 + d)))
            .collect();
        std::fs::write(&csv, body).unwrap();
        let csv_arg = csv.display().to_string();
        let config = SalesConfig::default();

        let chart_json = dir.path().join("weekly.json");
        let json_arg = chart_json.display().to_string();
        let args = view_args(&["sales", "weekly", "-f", &csv_arg, "--export-chart", &json_arg]);
        assert_eq!(run_view(&args, Action::ShowWeekly, &config).unwrap(), None);
        let saved = crate::io::export::read_chart_json(&chart_json).unwrap();
        assert_eq!(saved.kind, crate::chart::ChartKind::WeeklyLine);

        let args = view_args(&["sales", "forecast", "-f", &csv_arg]);
        let result = run_view(&args, Action::Forecast, &config).unwrap().unwrap();
        assert_eq!(result.future_days.first(), Some(&61));
        assert_eq!(result.predicted.len(), 30);
    }

    #[test]
    fn run_view_reports_data_error_for_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("one.csv");
        std::fs::write(&csv, "Daily_Revenue\n5\n").unwrap();
        let csv_arg = csv.display().to_string();

        let args = view_args(&["sales", "forecast", "-f", &csv_arg]);
        let err = run_view(&args, Action::Forecast, &SalesConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Data(_)), "{err:?}");
    }

    #[test]
    fn load_session_surfaces_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Revenue\n1\n").unwrap();

        let err = load_session(path, &SalesConfig::default()).unwrap_err();
        assert!(err.is_format_error());
    }
}
