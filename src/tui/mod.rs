//! Ratatui-based terminal UI.
//!
//! The TUI is a thin shell around [`Session::dispatch`]: each key maps to one
//! action, the action runs to completion, and the response becomes either the
//! chart on screen or a notice in the status line.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::app::session::{Action, RenderCommand, Response, Session};
use crate::chart::ChartSpec;
use crate::cli::picker::{pretty_path, CsvPicker};
use crate::domain::SalesConfig;
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::SalesPlottersChart;

/// Start the TUI, optionally loading `initial` right away.
pub fn run(config: SalesConfig, initial: Option<PathBuf>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::Terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    if let Some(path) = initial {
        app.apply(Action::Load(path));
    }
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

struct App {
    config: SalesConfig,
    session: Session,
    view: Option<RenderCommand>,
    picker: Option<CsvPicker>,
    status: String,
    status_kind: StatusKind,
}

impl App {
    fn new(config: SalesConfig) -> Self {
        Self {
            config,
            session: Session::new(),
            view: None,
            picker: None,
            status: "Press o to open a CSV.".to_string(),
            status_kind: StatusKind::Info,
        }
    }

    /// Run one action and fold its response into the screen state.
    fn apply(&mut self, action: Action) {
        let session = std::mem::take(&mut self.session);
        let (session, response) = session.dispatch(action, &self.config);
        self.session = session;

        match response {
            Response::Loaded { .. } => {
                self.view = None;
                if let Some(dataset) = self.session.dataset() {
                    self.status = crate::report::format_load_notice(dataset, &self.config);
                }
                self.status_kind = StatusKind::Info;
            }
            Response::Render(command) => {
                self.status = crate::report::format_chart_caption(&command.chart);
                self.status_kind = StatusKind::Info;
                self.view = Some(command);
            }
            Response::Failed(err) => {
                // Nothing from the failed action is drawn.
                self.view = None;
                self.status = format!("Error: {err}");
                self.status_kind = StatusKind::Error;
            }
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::Terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::Terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::Terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.picker.is_some() {
            self.handle_picker_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('o') => self.open_picker(),
            KeyCode::Char('d') => self.apply(Action::ShowDaily),
            KeyCode::Char('w') => self.apply(Action::ShowWeekly),
            KeyCode::Char('m') => self.apply(Action::ShowMonthly),
            KeyCode::Char('f') => self.apply(Action::Forecast),
            _ => {}
        }
        false
    }

    fn open_picker(&mut self) {
        let picker = CsvPicker::scan(std::path::Path::new("."));
        if picker.is_empty() {
            self.status = "No .csv files found under the current directory.".to_string();
            self.status_kind = StatusKind::Error;
            return;
        }
        self.picker = Some(picker);
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match code {
            KeyCode::Up => picker.up(),
            KeyCode::Down => picker.down(),
            KeyCode::Esc => {
                self.picker = None;
                self.status = "Open canceled.".to_string();
                self.status_kind = StatusKind::Info;
            }
            KeyCode::Enter => {
                let path = picker.selected().map(|p| p.to_path_buf());
                self.picker = None;
                if let Some(path) = path {
                    self.apply(Action::Load(path));
                }
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Some(picker) = &self.picker {
            draw_picker(frame, size, picker);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sales", Style::default().fg(Color::Cyan)),
            Span::raw(" | revenue trends and forecast"),
        ]));

        let detail = match self.session.dataset() {
            Some(dataset) => {
                let mut s = format!(
                    "file: {} | days: {}",
                    pretty_path(&dataset.source),
                    dataset.rows_kept()
                );
                if let Some(stats) = &dataset.stats {
                    s.push_str(&format!(
                        " | total: {}{:.2} | mean: {}{:.2}",
                        self.config.currency_symbol, stats.total, self.config.currency_symbol, stats.mean
                    ));
                }
                if let Some(result) = self.view.as_ref().and_then(|v| v.forecast.as_ref()) {
                    s.push_str(&format!(
                        " | trend: {:+.2}/day",
                        result.fit.slope
                    ));
                }
                s
            }
            None => "no dataset loaded".to_string(),
        };
        lines.push(Line::from(Span::styled(detail, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self
            .view
            .as_ref()
            .map(|v| v.chart.title.clone())
            .unwrap_or_else(|| "Chart".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = &self.view else {
            let msg = Paragraph::new("d daily · w weekly · m monthly · f forecast")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(msg, inner);
            return;
        };

        let chart = &view.chart;
        let x_bounds = chart.x_bounds();
        let y_bounds = chart.y_bounds();

        let (chart_rect, axis_rows) = chart_layout(inner);
        frame.render_widget(
            SalesPlottersChart {
                chart,
                x_bounds,
                y_bounds,
            },
            chart_rect,
        );
        if let Some(axis_rows) = axis_rows {
            draw_x_axis(frame, chart_rect, axis_rows, chart, x_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "o open  d daily  w weekly  m monthly  f forecast  q quit";
        let status_color = match self.status_kind {
            StatusKind::Info => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(status_color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Split the chart area into the plot and the two rows below it for tick labels
/// and the axis caption.
fn chart_layout(inner: Rect) -> (Rect, Option<Rect>) {
    const AXIS_ROWS: u16 = 2;
    if inner.height <= AXIS_ROWS + 8 || inner.width < 20 {
        return (inner, None);
    }

    let chart = Rect {
        height: inner.height - AXIS_ROWS,
        ..inner
    };
    let axis = Rect {
        y: inner.y + chart.height,
        height: AXIS_ROWS,
        ..inner
    };
    (chart, Some(axis))
}

/// Column of `x` inside a plot of `width` cells whose left label area is `left` cells.
fn tick_column(x: f64, x_bounds: [f64; 2], left: u16, width: u16) -> u16 {
    let plot_width = width.saturating_sub(left + 2).max(1);
    let u = ((x - x_bounds[0]) / (x_bounds[1] - x_bounds[0])).clamp(0.0, 1.0);
    left + 1 + ((plot_width - 1) as f64 * u).round() as u16
}

fn draw_x_axis(frame: &mut ratatui::Frame<'_>, chart: Rect, axis: Rect, spec: &ChartSpec, x_bounds: [f64; 2]) {
    let style = Style::default().fg(Color::Gray);
    // Matches the Plotters left label area + margin.
    let left = 9u16;

    let mut next_free = 0u16;
    for &t in &spec.x_ticks {
        let label = format!("{t:.0}");
        let len = label.len() as u16;
        let col = tick_column(t, x_bounds, left, chart.width);
        let start = col.saturating_sub(len / 2).min(chart.width.saturating_sub(len));
        if start < next_free {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: chart.x + start,
                y: axis.y,
                width: len,
                height: 1,
            },
        );
        next_free = start + len + 1;
    }

    let caption = Paragraph::new(format!("{} · {}", spec.x_label, spec.y_label))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    frame.render_widget(
        caption,
        Rect {
            y: axis.y + 1,
            height: 1,
            ..axis
        },
    );
}

fn draw_picker(frame: &mut ratatui::Frame<'_>, area: Rect, picker: &CsvPicker) {
    let width = area.width.saturating_sub(8).min(80);
    let height = (picker.files().len() as u16 + 2).min(area.height.saturating_sub(4)).max(3);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let items: Vec<ListItem> = picker
        .files()
        .iter()
        .map(|p| ListItem::new(pretty_path(p)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title("Open CSV (Enter load, Esc cancel)")
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");

    let mut state = ListState::default();
    state.select(Some(picker.selected_index()));
    frame.render_widget(Clear, rect);
    frame.render_stateful_widget(list, rect, &mut state);
}
