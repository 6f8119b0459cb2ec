//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - actual values: `o` markers joined by `-`
//! - predicted values: `:` line
//! - band edges: `.`
//! - bars: `#` columns from the zero line

use crate::chart::{ChartSpec, Mark, SeriesRole};

/// Render a chart into a text block of roughly `width` × `height` cells.
pub fn render_chart(chart: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let [x_min, x_max] = chart.x_bounds();
    let [y_min, y_max] = chart.y_bounds();
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    let mut grid = vec![vec![' '; width]; height];

    // Band first so series can overlay it.
    if let Some(band) = &chart.band {
        let lower: Vec<(f64, f64)> = band.points.iter().map(|p| (p.0, p.1)).collect();
        let upper: Vec<(f64, f64)> = band.points.iter().map(|p| (p.0, p.2)).collect();
        draw_polyline(&mut grid, &frame, &lower, '.');
        draw_polyline(&mut grid, &frame, &upper, '.');
    }

    for series in &chart.series {
        match (series.mark, series.role) {
            (Mark::Bar, _) => draw_bars(&mut grid, &frame, &series.points),
            (Mark::Line, SeriesRole::Predicted) => draw_polyline(&mut grid, &frame, &series.points, ':'),
            (Mark::Line, SeriesRole::Actual) => {
                draw_polyline(&mut grid, &frame, &series.points, '-');
                for &(x, y) in &series.points {
                    grid[frame.row(y)][frame.col(x)] = 'o';
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{} | x=[{x_min:.0}, {x_max:.0}] | y=[{y_min:.2}, {y_max:.2}]\n",
        chart.title
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out.push_str(tick_row(&chart.x_ticks, &frame).trim_end());
    out.push('\n');
    out.push_str(&format!("x: {} | y: {}\n", chart.x_label, chart.y_label));

    let legend = legend(chart);
    if !legend.is_empty() {
        out.push_str(&legend);
        out.push('\n');
    }

    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

impl Frame {
    fn col(&self, x: f64) -> usize {
        let u = ((x - self.x_min) / (self.x_max - self.x_min)).clamp(0.0, 1.0);
        (u * (self.width as f64 - 1.0)).round() as usize
    }

    fn row(&self, y: f64) -> usize {
        let u = ((y - self.y_min) / (self.y_max - self.y_min)).clamp(0.0, 1.0);
        // y=top is max -> row 0
        (self.height as f64 - 1.0 - (u * (self.height as f64 - 1.0))).round() as usize
    }
}

fn draw_polyline(grid: &mut [Vec<char>], frame: &Frame, points: &[(f64, f64)], ch: char) {
    let mut prev = None;
    for &(x, y) in points {
        let (c, r) = (frame.col(x), frame.row(y));
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, c, r, ch),
            None => grid[r][c] = ch,
        }
        prev = Some((c, r));
    }
}

fn draw_bars(grid: &mut [Vec<char>], frame: &Frame, points: &[(f64, f64)]) {
    let base = frame.row(0.0);
    for &(x, y) in points {
        let c = frame.col(x);
        let top = frame.row(y);
        let (r0, r1) = if top <= base { (top, base) } else { (base, top) };
        for row in grid.iter_mut().take(r1 + 1).skip(r0) {
            row[c] = '#';
        }
    }
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Tick labels placed under their column; labels that would overlap are dropped.
fn tick_row(ticks: &[f64], frame: &Frame) -> String {
    let mut row = vec![' '; frame.width];
    let mut next_free = 0usize;

    for &t in ticks {
        let label = format!("{t:.0}");
        let len = label.chars().count();
        if len > frame.width {
            continue;
        }
        let start = frame.col(t).min(frame.width - len);
        if start < next_free {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            row[start + i] = ch;
        }
        next_free = start + len + 1;
    }

    row.into_iter().collect()
}

fn legend(chart: &ChartSpec) -> String {
    let mut parts = Vec::new();
    for s in &chart.series {
        let glyph = match (s.mark, s.role) {
            (Mark::Bar, _) => '#',
            (Mark::Line, SeriesRole::Actual) => 'o',
            (Mark::Line, SeriesRole::Predicted) => ':',
        };
        parts.push(format!("{glyph} {}", s.label));
    }
    if let Some(band) = &chart.band {
        parts.push(format!(". {}", band.label));
    }
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, Series};
    use crate::domain::{RevenueSeries, SalesConfig};

    fn line_chart(points: Vec<(f64, f64)>, ticks: Vec<f64>) -> ChartSpec {
        ChartSpec {
            kind: ChartKind::DailyLine,
            title: "T".to_string(),
            x_label: "Days".to_string(),
            y_label: "Revenue".to_string(),
            series: vec![Series {
                label: "Daily Revenue".to_string(),
                mark: Mark::Line,
                role: SeriesRole::Actual,
                points,
            }],
            band: None,
            x_ticks: ticks,
        }
    }

    #[test]
    fn rising_line_runs_bottom_left_to_top_right() {
        let chart = line_chart(vec![(1.0, 0.0), (2.0, 10.0)], vec![1.0, 2.0]);
        let txt = render_chart(&chart, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines[0], "T | x=[1, 2] | y=[-0.50, 10.50]");
        // Five grid rows follow the header.
        assert!(lines[1].ends_with('o'));
        assert!(lines[5].starts_with('o'));
        assert_eq!(lines[6], "1        2");
        assert_eq!(lines[7], "x: Days | y: Revenue");
        assert_eq!(lines[8], "o Daily Revenue");
    }

    #[test]
    fn overlapping_tick_labels_are_dropped() {
        let ticks: Vec<f64> = (1..=100).map(|t| t as f64).collect();
        let points = vec![(1.0, 1.0), (100.0, 2.0)];
        let txt = render_chart(&line_chart(points, ticks), 20, 5);
        let tick_line = txt.lines().nth(6).unwrap();
        assert!(tick_line.starts_with("1 "));
        assert!(tick_line.len() <= 20);
    }

    #[test]
    fn monthly_bars_fill_columns() {
        let series = RevenueSeries::from_amounts(std::iter::repeat(10.0).take(90));
        let chart = crate::chart::monthly_chart(&series, &SalesConfig::default()).unwrap();
        let txt = render_chart(&chart, 30, 8);

        let bars = txt.lines().skip(1).take(8).filter(|l| l.contains('#')).count();
        // Equal bars span every row between the zero line and the top.
        assert_eq!(bars, 8);
        assert!(txt.contains("# Monthly Revenue"));
    }

    #[test]
    fn forecast_shows_band_and_prediction() {
        let series = RevenueSeries::from_amounts((1..=60).map(|d| 100.0 + d as f64));
        let (chart, _) = crate::chart::forecast_chart(&series, &SalesConfig::default()).unwrap();
        let txt = render_chart(&chart, 80, 20);

        assert!(txt.starts_with("Sales Forecast (Next 30 Days)"));
        let grid: String = txt.lines().skip(1).take(20).collect();
        assert!(grid.contains(':'));
        assert!(grid.contains('.'));
        assert!(grid.contains('o'));
        assert!(txt.contains("o Recent Sales Data  : Predicted Sales  . Confidence Range"));
    }
}
