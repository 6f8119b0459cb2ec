//! Plotters-powered revenue chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! X tick labels are drawn separately by the caller because the chart carries
//! explicit tick positions that Plotters' mesh cannot express.

use plotters::prelude::*;
// Trait only; the `Color` type here is ratatui's.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{ChartSpec, Mark, SeriesRole};

/// A render-only view over a [`ChartSpec`].
///
/// Bounds are computed outside the render call so the caller can align its
/// own tick labels with the plotted area.
pub struct SalesPlottersChart<'a> {
    pub chart: &'a ChartSpec,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let chart_spec = self.chart;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(5)
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let actual_color = RGBColor(0, 170, 255);
            let bar_color = RGBColor(0, 120, 255);
            let predicted_color = RGBColor(255, 60, 60);
            let band_color = RGBColor(140, 30, 30);

            // 1) Band edges first so the prediction overlays them.
            if let Some(band) = &chart_spec.band {
                chart.draw_series(LineSeries::new(band.points.iter().map(|p| (p.0, p.1)), &band_color))?;
                chart.draw_series(LineSeries::new(band.points.iter().map(|p| (p.0, p.2)), &band_color))?;
            }

            // 2) Series.
            for series in &chart_spec.series {
                match (series.mark, series.role) {
                    (Mark::Bar, _) => {
                        let base = 0.0_f64.clamp(y0, y1);
                        chart.draw_series(series.points.iter().map(|&(x, y)| {
                            Rectangle::new([(x - 0.35, base), (x + 0.35, y)], bar_color.filled())
                        }))?;
                    }
                    (Mark::Line, SeriesRole::Actual) => {
                        chart.draw_series(LineSeries::new(series.points.iter().copied(), &actual_color))?;
                    }
                    (Mark::Line, SeriesRole::Predicted) => {
                        chart.draw_series(LineSeries::new(
                            series.points.iter().copied(),
                            &predicted_color,
                        ))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
