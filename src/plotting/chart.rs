use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::styles::ChartStyle;
use crate::error::{ChartError, Result};
use crate::types::AggregatedSeries;

const FONT: &str = "sans-serif";

fn plot_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Plot(e.to_string())
}

/// Render an aggregated series to `path`.
///
/// Paths ending in `.svg` are drawn as SVG, everything else as a bitmap whose
/// format follows the extension.
pub fn render_chart(series: &AggregatedSeries, path: &Path, style: &ChartStyle) -> Result<()> {
    let size = (style.width, style.height);
    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_chart(&root, series, style)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_chart(&root, series, style)?;
        root.present().map_err(plot_err)?;
    }

    tracing::info!(path = %path.display(), buckets = series.len(), "rendered chart");
    Ok(())
}

/// Draw sales as bars against the right axis and sums as a line with points
/// against the left axis.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &AggregatedSeries,
    style: &ChartStyle,
) -> Result<()> {
    let theme = style.theme;
    root.fill(&theme.background_color).map_err(plot_err)?;

    let labels = series.labels();
    let sales = series.sales();
    let sums = series.sums();
    let x_max = labels.len().max(1) as f64;

    let (sum_min, sum_max) = value_range(&sums);
    let (sales_min, sales_max) = value_range(&sales);

    let text = |size: f64| (FONT, size).into_font().color(&theme.text_color);

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Sales by {}", series.granularity), text(style.font_size + 10.0))
        .margin(style.margin)
        .x_label_area_size(style.label_area_size)
        .y_label_area_size(style.label_area_size)
        .right_y_label_area_size(style.label_area_size)
        .build_cartesian_2d(0f64..x_max, sum_min..sum_max)
        .map_err(plot_err)?
        .set_secondary_coord(0f64..x_max, sales_min..sales_max);

    let stride = label_stride(labels.len(), style.max_x_labels);
    let x_label_formatter = |x: &f64| tick_label(&labels, stride, *x);

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("Sum (In Thousands)")
        .x_labels(labels.len() + 1)
        .x_label_formatter(&x_label_formatter)
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .label_style(text(style.font_size))
        .draw()
        .map_err(plot_err)?;

    chart
        .configure_secondary_axes()
        .y_desc("Sales")
        .axis_style(theme.axis_color)
        .label_style(text(style.font_size))
        .draw()
        .map_err(plot_err)?;

    let sales_color = theme.sales_color;
    let inset = (1.0 - style.bar_width.clamp(0.0, 1.0)) / 2.0;
    chart
        .draw_secondary_series(sales.iter().enumerate().map(|(i, value)| {
            let x0 = i as f64 + inset;
            let x1 = i as f64 + 1.0 - inset;
            Rectangle::new([(x0, 0.0), (x1, *value)], sales_color.filled())
        }))
        .map_err(plot_err)?
        .label("Sales")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], sales_color.filled()));

    let points: Vec<(f64, f64)> = sums
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64 + 0.5, *value))
        .collect();

    let sum_color = theme.sum_color;
    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            sum_color.stroke_width(style.line_width),
        ))
        .map_err(plot_err)?
        .label("Sum $/K")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], sum_color));

    chart
        .draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, style.point_radius, theme.sum_point_color.filled())),
        )
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, style.point_radius, sum_color.stroke_width(2))),
        )
        .map_err(plot_err)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(theme.background_color.mix(0.8))
        .border_style(theme.axis_color)
        .label_font(text(style.font_size))
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

/// Y-axis bounds for a set of values: always includes zero, with 10% headroom.
pub fn value_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max - min <= f64::EPSILON {
        return (min, min + 1.0);
    }
    let pad = (max - min) * 0.1;
    let lower = if min < 0.0 { min - pad } else { min };
    let upper = if max > 0.0 { max + pad } else { max };
    (lower, upper)
}

/// Show every `stride`-th label so that at most `max_labels` are drawn.
pub fn label_stride(count: usize, max_labels: usize) -> usize {
    if max_labels == 0 || count <= max_labels {
        1
    } else {
        count.div_ceil(max_labels)
    }
}

/// Label for an x-axis tick; ticks between buckets or skipped by the stride
/// stay blank.
pub fn tick_label(labels: &[String], stride: usize, x: f64) -> String {
    if x < 0.0 || (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    let idx = x.round() as usize;
    match labels.get(idx) {
        Some(label) if idx % stride.max(1) == 0 => label.clone(),
        _ => String::new(),
    }
}
