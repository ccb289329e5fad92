//! Chart rendering for aggregated series.

mod chart;
mod styles;

pub use chart::{draw_chart, label_stride, render_chart, tick_label, value_range};
pub use styles::{ChartStyle, ChartTheme};
