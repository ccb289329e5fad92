use plotters::style::{RGBAColor, RGBColor};

use crate::config::PlotConfig;

/// Chart theme configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Fill of the sales bars
    pub sales_color: RGBAColor,
    /// Stroke of the sum line and its point borders
    pub sum_color: RGBColor,
    /// Fill of the sum line's points
    pub sum_point_color: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(0, 0, 0, 0.85),
            grid_color: RGBAColor(0, 0, 0, 0.1),
            axis_color: RGBAColor(0, 0, 0, 1.0),
            sales_color: RGBAColor(173, 216, 230, 0.7),
            sum_color: RGBColor(255, 215, 0),
            sum_point_color: RGBColor(255, 255, 255),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub theme: ChartTheme,
    pub line_width: u32,
    pub font_size: f64,
    pub margin: u32,
    pub label_area_size: u32,
    /// Fraction of a bucket's width covered by its bar
    pub bar_width: f64,
    pub point_radius: u32,
    /// Upper bound on x-axis labels drawn; the rest are skipped
    pub max_x_labels: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            theme: ChartTheme::default(),
            line_width: 1,
            font_size: 15.0,
            margin: 15,
            label_area_size: 60,
            bar_width: 1.0,
            point_radius: 3,
            max_x_labels: 24,
        }
    }
}

impl From<&PlotConfig> for ChartStyle {
    fn from(plot: &PlotConfig) -> Self {
        Self {
            width: plot.width,
            height: plot.height,
            ..Self::default()
        }
    }
}
