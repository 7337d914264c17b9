//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    pub close_color: Color32,
    // Medium chart keeps the MA100 in the default accent, Hard chart uses red/green/blue
    pub short_ma_color: Color32,
    pub hard_short_ma_color: Color32,
    pub hard_long_ma_color: Color32,
    pub hard_close_color: Color32,
    pub actual_price_color: Color32,
    pub predicted_price_color: Color32,
    pub line_width: f32,
    /// Plot aspect ratio (width:height)
    pub plot_aspect_ratio: f32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    close_color: Color32::from_rgb(31, 119, 180),   // Blue
    short_ma_color: Color32::from_rgb(255, 127, 14), // Orange
    hard_short_ma_color: Color32::from_rgb(220, 40, 40), // Red
    hard_long_ma_color: Color32::from_rgb(40, 170, 60), // Green
    hard_close_color: Color32::from_rgb(40, 90, 220), // Blue
    actual_price_color: Color32::from_rgb(40, 90, 220),
    predicted_price_color: Color32::from_rgb(220, 40, 40),
    line_width: 1.5,
    plot_aspect_ratio: 2.0,
};
