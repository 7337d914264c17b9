use chrono::NaiveDate;
use eframe::egui::{Context, RichText, Ui, Visuals};

use crate::ui::config::UI_CONFIG;
use crate::utils::time_utils;

/// Creates a colored heading with uppercase text and monospace font
pub fn colored_heading(text: impl Into<String>) -> RichText {
    let uppercase_text = text.into().to_uppercase() + ":";
    RichText::new(uppercase_text)
        .color(UI_CONFIG.colors.heading)
        .monospace()
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;

    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;

    ctx.set_visuals(visuals);
}

/// Creates a section heading with standard spacing
pub fn section_heading(ui: &mut Ui, text: impl Into<String>) {
    ui.add_space(10.0);
    ui.heading(colored_heading(text));
    ui.add_space(5.0);
}

/// Creates a separator with standard spacing
pub fn spaced_separator(ui: &mut Ui) {
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Dollar price with cents, thousands separated ("$1,234.56").
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "n/a".to_string();
    }
    let sign = if price < 0.0 { "-" } else { "" };
    let cents = (price.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, frac)
}

/// Axis label for a bar index, using the date when the index is in range.
pub fn date_at_index(dates: &[NaiveDate], x: f64) -> String {
    let rounded = x.round();
    if rounded < 0.0 || (x - rounded).abs() > 1e-6 {
        return String::new();
    }
    dates
        .get(rounded as usize)
        .map(|d| time_utils::format_date(*d))
        .unwrap_or_default()
}
