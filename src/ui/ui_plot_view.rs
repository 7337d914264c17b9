use std::sync::Arc;

use eframe::egui::{self, Color32};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

use crate::analysis::PredictionReport;
use crate::analysis::moving_average::defined_points;
use crate::config::ANALYSIS;
use crate::config::plot::PLOT_CONFIG;
use crate::engine::{ChartDetail, LoadedHistory};
use crate::ui::config::UI_TEXT;
use crate::ui::utils::{date_at_index, format_price};

/// Plot-ready series for one history, rebuilt only when the history changes.
struct SeriesCache {
    source: Arc<LoadedHistory>,
    close: Vec<[f64; 2]>,
    short_ma: Vec<[f64; 2]>,
    long_ma: Vec<[f64; 2]>,
}

#[derive(Default)]
pub struct PlotView {
    cache: Option<SeriesCache>,
}

impl PlotView {
    pub fn new() -> Self {
        Self { cache: None }
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    fn series_for(&mut self, loaded: &Arc<LoadedHistory>) -> &SeriesCache {
        if self
            .cache
            .as_ref()
            .is_some_and(|c| !Arc::ptr_eq(&c.source, loaded))
        {
            self.cache = None;
        }
        self.cache.get_or_insert_with(|| SeriesCache {
            source: loaded.clone(),
            close: indexed(&loaded.closes),
            short_ma: defined_points(&loaded.short_ma),
            long_ma: defined_points(&loaded.long_ma),
        })
    }

    /// Close over time, plus the moving averages the tier calls for.
    pub fn show_price_chart(&mut self, ui: &mut egui::Ui, loaded: &Arc<LoadedHistory>, detail: ChartDetail) {
        let dates = loaded.dates.clone();
        let series = self.series_for(loaded);

        let (close_color, short_color) = match detail {
            ChartDetail::Hard => (PLOT_CONFIG.hard_close_color, PLOT_CONFIG.hard_short_ma_color),
            _ => (PLOT_CONFIG.close_color, PLOT_CONFIG.short_ma_color),
        };

        let mut lines = vec![line(UI_TEXT.label_close, &series.close, close_color)];
        if detail.shows_short_ma() {
            let name = format!("MA{}", ANALYSIS.moving_average.short_window);
            lines.push(line(name, &series.short_ma, short_color));
        }
        if detail.shows_long_ma() {
            let name = format!("MA{}", ANALYSIS.moving_average.long_window);
            lines.push(line(name, &series.long_ma, PLOT_CONFIG.hard_long_ma_color));
        }

        ui.label(detail.title());
        Plot::new(("price_chart", detail))
            .view_aspect(PLOT_CONFIG.plot_aspect_ratio)
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_label(UI_TEXT.plot_x_axis_time)
            .y_axis_label(UI_TEXT.plot_y_axis_price)
            .x_axis_formatter(move |mark, _range| date_at_index(&dates, mark.value))
            .y_axis_formatter(|mark, _range| format_price(mark.value))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\n{}", name, format_price(value.y))
                }
            })
            .show(ui, |plot_ui| {
                for l in lines {
                    plot_ui.line(l);
                }
            });
    }

    /// Actual vs predicted over the testing range, x in days since the split.
    pub fn show_prediction_chart(&self, ui: &mut egui::Ui, report: &PredictionReport) {
        let actual: Vec<[f64; 2]> = indexed(&report.actual);
        let predicted: Vec<[f64; 2]> = indexed(&report.predicted);

        ui.label(UI_TEXT.prediction_title);
        Plot::new("prediction_chart")
            .view_aspect(PLOT_CONFIG.plot_aspect_ratio)
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_label(UI_TEXT.plot_x_axis_days)
            .y_axis_label(UI_TEXT.plot_y_axis_price)
            .y_axis_formatter(|mark, _range| format_price(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(line(UI_TEXT.label_actual, &actual, PLOT_CONFIG.actual_price_color));
                plot_ui.line(line(
                    UI_TEXT.label_predicted,
                    &predicted,
                    PLOT_CONFIG.predicted_price_color,
                ));
            });
    }
}

fn indexed(values: &[f64]) -> Vec<[f64; 2]> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| [i as f64, *v])
        .collect()
}

fn line(name: impl Into<String>, points: &[[f64; 2]], color: Color32) -> Line<'static> {
    Line::new(name, PlotPoints::new(points.to_vec()))
        .color(color)
        .width(PLOT_CONFIG.line_width)
}
