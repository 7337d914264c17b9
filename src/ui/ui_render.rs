use eframe::egui::{CentralPanel, Context, Frame, RichText, ScrollArea, SidePanel, TopBottomPanel, Ui};

use crate::engine::DashboardState;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{
    ChartSelectorPanel, InputEvent, InputPanel, ModelEvent, ModelPanel, Panel, render_stats_table,
};
use crate::ui::utils::{format_price, section_heading};
use crate::utils::time_utils;

use super::app::StockTrendApp;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

impl StockTrendApp {
    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let side_panel_frame = Frame::new().fill(UI_CONFIG.colors.side_panel).inner_margin(8.0);
        SidePanel::left("left_panel")
            .min_width(UI_CONFIG.side_panel_min_width)
            .frame(side_panel_frame)
            .show(ctx, |ui| {
                let end_date = self.end_date();
                let busy = self.engine.as_ref().is_some_and(|e| e.is_busy());
                let source = self
                    .engine
                    .as_ref()
                    .map(|e| e.sources.describe())
                    .unwrap_or_default();

                let input_events =
                    InputPanel::new(&mut self.ticker, &mut self.start_date, end_date, source, busy)
                        .render(ui);

                let loading = self.is_model_loading();
                let (description, model_error) = match &self.engine {
                    Some(engine) => (engine.model_description(), engine.model_error().cloned()),
                    None => (None, None),
                };
                let model_events =
                    ModelPanel::new(&mut self.model_path, description, model_error.as_ref(), loading)
                        .render(ui);

                self.render_pipeline_settings(ui);

                for event in input_events {
                    match event {
                        InputEvent::Fetch { ticker, start } => self.request_history(&ticker, start),
                        InputEvent::Reset => {
                            self.visible_chart = None;
                            self.plot_view.clear_cache();
                            if let Some(engine) = self.engine.as_mut() {
                                engine.reset();
                            }
                        }
                    }
                }
                for event in model_events {
                    match event {
                        ModelEvent::Reload => self.start_model_load(),
                    }
                }
            });
    }

    fn render_pipeline_settings(&self, ui: &mut Ui) {
        let Some(engine) = &self.engine else {
            return;
        };
        let config = &engine.config;
        section_heading(ui, UI_TEXT.pipeline_heading);
        let color = UI_CONFIG.colors.label;
        ui.metric("Lookback", &format!("{} days", config.lookback), color);
        ui.metric(
            "Train split",
            &format!("{:.0}%", config.train_fraction * 100.0),
            color,
        );
        ui.metric("Scaler", &config.scaler_policy.to_string(), color);
        ui.metric("Inverse", &config.inverse_scaling.to_string(), color);
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.engine.as_ref().and_then(|e| e.worker_status()) {
                    Some(status) => {
                        ui.spinner();
                        ui.label_subdued(status);
                    }
                    None => ui.label_subdued("Ready"),
                }
                if let Some(engine) = &self.engine {
                    ui.separator();
                    ui.label_subdued(format!("{:?}", engine.state));
                }
            });
        });
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let central_panel_frame = Frame::new().fill(UI_CONFIG.colors.central_panel).inner_margin(12.0);
        CentralPanel::default()
            .frame(central_panel_frame)
            .show(ctx, |ui| {
                ui.heading(UI_TEXT.app_title);
                ui.add_space(6.0);

                let Some(engine) = self.engine.as_ref() else {
                    return;
                };
                let Some(loaded) = engine.loaded.clone() else {
                    self.render_placeholder(ui);
                    return;
                };

                ScrollArea::vertical().show(ui, |ui| {
                    let history = &loaded.history;
                    let first = history.first_date().map(time_utils::format_date).unwrap_or_default();
                    let last = history.last_date().map(time_utils::format_date).unwrap_or_default();
                    ui.label(
                        RichText::new(format!(
                            "{}  {} → {}  ({} trading days, {})",
                            history.ticker,
                            first,
                            last,
                            history.len(),
                            loaded.source
                        ))
                        .strong(),
                    );

                    section_heading(ui, UI_TEXT.stats_heading);
                    render_stats_table(ui, &loaded.summaries);

                    section_heading(ui, UI_TEXT.charts_heading);
                    let chart_events = ChartSelectorPanel::new(self.visible_chart).render(ui);
                    for detail in chart_events {
                        #[cfg(debug_assertions)]
                        if DEBUG_FLAGS.print_ui_interactions {
                            log::info!("Chart requested: {}", detail);
                        }
                        if let Some(engine) = self.engine.as_mut() {
                            engine.show_chart(detail);
                            if engine.state.chart_detail() == Some(detail) {
                                self.visible_chart = Some(detail);
                            }
                        }
                    }
                    if let Some(detail) = self.visible_chart {
                        self.plot_view.show_price_chart(ui, &loaded, detail);
                    }

                    self.render_prediction_section(ui);
                });
            });
    }

    fn render_placeholder(&self, ui: &mut Ui) {
        let Some(engine) = &self.engine else {
            return;
        };
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            if engine.is_busy() {
                ui.spinner();
                ui.add_space(12.0);
                ui.heading(UI_TEXT.loading_heading);
            } else if let Some(error) = &engine.last_error {
                ui.heading(UI_TEXT.error_heading);
                ui.add_space(10.0);
                ui.pipeline_error(error);
            } else {
                ui.heading(UI_TEXT.welcome_heading);
                ui.add_space(6.0);
                ui.label_subdued(UI_TEXT.welcome_hint);
            }
        });
    }

    fn render_prediction_section(&mut self, ui: &mut Ui) {
        section_heading(ui, UI_TEXT.prediction_heading);

        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let blocker = engine.prediction_blocker();
        let response = ui.add_enabled(
            blocker.is_none(),
            eframe::egui::Button::new(UI_TEXT.predict_button),
        );
        let response = match &blocker {
            Some(reason) => response.on_disabled_hover_text(reason.as_str()),
            None => response,
        };
        if response.clicked() {
            engine.predict();
        }

        if let Some(reason) = &blocker {
            if !engine.is_busy() && engine.loaded.as_ref().is_some_and(|l| l.prepared.is_err()) {
                ui.label_warning(reason);
            }
        }

        if engine.state == DashboardState::PredictionRequested && engine.is_busy() {
            ui.spinner();
        }
        if let Some(error) = engine.last_error.as_ref().filter(|_| engine.loaded.is_some()) {
            ui.pipeline_error(error);
        }

        let Some(report) = engine.prediction.clone() else {
            return;
        };
        self.plot_view.show_prediction_chart(ui, &report);

        if let Some(metrics) = report.metrics {
            let color = UI_CONFIG.colors.label;
            ui.horizontal_wrapped(|ui| {
                ui.metric("MAE", &format_price(metrics.mae), color);
                ui.metric("RMSE", &format_price(metrics.rmse), color);
                ui.metric("MAPE", &format!("{:.2}%", metrics.mape), color);
                ui.metric(
                    "Direction hit rate",
                    &format!("{:.1}%", metrics.directional_accuracy * 100.0),
                    color,
                );
            });
        }
        ui.label_subdued(format!(
            "{} training windows, {} test windows, evaluation scale [{}, {}]",
            report.training_windows,
            report.evaluation_windows,
            format_price(report.evaluation_scaler.data_min),
            format_price(report.evaluation_scaler.data_max)
        ));
    }
}
