use chrono::NaiveDate;
use eframe::egui::{Grid, ScrollArea, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::analysis::ColumnSummary;
use crate::engine::ChartDetail;
use crate::error::PipelineError;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{section_heading, spaced_separator};
use crate::utils::time_utils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Fetch { ticker: String, start: NaiveDate },
    Reset,
}

/// Ticker and date range form. Edits the persisted strings in place.
pub struct InputPanel<'a> {
    ticker: &'a mut String,
    start_date: &'a mut String,
    end_date: NaiveDate,
    source: String,
    busy: bool,
}

impl<'a> InputPanel<'a> {
    pub fn new(
        ticker: &'a mut String,
        start_date: &'a mut String,
        end_date: NaiveDate,
        source: String,
        busy: bool,
    ) -> Self {
        Self {
            ticker,
            start_date,
            end_date,
            source,
            busy,
        }
    }
}

impl<'a> Panel for InputPanel<'a> {
    type Event = InputEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.input_heading);

        ui.label_subheader(UI_TEXT.ticker_label);
        let ticker_response = ui.add(TextEdit::singleline(self.ticker).desired_width(120.0));
        if ticker_response.changed() {
            *self.ticker = self.ticker.to_uppercase();
        }

        ui.add_space(5.0);
        ui.label_subheader(UI_TEXT.start_date_label);
        ui.add(TextEdit::singleline(self.start_date).desired_width(120.0));
        let start = time_utils::parse_date(self.start_date);
        if let Some(warning) = start_date_warning(&start, self.end_date) {
            ui.label_warning(warning);
        }

        ui.add_space(5.0);
        ui.metric(
            UI_TEXT.end_date_label,
            &time_utils::format_date(self.end_date),
            UI_CONFIG.colors.label,
        );
        ui.metric(UI_TEXT.source_label, &self.source, UI_CONFIG.colors.label);

        ui.add_space(8.0);
        let ticker = self.ticker.trim().to_uppercase();
        let can_fetch =
            !self.busy && !ticker.is_empty() && start_date_warning(&start, self.end_date).is_none();

        ui.horizontal(|ui| {
            let enter_pressed =
                ticker_response.lost_focus() && ui.input(|i| i.key_pressed(eframe::egui::Key::Enter));
            let clicked = ui
                .add_enabled(can_fetch, eframe::egui::Button::new(UI_TEXT.fetch_button))
                .clicked();
            if (clicked || (enter_pressed && can_fetch))
                && let Ok(start) = start
            {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("Fetch requested: {} from {}", ticker, start);
                }
                events.push(InputEvent::Fetch {
                    ticker: ticker.clone(),
                    start,
                });
            }
            if ui.button(UI_TEXT.reset_button).clicked() {
                events.push(InputEvent::Reset);
            }
        });

        spaced_separator(ui);
        events
    }
}

/// The range is half-open, so the start must fall strictly before the end.
fn start_date_warning(start: &anyhow::Result<NaiveDate>, end_date: NaiveDate) -> Option<String> {
    match start {
        Ok(date) if *date >= end_date => Some(UI_TEXT.start_after_end_warning.to_string()),
        Ok(_) => None,
        Err(e) => Some(format!("{}", e)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    Reload,
}

/// Model artifact path and load status.
pub struct ModelPanel<'a> {
    model_path: &'a mut String,
    description: Option<String>,
    error: Option<&'a PipelineError>,
    loading: bool,
}

impl<'a> ModelPanel<'a> {
    pub fn new(
        model_path: &'a mut String,
        description: Option<String>,
        error: Option<&'a PipelineError>,
        loading: bool,
    ) -> Self {
        Self {
            model_path,
            description,
            error,
            loading,
        }
    }
}

impl<'a> Panel for ModelPanel<'a> {
    type Event = ModelEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.model_heading);

        ui.add(TextEdit::singleline(self.model_path).desired_width(200.0));

        if self.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label_subdued(UI_TEXT.model_loading);
            });
        } else if let Some(error) = self.error {
            ui.pipeline_error(error);
        } else if let Some(description) = &self.description {
            ui.metric("Loaded", description, UI_CONFIG.colors.positive);
        }

        if ui
            .add_enabled(!self.loading, eframe::egui::Button::new(UI_TEXT.reload_model_button))
            .clicked()
        {
            events.push(ModelEvent::Reload);
        }

        spaced_separator(ui);
        events
    }
}

/// One button per chart tier; the active one is highlighted.
pub struct ChartSelectorPanel {
    selected: Option<ChartDetail>,
}

impl ChartSelectorPanel {
    pub fn new(selected: Option<ChartDetail>) -> Self {
        Self { selected }
    }
}

impl Panel for ChartSelectorPanel {
    type Event = ChartDetail;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        ui.horizontal(|ui| {
            for detail in ChartDetail::iter() {
                let is_selected = self.selected == Some(detail);
                if ui.selectable_label(is_selected, detail.to_string()).clicked() {
                    self.selected = Some(detail);
                    events.push(detail);
                }
            }
        });
        events
    }
}

/// Descriptive statistics, one row per price column.
pub fn render_stats_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    ScrollArea::horizontal()
        .id_salt("stats_table")
        .max_height(UI_CONFIG.stats_table_height)
        .show(ui, |ui| {
            Grid::new("stats_grid")
                .striped(true)
                .num_columns(ColumnSummary::HEADERS.len())
                .show(ui, |ui| {
                    for header in ColumnSummary::HEADERS {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for summary in summaries {
                        ui.label_subheader(summary.column.to_string());
                        for cell in summary.cells() {
                            ui.monospace(cell);
                        }
                        ui.end_row();
                    }
                });
        });
}
