use eframe::egui::{Color32, RichText, Ui};

use crate::error::PipelineError;
use crate::ui::config::UI_CONFIG;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Small gray text for hints and secondary values.
    fn label_subdued(&mut self, text: impl Into<String>);

    /// "Label: Value" on one line, value in `color`.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    fn label_subheader(&mut self, text: impl Into<String>);

    fn label_error(&mut self, text: impl Into<String>);

    fn label_warning(&mut self, text: impl Into<String>);

    /// Error text with a one-line hint on what the user can do about it.
    fn pipeline_error(&mut self, error: &PipelineError);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.label));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.subsection_heading));
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.error));
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.warning));
    }

    fn pipeline_error(&mut self, error: &PipelineError) {
        self.label_error(error.to_string());
        let hint = match error {
            PipelineError::DataUnavailable(_) => "Check the ticker symbol and your connection.",
            PipelineError::InsufficientHistory { .. } => "Pick an earlier start date.",
            PipelineError::ModelLoadFailure(_) => "Charts still work; prediction is disabled.",
            PipelineError::DegenerateScale { .. } => "The price never moved in this range.",
            PipelineError::InferenceFailed(_) => "The model rejected this input.",
        };
        self.label_subdued(hint);
    }
}
