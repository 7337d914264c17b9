//! User-facing strings, kept in one place.

pub struct UiText {
    pub app_title: &'static str,

    // Side panel
    pub input_heading: &'static str,
    pub ticker_label: &'static str,
    pub start_date_label: &'static str,
    pub start_after_end_warning: &'static str,
    pub end_date_label: &'static str,
    pub fetch_button: &'static str,
    pub reset_button: &'static str,
    pub source_label: &'static str,
    pub model_heading: &'static str,
    pub model_loading: &'static str,
    pub reload_model_button: &'static str,
    pub pipeline_heading: &'static str,

    // Central panel
    pub welcome_heading: &'static str,
    pub welcome_hint: &'static str,
    pub loading_heading: &'static str,
    pub error_heading: &'static str,
    pub stats_heading: &'static str,
    pub charts_heading: &'static str,
    pub prediction_heading: &'static str,
    pub predict_button: &'static str,
    pub prediction_title: &'static str,

    // Plots
    pub label_close: &'static str,
    pub label_actual: &'static str,
    pub label_predicted: &'static str,
    pub plot_x_axis_time: &'static str,
    pub plot_x_axis_days: &'static str,
    pub plot_y_axis_price: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Stock Trend Prediction",

    input_heading: "Input",
    ticker_label: "Enter Stock Ticker",
    start_date_label: "Start date (YYYY-MM-DD)",
    start_after_end_warning: "Start date must be before the end date",
    end_date_label: "End date",
    fetch_button: "Fetch data",
    reset_button: "Reset",
    source_label: "Source",
    model_heading: "Model",
    model_loading: "Loading model...",
    reload_model_button: "Reload model",
    pipeline_heading: "Pipeline",

    welcome_heading: "No data loaded",
    welcome_hint: "Enter a ticker and press Fetch data",
    loading_heading: "Fetching price history...",
    error_heading: "⚠ Unable to load data",
    stats_heading: "Data Summary",
    charts_heading: "Charts",
    prediction_heading: "Prediction",
    predict_button: "Predict",
    prediction_title: "Actual vs Predicted Price",

    label_close: "Close",
    label_actual: "Actual Price",
    label_predicted: "Predicted Price",
    plot_x_axis_time: "Time",
    plot_x_axis_days: "Days",
    plot_y_axis_price: "Price",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_chart_labels_name_actual_prices() {
        assert_eq!(UI_TEXT.prediction_title, "Actual vs Predicted Price");
        assert_eq!(UI_TEXT.label_actual, "Actual Price");
        assert_eq!(UI_TEXT.label_predicted, "Predicted Price");
    }
}
