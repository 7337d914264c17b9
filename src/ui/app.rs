use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use eframe::{Frame, egui};
use poll_promise::Promise;
use serde::{Deserialize, Serialize};

use crate::analysis::PipelineConfig;
use crate::config::{ANALYSIS, PERSISTENCE};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::DataSources;
use crate::domain::HistoryRequest;
use crate::engine::{ChartDetail, DashboardEngine};
use crate::error::PipelineError;
use crate::inference::{Predictor, load_predictor};
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::setup_custom_visuals;
use crate::utils::time_utils;

type ModelLoad = Result<Arc<dyn Predictor>, PipelineError>;

/// Everything the command line can decide before the window opens.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config: PipelineConfig,
    pub sources: DataSources,
    pub ticker: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub model_path: Option<PathBuf>,
    /// Fetch the ticker as soon as the window opens
    pub autoload: bool,
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct StockTrendApp {
    // Form state, persisted between runs
    pub(super) ticker: String,
    pub(super) start_date: String,
    pub(super) model_path: String,

    // Runtime only
    #[serde(skip)]
    pub(super) end_date: Option<NaiveDate>,
    #[serde(skip)]
    pub(super) engine: Option<DashboardEngine>,
    #[serde(skip)]
    pub(super) model_promise: Option<Promise<ModelLoad>>,
    #[serde(skip)]
    pub(super) visible_chart: Option<ChartDetail>,
    #[serde(skip)]
    pub(super) plot_view: PlotView,
}

impl Default for StockTrendApp {
    fn default() -> Self {
        Self {
            ticker: ANALYSIS.input.ticker.to_string(),
            start_date: ANALYSIS.input.start_date.to_string(),
            model_path: PERSISTENCE.model.default_artifact.to_string(),
            end_date: None,
            engine: None,
            model_promise: None,
            visible_chart: None,
            plot_view: PlotView::new(),
        }
    }
}

impl StockTrendApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let mut app: StockTrendApp = match cc.storage.and_then(|s| eframe::get_value(s, eframe::APP_KEY)) {
            Some(value) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("Successfully loaded persisted state");
                }
                value
            }
            None => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_serde {
                    log::info!("No persisted state. Creating anew.");
                }
                StockTrendApp::default()
            }
        };

        // Command line beats persisted state
        if let Some(ticker) = &options.ticker {
            app.ticker = HistoryRequest::normalize_ticker(ticker);
        }
        if let Some(start) = options.start_date {
            app.start_date = time_utils::format_date(start);
        }
        if let Some(path) = &options.model_path {
            app.model_path = path.display().to_string();
        }
        app.end_date = options.end_date;

        app.engine = Some(DashboardEngine::new(options.config, options.sources.clone()));
        app.start_model_load();

        if options.autoload {
            match time_utils::parse_date(&app.start_date) {
                Ok(start) => {
                    let ticker = app.ticker.clone();
                    app.request_history(&ticker, start);
                }
                Err(e) => log::warn!("Not fetching at startup: {:#}", e),
            }
        }

        app
    }

    /// Today unless the command line pinned an end date.
    pub(super) fn end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(time_utils::today_local)
    }

    pub(super) fn lookback(&self) -> usize {
        self.engine
            .as_ref()
            .map(|e| e.config.lookback)
            .unwrap_or(ANALYSIS.prediction.lookback)
    }

    /// Loads the artifact off the UI thread; the result is handed to the engine when ready.
    pub(super) fn start_model_load(&mut self) {
        let path = PathBuf::from(self.model_path.trim());
        let lookback = self.lookback();
        log::info!("Loading model artifact {}", path.display());
        self.model_promise = Some(Promise::spawn_thread("model_load", move || {
            load_predictor(&path, lookback)
        }));
    }

    pub(super) fn is_model_loading(&self) -> bool {
        self.model_promise.is_some()
    }

    fn poll_model_load(&mut self) {
        let Some(promise) = self.model_promise.take() else {
            return;
        };
        match promise.try_take() {
            Ok(result) => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_predictor(result);
                }
            }
            Err(pending) => self.model_promise = Some(pending),
        }
    }

    pub(super) fn request_history(&mut self, ticker: &str, start: NaiveDate) {
        let request = HistoryRequest::new(ticker, start, self.end_date());
        self.ticker = request.ticker.clone();
        self.visible_chart = None;
        self.plot_view.clear_cache();
        if let Some(engine) = self.engine.as_mut() {
            engine.load_history(request);
        }
    }
}

impl eframe::App for StockTrendApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.poll_model_load();
        let busy = self
            .engine
            .as_mut()
            .map(|engine| engine.update())
            .unwrap_or(false);
        if busy || self.is_model_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        self.render_side_panel(ctx);
        self.render_status_panel(ctx);
        self.render_central_panel(ctx);
    }
}
