use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::analysis::{PipelineConfig, PredictionReport};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::DataSources;
use crate::domain::HistoryRequest;
use crate::error::PipelineError;
use crate::inference::Predictor;

use super::messages::{JobKind, JobOutcome, JobRequest, JobResult, LoadedHistory};
use super::state::{ChartDetail, DashboardCommand, DashboardState};
use super::worker;

pub struct DashboardEngine {
    pub state: DashboardState,

    /// The front buffer. Replaced whole when a fetch completes.
    pub loaded: Option<Arc<LoadedHistory>>,
    pub prediction: Option<Arc<PredictionReport>>,

    /// Last failure to show in the UI (cleared by the next success)
    pub last_error: Option<PipelineError>,

    predictor: Option<Arc<dyn Predictor>>,
    model_error: Option<PipelineError>,

    pub config: PipelineConfig,
    pub sources: DataSources,

    /// Worker Communication
    job_tx: Sender<JobRequest>,
    result_rx: Receiver<JobResult>,

    /// Bumped on every load; results tagged with an older id are stale
    generation: u64,
    in_flight: Option<(u64, String)>,
    /// At most one waiting job; a newer one replaces it
    pending: Option<JobRequest>,
}

impl DashboardEngine {
    pub fn new(config: PipelineConfig, sources: DataSources) -> Self {
        let (job_tx, job_rx) = channel::<JobRequest>();
        let (result_tx, result_rx) = channel::<JobResult>();

        worker::spawn_worker_thread(job_rx, result_tx, sources.clone());

        Self {
            state: DashboardState::Idle,
            loaded: None,
            prediction: None,
            last_error: None,
            predictor: None,
            model_error: None,
            config,
            sources,
            job_tx,
            result_rx,
            generation: 0,
            in_flight: None,
            pending: None,
        }
    }

    /// Called every frame. Returns TRUE while a job is queued or running,
    /// so the UI keeps repainting.
    pub fn update(&mut self) -> bool {
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_job_result(result);
        }

        if self.in_flight.is_none() {
            if let Some(job) = self.pending.take() {
                self.dispatch(job);
            }
        }

        self.is_busy()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.pending.is_some()
    }

    pub fn worker_status(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|(_, label)| label.as_str())
    }

    // --- COMMANDS ---

    pub fn load_history(&mut self, request: HistoryRequest) {
        if !self.transition(DashboardCommand::LoadHistory) {
            return;
        }
        self.generation += 1;
        self.loaded = None;
        self.prediction = None;
        self.last_error = None;

        self.pending = Some(JobRequest {
            id: self.generation,
            kind: JobKind::FetchHistory {
                request,
                config: self.config,
            },
        });
    }

    pub fn show_chart(&mut self, detail: ChartDetail) {
        self.transition(DashboardCommand::ShowChart(detail));
    }

    /// Queues inference over the current history. Does nothing unless
    /// [`Self::prediction_blocker`] is `None`.
    pub fn predict(&mut self) {
        if let Some(reason) = self.prediction_blocker() {
            log::warn!("Predict ignored: {}", reason);
            return;
        }
        let (Some(loaded), Some(predictor)) = (&self.loaded, &self.predictor) else {
            return;
        };
        let Ok(prepared) = &loaded.prepared else {
            return;
        };
        let job = JobRequest {
            id: self.generation,
            kind: JobKind::RunPrediction {
                prepared: prepared.clone(),
                dates: loaded.dates.clone(),
                predictor: predictor.clone(),
            },
        };

        if self.transition(DashboardCommand::Predict) {
            self.prediction = None;
            self.pending = Some(job);
        }
    }

    pub fn reset(&mut self) {
        self.transition(DashboardCommand::Reset);
        self.generation += 1;
        self.loaded = None;
        self.prediction = None;
        self.last_error = None;
        self.pending = None;
    }

    // --- MODEL ---

    pub fn set_predictor(&mut self, result: Result<Arc<dyn Predictor>, PipelineError>) {
        match result {
            Ok(predictor) => {
                self.predictor = Some(predictor);
                self.model_error = None;
            }
            Err(e) => {
                log::error!("{}", e);
                self.predictor = None;
                self.model_error = Some(e);
            }
        }
    }

    pub fn model_description(&self) -> Option<String> {
        self.predictor.as_ref().map(|p| p.describe())
    }

    pub fn model_error(&self) -> Option<&PipelineError> {
        self.model_error.as_ref()
    }

    /// Why Predict cannot run right now, or `None` if it can.
    pub fn prediction_blocker(&self) -> Option<String> {
        if self.is_busy() {
            return Some("Busy".to_string());
        }
        let Some(loaded) = &self.loaded else {
            return Some("Load price data first".to_string());
        };
        if let Err(e) = &loaded.prepared {
            return Some(e.to_string());
        }
        if let Some(e) = &self.model_error {
            return Some(e.to_string());
        }
        if self.predictor.is_none() {
            return Some("Model is loading".to_string());
        }
        None
    }

    // --- INTERNAL LOGIC ---

    fn transition(&mut self, command: DashboardCommand) -> bool {
        match self.state.apply(command) {
            Some(next) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_state_transitions {
                    log::info!("{:?} --{:?}--> {:?}", self.state, command, next);
                }
                self.state = next;
                true
            }
            None => {
                log::warn!("{:?} ignored in state {:?}", command, self.state);
                false
            }
        }
    }

    fn dispatch(&mut self, job: JobRequest) {
        let label = job.kind.label();
        let id = job.id;
        if let Err(err) = self.job_tx.send(job) {
            log::error!("Worker thread is gone, cannot run: {}", label);
            let reason = "background worker stopped".to_string();
            self.last_error = Some(match err.0.kind {
                JobKind::FetchHistory { .. } => PipelineError::DataUnavailable(reason),
                JobKind::RunPrediction { .. } => PipelineError::InferenceFailed(reason),
            });
            return;
        }
        self.in_flight = Some((id, label));
    }

    fn handle_job_result(&mut self, result: JobResult) {
        self.in_flight = None;

        if result.id != self.generation {
            log::info!(
                "Dropping stale result for job {} (current {})",
                result.id,
                self.generation
            );
            return;
        }

        match result.outcome {
            JobOutcome::History(Ok(loaded)) => {
                log::info!(
                    "{} rows of {} from {} in {} ms",
                    loaded.history.len(),
                    loaded.history.ticker,
                    loaded.source,
                    result.duration_ms
                );
                self.loaded = Some(Arc::from(loaded));
                self.last_error = None;
                self.state = self.state.loaded();
            }
            JobOutcome::History(Err(e)) => {
                log::error!("Load failed: {}", e);
                self.last_error = Some(e);
            }
            JobOutcome::Prediction(Ok(report)) => {
                log::info!(
                    "Predicted {} points in {} ms",
                    report.len(),
                    result.duration_ms
                );
                self.prediction = Some(report);
                self.last_error = None;
            }
            JobOutcome::Prediction(Err(e)) => {
                log::error!("Prediction failed: {}", e);
                self.last_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyBar, PriceHistory};
    use crate::engine::worker::derive_history;
    use crate::inference::WindowMeanPredictor;
    use chrono::NaiveDate;
    use std::time::{Duration, Instant};

    fn offline_engine() -> DashboardEngine {
        let sources = DataSources {
            offline: true,
            ..Default::default()
        };
        DashboardEngine::new(PipelineConfig::default(), sources)
    }

    fn loaded(n: usize) -> Arc<LoadedHistory> {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 10.0 + i as f64;
                DailyBar::new(start + chrono::Days::new(i as u64), c, c, c, c, 1.0)
            })
            .collect();
        let history = PriceHistory::new("TEST", bars);
        Arc::new(derive_history(history, "fixture", &PipelineConfig::default()))
    }

    fn pump_until_idle(engine: &mut DashboardEngine) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while engine.update() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn request() -> HistoryRequest {
        HistoryRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        )
    }

    #[test]
    fn failed_fetch_stays_idle_with_error() {
        let mut engine = offline_engine();
        engine.load_history(request());
        pump_until_idle(&mut engine);

        assert_eq!(engine.state, DashboardState::Idle);
        assert!(matches!(
            engine.last_error,
            Some(PipelineError::DataUnavailable(_))
        ));
        assert!(engine.loaded.is_none());
    }

    #[test]
    fn predict_is_blocked_without_model() {
        let mut engine = offline_engine();
        engine.loaded = Some(loaded(300));
        engine.state = DashboardState::DataLoaded;

        assert_eq!(
            engine.prediction_blocker().as_deref(),
            Some("Model is loading")
        );
        engine.set_predictor(Err(PipelineError::ModelLoadFailure("gone".into())));
        assert_eq!(
            engine.prediction_blocker().as_deref(),
            Some("Model unavailable: gone")
        );

        engine.predict();
        assert_eq!(engine.state, DashboardState::DataLoaded);
    }

    #[test]
    fn prediction_round_trip_through_worker() {
        let mut engine = offline_engine();
        engine.loaded = Some(loaded(300));
        engine.state = DashboardState::DataLoaded;
        engine.set_predictor(Ok(Arc::new(WindowMeanPredictor)));

        assert_eq!(engine.prediction_blocker(), None);
        engine.predict();
        assert_eq!(engine.state, DashboardState::PredictionRequested);
        pump_until_idle(&mut engine);

        let report = engine.prediction.clone().unwrap();
        assert_eq!(report.len(), 90);
        assert_eq!(report.dates.len(), 90);
    }

    #[test]
    fn results_from_before_reset_are_dropped() {
        let mut engine = offline_engine();
        engine.loaded = Some(loaded(300));
        engine.state = DashboardState::DataLoaded;
        engine.set_predictor(Ok(Arc::new(WindowMeanPredictor)));

        engine.predict();
        engine.update(); // dispatch
        engine.reset();
        pump_until_idle(&mut engine);

        assert!(engine.prediction.is_none());
        assert_eq!(engine.state, DashboardState::Idle);
    }

    #[test]
    fn short_history_blocks_prediction() {
        let mut engine = offline_engine();
        engine.loaded = Some(loaded(120));
        engine.state = DashboardState::DataLoaded;
        engine.set_predictor(Ok(Arc::new(WindowMeanPredictor)));

        let reason = engine.prediction_blocker().unwrap();
        assert_eq!(
            reason,
            PipelineError::InsufficientHistory {
                needed: 101,
                available: 84
            }
            .to_string()
        );
    }

    fn engine_without_worker() -> DashboardEngine {
        let mut engine = offline_engine();
        let (job_tx, job_rx) = channel::<JobRequest>();
        drop(job_rx);
        engine.job_tx = job_tx;
        engine
    }

    #[test]
    fn stopped_worker_fails_fetch_as_data_unavailable() {
        let mut engine = engine_without_worker();
        engine.load_history(request());
        engine.update();

        assert!(!engine.is_busy());
        assert!(matches!(
            engine.last_error,
            Some(PipelineError::DataUnavailable(_))
        ));
    }

    #[test]
    fn stopped_worker_fails_prediction_as_inference() {
        let mut engine = engine_without_worker();
        engine.loaded = Some(loaded(300));
        engine.state = DashboardState::DataLoaded;
        engine.set_predictor(Ok(Arc::new(WindowMeanPredictor)));

        engine.predict();
        engine.update();

        assert!(!engine.is_busy());
        assert!(matches!(
            engine.last_error,
            Some(PipelineError::InferenceFailed(_))
        ));
    }
}
