use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::ANALYSIS;

/// The three chart tiers of the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Display, Serialize, Deserialize,
)]
pub enum ChartDetail {
    /// Close only
    #[default]
    Basic,
    /// Close with the short moving average
    Medium,
    /// Close with both moving averages
    Hard,
}

impl ChartDetail {
    pub fn title(&self) -> String {
        let ma = &ANALYSIS.moving_average;
        match self {
            ChartDetail::Basic => "Closing Price vs Time chart".to_string(),
            ChartDetail::Medium => format!("Closing Price vs Time chart with {}MA", ma.short_window),
            ChartDetail::Hard => format!(
                "Closing Price vs Time chart with {}MA & {}MA",
                ma.short_window, ma.long_window
            ),
        }
    }

    pub fn shows_short_ma(&self) -> bool {
        matches!(self, ChartDetail::Medium | ChartDetail::Hard)
    }

    pub fn shows_long_ma(&self) -> bool {
        matches!(self, ChartDetail::Hard)
    }
}

/// Where the dashboard is in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardState {
    /// Nothing loaded (or a load is in flight)
    #[default]
    Idle,
    /// History, statistics and moving averages are available
    DataLoaded,
    ChartRequested(ChartDetail),
    PredictionRequested,
}

/// What the user asked the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardCommand {
    LoadHistory,
    ShowChart(ChartDetail),
    Predict,
    Reset,
}

impl DashboardState {
    pub fn has_data(&self) -> bool {
        !matches!(self, DashboardState::Idle)
    }

    /// Next state for `command`, or `None` if the command is not valid here.
    ///
    /// `LoadHistory` drops back to `Idle` until the history arrives, see [`Self::loaded`].
    pub fn apply(self, command: DashboardCommand) -> Option<DashboardState> {
        match (self, command) {
            (_, DashboardCommand::Reset) => Some(DashboardState::Idle),
            (_, DashboardCommand::LoadHistory) => Some(DashboardState::Idle),
            (state, DashboardCommand::ShowChart(detail)) if state.has_data() => {
                Some(DashboardState::ChartRequested(detail))
            }
            (state, DashboardCommand::Predict) if state.has_data() => {
                Some(DashboardState::PredictionRequested)
            }
            _ => None,
        }
    }

    /// A fetch completed.
    pub fn loaded(self) -> DashboardState {
        DashboardState::DataLoaded
    }

    pub fn chart_detail(&self) -> Option<ChartDetail> {
        match self {
            DashboardState::ChartRequested(detail) => Some(*detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn idle_only_accepts_load_and_reset() {
        let idle = DashboardState::Idle;
        assert_eq!(idle.apply(DashboardCommand::Predict), None);
        assert_eq!(idle.apply(DashboardCommand::ShowChart(ChartDetail::Hard)), None);
        assert_eq!(
            idle.apply(DashboardCommand::LoadHistory),
            Some(DashboardState::Idle)
        );
    }

    #[test]
    fn loaded_state_walks_through_charts_and_prediction() {
        let state = DashboardState::Idle.loaded();
        assert_eq!(state, DashboardState::DataLoaded);

        let state = state
            .apply(DashboardCommand::ShowChart(ChartDetail::Medium))
            .unwrap();
        assert_eq!(state.chart_detail(), Some(ChartDetail::Medium));

        let state = state.apply(DashboardCommand::Predict).unwrap();
        assert_eq!(state, DashboardState::PredictionRequested);

        let state = state
            .apply(DashboardCommand::ShowChart(ChartDetail::Basic))
            .unwrap();
        assert_eq!(state, DashboardState::ChartRequested(ChartDetail::Basic));

        assert_eq!(
            state.apply(DashboardCommand::Reset),
            Some(DashboardState::Idle)
        );
    }

    #[test]
    fn reloading_discards_data() {
        let state = DashboardState::PredictionRequested;
        assert!(!state.apply(DashboardCommand::LoadHistory).unwrap().has_data());
    }

    #[test]
    fn detail_tiers_add_moving_averages() {
        let tiers: Vec<_> = ChartDetail::iter()
            .map(|d| (d.shows_short_ma(), d.shows_long_ma()))
            .collect();
        assert_eq!(tiers, vec![(false, false), (true, false), (true, true)]);
        assert_eq!(
            ChartDetail::Hard.title(),
            "Closing Price vs Time chart with 100MA & 200MA"
        );
    }
}
