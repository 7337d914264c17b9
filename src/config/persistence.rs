//! File locations

/// Artifact locations
pub struct ModelPaths {
    /// Model artifact loaded when no `--model` flag is given
    pub default_artifact: &'static str,
}

pub struct PersistenceConfig {
    pub model: ModelPaths,
    /// Path for saving/loading the input form state (ticker, start date, model path)
    pub app_state_path: &'static str,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    model: ModelPaths {
        default_artifact: "model/window_model.json",
    },
    app_state_path: ".states.json",
};
