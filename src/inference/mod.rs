// Model artifacts behind a batch-in, batch-out predictor interface
pub mod linear_window;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod predictor;

pub use linear_window::LinearWindowModel;
pub use loader::load_predictor;
pub use predictor::{Predictor, WindowMeanPredictor};
