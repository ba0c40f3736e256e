//! Predicts whether a flight had a previous delay from its schedule, airline,
//! distance and weather, using a linear support vector machine trained at startup.

pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod form;
pub mod gate;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use gate::{predict_from_raw, RawInput};
pub use pipeline::PipelineContext;
