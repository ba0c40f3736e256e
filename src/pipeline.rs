//! Startup pipeline: load, encode, split, train.

use crate::config::PipelineConfig;
use crate::dataset::{self, Dataset};
use crate::encoder::CategoryEncoder;
use crate::error::Result;
use crate::gate::{AIRLINES, WEATHER_CONDITIONS};
use crate::model::svm::{self, Evaluation, LabeledVector, TrainedModel};
use crate::model::FeatureVector;
use tracing::{info, warn};

/// Everything inference needs, built once at startup and only read afterwards.
pub struct PipelineContext {
    airline: CategoryEncoder,
    weather: CategoryEncoder,
    model: TrainedModel,
    evaluation: Evaluation,
}

impl PipelineContext {
    /// Loads the configured dataset and trains on it.
    pub fn build(config: &PipelineConfig) -> Result<PipelineContext> {
        config.validate()?;
        let dataset = dataset::load(&config.dataset)?;
        PipelineContext::from_dataset(&dataset, config)
    }

    /// Fits the encoders on the whole dataset, then trains on the training
    /// partition and evaluates on the held-out one.
    pub fn from_dataset(dataset: &Dataset, config: &PipelineConfig) -> Result<PipelineContext> {
        let airline = CategoryEncoder::fit("Airline", dataset.airlines());
        let weather = CategoryEncoder::fit("WeatherConditions", dataset.weather_conditions());
        info!(
            "Fitted {} airline and {} weather categories",
            airline.len(),
            weather.len()
        );
        warn_unfitted_choices(&airline, &AIRLINES);
        warn_unfitted_choices(&weather, &WEATHER_CONDITIONS);

        let rows = dataset
            .records()
            .iter()
            .map(|record| {
                Ok((
                    FeatureVector::encode(record, &airline, &weather)?,
                    record.previous_delay,
                ))
            })
            .collect::<Result<Vec<LabeledVector>>>()?;

        let (train, test) = dataset::split(&rows, config.test_fraction, config.seed)?;
        info!("Training on {} rows, holding out {}", train.len(), test.len());
        let model = svm::train(&train, &config.svm, config.seed)?;

        let evaluation = model.evaluate(&test)?;
        info!("Held-out evaluation: {}", evaluation);

        Ok(PipelineContext {
            airline,
            weather,
            model,
            evaluation,
        })
    }

    pub fn airline_encoder(&self) -> &CategoryEncoder {
        &self.airline
    }

    pub fn weather_encoder(&self) -> &CategoryEncoder {
        &self.weather
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Confusion counts on the held-out partition.
    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }
}

fn warn_unfitted_choices(encoder: &CategoryEncoder, offered: &[&str]) {
    for choice in offered.iter().filter(|choice| !encoder.contains(choice)) {
        warn!(
            "Offered {} choice '{}' was not seen in the dataset and will be rejected",
            encoder.column(),
            choice
        );
    }
}
