//! Feature representation shared by training and inference.

use crate::dataset::Record;
use crate::encoder::CategoryEncoder;
use crate::error::Result;
use std::fmt;

pub mod svm;

/// Number of features the classifier is trained on.
pub const N_FEATURES: usize = 6;

/// Feature names in the order the classifier sees them.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "DepTime",
    "ArrTime",
    "AirlineCode",
    "Distance",
    "WeatherCode",
    "PreviousFlightDelay",
];

/// Binary target: whether the flight had a previous delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    NoPreviousDelay,
    PreviousDelay,
}

impl Label {
    pub fn from_code(code: i64) -> Option<Label> {
        match code {
            0 => Some(Label::NoPreviousDelay),
            1 => Some(Label::PreviousDelay),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Label::NoPreviousDelay => 0,
            Label::PreviousDelay => 1,
        }
    }

    /// Text shown to the user for this label.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::NoPreviousDelay => "No Previous Delay",
            Label::PreviousDelay => "Previous Delay",
        }
    }
}

impl From<bool> for Label {
    fn from(positive: bool) -> Self {
        if positive {
            Label::PreviousDelay
        } else {
            Label::NoPreviousDelay
        }
    }
}

impl From<Label> for bool {
    fn from(label: Label) -> Self {
        label == Label::PreviousDelay
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded flight, in the fixed column order of [`FEATURE_NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub dep_time: i64,
    pub arr_time: i64,
    pub airline_code: i64,
    pub distance: i64,
    pub weather_code: i64,
    pub previous_delay: i64,
}

impl FeatureVector {
    /// Encodes a record with already fitted encoders.
    pub fn encode(
        record: &Record,
        airline: &CategoryEncoder,
        weather: &CategoryEncoder,
    ) -> Result<FeatureVector> {
        Ok(FeatureVector {
            dep_time: record.dep_time,
            arr_time: record.arr_time,
            airline_code: airline.transform(&record.airline)?,
            distance: record.distance,
            weather_code: weather.transform(&record.weather)?,
            previous_delay: record.previous_delay.code(),
        })
    }

    pub fn to_array(&self) -> [i64; N_FEATURES] {
        [
            self.dep_time,
            self.arr_time,
            self.airline_code,
            self.distance,
            self.weather_code,
            self.previous_delay,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_codes_and_text() {
        assert_eq!(Label::from_code(0), Some(Label::NoPreviousDelay));
        assert_eq!(Label::from_code(1), Some(Label::PreviousDelay));
        assert_eq!(Label::from_code(2), None);
        assert_eq!(Label::PreviousDelay.code(), 1);
        assert_eq!(Label::NoPreviousDelay.to_string(), "No Previous Delay");
        assert_eq!(Label::PreviousDelay.to_string(), "Previous Delay");
        assert!(bool::from(Label::PreviousDelay));
        assert_eq!(Label::from(false), Label::NoPreviousDelay);
    }

    #[test]
    fn encodes_in_declared_order() {
        let airline = CategoryEncoder::fit("Airline", ["Delta", "United"]);
        let weather = CategoryEncoder::fit("WeatherConditions", ["Clear", "Rainy"]);
        let record = Record {
            dep_time: 1400,
            arr_time: 1600,
            airline: "United".into(),
            distance: 1200,
            weather: "Rainy".into(),
            previous_delay: Label::PreviousDelay,
        };
        let vector = FeatureVector::encode(&record, &airline, &weather).unwrap();
        assert_eq!(vector.to_array(), [1400, 1600, 1, 1200, 1, 1]);
    }
}
