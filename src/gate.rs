//! Inference gate: validates one raw request and runs it through the
//! encoders and model fitted at startup.
//!
//! Validation happens in a fixed order. Integer fields are parsed first,
//! then the categorical fields are checked against the fitted vocabularies,
//! and the previous-delay flag is checked last. The first failure is
//! returned. A rejected request leaves the [`PipelineContext`] untouched.

use crate::error::{Error, Field, Result};
use crate::model::{FeatureVector, Label};
use crate::pipeline::PipelineContext;
use tracing::{debug, error};

/// Airlines offered to the user.
pub const AIRLINES: [&str; 5] = ["Delta", "United", "American", "JetBlue", "Southwest"];

/// Weather conditions offered to the user.
pub const WEATHER_CONDITIONS: [&str; 4] = ["Clear", "Cloudy", "Rainy", "Snowy"];

/// The six text fields a user submits for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInput<'a> {
    pub dep_time: &'a str,
    pub arr_time: &'a str,
    pub airline: &'a str,
    pub distance: &'a str,
    pub weather: &'a str,
    pub previous_delay: &'a str,
}

impl<'a> RawInput<'a> {
    /// Splits a comma separated line in dataset column order. Fields are
    /// passed through untouched so the gate sees exactly what was typed.
    pub fn from_csv_line(line: &'a str) -> Option<RawInput<'a>> {
        let fields: Vec<&str> = line.split(',').collect();
        match fields[..] {
            [dep_time, arr_time, airline, distance, weather, previous_delay] => Some(RawInput {
                dep_time,
                arr_time,
                airline,
                distance,
                weather,
                previous_delay,
            }),
            _ => None,
        }
    }
}

fn parse_integer(field: Field, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| Error::InvalidInput {
        field,
        reason: format!("{} must be an integer, got '{}'", field, value),
    })
}

fn parse_flag(value: &str) -> Result<i64> {
    match value {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(Error::InvalidInput {
            field: Field::PreviousFlightDelay,
            reason: "Previous Flight Delay should be either 0 or 1.".into(),
        }),
    }
}

/// Validates and encodes `input` into the feature vector the model was trained on.
pub fn encode(context: &PipelineContext, input: &RawInput<'_>) -> Result<FeatureVector> {
    let dep_time = parse_integer(Field::DepTime, input.dep_time)?;
    let arr_time = parse_integer(Field::ArrTime, input.arr_time)?;
    let distance = parse_integer(Field::Distance, input.distance)?;

    let airline_code = context.airline_encoder().transform(input.airline)?;
    let weather_code = context.weather_encoder().transform(input.weather)?;

    let previous_delay = parse_flag(input.previous_delay)?;

    Ok(FeatureVector {
        dep_time,
        arr_time,
        airline_code,
        distance,
        weather_code,
        previous_delay,
    })
}

/// Classifies one raw request.
pub fn classify(context: &PipelineContext, input: &RawInput<'_>) -> Result<Label> {
    let vector = encode(context, input)?;
    match context.model().predict(&vector.to_array()) {
        Ok(label) => {
            debug!("Predicted {:?} for {:?}", label, vector);
            Ok(label)
        }
        Err(why) => {
            error!("Encoded request rejected by the classifier, this is a bug: {}", why);
            Err(why)
        }
    }
}

/// Classifies one raw request and returns the text to show the user:
/// "No Previous Delay" or "Previous Delay".
pub fn predict_from_raw(context: &PipelineContext, input: &RawInput<'_>) -> Result<&'static str> {
    classify(context, input).map(Label::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_exactly_zero_and_one() {
        assert_eq!(parse_flag("0").unwrap(), 0);
        assert_eq!(parse_flag("1").unwrap(), 1);
        for value in ["2", "01", "true", "", " 1", "1 ", "-0", "+1", "1.0"] {
            match parse_flag(value) {
                Err(Error::InvalidInput { field, reason }) => {
                    assert_eq!(field, Field::PreviousFlightDelay);
                    assert_eq!(reason, "Previous Flight Delay should be either 0 or 1.");
                }
                other => panic!("unexpected result for {:?}: {:?}", value, other),
            }
        }
    }

    #[test]
    fn integers_allow_surrounding_whitespace() {
        assert_eq!(parse_integer(Field::Distance, " 1200 ").unwrap(), 1200);
        assert_eq!(parse_integer(Field::DepTime, "-5").unwrap(), -5);
    }

    #[test]
    fn integer_errors_name_the_field() {
        match parse_integer(Field::ArrTime, "12:30") {
            Err(Error::InvalidInput { field, reason }) => {
                assert_eq!(field, Field::ArrTime);
                assert!(reason.contains("Arrival Time"));
                assert!(reason.contains("12:30"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn splits_csv_lines() {
        let input = RawInput::from_csv_line("800, 1000,Delta,500,Clear,0").unwrap();
        assert_eq!(input.arr_time, " 1000");
        assert_eq!(parse_integer(Field::ArrTime, input.arr_time).unwrap(), 1000);
        assert_eq!(input.previous_delay, "0");
        assert!(RawInput::from_csv_line("800,1000,Delta,500,Clear").is_none());
        assert!(RawInput::from_csv_line("800,1000,Delta,500,Clear,0,1").is_none());
    }

    #[test]
    fn csv_lines_keep_flag_and_categories_verbatim() {
        let input = RawInput::from_csv_line("800,1000, Delta,500,Clear , 1").unwrap();
        assert_eq!(input.airline, " Delta");
        assert_eq!(input.weather, "Clear ");
        assert_eq!(input.previous_delay, " 1");
        assert!(matches!(
            parse_flag(input.previous_delay),
            Err(Error::InvalidInput {
                field: Field::PreviousFlightDelay,
                ..
            })
        ));
    }
}
