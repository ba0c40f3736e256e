//! Error taxonomy shared by the loader, encoders, classifier and inference gate.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Raw input fields that can be rejected by the inference gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DepTime,
    ArrTime,
    Distance,
    PreviousFlightDelay,
}

impl Field {
    /// Column name as it appears in the dataset header.
    pub fn column(self) -> &'static str {
        match self {
            Field::DepTime => "DepTime",
            Field::ArrTime => "ArrTime",
            Field::Distance => "Distance",
            Field::PreviousFlightDelay => "PreviousFlightDelay",
        }
    }

    /// Human readable label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::DepTime => "Departure Time",
            Field::ArrTime => "Arrival Time",
            Field::Distance => "Distance",
            Field::PreviousFlightDelay => "Previous Flight Delay",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.column())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The dataset file does not exist.
    #[error("The dataset file '{}' is missing.", .path.display())]
    MissingSource { path: PathBuf },
    /// The dataset exists but cannot be read into records.
    #[error("Malformed dataset: {0}")]
    MalformedData(String),
    /// A categorical value outside the fitted vocabulary.
    #[error("Unknown {column} category '{value}'")]
    UnknownCategory { column: &'static str, value: String },
    /// A raw request field failed validation. The reason is shown verbatim.
    #[error("{reason}")]
    InvalidInput { field: Field, reason: String },
    /// A feature vector handed to the classifier has the wrong shape.
    #[error("Feature vector has {actual} values, expected {expected}")]
    InvalidFeatureVector { expected: usize, actual: usize },
    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot split dataset: {0}")]
    InvalidSplit(String),
    #[error("Could not train model: {0}")]
    Training(String),
}

impl Error {
    /// Errors that reject a single inference request but leave the process healthy.
    pub fn is_request_local(&self) -> bool {
        matches!(
            self,
            Error::UnknownCategory { .. }
                | Error::InvalidInput { .. }
                | Error::InvalidFeatureVector { .. }
        )
    }
}

impl From<linfa_svm::SvmError> for Error {
    fn from(why: linfa_svm::SvmError) -> Self {
        Error::Training(why.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
