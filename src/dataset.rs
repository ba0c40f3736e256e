//! Loading the labeled flight dataset and partitioning it for training.

use crate::error::{Error, Result};
use crate::model::Label;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

/// Header columns every dataset must carry.
pub const COLUMNS: [&str; 6] = [
    "DepTime",
    "ArrTime",
    "Airline",
    "Distance",
    "WeatherConditions",
    "PreviousFlightDelay",
];

pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// One flight row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub dep_time: i64,
    pub arr_time: i64,
    pub airline: String,
    pub distance: i64,
    pub weather: String,
    pub previous_delay: Label,
}

/// Row as it appears on disk, before domain checks.
#[derive(Deserialize)]
struct CsvRow {
    #[serde(rename = "DepTime")]
    dep_time: i64,
    #[serde(rename = "ArrTime")]
    arr_time: i64,
    #[serde(rename = "Airline")]
    airline: String,
    #[serde(rename = "Distance")]
    distance: i64,
    #[serde(rename = "WeatherConditions")]
    weather: String,
    #[serde(rename = "PreviousFlightDelay")]
    previous_delay: i64,
}

impl CsvRow {
    fn into_record(self, number: usize) -> Result<Record> {
        let previous_delay = Label::from_code(self.previous_delay).ok_or_else(|| {
            Error::MalformedData(format!(
                "record {}: PreviousFlightDelay must be 0 or 1, got {}",
                number, self.previous_delay
            ))
        })?;
        if self.distance <= 0 {
            return Err(Error::MalformedData(format!(
                "record {}: Distance must be positive, got {}",
                number, self.distance
            )));
        }
        Ok(Record {
            dep_time: self.dep_time,
            arr_time: self.arr_time,
            airline: self.airline,
            distance: self.distance,
            weather: self.weather,
            previous_delay,
        })
    }
}

/// Ordered, immutable set of records loaded at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Dataset {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn airlines(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.airline.as_str())
    }

    pub fn weather_conditions(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.weather.as_str())
    }
}

/// Reads the dataset at `path`.
///
/// A missing file is reported as [`Error::MissingSource`]; anything that
/// prevents a row from becoming a [`Record`] is [`Error::MalformedData`].
pub fn load(path: &Path) -> Result<Dataset> {
    info!("Loading {}", path.display());
    let file = match File::open(path) {
        Ok(file) => file,
        Err(why) if why.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingSource {
                path: path.to_path_buf(),
            })
        }
        Err(why) => {
            return Err(Error::MalformedData(format!(
                "could not open {}: {}",
                path.display(),
                why
            )))
        }
    };
    let dataset = from_reader(file)?;
    info!("Loaded {} records", dataset.len());
    Ok(dataset)
}

/// Parses CSV data with a header row into a [`Dataset`].
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|why| Error::MalformedData(format!("could not read header: {}", why)))?
        .clone();
    let missing: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(Error::MalformedData(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let number = i + 1;
        let row = row.map_err(|why| Error::MalformedData(format!("record {}: {}", number, why)))?;
        records.push(row.into_record(number)?);
    }
    if records.is_empty() {
        return Err(Error::MalformedData("dataset contains no records".into()));
    }
    Ok(Dataset::new(records))
}

/// Shuffles `rows` with a seeded generator and returns `(train, test)`.
///
/// The test partition takes `ceil(n * test_fraction)` rows. The same seed
/// always yields the same partition.
pub fn split<T: Clone>(rows: &[T], test_fraction: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidSplit(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }
    let n_test = (rows.len() as f64 * test_fraction).ceil() as usize;
    if n_test >= rows.len() {
        return Err(Error::InvalidSplit(format!(
            "{} rows leave no training data at test fraction {}",
            rows.len(),
            test_fraction
        )));
    }

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train = train_idx.iter().map(|&i| rows[i].clone()).collect::<Vec<T>>();
    let test = test_idx.iter().map(|&i| rows[i].clone()).collect::<Vec<T>>();
    debug!(
        "Split {} rows into {} train / {} test (seed {})",
        rows.len(),
        train.len(),
        test.len(),
        seed
    );
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const HEADER: &str = "DepTime,ArrTime,Airline,Distance,WeatherConditions,PreviousFlightDelay\n";

    #[test]
    fn parses_records_in_order() {
        let csv = format!(
            "{}800,1000,Delta,500,Clear,0\n1400,1600,United,1200,Rainy,1\n",
            HEADER
        );
        let dataset = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.records()[0],
            Record {
                dep_time: 800,
                arr_time: 1000,
                airline: "Delta".into(),
                distance: 500,
                weather: "Clear".into(),
                previous_delay: Label::NoPreviousDelay,
            }
        );
        assert_eq!(dataset.records()[1].previous_delay, Label::PreviousDelay);
    }

    #[test]
    fn columns_may_come_in_any_order() {
        let csv = "Airline,PreviousFlightDelay,DepTime,ArrTime,Distance,WeatherConditions,Extra\n\
                   JetBlue,1,915,1130,640,Snowy,x\n";
        let dataset = from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].airline, "JetBlue");
        assert_eq!(dataset.records()[0].dep_time, 915);
    }

    #[test]
    fn rejects_missing_columns() {
        let csv = "DepTime,ArrTime,Airline,Distance\n800,1000,Delta,500\n";
        match from_reader(csv.as_bytes()) {
            Err(Error::MalformedData(msg)) => {
                assert!(msg.contains("WeatherConditions"));
                assert!(msg.contains("PreviousFlightDelay"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_label_outside_binary_domain() {
        let csv = format!("{}800,1000,Delta,500,Clear,2\n", HEADER);
        assert!(matches!(
            from_reader(csv.as_bytes()),
            Err(Error::MalformedData(_))
        ));
    }

    #[test]
    fn rejects_unparsable_rows() {
        let csv = format!("{}800,ten,Delta,500,Clear,0\n", HEADER);
        match from_reader(csv.as_bytes()) {
            Err(Error::MalformedData(msg)) => assert!(msg.starts_with("record 1")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_non_positive_distance() {
        let csv = format!("{}800,1000,Delta,0,Clear,0\n", HEADER);
        assert!(matches!(
            from_reader(csv.as_bytes()),
            Err(Error::MalformedData(_))
        ));
    }

    #[test]
    fn rejects_empty_dataset() {
        assert!(matches!(
            from_reader(HEADER.as_bytes()),
            Err(Error::MalformedData(_))
        ));
    }

    #[test]
    fn missing_file_is_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flight_delay_dataset.csv");
        match load(&path) {
            Err(Error::MissingSource { path: reported }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn split_is_deterministic_for_a_seed() {
        let rows: Vec<u32> = (0..50).collect();
        let first = split(&rows, 0.2, 42).unwrap();
        let second = split(&rows, 0.2, 42).unwrap();
        assert_eq!(first, second);

        let other = split(&rows, 0.2, 7).unwrap();
        assert_ne!(first.1, other.1);
    }

    #[test]
    fn split_partitions_are_disjoint_and_complete() {
        let rows: Vec<u32> = (0..23).collect();
        let (train, test) = split(&rows, 0.2, 42).unwrap();
        assert_eq!(test.len(), 5);
        assert_eq!(train.len(), 18);

        let train_set: HashSet<u32> = train.iter().copied().collect();
        let test_set: HashSet<u32> = test.iter().copied().collect();
        assert!(train_set.is_disjoint(&test_set));
        let union: HashSet<u32> = train_set.union(&test_set).copied().collect();
        assert_eq!(union, rows.iter().copied().collect());
    }

    #[test]
    fn split_rejects_bad_fractions() {
        let rows: Vec<u32> = (0..10).collect();
        for fraction in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                split(&rows, fraction, 42),
                Err(Error::InvalidSplit(_))
            ));
        }
    }

    #[test]
    fn split_needs_a_training_row() {
        let rows = vec![1u8];
        assert!(matches!(split(&rows, 0.2, 42), Err(Error::InvalidSplit(_))));
    }
}
