//! Categorical column encoding.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Closed mapping between the categories of one column and integer codes.
///
/// Codes follow the lexicographic order of the fitted values, so the same
/// vocabulary always yields the same codes regardless of row order. Values
/// that were not present at fit time are rejected rather than assigned a
/// new code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncoder {
    column: &'static str,
    codes: BTreeMap<String, i64>,
    categories: Vec<String>,
}

impl CategoryEncoder {
    /// Builds the vocabulary for `column` from every value it contains.
    pub fn fit<'a, I>(column: &'static str, values: I) -> CategoryEncoder
    where
        I: IntoIterator<Item = &'a str>,
    {
        let categories: Vec<String> = values
            .into_iter()
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(String::from)
            .collect();
        let codes = categories
            .iter()
            .enumerate()
            .map(|(code, category)| (category.clone(), code as i64))
            .collect();
        CategoryEncoder {
            column,
            codes,
            categories,
        }
    }

    pub fn transform(&self, value: &str) -> Result<i64> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| Error::UnknownCategory {
                column: self.column,
                value: value.to_string(),
            })
    }

    pub fn inverse(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.categories.get(i))
            .map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }

    /// Fitted categories in code order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airlines() -> CategoryEncoder {
        CategoryEncoder::fit(
            "Airline",
            ["United", "Delta", "United", "JetBlue", "American", "Delta"],
        )
    }

    #[test]
    fn codes_follow_lexicographic_order() {
        let encoder = airlines();
        assert_eq!(encoder.categories(), ["American", "Delta", "JetBlue", "United"]);
        assert_eq!(encoder.transform("American").unwrap(), 0);
        assert_eq!(encoder.transform("United").unwrap(), 3);
    }

    #[test]
    fn row_order_does_not_change_codes() {
        let shuffled = CategoryEncoder::fit("Airline", ["American", "JetBlue", "Delta", "United"]);
        assert_eq!(shuffled, airlines());
    }

    #[test]
    fn transform_is_idempotent() {
        let encoder = airlines();
        let first = encoder.transform("JetBlue").unwrap();
        for _ in 0..5 {
            assert_eq!(encoder.transform("JetBlue").unwrap(), first);
        }
    }

    #[test]
    fn inverse_round_trips_fitted_values() {
        let encoder = airlines();
        for category in ["United", "Delta", "JetBlue", "American"] {
            let code = encoder.transform(category).unwrap();
            assert_eq!(encoder.inverse(code), Some(category));
        }
        assert_eq!(encoder.inverse(4), None);
        assert_eq!(encoder.inverse(-1), None);
    }

    #[test]
    fn unseen_values_are_rejected_regardless_of_closeness() {
        let encoder = airlines();
        for value in ["Spirit", "delta", "DELTA", "Delta ", ""] {
            match encoder.transform(value) {
                Err(Error::UnknownCategory { column, value: v }) => {
                    assert_eq!(column, "Airline");
                    assert_eq!(v, value);
                }
                other => panic!("unexpected result for {:?}: {:?}", value, other),
            }
        }
        assert_eq!(encoder, airlines());
    }
}
