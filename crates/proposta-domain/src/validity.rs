//! Proposal validity (expiration) date.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display format for validity dates (`DD/MM/YYYY`).
pub const VALIDITY_FORMAT: &str = "%d/%m/%Y";

/// Last calendar day on which a proposal is still actionable.
///
/// Wire format: `"DD/MM/YYYY"`. Stored as a SQL `DATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidityDate(NaiveDate);

impl ValidityDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ValidityDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for ValidityDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(VALIDITY_FORMAT))
    }
}

impl FromStr for ValidityDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, VALIDITY_FORMAT).map(Self)
    }
}

impl Serialize for ValidityDate {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ValidityDate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Rejected term input. Fatal to a dispatch: nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTerm {
    #[error("term must be a non-negative whole number of days, got {0:?}")]
    NotANumber(String),
    #[error("term of {0} days is beyond the supported calendar")]
    OutOfRange(u32),
}

/// Compute the validity date `term_days` calendar days after `reference`.
///
/// The time-of-day of `reference` is discarded before adding days, so any
/// instant on the same UTC date yields the same result.
pub fn compute_validity(
    term_days: &str,
    reference: DateTime<Utc>,
) -> Result<ValidityDate, InvalidTerm> {
    let term: u32 = term_days
        .trim()
        .parse()
        .map_err(|_| InvalidTerm::NotANumber(term_days.to_owned()))?;
    reference
        .date_naive()
        .checked_add_days(Days::new(u64::from(term)))
        .map(ValidityDate)
        .ok_or(InvalidTerm::OutOfRange(term))
}
