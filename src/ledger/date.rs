use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FarmError;

const ISO_FORMAT: &str = "%Y-%m-%d";
const MONTH_PREFIX_LEN: usize = 7;

/// A calendar day held as its `YYYY-MM-DD` text.
///
/// Ordering and filtering are plain string comparisons, which is exact for
/// zero-padded ISO dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct IsoDate(String);

impl IsoDate {
    pub fn parse(raw: &str) -> Result<Self, FarmError> {
        let trimmed = raw.trim();
        // Timestamps from the store carry a time part after `T` or a space.
        let day = match (trimmed.get(..10), trimmed.get(10..)) {
            (Some(day), Some(time)) if time.starts_with(['T', ' ']) => day,
            _ => trimmed,
        };
        NaiveDate::parse_from_str(day, ISO_FORMAT)
            .map(Self::from_naive)
            .map_err(|_| FarmError::InvalidInput(format!("`{}` is not a YYYY-MM-DD date", raw)))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format(ISO_FORMAT).to_string())
    }

    pub fn today() -> Self {
        Self::from_naive(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `YYYY-MM` month this day belongs to.
    pub fn month(&self) -> &str {
        self.0.get(..MONTH_PREFIX_LEN).unwrap_or(&self.0)
    }

    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, ISO_FORMAT).ok()
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IsoDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        IsoDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Scope used by the daily and monthly filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePeriod {
    Day(IsoDate),
    /// `YYYY-MM`
    Month(String),
}

impl DatePeriod {
    /// Accepts either `YYYY-MM-DD` or `YYYY-MM`.
    pub fn parse(raw: &str) -> Result<Self, FarmError> {
        let trimmed = raw.trim();
        if trimmed.len() == MONTH_PREFIX_LEN {
            let probe = format!("{}-01", trimmed);
            IsoDate::parse(&probe)?;
            return Ok(DatePeriod::Month(trimmed.to_string()));
        }
        IsoDate::parse(trimmed).map(DatePeriod::Day)
    }

    pub fn month_of(date: &IsoDate) -> Self {
        DatePeriod::Month(date.month().to_string())
    }

    pub fn matches(&self, date: &IsoDate) -> bool {
        match self {
            DatePeriod::Day(day) => day == date,
            DatePeriod::Month(month) => date.as_str().starts_with(month.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DatePeriod::Day(day) => day.as_str(),
            DatePeriod::Month(month) => month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_store_timestamps() {
        let date = IsoDate::parse("2024-06-15T10:22:00+00:00").unwrap();
        assert_eq!(date.as_str(), "2024-06-15");
        assert_eq!(date.month(), "2024-06");
        let spaced = IsoDate::parse("2024-06-15 10:22:00").unwrap();
        assert_eq!(spaced.as_str(), "2024-06-15");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(IsoDate::parse("15/06/2024").is_err());
        assert!(IsoDate::parse("2024-06-15garbage").is_err());
        assert!(IsoDate::parse("2024-06-1512").is_err());
        assert!(DatePeriod::parse("2024-13").is_err());
    }

    #[test]
    fn month_period_matches_on_prefix() {
        let date = IsoDate::parse("2024-06-15").unwrap();
        assert!(DatePeriod::parse("2024-06").unwrap().matches(&date));
        assert!(!DatePeriod::parse("2024-07").unwrap().matches(&date));
        assert!(DatePeriod::parse("2024-06-15").unwrap().matches(&date));
        assert!(!DatePeriod::parse("2024-06-16").unwrap().matches(&date));
    }
}
