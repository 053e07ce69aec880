use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::PopulateError;

/// Upper bound accepted for `max_collection_size`.
pub const MAX_COLLECTION_SIZE_LIMIT: usize = 64;

/// Options for the population engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulateOptions {
    /// Smallest element count drawn by the default container generators.
    pub min_collection_size: usize,
    /// Largest element count drawn by the default container generators.
    pub max_collection_size: usize,
    /// First day of the window temporal values are drawn from.
    pub base_date: NaiveDate,
    /// Width of the temporal window, in days.
    pub date_span_days: u32,
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self {
            min_collection_size: 1,
            max_collection_size: 5,
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            date_span_days: 365,
        }
    }
}

impl PopulateOptions {
    /// Parses options from TOML; missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, PopulateError> {
        let options: Self = toml::from_str(input)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), PopulateError> {
        if self.min_collection_size > self.max_collection_size {
            return Err(PopulateError::InvalidOptions(format!(
                "min_collection_size ({}) exceeds max_collection_size ({})",
                self.min_collection_size, self.max_collection_size
            )));
        }
        if self.max_collection_size > MAX_COLLECTION_SIZE_LIMIT {
            return Err(PopulateError::InvalidOptions(format!(
                "max_collection_size ({}) exceeds the limit of {MAX_COLLECTION_SIZE_LIMIT}",
                self.max_collection_size
            )));
        }
        // One spare day on each side keeps every UTC offset representable.
        let in_range = self
            .base_date
            .checked_sub_days(Days::new(1))
            .and_then(|_| {
                self.base_date
                    .checked_add_days(Days::new(u64::from(self.date_span_days) + 1))
            })
            .is_some();
        if !in_range {
            return Err(PopulateError::InvalidOptions(format!(
                "date window {} + {} days exceeds the supported date range",
                self.base_date, self.date_span_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let options = PopulateOptions::from_toml_str(
            r#"
max_collection_size = 3
base_date = "2020-02-29"
"#,
        )
        .expect("parse options");
        assert_eq!(options.min_collection_size, 1);
        assert_eq!(options.max_collection_size, 3);
        assert_eq!(
            options.base_date,
            NaiveDate::from_ymd_opt(2020, 2, 29).expect("date")
        );
        assert_eq!(options.date_span_days, 365);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let result = PopulateOptions::from_toml_str("min_collection_size = 9\nmax_collection_size = 2");
        assert!(matches!(result, Err(PopulateError::InvalidOptions(_))));
    }

    #[test]
    fn rejects_oversized_collections() {
        let options = PopulateOptions {
            max_collection_size: 1000,
            ..PopulateOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_date_window_past_calendar_range() {
        let options = PopulateOptions {
            date_span_days: 100_000_000,
            ..PopulateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(PopulateError::InvalidOptions(ref reason)) if reason.contains("date window")
        ));

        let at_edge = PopulateOptions {
            base_date: NaiveDate::MAX
                .checked_sub_days(Days::new(1))
                .expect("day before max"),
            date_span_days: 0,
            ..PopulateOptions::default()
        };
        assert!(at_edge.validate().is_ok());
        let past_edge = PopulateOptions {
            date_span_days: 1,
            ..at_edge
        };
        assert!(past_edge.validate().is_err());

        let at_min = PopulateOptions {
            base_date: NaiveDate::MIN,
            ..PopulateOptions::default()
        };
        assert!(at_min.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let result = PopulateOptions::from_toml_str("max_collection_size = \"many\"");
        assert!(matches!(result, Err(PopulateError::Toml(_))));
    }
}
