//! Trailing-window periods selectable on the dashboard.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Length of the trailing window used to slice a ticker's history.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
    PartialOrd,
    Ord,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Period {
    /// Last 7 days.
    Week,
    /// Last 31 days.
    Month,
    /// Last 90 days.
    #[default]
    Trimester,
    /// Last 365 days.
    Year,
}

impl Period {
    /// Number of calendar days the window reaches back from "today".
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 31,
            Period::Trimester => 90,
            Period::Year => 365,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("TRIMESTER".parse::<Period>().unwrap(), Period::Trimester);
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn day_table_is_fixed_and_ordered() {
        let days: Vec<i64> = Period::iter().map(Period::days).collect();
        assert_eq!(days, vec![7, 31, 90, 365]);
        assert_eq!(Period::default(), Period::Trimester);
        assert_eq!(Period::Month.to_string(), "Month");
    }
}
