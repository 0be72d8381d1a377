//! Registry report types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::herd::{Animal, MovementKind};

/// Age bucket filter on the registry report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBucket {
    /// Up to 2 years.
    #[serde(rename = "0-2")]
    UpToTwo,
    /// 3 to 5 years.
    #[serde(rename = "3-5")]
    ThreeToFive,
    /// 6 to 10 years.
    #[serde(rename = "6-10")]
    SixToTen,
    /// Over 10 years.
    #[serde(rename = "10+")]
    OverTen,
}

impl AgeBucket {
    /// Parse an age bucket from its filter string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "0-2" => Some(Self::UpToTwo),
            "3-5" => Some(Self::ThreeToFive),
            "6-10" => Some(Self::SixToTen),
            "10+" => Some(Self::OverTen),
            _ => None,
        }
    }

    /// Whether an age in years falls inside the bucket.
    #[must_use]
    pub const fn contains(self, age: i32) -> bool {
        match self {
            Self::UpToTwo => age <= 2,
            Self::ThreeToFive => age >= 3 && age <= 5,
            Self::SixToTen => age >= 6 && age <= 10,
            Self::OverTen => age > 10,
        }
    }
}

/// Filters for the animal registry report. `None` means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryFilter {
    /// Species label filter.
    pub species: Option<String>,
    /// Breed filter.
    pub breed: Option<String>,
    /// Coat color filter.
    pub color: Option<String>,
    /// Health status filter (stored string form).
    pub health_status: Option<String>,
    /// Age bucket filter.
    pub age: Option<AgeBucket>,
}

/// One movement history row with the animal's tag resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MovementHistoryRow {
    /// Movement ID.
    pub id: Uuid,
    /// The animal that moved.
    pub animal_id: Uuid,
    /// The animal's government tag, or a placeholder if unknown.
    pub govt_tag_no: String,
    /// Entry or exit.
    pub kind: MovementKind,
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Why the animal moved.
    pub reason: String,
}

/// One row of the detailed report: an animal with its stay boundaries.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedRow {
    /// The animal.
    pub animal: Animal,
    /// Age in years as of the report day.
    pub age: i32,
    /// Earliest entry date, if the animal ever entered.
    pub check_in_date: Option<NaiveDate>,
    /// Latest exit date, if the animal ever exited.
    pub check_out_date: Option<NaiveDate>,
    /// Reason on the latest exit.
    pub check_out_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AgeBucket::UpToTwo, 0, true)]
    #[case(AgeBucket::UpToTwo, 2, true)]
    #[case(AgeBucket::UpToTwo, 3, false)]
    #[case(AgeBucket::ThreeToFive, 3, true)]
    #[case(AgeBucket::ThreeToFive, 5, true)]
    #[case(AgeBucket::ThreeToFive, 6, false)]
    #[case(AgeBucket::SixToTen, 10, true)]
    #[case(AgeBucket::SixToTen, 11, false)]
    #[case(AgeBucket::OverTen, 11, true)]
    #[case(AgeBucket::OverTen, 10, false)]
    fn test_age_bucket_boundaries(
        #[case] bucket: AgeBucket,
        #[case] age: i32,
        #[case] inside: bool,
    ) {
        assert_eq!(bucket.contains(age), inside);
    }

    #[rstest]
    #[case("0-2", Some(AgeBucket::UpToTwo))]
    #[case("3-5", Some(AgeBucket::ThreeToFive))]
    #[case("6-10", Some(AgeBucket::SixToTen))]
    #[case("10+", Some(AgeBucket::OverTen))]
    #[case("All", None)]
    fn test_age_bucket_parse(#[case] input: &str, #[case] expected: Option<AgeBucket>) {
        assert_eq!(AgeBucket::parse(input), expected);
    }
}
