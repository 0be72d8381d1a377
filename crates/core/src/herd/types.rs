//! Herd domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Animals aged three or younger count in the young cohort.
pub const YOUNG_COHORT_MAX_AGE: i32 = 3;

/// Animal gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Parse a gender from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Health status of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// No known issues.
    Healthy,
    /// Sick.
    Sick,
    /// Receiving treatment.
    #[serde(rename = "Under Treatment")]
    UnderTreatment,
}

impl HealthStatus {
    /// Parse a health status from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Healthy" => Some(Self::Healthy),
            "Sick" => Some(Self::Sick),
            "Under Treatment" => Some(Self::UnderTreatment),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Sick => "Sick",
            Self::UnderTreatment => "Under Treatment",
        }
    }
}

/// Direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// The animal entered the shelter.
    Entry,
    /// The animal left the shelter.
    Exit,
}

impl MovementKind {
    /// Parse a movement kind from its stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Entry" => Some(Self::Entry),
            "Exit" => Some(Self::Exit),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Exit => "Exit",
        }
    }
}

/// A registered animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    /// Animal ID.
    pub id: Uuid,
    /// Species label ("Cow", "Buffalo", ...).
    pub species: String,
    /// Government ear tag number, unique within one gaushala.
    pub govt_tag_no: String,
    /// Breed label.
    pub breed: String,
    /// Coat color.
    pub color: String,
    /// Gender.
    pub gender: Gender,
    /// Calendar year of birth.
    pub year_of_birth: i32,
    /// Health status.
    pub health_status: HealthStatus,
    /// Color of the ear tag.
    pub tag_color: String,
    /// Distinguishing mark, if any.
    pub identification_mark: Option<String>,
    /// Photo URL, if any.
    pub image_url: Option<String>,
}

impl Animal {
    /// Age in years as of the given day. Year arithmetic only; the shelter
    /// records birth years, not birth dates.
    #[must_use]
    pub fn age_at(&self, day: NaiveDate) -> i32 {
        use chrono::Datelike;
        day.year() - self.year_of_birth
    }

    /// Whether the animal falls in the young cohort as of the given day.
    #[must_use]
    pub fn is_young_at(&self, day: NaiveDate) -> bool {
        self.age_at(day) <= YOUNG_COHORT_MAX_AGE
    }
}

/// One entry or exit in the movement log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// Movement ID.
    pub id: Uuid,
    /// The animal that moved.
    pub animal_id: Uuid,
    /// Entry or exit.
    pub kind: MovementKind,
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Why the animal moved.
    pub reason: String,
}

/// Headcount split by gender and by age cohort.
///
/// Gender and cohort are tallied independently: `male + female` and
/// `young + adult` both equal the headcount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortTally {
    /// Male headcount.
    pub male: i32,
    /// Female headcount.
    pub female: i32,
    /// Headcount aged 0-3 years.
    pub young: i32,
    /// Headcount aged over 3 years.
    pub adult: i32,
}

impl CohortTally {
    /// Tallies one animal.
    pub fn add(&mut self, gender: Gender, young: bool) {
        match gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
        }
        if young {
            self.young += 1;
        } else {
            self.adult += 1;
        }
    }

    /// Cell-wise `opening + inflow - outflow`.
    #[must_use]
    pub fn roll_forward(&self, inflow: &Self, outflow: &Self) -> Self {
        Self {
            male: self.male + inflow.male - outflow.male,
            female: self.female + inflow.female - outflow.female,
            young: self.young + inflow.young - outflow.young,
            adult: self.adult + inflow.adult - outflow.adult,
        }
    }
}

/// One day of the daily headcount summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRow {
    /// The day this row describes.
    pub date: NaiveDate,
    /// Headcount at the start of the day.
    pub opening: CohortTally,
    /// Entries during the day.
    pub inflow: CohortTally,
    /// Entry reasons, comma separated.
    pub in_reasons: String,
    /// Exits during the day.
    pub outflow: CohortTally,
    /// Exit reasons, comma separated.
    pub out_reasons: String,
    /// Headcount at the end of the day.
    pub closing: CohortTally,
}

/// Headcount split by age cohort, for one gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortSlice {
    /// Headcount aged 0-3 years.
    pub young: i32,
    /// Headcount aged over 3 years.
    pub adult: i32,
    /// Total headcount.
    pub total: i32,
}

/// A movement flow split by age cohort, with the reasons behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSlice {
    /// Movements of animals aged 0-3 years.
    pub young: i32,
    /// Movements of animals aged over 3 years.
    pub adult: i32,
    /// Total movements.
    pub total: i32,
    /// Reasons in movement order.
    pub reasons: Vec<String>,
}

/// Opening, flows, and closing for one gender across the whole range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderSummary {
    /// Headcount at the range start.
    pub opening: CohortSlice,
    /// Entries over the range.
    pub inflow: FlowSlice,
    /// Exits over the range.
    pub outflow: FlowSlice,
    /// Headcount at the range end.
    pub closing: CohortSlice,
}

/// The cross-tab report: gender rows plus a totals row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTabReport {
    /// Male summary.
    pub male: GenderSummary,
    /// Female summary.
    pub female: GenderSummary,
    /// Male + female, cell by cell, reasons concatenated.
    pub total: GenderSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn animal(gender: Gender, year_of_birth: i32) -> Animal {
        Animal {
            id: Uuid::new_v4(),
            species: "Cow".to_string(),
            govt_tag_no: "T-1".to_string(),
            breed: "Gir".to_string(),
            color: "Brown".to_string(),
            gender,
            year_of_birth,
            health_status: HealthStatus::Healthy,
            tag_color: "Yellow".to_string(),
            identification_mark: None,
            image_url: None,
        }
    }

    #[test]
    fn test_cohort_boundary_is_inclusive_at_three() {
        let a = animal(Gender::Female, 2021);
        assert_eq!(a.age_at(d("2024-06-15")), 3);
        assert!(a.is_young_at(d("2024-06-15")));
        assert!(!a.is_young_at(d("2025-01-01")));
    }

    #[test]
    fn test_age_uses_calendar_year_only() {
        let a = animal(Gender::Male, 2020);
        // Same age on January 1st and December 31st.
        assert_eq!(a.age_at(d("2024-01-01")), a.age_at(d("2024-12-31")));
    }

    #[test]
    fn test_tally_add_and_roll_forward() {
        let mut opening = CohortTally::default();
        opening.add(Gender::Male, true);
        opening.add(Gender::Female, false);
        assert_eq!(opening.male, 1);
        assert_eq!(opening.female, 1);
        assert_eq!(opening.young, 1);
        assert_eq!(opening.adult, 1);

        let mut inflow = CohortTally::default();
        inflow.add(Gender::Female, true);
        let mut outflow = CohortTally::default();
        outflow.add(Gender::Male, true);

        let closing = opening.roll_forward(&inflow, &outflow);
        assert_eq!(closing.male, 0);
        assert_eq!(closing.female, 2);
        assert_eq!(closing.young, 1);
        assert_eq!(closing.adult, 1);
    }

    #[test]
    fn test_enum_round_trips() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("male"), None);
        assert_eq!(
            HealthStatus::parse("Under Treatment"),
            Some(HealthStatus::UnderTreatment)
        );
        assert_eq!(HealthStatus::UnderTreatment.as_str(), "Under Treatment");
        assert_eq!(MovementKind::parse("Exit"), Some(MovementKind::Exit));
    }
}
