//! Herd population reconstruction.
//!
//! The shelter never stores a headcount. Presence is reconstructed from the
//! movement log: an animal is present at a cutoff day iff its most recent
//! movement strictly before that day is an entry.

pub mod population;
pub mod types;

pub use population::{cross_tab_summary, daily_summary, is_present_as_of};
pub use types::{
    Animal, CohortSlice, CohortTally, CrossTabReport, DailyRow, FlowSlice, Gender, GenderSummary,
    HealthStatus, Movement, MovementKind,
};
