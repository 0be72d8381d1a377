//! Animal registry and movement report derivations.

pub mod report;
pub mod types;

pub use report::{current_state, detailed_report, filter_registry, movement_history};
pub use types::{AgeBucket, DetailedRow, MovementHistoryRow, RegistryFilter};
