//! `SeaORM` entity definitions.
//!
//! Domain enumerations (record kinds, statuses, genders) are stored as their
//! display strings and validated by `gaurakshak-core` parsers plus CHECK
//! constraints in the schema.

pub mod accounts;
pub mod amc_renewals;
pub mod animals;
pub mod financial_records;
pub mod milk_records;
pub mod movements;
pub mod users;
