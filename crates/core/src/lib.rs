//! Core business logic for GauRakshak.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Account ledger statements from the financial record log
//! - `herd` - Headcount reconstruction from the movement log
//! - `registry` - Animal registry and movement report derivations
//! - `approval` - User and AMC renewal approval transitions
//! - `export` - Tabular report shaping and CSV serialization
//! - `auth` - Password hashing

pub mod approval;
pub mod auth;
pub mod export;
pub mod herd;
pub mod ledger;
pub mod registry;
pub mod window;

pub use window::DateWindow;
