//! Shared types and configuration for GauRakshak.
//!
//! This crate provides common types used across all other crates:
//! - Configuration management
//! - JWT claims and token service
//! - Auth request and response payloads

pub mod auth;
pub mod config;
pub mod jwt;

pub use auth::Claims;
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
