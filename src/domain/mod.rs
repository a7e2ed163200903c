//! Domain layer for the SentinelSync configuration
//!
//! This module contains the settings value types and their validation rules.

pub mod models;

pub use models::{AppSettings, ValidationError};
