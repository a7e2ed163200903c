//! Infrastructure layer module
//!
//! This module contains the parts that touch the outside world:
//! - Configuration loading (YAML file, environment variables, shared cache)
//! - Logging infrastructure

pub mod config;
pub mod logging;
