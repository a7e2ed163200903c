//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON log formatting
//! - Default level taken from `app.log_level`, `RUST_LOG` wins when set
pub mod logger;

pub use logger::{init_logging, tracing_level, LogFormat};
