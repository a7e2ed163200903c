pub mod secret;
pub mod settings;

pub use secret::SerializableSecretString;
pub use settings::{
    AppSettings, BusSettings, LogLevel, OffsetReset, SinkDbSettings, SourceDbSettings,
    ValidationError,
};
