//! Error types for the demo host binary.
//!
//! [`SimError`] wraps every failure mode of the demo run so `main` can
//! propagate with `?`.

/// Top-level error for the demo host.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: devhooks_core::ConfigError,
    },

    /// An event could not be constructed.
    #[error("event error: {source}")]
    Event {
        /// The underlying construction error.
        #[from]
        source: devhooks_events::EventError,
    },

    /// Rack rendering failed.
    #[error("render error: {source}")]
    Render {
        /// The underlying render error.
        #[from]
        source: devhooks_core::RenderError,
    },

    /// An access notice could not be encoded or decoded for transport.
    #[error("notice transport error: {source}")]
    Wire {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
