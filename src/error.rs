//! Error types for venbluez.
//!
//! Every variant here ends the run with exit status 1. Recoverable failures
//! (a silent probe, a pairing attempt that goes nowhere) never reach this type;
//! they are logged and folded into the stage's result instead.

use thiserror::Error;

/// Fatal errors raised by the capture pipeline.
#[derive(Error, Debug)]
pub enum VenbluezError {
    /// The address given on the command line is not a six-octet hex address.
    #[error("Invalid Bluetooth address '{0}': expected six hex octets like AA:BB:CC:DD:EE:FF")]
    InvalidAddress(String),

    /// A required external program is not on the search path.
    #[error("Required tool '{0}' not found. Please install it.")]
    MissingTool(String),

    /// The target did not answer the link-layer probe.
    #[error("Target device {0} is not reachable")]
    Unreachable(String),

    /// The source listing has no headset-profile entry for the target.
    #[error("Bluetooth mic source for '{key}' not found in the audio server source list")]
    SourceNotFound {
        /// Underscore form of the address the listing was searched for.
        key: String,
    },

    /// The audio server could not be queried.
    #[error("Error while searching for source: {0}")]
    SourceQuery(String),

    /// The recorder process could not be started.
    #[error("Failed to start recording: {0}")]
    RecorderSpawn(#[source] std::io::Error),

    /// The configuration file is unreadable or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for pipeline stages.
pub type Result<T> = std::result::Result<T, VenbluezError>;
