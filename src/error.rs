//! Error type shared by the library.
//!
//! The simulation itself never fails; only startup (configuration and the
//! rendering surface) can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The viewport has no drawable area.
    #[error("rendering surface unavailable ({width}x{height} px)")]
    SurfaceUnavailable { width: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, GameError>;
