//! Error types for TileSonic

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileSonicError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio instance error: {0}")]
    AudioInstance(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, TileSonicError>;
