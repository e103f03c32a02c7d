//! Conf module — configuration model and loading.

pub mod model;
pub mod load;

use thiserror::Error;

use crate::format::FormatError;

pub use model::{CheckConfig, ValidatorConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode config: {0}")]
    Decode(#[from] toml::de::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
