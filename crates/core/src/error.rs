use std::path::PathBuf;
use thiserror::Error;
use trellis_plugin::DiscoveryError;

#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cache encoding error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Cache decoding error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Cannot create cache directory {}: {source}", path.display())]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed cache file: {0}")]
    MalformedCache(String),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<trellis_api::ApiError> for TrellisError {
    fn from(err: trellis_api::ApiError) -> Self {
        TrellisError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrellisError>;
