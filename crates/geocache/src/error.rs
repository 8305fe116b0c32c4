//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, rejected coordinates, grid index overflow, transfers against
//! cells without a cache, and generic errors.
use thiserror::Error;

use crate::grid::CellCoord;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid coordinate ({lat}, {lng}): components must be finite")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("grid index out of range: {0}")]
    OutOfRange(String),

    #[error("no cache at cell {0}")]
    NoCache(CellCoord),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
