use std::io;

use axum::http::StatusCode;
use shared::InvalidHit;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to read gazetteer: {0}")]
    Io(#[from] io::Error),
    #[error("invalid gazetteer definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("gazetteer is empty")]
    EmptyGazetteer,
    #[error("gazetteer place #{index} is invalid: {reason}")]
    InvalidPlace { index: usize, reason: InvalidHit },
    #[error("got {latitudes} latitudes but {longitudes} longitudes")]
    LengthMismatch { latitudes: usize, longitudes: usize },
    #[error("coordinate #{0} is out of range")]
    CoordinateOutOfRange(usize),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::LengthMismatch { .. } | ServiceError::CoordinateOutOfRange(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
