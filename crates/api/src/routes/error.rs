use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db;

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Please use the format: YYYY-MM-DD.";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid date format. Please use the format: YYYY-MM-DD.")]
    InvalidDate(#[source] time::error::Parse),
    #[error("Station not found: {0}")]
    StationNotFound(String),
    #[error("Failed to read climate data: {0}")]
    Data(#[from] db::Error),
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidDate(e) => {
                warn!("rejected date parameter: {}", e);
                StatusCode::BAD_REQUEST
            }
            Error::StationNotFound(station_id) => {
                warn!("unknown station requested: {}", station_id);
                StatusCode::NOT_FOUND
            }
            Error::Data(e) => {
                error!("error reading climate data: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
