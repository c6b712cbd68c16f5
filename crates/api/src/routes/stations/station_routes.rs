use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{db::Station, routes::Error, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Distinct station ids in the dataset", content_type = "application/json", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn get_stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    let station_ids = state.climate_db.station_ids().await?;
    Ok(Json(station_ids))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station id, e.g. USC00519281"),
    ),
    responses(
        (status = OK, description = "Station metadata", content_type = "application/json", body = Station),
        (status = NOT_FOUND, description = "No station with that id", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(station_id): Path<String>,
) -> Result<Json<Station>, Error> {
    state
        .climate_db
        .station(&station_id)
        .await?
        .map(Json)
        .ok_or(Error::StationNotFound(station_id))
}
