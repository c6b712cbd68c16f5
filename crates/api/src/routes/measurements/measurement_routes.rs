use axum::{
    extract::{Path, Query, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::{IntoParams, ToSchema};

use crate::{
    db::{parse_date, DateRange, PrecipitationReading, TemperatureSummary},
    routes::Error,
    AppState,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct PrecipitationParams {
    /// Keep every reading per date instead of only the last one read
    pub all: Option<bool>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PrecipitationByDate {
    /// One value per date; when several stations report the same date the
    /// last row read (highest row id) wins.
    Latest(BTreeMap<String, Option<f64>>),
    /// Every station's reading for each date, in row order.
    All(BTreeMap<String, Vec<Option<f64>>>),
}

impl PrecipitationByDate {
    pub fn latest(readings: Vec<PrecipitationReading>) -> Self {
        let by_date = readings
            .into_iter()
            .map(|reading| (reading.date, reading.precipitation))
            .collect();
        PrecipitationByDate::Latest(by_date)
    }

    pub fn all(readings: Vec<PrecipitationReading>) -> Self {
        let mut by_date: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        for reading in readings {
            by_date
                .entry(reading.date)
                .or_default()
                .push(reading.precipitation);
        }
        PrecipitationByDate::All(by_date)
    }

    fn empty(all: bool) -> Self {
        if all {
            PrecipitationByDate::All(BTreeMap::new())
        } else {
            PrecipitationByDate::Latest(BTreeMap::new())
        }
    }
}

/// The configured trailing window ending on the dataset's latest date, or
/// `None` when the dataset holds no observations.
async fn trailing_window(state: &AppState) -> Result<Option<DateRange>, Error> {
    let latest = state.climate_db.latest_observation_date().await?;
    Ok(latest.map(|latest| DateRange::trailing(latest, state.window_days)))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    params(PrecipitationParams),
    responses(
        (status = OK, description = "Precipitation for the last 12 months of data, keyed by date", content_type = "application/json", body = PrecipitationByDate),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PrecipitationParams>,
) -> Result<Json<PrecipitationByDate>, Error> {
    let all = params.all.unwrap_or(false);
    let Some(window) = trailing_window(&state).await? else {
        return Ok(Json(PrecipitationByDate::empty(all)));
    };

    let readings = state.climate_db.precipitation(&window).await?;
    debug!("precipitation: {} readings from {}", readings.len(), window.start);

    let body = if all {
        PrecipitationByDate::all(readings)
    } else {
        PrecipitationByDate::latest(readings)
    };
    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the configured station for the last 12 months of data", content_type = "application/json", body = Vec<f64>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<f64>>, Error> {
    let Some(window) = trailing_window(&state).await? else {
        return Ok(Json(vec![]));
    };

    let observations = state
        .climate_db
        .station_observations(&state.tobs_station, &window)
        .await?;

    Ok(Json(
        observations
            .into_iter()
            .map(|observation| observation.temperature)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/date/{start}",
    params(
        ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature from the start date on", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Date is not YYYY-MM-DD", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, Error> {
    summarize(&state, &start, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/date/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date included, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature between both dates", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Date is not YYYY-MM-DD", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::routes::ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, Error> {
    summarize(&state, &start, Some(&end)).await
}

async fn summarize(
    state: &AppState,
    start: &str,
    end: Option<&str>,
) -> Result<Json<Vec<TemperatureSummary>>, Error> {
    let start = parse_date(start).map_err(Error::InvalidDate)?;
    let end = end
        .map(parse_date)
        .transpose()
        .map_err(Error::InvalidDate)?;

    let summary = state
        .climate_db
        .temperature_summary(&DateRange::new(start, end))
        .await?;

    Ok(Json(vec![summary]))
}
