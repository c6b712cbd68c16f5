use crate::{
    db::{self, ClimateAccess, ClimateData, Database, DatasetSpan},
    get_station, get_stations, index_handler, precipitation, routes, temperature_between,
    temperature_from, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{info, warn};
use std::{path::Path, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
    /// Station reported by `/api/v1.0/tobs`
    pub tobs_station: String,
    /// Length of the trailing window ending at the latest observation
    pub window_days: i64,
    /// Read once at startup; the dataset is static
    pub dataset_span: Option<DatasetSpan>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::measurements::measurement_routes::precipitation,
        routes::measurements::measurement_routes::tobs,
        routes::measurements::measurement_routes::temperature_from,
        routes::measurements::measurement_routes::temperature_between,
        routes::stations::station_routes::get_stations,
        routes::stations::station_routes::get_station,
    ),
    components(
        schemas(
                routes::ErrorBody,
                routes::measurements::measurement_routes::PrecipitationByDate,
                db::Station,
                db::TemperatureSummary,
        )
    ),
    tags(
        (name = "climate api", description = "a read-only RESTful api over station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub struct Settings {
    pub tobs_station: String,
    pub window_days: i64,
    pub max_connections: u32,
}

pub async fn build_app_state(database: &Path, settings: Settings) -> Result<AppState, anyhow::Error> {
    let db = Arc::new(
        Database::open(database, settings.max_connections)
            .await
            .map_err(|e| anyhow!("error opening climate dataset: {}", e))?,
    );
    let climate_db = Arc::new(ClimateAccess::new(db));

    let dataset_span = climate_db
        .dataset_span()
        .await
        .map_err(|e| anyhow!("error reading dataset span: {}", e))?;
    match &dataset_span {
        Some(span) => info!("  Observations: {} to {}", span.first, span.last),
        None => warn!("dataset has no observations, date routes will return empty results"),
    }

    Ok(AppState {
        climate_db,
        tobs_station: settings.tobs_station,
        window_days: settings.window_days,
        dataset_span,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/stations/{station_id}", get(get_station))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/date/{start}", get(temperature_from))
        .route("/api/v1.0/date/{start}/{end}", get(temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
