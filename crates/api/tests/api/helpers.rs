use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app,
    db::{DatasetSpan, DateRange, Error, Observation, PrecipitationReading, Station},
    AppState, ClimateData, TemperatureSummary,
};
use hyper::{header, Method};
use mockall::mock;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use time::{macros::date, Date};
use tower::ServiceExt;

pub const TOBS_STATION: &str = "USC00519281";
pub const LATEST: Date = date!(2017 - 08 - 23);

mock! {
    pub ClimateAccess {}
    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn latest_observation_date(&self) -> Result<Option<Date>, Error>;
        async fn dataset_span(&self) -> Result<Option<DatasetSpan>, Error>;
        async fn precipitation(&self, range: &DateRange) -> Result<Vec<PrecipitationReading>, Error>;
        async fn station_ids(&self) -> Result<Vec<String>, Error>;
        async fn station(&self, station_id: &str) -> Result<Option<Station>, Error>;
        async fn station_observations(
            &self,
            station_id: &str,
            range: &DateRange,
        ) -> Result<Vec<Observation>, Error>;
        async fn temperature_summary(&self, range: &DateRange) -> Result<TemperatureSummary, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(climate_db: Arc<dyn ClimateData>) -> TestApp {
    let app_state = AppState {
        climate_db,
        tobs_station: TOBS_STATION.to_string(),
        window_days: 365,
        dataset_span: Some(DatasetSpan {
            first: date!(2010 - 01 - 01),
            last: LATEST,
        }),
    };

    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> (StatusCode, T) {
        let (status, body) = self.get(uri).await;
        let value = serde_json::from_slice(&body).unwrap_or_else(|e| {
            panic!(
                "body of {} is not the expected json ({}): {}",
                uri,
                e,
                String::from_utf8_lossy(&body)
            )
        });
        (status, value)
    }
}

pub fn reading(date: &str, precipitation: Option<f64>) -> PrecipitationReading {
    PrecipitationReading {
        date: date.to_string(),
        precipitation,
    }
}

pub fn observation(station_id: &str, date: &str, temperature: f64) -> Observation {
    Observation {
        station_id: station_id.to_string(),
        date: date.to_string(),
        precipitation: Some(0.0),
        temperature,
    }
}
