use crate::helpers::{observation, reading, spawn_app, MockClimateAccess, LATEST, TOBS_STATION};
use axum::http::StatusCode;
use climate_api::{
    db::{parse_date, DateRange},
    ErrorBody, TemperatureSummary, INVALID_DATE_MESSAGE,
};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use time::macros::date;

fn expect_latest(climate_data: &mut MockClimateAccess) {
    climate_data
        .expect_latest_observation_date()
        .times(1)
        .returning(|| Ok(Some(LATEST)));
}

#[tokio::test]
async fn precipitation_covers_trailing_year_keyed_by_date() {
    let mut climate_data = MockClimateAccess::new();
    expect_latest(&mut climate_data);
    climate_data
        .expect_precipitation()
        .withf(|range| *range == DateRange::trailing(LATEST, 365))
        .times(1)
        .returning(|_| {
            Ok(vec![
                reading("2016-08-23", Some(1.79)),
                reading("2017-01-15", None),
                reading("2017-08-23", Some(0.0)),
            ])
        });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, by_date): (_, BTreeMap<String, Option<f64>>) =
        test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_date.len(), 3);
    let window = DateRange::trailing(LATEST, 365);
    for key in by_date.keys() {
        let day = parse_date(key).expect("every key is a date");
        assert!(window.contains(day), "{key} outside the window");
    }
    assert_eq!(by_date["2017-01-15"], None);
}

#[tokio::test]
async fn precipitation_keeps_last_reading_for_shared_dates() {
    let mut climate_data = MockClimateAccess::new();
    expect_latest(&mut climate_data);
    climate_data.expect_precipitation().times(1).returning(|_| {
        Ok(vec![
            reading("2017-08-23", Some(0.0)),
            reading("2017-08-23", Some(0.45)),
        ])
    });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body): (_, Value) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "2017-08-23": 0.45 }));
}

#[tokio::test]
async fn precipitation_all_keeps_every_reading() {
    let mut climate_data = MockClimateAccess::new();
    expect_latest(&mut climate_data);
    climate_data.expect_precipitation().times(1).returning(|_| {
        Ok(vec![
            reading("2017-08-23", Some(0.0)),
            reading("2017-08-23", Some(0.45)),
        ])
    });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body): (_, Value) = test_app.get_json("/api/v1.0/precipitation?all=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "2017-08-23": [0.0, 0.45] }));
}

#[tokio::test]
async fn precipitation_on_empty_dataset_is_empty_object() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_latest_observation_date()
        .times(1)
        .returning(|| Ok(None));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body): (_, Value) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn tobs_returns_configured_station_temperatures_only() {
    let mut climate_data = MockClimateAccess::new();
    expect_latest(&mut climate_data);
    climate_data
        .expect_station_observations()
        .withf(|station_id, range| {
            station_id == TOBS_STATION && *range == DateRange::trailing(LATEST, 365)
        })
        .times(1)
        .returning(|station_id, _| {
            Ok(vec![
                observation(station_id, "2016-08-23", 77.0),
                observation(station_id, "2017-01-15", 68.0),
                observation(station_id, "2017-08-18", 79.0),
            ])
        });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, temps): (_, Vec<f64>) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(temps, vec![77.0, 68.0, 79.0]);
}

#[tokio::test]
async fn tobs_on_empty_dataset_is_empty_list() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_latest_observation_date()
        .times(1)
        .returning(|| Ok(None));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, temps): (_, Vec<f64>) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(temps.is_empty());
}

#[tokio::test]
async fn start_date_returns_single_ordered_summary() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .withf(|range| *range == DateRange::new(date!(2017 - 01 - 01), None))
        .times(1)
        .returning(|_| {
            Ok(TemperatureSummary {
                min_temp: Some(58.0),
                avg_temp: Some(74.14),
                max_temp: Some(87.0),
            })
        });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, summaries): (_, Vec<TemperatureSummary>) =
        test_app.get_json("/api/v1.0/date/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    let (min, avg, max) = (
        summary.min_temp.unwrap(),
        summary.avg_temp.unwrap(),
        summary.max_temp.unwrap(),
    );
    assert!(min <= avg && avg <= max);
}

#[tokio::test]
async fn single_day_range_queries_only_that_day() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .withf(|range| *range == DateRange::new(LATEST, Some(LATEST)))
        .times(1)
        .returning(|_| {
            Ok(TemperatureSummary {
                min_temp: Some(76.0),
                avg_temp: Some(78.5),
                max_temp: Some(81.0),
            })
        });

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body): (_, Value) = test_app.get_json("/api/v1.0/date/2017-08-23/2017-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([{ "min_temp": 76.0, "avg_temp": 78.5, "max_temp": 81.0 }])
    );
}

#[tokio::test]
async fn empty_range_serializes_nulls() {
    let mut climate_data = MockClimateAccess::new();
    climate_data
        .expect_temperature_summary()
        .times(1)
        .returning(|_| Ok(TemperatureSummary::default()));

    let test_app = spawn_app(Arc::new(climate_data)).await;
    let (status, body): (_, Value) = test_app.get_json("/api/v1.0/date/2030-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([{ "min_temp": null, "avg_temp": null, "max_temp": null }])
    );
}

#[tokio::test]
async fn malformed_dates_are_rejected() {
    for uri in [
        "/api/v1.0/date/2017%2F08%2F23",
        "/api/v1.0/date/not-a-date",
        "/api/v1.0/date/2017-8-23",
        "/api/v1.0/date/2017-01-01/not-a-date",
        "/api/v1.0/date/not-a-date/2017-01-01",
        "/api/v1.0/date/2017/08",
        "/api/v1.0/date/+2017-08-23",
        "/api/v1.0/date/2017-01-01/-2017-08-23",
    ] {
        // No expectations: a rejected date never reaches the data layer
        let test_app = spawn_app(Arc::new(MockClimateAccess::new())).await;
        let (status, body): (_, ErrorBody) = test_app.get_json(uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body.error, INVALID_DATE_MESSAGE, "{uri}");
    }
}
