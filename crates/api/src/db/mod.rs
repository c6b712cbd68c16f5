mod climate_data;
mod sqlite;

pub use climate_data::*;
pub use sqlite::*;

use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};
use utoipa::ToSchema;

/// Calendar dates are stored and accepted as zero-padded `YYYY-MM-DD`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date. `[year]` alone would also take a leading sign,
/// so the shape is checked first: four digits, dash, two digits, dash, two digits.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(time::error::Parse::ParseFromDescription(
            time::error::ParseFromDescription::InvalidComponent("year"),
        ));
    }
    Date::parse(value, DATE_FORMAT)
}

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

/// A row of the `measurement` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Observation {
    #[sqlx(rename = "station")]
    pub station_id: String,
    pub date: String,
    #[sqlx(rename = "prcp")]
    pub precipitation: Option<f64>,
    #[sqlx(rename = "tobs")]
    pub temperature: f64,
}

/// A row of the `station` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Station {
    #[sqlx(rename = "station")]
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// Aggregate temperatures over a date range; every field is `None` when no
/// observation matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TemperatureSummary {
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// Inclusive date filter, open-ended when `end` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn new(start: Date, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending on `latest`, both ends included.
    /// Saturates at `Date::MIN`; a negative `days` is treated as zero.
    pub fn trailing(latest: Date, days: i64) -> Self {
        let start = days
            .max(0)
            .checked_mul(86_400)
            .map(Duration::seconds)
            .and_then(|window| latest.checked_sub(window))
            .unwrap_or(Date::MIN);
        Self {
            start,
            end: Some(latest),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && self.end.map_or(true, |end| date <= end)
    }
}

/// First and last observation dates present in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpan {
    pub first: Date,
    pub last: Date,
}
