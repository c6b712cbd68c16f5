use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::{
    format_date, parse_date, DatasetSpan, DateRange, Database, Observation, PrecipitationReading,
    Station, TemperatureSummary,
};

pub struct ClimateAccess {
    db: Arc<Database>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Failed to format date: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("Stored date is not YYYY-MM-DD: {0}")]
    TimeParse(#[from] time::error::Parse),
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Most recent observation date, `None` for an empty dataset.
    async fn latest_observation_date(&self) -> Result<Option<time::Date>, Error>;
    async fn dataset_span(&self) -> Result<Option<DatasetSpan>, Error>;
    /// Precipitation readings in the range, ordered by date then row id.
    async fn precipitation(&self, range: &DateRange) -> Result<Vec<PrecipitationReading>, Error>;
    /// Distinct station ids, sorted.
    async fn station_ids(&self) -> Result<Vec<String>, Error>;
    async fn station(&self, station_id: &str) -> Result<Option<Station>, Error>;
    /// One station's observations in the range, ordered by date.
    async fn station_observations(
        &self,
        station_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Observation>, Error>;
    async fn temperature_summary(&self, range: &DateRange) -> Result<TemperatureSummary, Error>;
}

impl ClimateAccess {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Bind values for a `date >= ? [AND date <= ?]` filter; dates are stored as
/// zero-padded text so string comparison orders them correctly.
fn range_bounds(range: &DateRange) -> Result<(String, Option<String>), Error> {
    let start = format_date(range.start)?;
    let end = range.end.map(format_date).transpose()?;
    Ok((start, end))
}

fn range_clause(end: &Option<String>) -> &'static str {
    if end.is_some() {
        "date >= ? AND date <= ?"
    } else {
        "date >= ?"
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_observation_date(&self) -> Result<Option<time::Date>, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(self.db.pool())
            .await?;
        Ok(latest.as_deref().map(parse_date).transpose()?)
    }

    async fn dataset_span(&self) -> Result<Option<DatasetSpan>, Error> {
        let (first, last): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM measurement")
                .fetch_one(self.db.pool())
                .await?;

        match (first, last) {
            (Some(first), Some(last)) => Ok(Some(DatasetSpan {
                first: parse_date(&first)?,
                last: parse_date(&last)?,
            })),
            _ => Ok(None),
        }
    }

    async fn precipitation(&self, range: &DateRange) -> Result<Vec<PrecipitationReading>, Error> {
        let (start, end) = range_bounds(range)?;
        let sql = format!(
            "SELECT date, CAST(prcp AS REAL) AS precipitation FROM measurement \
             WHERE {} ORDER BY date, id",
            range_clause(&end)
        );
        debug!("precipitation query: {} [{}, {:?}]", sql, start, end);

        let mut query = sqlx::query_as::<_, PrecipitationReading>(&sql).bind(start);
        if let Some(end) = end {
            query = query.bind(end);
        }
        Ok(query.fetch_all(self.db.pool()).await?)
    }

    async fn station_ids(&self) -> Result<Vec<String>, Error> {
        let ids = sqlx::query_scalar("SELECT DISTINCT station FROM station ORDER BY station")
            .fetch_all(self.db.pool())
            .await?;
        Ok(ids)
    }

    async fn station(&self, station_id: &str) -> Result<Option<Station>, Error> {
        let station = sqlx::query_as::<_, Station>(
            "SELECT station, name, latitude, longitude, elevation FROM station \
             WHERE station = ? ORDER BY id LIMIT 1",
        )
        .bind(station_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(station)
    }

    async fn station_observations(
        &self,
        station_id: &str,
        range: &DateRange,
    ) -> Result<Vec<Observation>, Error> {
        let (start, end) = range_bounds(range)?;
        let sql = format!(
            "SELECT station, date, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs \
             FROM measurement WHERE station = ? AND {} ORDER BY date, id",
            range_clause(&end)
        );
        debug!("station observation query: {} [{}, {}, {:?}]", sql, station_id, start, end);

        let mut query = sqlx::query_as::<_, Observation>(&sql)
            .bind(station_id)
            .bind(start);
        if let Some(end) = end {
            query = query.bind(end);
        }
        Ok(query.fetch_all(self.db.pool()).await?)
    }

    async fn temperature_summary(&self, range: &DateRange) -> Result<TemperatureSummary, Error> {
        let (start, end) = range_bounds(range)?;
        let sql = format!(
            "SELECT CAST(MIN(tobs) AS REAL) AS min_temp, AVG(tobs) AS avg_temp, \
             CAST(MAX(tobs) AS REAL) AS max_temp FROM measurement WHERE {}",
            range_clause(&end)
        );
        debug!("temperature summary query: {} [{}, {:?}]", sql, start, end);

        let mut query = sqlx::query_as::<_, TemperatureSummary>(&sql).bind(start);
        if let Some(end) = end {
            query = query.bind(end);
        }
        Ok(query.fetch_one(self.db.pool()).await?)
    }
}
