//! Read-only HTTP API over a static station climate dataset.
//!
//! Routes run one fixed query each against the SQLite dataset and return
//! JSON; see [`startup::app`] for the route table.

pub mod db;
pub mod routes;
pub mod startup;
pub mod templates;
pub mod utils;

pub use db::{
    ClimateAccess, ClimateData, DatasetSpan, DateRange, Observation, PrecipitationReading,
    Station, TemperatureSummary,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
