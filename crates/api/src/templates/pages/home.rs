use maud::{html, Markup};

use crate::db::{format_date, DatasetSpan};

/// Route paths listed on the landing page, in display order.
pub const LISTED_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/stations/<station_id>",
    "/api/v1.0/tobs",
];

pub const DATE_ROUTES: &[&str] = &[
    "/api/v1.0/date/<start_date>",
    "/api/v1.0/date/<start_date>/<end_date>",
];

pub fn home_page(span: Option<&DatasetSpan>) -> Markup {
    html! {
        "Available Routes:" br;
        @for route in LISTED_ROUTES {
            (route) br;
        }
        "Search by a start date, or start and end date." br;
        @for route in DATE_ROUTES {
            (route) br;
        }
        "NOTE: dates must be entered in (YYYY-MM-DD) form."
        @if let Some(range) = span.and_then(date_range_note) {
            " " (range)
        }
        br;
        a href="/docs" { "API Docs" }
    }
}

fn date_range_note(span: &DatasetSpan) -> Option<String> {
    let first = format_date(span.first).ok()?;
    let last = format_date(span.last).ok()?;
    Some(format!("Date range: ({} to {})", first, last))
}
