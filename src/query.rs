//! FDSN event query parameters.
//!
//! Turns a [`FilterSnapshot`] into the ordered `(key, value)` pairs of a
//! `fdsnws/event/1/query` request. Output depends only on the snapshot and
//! the supplied clock.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::settings::FilterSnapshot;

/// Response format requested from the service.
pub const FORMAT: &str = "geojson";

/// Render a timestamp the way the webservice expects: ISO-8601, UTC, `Z`.
#[must_use]
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render a magnitude as a decimal string, keeping at least one fractional
/// digit (`4.0`, `5.25`).
#[must_use]
pub fn format_magnitude(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Comma-joined query tokens of every selected event type.
#[must_use]
pub fn event_type_param(filter: &FilterSnapshot) -> String {
    filter
        .selected_event_types
        .iter()
        .map(|kind| kind.query_token())
        .collect::<Vec<_>>()
        .join(",")
}

/// Query parameters for `filter`, with the default window ending at `now`.
#[must_use]
pub fn build(filter: &FilterSnapshot, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    let (start, end) = filter.effective_range_at(now);

    vec![
        ("format", FORMAT.to_string()),
        ("starttime", format_time(start)),
        ("endtime", format_time(end)),
        ("minmagnitude", format_magnitude(filter.minimum_magnitude)),
        ("maxmagnitude", format_magnitude(filter.maximum_magnitude)),
        ("eventtype", event_type_param(filter)),
    ]
}
