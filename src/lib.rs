//! Quakes - recent seismic events from the FDSN event webservice.
//!
//! Builds `fdsnws/event/1/query` requests from persisted user filters
//! (magnitude range, event types, date range), decodes the GeoJSON response
//! into domain events, and re-checks fetched events against the filter.

pub mod client;
pub mod errors;
pub mod event_type;
pub mod events;
pub mod filters;
pub mod models;
pub mod output;
pub mod query;
pub mod settings;

pub use client::QuakeClient;
pub use errors::{FailureKind, QuakesError};
pub use event_type::{EventType, Rgba};
pub use events::{Coordinate, EventList, EventLocation, SeismicEvent};
pub use settings::{FileStore, FilterDraft, FilterSettings, FilterSnapshot, MemoryStore, SettingsStore};
