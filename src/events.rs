//! Domain events built from query responses.
//!
//! A [`SeismicEvent`] is a flattened, typed view of one wire [`Feature`]:
//! epoch milliseconds become `DateTime<Utc>`, the `type` string becomes an
//! [`EventType`], and the `[lon, lat, depth]` triple becomes an
//! [`EventLocation`].

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Serialize;

use crate::event_type::EventType;
use crate::models::{Feature, QueryResponse};
use crate::query;
use crate::settings::FilterSnapshot;

/// Marker diameter for a magnitude-1 event, and for events with no magnitude.
pub const BASE_MARKER_SIZE: f64 = 5.0;

/// Convert an epoch-milliseconds wire value to a timestamp.
fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Sentinel for "no position known". Renderers must not place it.
    pub const INVALID: Self = Self {
        latitude: -180.0,
        longitude: -180.0,
    };

    /// Whether the coordinate lies on the globe.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Hypocentre of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventLocation {
    pub coordinate: Coordinate,
    /// Kilometres, positive down
    pub depth_km: f64,
}

impl EventLocation {
    fn from_feature(feature: &Feature) -> Self {
        let coords = feature
            .geometry
            .as_ref()
            .and_then(|g| g.coordinates.as_deref())
            .unwrap_or_default();

        let coordinate = match (coords.first(), coords.get(1)) {
            (Some(&longitude), Some(&latitude)) => Coordinate {
                latitude,
                longitude,
            },
            _ => Coordinate::INVALID,
        };

        Self {
            coordinate,
            depth_km: coords.get(2).copied().unwrap_or(0.0),
        }
    }
}

/// A seismic event reported by the FDSN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeismicEvent {
    pub id: Option<String>,
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub event_type: EventType,
    pub title: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Offset from UTC at the epicentre, in seconds
    pub tz_offset_secs: Option<i32>,
    pub url: Option<String>,
    pub location: EventLocation,
}

impl SeismicEvent {
    /// Project a wire feature onto a domain event.
    #[must_use]
    pub fn from_feature(feature: &Feature) -> Self {
        let props = feature.properties.as_ref();

        Self {
            id: feature.id.clone(),
            magnitude: props.and_then(|p| p.mag),
            place: props.and_then(|p| p.place.clone()),
            event_type: EventType::decode(props.and_then(|p| p.event_type.as_deref())),
            title: props.and_then(|p| p.title.clone()),
            time: props.and_then(|p| p.time).and_then(from_epoch_millis),
            updated: props.and_then(|p| p.updated).and_then(from_epoch_millis),
            tz_offset_secs: props.and_then(|p| p.tz),
            url: props.and_then(|p| p.url.clone()),
            location: EventLocation::from_feature(feature),
        }
    }

    /// Position on the map, or [`Coordinate::INVALID`].
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.location.coordinate
    }

    /// Local time zone at the epicentre, when the service reported one.
    #[must_use]
    pub fn timezone(&self) -> Option<FixedOffset> {
        self.tz_offset_secs.and_then(FixedOffset::east_opt)
    }

    /// Secondary text shown under the title: the event type label.
    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        self.event_type.label()
    }

    /// Marker diameter: `|magnitude| * 5`, or 5 when magnitude is absent.
    #[must_use]
    pub fn map_marker_size(&self) -> f64 {
        self.magnitude
            .map_or(BASE_MARKER_SIZE, |mag| mag.abs() * BASE_MARKER_SIZE)
    }
}

impl fmt::Display for SeismicEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            query::format_magnitude(self.magnitude.unwrap_or(0.0)),
            self.place.as_deref().unwrap_or("Unknown")
        )
    }
}

/// Events returned by one query, in service order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventList {
    pub generated: Option<DateTime<Utc>>,
    pub bbox: Option<Vec<f64>>,
    pub events: Vec<SeismicEvent>,
}

impl EventList {
    /// Build the domain list from a decoded response.
    #[must_use]
    pub fn from_response(response: &QueryResponse) -> Self {
        Self {
            generated: response
                .metadata
                .as_ref()
                .and_then(|m| m.generated)
                .and_then(from_epoch_millis),
            bbox: response.bbox.clone(),
            events: response
                .features
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(SeismicEvent::from_feature)
                .collect(),
        }
    }

    /// Events that pass the client-side inclusion check.
    pub fn included<'a>(
        &'a self,
        filter: &'a FilterSnapshot,
    ) -> impl Iterator<Item = &'a SeismicEvent> + 'a {
        self.events.iter().filter(move |e| filter.is_included(e))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<QueryResponse> for EventList {
    fn from(response: QueryResponse) -> Self {
        Self::from_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Geometry, Metadata, Properties};

    fn feature(props: Properties, coordinates: Option<Vec<f64>>) -> Feature {
        Feature {
            type_: Some("Feature".into()),
            id: Some("us1".into()),
            properties: Some(props),
            geometry: coordinates.map(|c| Geometry {
                type_: Some("Point".into()),
                coordinates: Some(c),
            }),
        }
    }

    #[test]
    fn test_projects_fields() {
        let event = SeismicEvent::from_feature(&feature(
            Properties {
                mag: Some(5.2),
                place: Some("Offshore".into()),
                time: Some(1_590_000_000_000),
                updated: Some(1_590_000_600_500),
                tz: Some(-480),
                event_type: Some("quarry_blast".into()),
                title: Some("M 5.2 - Offshore".into()),
                ..Properties::default()
            },
            Some(vec![-122.41, 37.77, 8.5]),
        ));

        assert_eq!(event.magnitude, Some(5.2));
        assert_eq!(event.event_type, EventType::QuarryBlast);
        assert_eq!(event.subtitle(), "Quarry Blast");
        assert_eq!(event.time.map(|t| t.timestamp()), Some(1_590_000_000));
        assert_eq!(event.updated.map(|t| t.timestamp_millis()), Some(1_590_000_600_500));
        assert_eq!(event.timezone().map(|tz| tz.local_minus_utc()), Some(-480));
        assert_eq!(
            event.coordinate(),
            Coordinate {
                latitude: 37.77,
                longitude: -122.41
            }
        );
        assert!((event.location.depth_km - 8.5).abs() < f64::EPSILON);
        assert_eq!(event.to_string(), "5.2: Offshore");
    }

    #[test]
    fn test_missing_geometry_is_invalid_coordinate() {
        let event = SeismicEvent::from_feature(&feature(Properties::default(), None));
        assert_eq!(event.coordinate(), Coordinate::INVALID);
        assert!(!event.coordinate().is_valid());
        assert!(event.location.depth_km.abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_coordinates() {
        let event = SeismicEvent::from_feature(&feature(Properties::default(), Some(vec![10.0])));
        assert_eq!(event.coordinate(), Coordinate::INVALID);

        let event =
            SeismicEvent::from_feature(&feature(Properties::default(), Some(vec![10.0, 20.0])));
        assert!(event.coordinate().is_valid());
        assert!(event.location.depth_km.abs() < f64::EPSILON);
    }

    #[test]
    fn test_absent_properties() {
        let event = SeismicEvent::from_feature(&Feature::default());
        assert_eq!(event.magnitude, None);
        assert_eq!(event.event_type, EventType::Unknown);
        assert_eq!(event.time, None);
        assert_eq!(event.to_string(), "0.0: Unknown");
    }

    #[test]
    fn test_display_keeps_decimal_point() {
        let props = Properties {
            mag: Some(5.0),
            place: Some("Near Tokyo".into()),
            ..Properties::default()
        };
        let event = SeismicEvent::from_feature(&feature(props, None));
        assert_eq!(event.to_string(), "5.0: Near Tokyo");
    }

    #[test]
    fn test_map_marker_size() {
        let mut event = SeismicEvent::from_feature(&Feature::default());
        assert!((event.map_marker_size() - 5.0).abs() < f64::EPSILON);

        event.magnitude = Some(4.0);
        assert!((event.map_marker_size() - 20.0).abs() < f64::EPSILON);

        event.magnitude = Some(-1.5);
        assert!((event.map_marker_size() - 7.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_event_list_keeps_service_order() {
        let response = QueryResponse {
            type_: Some("FeatureCollection".into()),
            metadata: Some(Metadata {
                generated: Some(1_590_000_123_000),
                ..Metadata::default()
            }),
            features: Some(vec![
                feature(
                    Properties {
                        mag: Some(2.0),
                        time: Some(1_000),
                        ..Properties::default()
                    },
                    None,
                ),
                feature(
                    Properties {
                        mag: Some(6.0),
                        time: Some(9_000),
                        ..Properties::default()
                    },
                    None,
                ),
            ]),
            bbox: None,
        };

        let list = EventList::from(response);
        assert_eq!(list.generated.map(|g| g.timestamp()), Some(1_590_000_123));
        assert_eq!(list.len(), 2);
        assert_eq!(list.events[0].magnitude, Some(2.0));
        assert_eq!(list.events[1].magnitude, Some(6.0));
    }

    #[test]
    fn test_event_list_without_features() {
        let list = EventList::from_response(&QueryResponse::default());
        assert!(list.is_empty());
        assert!(list.generated.is_none());
    }

    #[test]
    fn test_included_applies_predicate() {
        let response = QueryResponse {
            features: Some(vec![
                feature(
                    Properties {
                        mag: Some(5.2),
                        ..Properties::default()
                    },
                    None,
                ),
                feature(Properties::default(), None),
                feature(
                    Properties {
                        mag: Some(1.0),
                        ..Properties::default()
                    },
                    None,
                ),
            ]),
            ..QueryResponse::default()
        };
        let list = EventList::from_response(&response);
        let filter = FilterSnapshot::default();

        let included: Vec<_> = list.included(&filter).collect();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].magnitude, Some(5.2));
    }
}
