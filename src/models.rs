//! Wire models for FDSN event query responses.
//!
//! These structures match the GeoJSON format returned by
//! `fdsnws/event/1/query?format=geojson`. Every field is optional: the
//! service does not guarantee a complete payload, and a missing or `null`
//! field must never abort decoding.

use serde::{Deserialize, Serialize};

/// Top-level GeoJSON response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryResponse {
    /// Normally "FeatureCollection"
    #[serde(rename = "type", default)]
    pub type_: Option<String>,

    /// Query metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Seismic events, in service order
    #[serde(default)]
    pub features: Option<Vec<Feature>>,

    /// `[minlon, minlat, mindepth, maxlon, maxlat, maxdepth]`
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

/// Metadata about the query response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Metadata {
    /// When the response was generated (ms since epoch)
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<u16>,
    pub api: Option<String>,
    pub count: Option<u64>,
}

/// A single reported event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Feature {
    /// Normally "Feature"
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub id: Option<String>,
    pub properties: Option<Properties>,
    pub geometry: Option<Geometry>,
}

/// Point geometry for an event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Geometry {
    /// Normally "Point"
    #[serde(rename = "type")]
    pub type_: Option<String>,

    /// `[longitude, latitude, depth_km]`, in that order
    pub coordinates: Option<Vec<f64>>,
}

/// Event properties.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: Option<i64>,

    /// Last update time (ms since epoch)
    pub updated: Option<i64>,

    /// Offset from UTC at the epicentre, in seconds
    pub tz: Option<i32>,

    /// Event page URL
    pub url: Option<String>,

    /// Detail GeoJSON URL
    pub detail: Option<String>,

    /// Number of "Did You Feel It?" reports
    pub felt: Option<i64>,

    /// Community Decimal Intensity
    pub cdi: Option<f64>,

    /// Modified Mercalli Intensity
    pub mmi: Option<f64>,

    /// Alert level: "green", "yellow", "orange", "red"
    pub alert: Option<String>,

    /// "automatic" or "reviewed"
    pub status: Option<String>,

    /// Tsunami flag: 0 or 1
    pub tsunami: Option<i32>,

    /// Significance score
    pub sig: Option<i32>,

    /// Network code
    pub net: Option<String>,

    /// Event code
    pub code: Option<String>,

    /// Comma-separated event IDs
    pub ids: Option<String>,

    /// Comma-separated source networks
    pub sources: Option<String>,

    /// Available product types
    pub types: Option<String>,

    /// Number of stations used
    pub nst: Option<i32>,

    /// Distance to nearest station (degrees)
    pub dmin: Option<f64>,

    /// RMS travel time residual
    pub rms: Option<f64>,

    /// Azimuthal gap (degrees)
    pub gap: Option<f64>,

    /// Magnitude type (mb, ml, mw, ...)
    #[serde(rename = "magType")]
    pub mag_type: Option<String>,

    /// Event type string, see [`crate::event_type::EventType::decode`]
    #[serde(rename = "type")]
    pub event_type: Option<String>,

    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {
            "generated": 1590000123000,
            "url": "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson",
            "title": "USGS Earthquakes",
            "status": 200,
            "api": "1.10.3",
            "count": 2
        },
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "mag": 5.2,
                    "place": "10 km SSW of Somewhere",
                    "time": 1590000000000,
                    "updated": 1590000600000,
                    "tz": null,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd",
                    "felt": 12,
                    "cdi": 3.4,
                    "mmi": null,
                    "alert": "green",
                    "status": "reviewed",
                    "tsunami": 0,
                    "sig": 416,
                    "net": "us",
                    "code": "7000abcd",
                    "ids": ",us7000abcd,",
                    "sources": ",us,",
                    "types": ",origin,phase-data,",
                    "nst": null,
                    "dmin": 1.2,
                    "rms": 0.8,
                    "gap": 33,
                    "magType": "mww",
                    "type": "earthquake",
                    "title": "M 5.2 - 10 km SSW of Somewhere"
                },
                "geometry": { "type": "Point", "coordinates": [-122.41, 37.77, 8.5] },
                "id": "us7000abcd"
            },
            {
                "type": "Feature",
                "properties": { "mag": null, "type": "quarry blast" },
                "geometry": null,
                "id": "uu60000001"
            }
        ],
        "bbox": [-122.41, 37.77, 8.5, -122.41, 37.77, 8.5]
    }"#;

    #[test]
    fn test_parse_sample_response() {
        let response: QueryResponse = serde_json::from_str(SAMPLE).expect("failed to parse");

        assert_eq!(response.type_.as_deref(), Some("FeatureCollection"));
        let metadata = response.metadata.expect("metadata");
        assert_eq!(metadata.generated, Some(1_590_000_123_000));
        assert_eq!(metadata.count, Some(2));

        let features = response.features.expect("features");
        assert_eq!(features.len(), 2);

        let first = &features[0];
        let props = first.properties.as_ref().expect("properties");
        assert_eq!(props.mag, Some(5.2));
        assert_eq!(props.mag_type.as_deref(), Some("mww"));
        assert_eq!(props.event_type.as_deref(), Some("earthquake"));
        assert_eq!(props.tz, None);
        assert_eq!(
            first.geometry.as_ref().and_then(|g| g.coordinates.clone()),
            Some(vec![-122.41, 37.77, 8.5])
        );

        let second = &features[1];
        assert!(second.geometry.is_none());
        assert_eq!(second.properties.as_ref().and_then(|p| p.mag), None);
        assert_eq!(response.bbox.map(|b| b.len()), Some(6));
    }

    #[test]
    fn test_empty_object_decodes() {
        let response: QueryResponse = serde_json::from_str("{}").expect("failed to parse");
        assert!(response.type_.is_none());
        assert!(response.metadata.is_none());
        assert!(response.features.is_none());
    }

    #[test]
    fn test_nulls_everywhere_decode() {
        let json = r#"{"type":null,"metadata":null,"features":[{"type":null,"id":null,"properties":null,"geometry":{"type":"Point","coordinates":null}}],"bbox":null}"#;
        let response: QueryResponse = serde_json::from_str(json).expect("failed to parse");
        let features = response.features.expect("features");
        assert_eq!(features.len(), 1);
        assert!(features[0].properties.is_none());
    }

    #[test]
    fn test_wrong_top_level_shape_is_rejected() {
        assert!(serde_json::from_str::<QueryResponse>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<QueryResponse>("\"text\"").is_err());
    }
}
