//! Event type catalog.
//!
//! Maps the many spellings the FDSN webservice has used over the years onto a
//! closed set of categories, and carries the display label, marker colour and
//! `eventtype` query token for each one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event category assigned by the FDSN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AcousticNoise,
    AnthropogenicEvent,
    BuildingCollapse,
    ChemicalExplosion,
    Collapse,
    Earthquake,
    ExperimentalExplosion,
    Explosion,
    IceQuake,
    InducedEvent,
    Landslide,
    Meteor,
    Meteorite,
    MineCollapse,
    MineExplosion,
    NotReported,
    NuclearExplosion,
    Other,
    QuarryBlast,
    RockBurst,
    RockSlide,
    SnowAvalanche,
    SonicBoom,
    Unknown,
    VolcanicEruption,
    VolcanicExplosion,
}

/// Colour with channels normalised to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    /// Opaque colour from 0-255 channel values.
    #[must_use]
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f64 / 255.0,
            green: green as f64 / 255.0,
            blue: blue as f64 / 255.0,
            alpha: 1.0,
        }
    }

    /// Opaque colour from normalised channels.
    #[must_use]
    pub const fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Channels scaled back to 0-255, rounded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let scale = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.red), scale(self.green), scale(self.blue))
    }

    /// `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

// Named platform colours used by the map markers.
const GRAY: Rgba = Rgba::opaque(0.5, 0.5, 0.5);
const DARK_GRAY: Rgba = Rgba::opaque(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
const LIGHT_GRAY: Rgba = Rgba::opaque(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
const CYAN: Rgba = Rgba::opaque(0.0, 1.0, 1.0);
const RED: Rgba = Rgba::opaque(1.0, 0.0, 0.0);
const BROWN: Rgba = Rgba::opaque(0.6, 0.4, 0.2);
const BLUE: Rgba = Rgba::opaque(0.0, 0.0, 1.0);
const WHITE: Rgba = Rgba::opaque(1.0, 1.0, 1.0);
const YELLOW: Rgba = Rgba::opaque(1.0, 1.0, 0.0);
const PURPLE: Rgba = Rgba::opaque(0.5, 0.0, 0.5);

/// One row of the catalog.
struct Entry {
    kind: EventType,
    name: &'static str,
    label: &'static str,
    /// Accepted wire spellings, already normalised (lowercase, spaces).
    aliases: &'static [&'static str],
    token: &'static str,
    color: Rgba,
}

/// Indexed by `EventType as usize`; order must follow the enum.
static CATALOG: [Entry; 26] = [
    Entry {
        kind: EventType::AcousticNoise,
        name: "acoustic_noise",
        label: "Acoustic Noise",
        aliases: &["acoustic noise"],
        token: "acoustic_noise,acoustic noise",
        color: Rgba::from_rgb8(25, 195, 237),
    },
    Entry {
        kind: EventType::AnthropogenicEvent,
        name: "anthropogenic_event",
        label: "Anthropogenic Event",
        aliases: &["anthropogenic event"],
        token: "anthropogenic_event",
        color: GRAY,
    },
    Entry {
        kind: EventType::BuildingCollapse,
        name: "building_collapse",
        label: "Building Collapse",
        aliases: &["building collapse"],
        token: "building_collapse",
        color: CYAN,
    },
    Entry {
        kind: EventType::ChemicalExplosion,
        name: "chemical_explosion",
        label: "Chemical Explosion",
        aliases: &["chemical explosion"],
        token: "chemical_explosion,chemical explosion",
        color: CYAN,
    },
    Entry {
        kind: EventType::Collapse,
        name: "collapse",
        label: "Collapse",
        aliases: &["collapse"],
        token: "collapse",
        color: CYAN,
    },
    Entry {
        kind: EventType::Earthquake,
        name: "earthquake",
        label: "Earthquake",
        aliases: &["earthquake", "eq"],
        token: "earthquake,eq",
        color: Rgba::from_rgb8(251, 127, 6),
    },
    Entry {
        kind: EventType::ExperimentalExplosion,
        name: "experimental_explosion",
        label: "Experimental Explosion",
        aliases: &["experimental explosion"],
        token: "experimental_explosion,experimental explosion",
        color: DARK_GRAY,
    },
    Entry {
        kind: EventType::Explosion,
        name: "explosion",
        label: "Explosion",
        aliases: &["explosion"],
        token: "explosion",
        color: RED,
    },
    Entry {
        kind: EventType::IceQuake,
        name: "ice_quake",
        label: "Ice Quake",
        aliases: &["ice quake"],
        token: "ice_quake",
        color: Rgba::from_rgb8(255, 214, 174),
    },
    Entry {
        kind: EventType::InducedEvent,
        name: "induced_event",
        label: "Induced Event",
        aliases: &["induced or triggered event", "induced event"],
        token: "induced_event,induced or triggered event",
        color: CYAN,
    },
    Entry {
        kind: EventType::Landslide,
        name: "landslide",
        label: "Landslide",
        aliases: &["landslide"],
        token: "landslide",
        color: BROWN,
    },
    Entry {
        kind: EventType::Meteor,
        name: "meteor",
        label: "Meteor",
        aliases: &["meteor"],
        token: "meteor",
        color: BLUE,
    },
    Entry {
        kind: EventType::Meteorite,
        name: "meteorite",
        label: "Meteorite",
        aliases: &["meteorite"],
        token: "meteorite",
        color: BLUE,
    },
    Entry {
        kind: EventType::MineCollapse,
        name: "mine_collapse",
        label: "Mine Collapse",
        aliases: &["mine collapse"],
        token: "mine_collapse,mine collapse",
        color: BLUE,
    },
    Entry {
        kind: EventType::MineExplosion,
        name: "mine_explosion",
        label: "Mine Explosion",
        aliases: &["mining explosion", "mine explosion"],
        token: "mining_explosion,mining explosion",
        color: BLUE,
    },
    Entry {
        kind: EventType::NotReported,
        name: "not_reported",
        label: "Not Reported",
        aliases: &["not reported"],
        token: "not_reported,not reported",
        color: BLUE,
    },
    Entry {
        kind: EventType::NuclearExplosion,
        name: "nuclear_explosion",
        label: "Nuclear Explosion",
        aliases: &["nuclear explosion"],
        token: "nuclear_explosion,nuclear explosion",
        color: BLUE,
    },
    Entry {
        kind: EventType::Other,
        name: "other",
        label: "Other",
        aliases: &["other event", "other"],
        token: "other_event,other event",
        color: BLUE,
    },
    Entry {
        kind: EventType::QuarryBlast,
        name: "quarry_blast",
        label: "Quarry Blast",
        aliases: &["quarry", "quarry blast"],
        token: "quarry,quarry_blast,quarry blast",
        color: Rgba::from_rgb8(50, 145, 38),
    },
    Entry {
        kind: EventType::RockBurst,
        name: "rock_burst",
        label: "Rock Burst",
        aliases: &["rock burst"],
        token: "rock_burst,rock burst",
        color: LIGHT_GRAY,
    },
    Entry {
        kind: EventType::RockSlide,
        name: "rock_slide",
        label: "Rock Slide",
        aliases: &["rock slide"],
        token: "rock_slide,Rock Slide",
        color: LIGHT_GRAY,
    },
    Entry {
        kind: EventType::SnowAvalanche,
        name: "snow_avalanche",
        label: "Snow Avalanche",
        aliases: &["snow avalanche"],
        token: "snow_avalanche",
        color: WHITE,
    },
    Entry {
        kind: EventType::SonicBoom,
        name: "sonic_boom",
        label: "Sonic Boom",
        aliases: &["sonic boom", "sonicboom"],
        token: "sonic_boom,sonic boom,sonicboom",
        color: WHITE,
    },
    Entry {
        kind: EventType::Unknown,
        name: "unknown",
        label: "Unknown",
        aliases: &["unknown"],
        token: "unknown",
        color: YELLOW,
    },
    Entry {
        kind: EventType::VolcanicEruption,
        name: "volcanic_eruption",
        label: "Volcanic Eruption",
        aliases: &["volcanic eruption", "volcanic erruption"],
        token: "volcanic_eruption,volcanic eruption",
        color: PURPLE,
    },
    Entry {
        kind: EventType::VolcanicExplosion,
        name: "volcanic_explosion",
        label: "Volcanic Explosion",
        aliases: &["volcanic explosion"],
        token: "volcanic_explosion,volcanic explosion",
        color: PURPLE,
    },
];

/// Lowercase, trim, and fold `_`/`-` to spaces so every spelling variant
/// lands on the same alias.
fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl EventType {
    /// Every category, in catalog order.
    pub const ALL: [Self; 26] = [
        Self::AcousticNoise,
        Self::AnthropogenicEvent,
        Self::BuildingCollapse,
        Self::ChemicalExplosion,
        Self::Collapse,
        Self::Earthquake,
        Self::ExperimentalExplosion,
        Self::Explosion,
        Self::IceQuake,
        Self::InducedEvent,
        Self::Landslide,
        Self::Meteor,
        Self::Meteorite,
        Self::MineCollapse,
        Self::MineExplosion,
        Self::NotReported,
        Self::NuclearExplosion,
        Self::Other,
        Self::QuarryBlast,
        Self::RockBurst,
        Self::RockSlide,
        Self::SnowAvalanche,
        Self::SonicBoom,
        Self::Unknown,
        Self::VolcanicEruption,
        Self::VolcanicExplosion,
    ];

    /// Categories selected when the user has never saved a filter.
    pub const DEFAULT_SELECTION: [Self; 6] = [
        Self::Earthquake,
        Self::IceQuake,
        Self::QuarryBlast,
        Self::Landslide,
        Self::RockSlide,
        Self::SnowAvalanche,
    ];

    fn entry(self) -> &'static Entry {
        &CATALOG[self as usize]
    }

    /// Translate a webservice `type` string to a category.
    ///
    /// Absent or unrecognised strings map to [`EventType::Unknown`].
    #[must_use]
    pub fn decode(wire: Option<&str>) -> Self {
        let Some(raw) = wire else {
            return Self::Unknown;
        };
        let needle = normalize(raw);

        CATALOG
            .iter()
            .find(|entry| entry.aliases.contains(&needle.as_str()))
            .map_or_else(
                || {
                    tracing::debug!("unrecognised event type {raw:?}, using unknown");
                    Self::Unknown
                },
                |entry| entry.kind,
            )
    }

    /// Canonical snake_case name, used for persistence and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.entry().name
    }

    /// Display-ready label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// Value(s) for the webservice `eventtype` parameter, comma-joined.
    #[must_use]
    pub fn query_token(self) -> &'static str {
        self.entry().token
    }

    /// Map marker colour.
    #[must_use]
    pub fn color(self) -> Rgba {
        self.entry().color
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(entry) = CATALOG.iter().find(|entry| entry.name == s) {
            return Ok(entry.kind);
        }
        match Self::decode(Some(s)) {
            Self::Unknown if normalize(s) != "unknown" => Err(format!("unknown event type: {s}")),
            kind => Ok(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_follows_enum_order() {
        for (index, kind) in EventType::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].kind, *kind);
            assert_eq!(*kind as usize, index);
        }
    }

    #[test]
    fn test_decode_every_catalog_alias() {
        for entry in &CATALOG {
            for alias in entry.aliases {
                let underscored = alias.replace(' ', "_");
                let shouted = alias.to_uppercase();
                for wire in [*alias, underscored.as_str(), shouted.as_str()] {
                    assert_eq!(EventType::decode(Some(wire)), entry.kind, "decoding {wire:?}");
                }
            }
        }
    }

    #[test]
    fn test_decode_wire_spellings() {
        let cases = [
            ("Rock Slide", EventType::RockSlide),
            ("quarry_blast", EventType::QuarryBlast),
            ("nuclear_explosion", EventType::NuclearExplosion),
            ("rock_burst", EventType::RockBurst),
            ("mine collapse", EventType::MineCollapse),
            ("not reported", EventType::NotReported),
            ("volcanic erruption", EventType::VolcanicEruption),
        ];

        for (wire, expected) in cases {
            assert_eq!(EventType::decode(Some(wire)), expected, "decoding {wire:?}");
        }
    }

    #[test]
    fn test_decode_is_case_and_separator_tolerant() {
        assert_eq!(EventType::decode(Some("  Quarry_Blast ")), EventType::QuarryBlast);
        assert_eq!(EventType::decode(Some("ICE-QUAKE")), EventType::IceQuake);
        assert_eq!(EventType::decode(Some("Earthquake")), EventType::Earthquake);
    }

    #[test]
    fn test_decode_falls_back_to_unknown() {
        assert_eq!(EventType::decode(None), EventType::Unknown);
        assert_eq!(EventType::decode(Some("")), EventType::Unknown);
        assert_eq!(EventType::decode(Some("alien landing")), EventType::Unknown);
    }

    #[test]
    fn test_quarry_blast_presentation() {
        let kind = EventType::decode(Some("quarry_blast"));
        assert_eq!(kind, EventType::QuarryBlast);
        assert_eq!(kind.label(), "Quarry Blast");
        assert!(kind.query_token().split(',').any(|t| t == "quarry_blast"));
        assert_eq!(kind.color().to_rgb8(), (50, 145, 38));
    }

    #[test]
    fn test_palette() {
        assert_eq!(EventType::Earthquake.color().to_hex(), "#fb7f06");
        assert_eq!(EventType::IceQuake.color().to_rgb8(), (255, 214, 174));
        assert_eq!(EventType::AcousticNoise.color().to_rgb8(), (25, 195, 237));
        assert_eq!(EventType::Unknown.color(), Rgba::opaque(1.0, 1.0, 0.0));
        assert_eq!(EventType::Explosion.color(), Rgba::opaque(1.0, 0.0, 0.0));
        assert!((EventType::Earthquake.color().red - 251.0 / 255.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_name_round_trip() {
        for kind in EventType::ALL {
            let parsed: EventType = kind.as_str().parse().expect("failed to parse");
            assert_eq!(parsed, kind);

            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert!("alien".parse::<EventType>().is_err());
    }

    #[test]
    fn test_every_token_nonempty() {
        for kind in EventType::ALL {
            assert!(!kind.query_token().is_empty());
            assert!(!kind.label().is_empty());
        }
    }
}
