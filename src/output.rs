//! Output formatters for seismic events and filter settings.
//!
//! Supports human-readable (with colors), JSON, and NDJSON formats.

use std::io::{self, Write};

use serde::Serialize;

use crate::event_type::{EventType, Rgba};
use crate::events::SeismicEvent;
use crate::query;
use crate::settings::FilterSnapshot;

// ANSI codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// JSON array
    Json,
    /// Newline-delimited JSON (one object per line)
    Ndjson,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "ndjson" => Ok(Self::Ndjson),
            _ => Err(format!("unknown format: {s} (expected: human, json, ndjson)")),
        }
    }
}

/// 24-bit foreground escape for a marker colour.
fn ansi_fg(color: Rgba) -> String {
    let (r, g, b) = color.to_rgb8();
    format!("\x1b[38;2;{r};{g};{b}m")
}

/// Get severity label for magnitude.
fn magnitude_label(mag: Option<f64>) -> &'static str {
    match mag {
        Some(m) if m >= 7.0 => "MAJOR",
        Some(m) if m >= 6.0 => "STRONG",
        Some(m) if m >= 4.5 => "MODERATE",
        Some(m) if m >= 3.0 => "LIGHT",
        Some(m) if m >= 2.0 => "MINOR",
        Some(_) => "MICRO",
        None => "?",
    }
}

fn json_error(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Write events in human-readable format, coloured by event type.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, events: &[SeismicEvent]) -> io::Result<()> {
    for event in events {
        let time = event
            .time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".into());

        let mag_str = event
            .magnitude
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "?".into());

        let place = event.place.as_deref().unwrap_or("Unknown location");
        let color = ansi_fg(event.event_type.color());
        let label = magnitude_label(event.magnitude);
        let kind = event.event_type.label();

        let position = if event.coordinate().is_valid() {
            let c = event.coordinate();
            format!("{:>7.2},{:>8.2}", c.latitude, c.longitude)
        } else {
            format!("{:>16}", "no position")
        };

        writeln!(
            writer,
            "{color}●{RESET} {BOLD}M{mag_str}{RESET} │ \
             {label:8} │ \
             {color}{kind:22}{RESET} │ \
             {DIM}{depth:>5.0}km{RESET} │ \
             {DIM}{position}{RESET} │ \
             {time} UTC │ \
             {place}",
            depth = event.location.depth_km,
        )?;
    }
    Ok(())
}

/// Write any serializable rows as a JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, rows: &[T]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(rows).map_err(json_error)?;
    writeln!(writer, "{json}")
}

/// Write any serializable rows as newline-delimited JSON.
///
/// Each row is written as a single line of JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_ndjson<W: Write, T: Serialize>(writer: &mut W, rows: &[T]) -> io::Result<()> {
    for row in rows {
        let json = serde_json::to_string(row).map_err(json_error)?;
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

/// Write events in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_events<W: Write>(
    writer: &mut W,
    events: &[SeismicEvent],
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, events),
        Format::Json => write_json(writer, events),
        Format::Ndjson => write_ndjson(writer, events),
    }
}

/// Write the current filter.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_settings<W: Write>(
    writer: &mut W,
    settings: &FilterSnapshot,
    format: Format,
) -> io::Result<()> {
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(settings).map_err(json_error)?;
            writeln!(writer, "{json}")
        }
        Format::Ndjson => {
            let json = serde_json::to_string(settings).map_err(json_error)?;
            writeln!(writer, "{json}")
        }
        Format::Human => {
            let (start, end) = settings.effective_range_at(chrono::Utc::now());
            let types: Vec<&str> = settings
                .selected_event_types
                .iter()
                .map(|t| t.label())
                .collect();

            writeln!(
                writer,
                "{BOLD}Magnitude{RESET}   {:.1} – {:.1}",
                settings.minimum_magnitude, settings.maximum_magnitude
            )?;
            writeln!(writer, "{BOLD}Types{RESET}       {}", types.join(", "))?;
            let range_kind = if settings.use_custom_date_range {
                "custom"
            } else {
                "last 24 hours"
            };
            writeln!(
                writer,
                "{BOLD}Dates{RESET}       {} → {} {DIM}({range_kind}){RESET}",
                query::format_time(start),
                query::format_time(end)
            )
        }
    }
}

/// One catalog row as listed by `quakes types`.
#[derive(Debug, Serialize)]
struct TypeRow {
    name: &'static str,
    label: &'static str,
    color: String,
    query_token: &'static str,
}

/// Write the event type catalog.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_event_types<W: Write>(writer: &mut W, format: Format) -> io::Result<()> {
    let rows: Vec<TypeRow> = EventType::ALL
        .iter()
        .map(|kind| TypeRow {
            name: kind.as_str(),
            label: kind.label(),
            color: kind.color().to_hex(),
            query_token: kind.query_token(),
        })
        .collect();

    match format {
        Format::Json => write_json(writer, &rows),
        Format::Ndjson => write_ndjson(writer, &rows),
        Format::Human => {
            for (kind, row) in EventType::ALL.iter().zip(&rows) {
                writeln!(
                    writer,
                    "{}●{RESET} {:24} {:24} {DIM}{}  {}{RESET}",
                    ansi_fg(kind.color()),
                    row.name,
                    row.label,
                    row.color,
                    row.query_token
                )?;
            }
            Ok(())
        }
    }
}
