//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use quakes::client::DEFAULT_ENDPOINT;
use quakes::event_type::EventType;
use quakes::output::Format;

/// Recent seismic events from the FDSN event webservice.
#[derive(Parser, Debug)]
#[command(name = "quakes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (defaults to <config dir>/quakes/settings.json)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch events matching the saved filter
    Fetch(FetchArgs),

    /// Show or change the saved filter
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// List every known event type
    Types(TypesArgs),
}

/// Arguments for the `fetch` command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// FDSN event query endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Maximum number of events to show
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// `settings` subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the saved filter
    Show {
        /// Output format
        #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
        format: Format,
    },

    /// Edit and save the filter
    Set(SetArgs),

    /// Forget the saved filter and return to defaults
    Reset,
}

/// Arguments for `settings set`. Omitted fields keep their saved value.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Minimum magnitude (0-10)
    #[arg(long)]
    pub min_magnitude: Option<f64>,

    /// Maximum magnitude (0-10)
    #[arg(long)]
    pub max_magnitude: Option<f64>,

    /// Event types to query, comma separated (see `quakes types`)
    #[arg(long, value_delimiter = ',', value_parser = parse_event_type)]
    pub types: Option<Vec<EventType>>,

    /// Start of a custom date range (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_time, conflicts_with = "last_day")]
    pub start: Option<DateTime<Utc>>,

    /// End of a custom date range (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_time, conflicts_with = "last_day")]
    pub end: Option<DateTime<Utc>>,

    /// Go back to the rolling last-24-hours window
    #[arg(long)]
    pub last_day: bool,
}

/// Arguments for the `types` command.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse an event type name or wire alias.
fn parse_event_type(s: &str) -> Result<EventType, String> {
    s.trim().parse()
}

/// Parse a date (midnight UTC) or an RFC 3339 timestamp.
fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date: {s} (expected YYYY-MM-DD or RFC 3339)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_time() {
        let date = parse_time("2020-05-20").unwrap();
        assert_eq!(date.timestamp(), 1_589_932_800);

        let stamp = parse_time("2020-05-20T18:40:00+02:00").unwrap();
        assert_eq!(stamp.timestamp(), 1_589_992_800);

        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_settings_set_args() {
        let cli = Cli::try_parse_from([
            "quakes",
            "settings",
            "set",
            "--min-magnitude",
            "2",
            "--types",
            "earthquake,quarry blast",
            "--start",
            "2020-01-01",
        ])
        .unwrap();

        let Command::Settings(SettingsCommand::Set(args)) = cli.command else {
            panic!("expected settings set");
        };
        assert_eq!(args.min_magnitude, Some(2.0));
        assert_eq!(
            args.types,
            Some(vec![EventType::Earthquake, EventType::QuarryBlast])
        );
        assert!(args.start.is_some());
        assert!(!args.last_day);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = Cli::try_parse_from(["quakes", "settings", "set", "--types", "aliens"]);
        assert!(result.is_err());
    }
}
