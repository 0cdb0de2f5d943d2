//! Quakes - recent seismic events from your terminal.
//!
//! A thin front end over the `quakes` library: fetches events with the saved
//! filter, and edits that filter the way the map app's filter screen does.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};

mod cli;

use cli::{Cli, Command, SetArgs, SettingsCommand};
use quakes::output;
use quakes::{FileStore, FilterDraft, FilterSettings, QuakeClient, SeismicEvent};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    let path = cli
        .settings
        .or_else(FileStore::default_path)
        .context("no config directory found, pass --settings <path>")?;
    let store = FileStore::open(&path)
        .with_context(|| format!("failed to open settings at {}", path.display()))?;
    let mut settings = FilterSettings::new(store);

    match cli.command {
        Command::Fetch(args) => cmd_fetch(&settings, args),
        Command::Settings(SettingsCommand::Show { format }) => {
            output::write_settings(&mut io::stdout().lock(), &settings.snapshot(), format)?;
            Ok(())
        }
        Command::Settings(SettingsCommand::Set(args)) => cmd_settings_set(&mut settings, args),
        Command::Settings(SettingsCommand::Reset) => {
            settings.reset().context("failed to reset settings")?;
            info!("filter reset to defaults");
            Ok(())
        }
        Command::Types(args) => {
            output::write_event_types(&mut io::stdout().lock(), args.format)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `fetch` command - one-shot query with the saved filter.
fn cmd_fetch(settings: &FilterSettings<FileStore>, args: cli::FetchArgs) -> Result<()> {
    let filter = settings.snapshot();
    let client = QuakeClient::with_endpoint(&args.endpoint).context("failed to create client")?;
    debug!(endpoint = %client.endpoint(), "fetching with saved filter");

    let list = tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(client.fetch_events(&filter))
        .context("failed to fetch seismic events")?;

    // The service already filtered; re-check on our side as the map does
    let mut events: Vec<SeismicEvent> = list.included(&filter).cloned().collect();
    let dropped = list.len() - events.len();
    if dropped > 0 {
        info!("{dropped} events without a magnitude in range were hidden");
    }

    // Sort by time descending (most recent first)
    events.sort_by(|a, b| b.time.cmp(&a.time));
    events.truncate(args.limit);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_events(&mut handle, &events, args.format)?;

    Ok(())
}

/// Execute `settings set` - edit a draft, then save it in one go.
fn cmd_settings_set(settings: &mut FilterSettings<FileStore>, args: SetArgs) -> Result<()> {
    let mut draft = settings.edit();

    // Raise the maximum first when the new minimum would collide with it
    let raise_first = matches!(
        (args.min_magnitude, args.max_magnitude),
        (Some(min), Some(_)) if min >= draft.snapshot().maximum_magnitude
    );
    let steps = if raise_first {
        [(Bound::Maximum, args.max_magnitude), (Bound::Minimum, args.min_magnitude)]
    } else {
        [(Bound::Minimum, args.min_magnitude), (Bound::Maximum, args.max_magnitude)]
    };
    for (bound, requested) in steps {
        if let Some(requested) = requested {
            step_magnitude(&mut draft, bound, requested);
        }
    }

    if let Some(types) = args.types {
        draft.set_event_types(types);
    }

    if args.last_day {
        draft.use_default_date_range();
    } else if args.start.is_some() || args.end.is_some() {
        draft.update_date_range(args.start, args.end);
    }

    let saved = draft.save().context("failed to save settings")?;
    output::write_settings(&mut io::stdout().lock(), &saved, output::Format::Human)?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Minimum,
    Maximum,
}

/// Move one magnitude stepper, warning when the policy clamps the value.
fn step_magnitude(draft: &mut FilterDraft<'_, FileStore>, bound: Bound, requested: f64) {
    let taken = match bound {
        Bound::Minimum => draft.step_minimum(requested),
        Bound::Maximum => draft.step_maximum(requested),
    };
    if (taken - requested).abs() > f64::EPSILON {
        warn!("{bound:?} magnitude clamped from {requested} to {taken}");
    }
}
