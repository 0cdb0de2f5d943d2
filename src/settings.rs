//! Persisted user filter settings.
//!
//! Settings live in a flat key-value [`SettingsStore`]. [`FilterSettings`]
//! reads and writes each field under its own key, falling back to defaults
//! for anything missing or unreadable. A [`FilterSnapshot`] is the plain
//! value the query builder and inclusion check consume, and a
//! [`FilterDraft`] is the edit session a UI drives before the user applies.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::QuakesError;
use crate::event_type::EventType;
use crate::events::SeismicEvent;
use crate::filters::{self, MagnitudeRange};

/// Default minimum magnitude.
pub const DEFAULT_MINIMUM_MAGNITUDE: f64 = 4.0;

/// Default maximum magnitude.
pub const DEFAULT_MAXIMUM_MAGNITUDE: f64 = 10.0;

/// Length of the default query window, ending now.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Store keys.
pub mod keys {
    pub const MINIMUM_MAGNITUDE: &str = "userMinimumMagnitude";
    pub const MAXIMUM_MAGNITUDE: &str = "userMaximumMagnitude";
    pub const EVENT_TYPES: &str = "userEventTypes";
    pub const USE_CUSTOM_DATE_RANGE: &str = "useCustomDateRange";
    pub const CUSTOM_START_TIME: &str = "customStartTime";
    pub const CUSTOM_END_TIME: &str = "customEndTime";

    pub const ALL: [&str; 6] = [
        MINIMUM_MAGNITUDE,
        MAXIMUM_MAGNITUDE,
        EVENT_TYPES,
        USE_CUSTOM_DATE_RANGE,
        CUSTOM_START_TIME,
        CUSTOM_END_TIME,
    ];
}

/// Flat key-value persistence backend.
pub trait SettingsStore {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), QuakesError>;

    /// Forget `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal.
    fn remove(&mut self, key: &str) -> Result<(), QuakesError>;
}

/// In-process store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), QuakesError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), QuakesError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk. Every write rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Default settings file: `<config dir>/quakes/settings.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quakes").join("settings.json"))
    }

    /// Open a settings file. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or does not
    /// hold a JSON object.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, QuakesError> {
        let path = path.into();

        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let parsed = serde_json::from_str::<Value>(&text)
                .map_err(|e| QuakesError::Settings(format!("{}: {e}", path.display())))?;
            match parsed {
                Value::Object(map) => map,
                other => {
                    return Err(QuakesError::Settings(format!(
                        "{} must hold a JSON object, found {}",
                        path.display(),
                        json_kind(&other)
                    )));
                }
            }
        } else {
            debug!("settings file {} not found, starting empty", path.display());
            Map::new()
        };

        Ok(Self { path, values })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), QuakesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.values)
            .map_err(|e| QuakesError::Settings(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), QuakesError> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), QuakesError> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// All filter fields at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub minimum_magnitude: f64,
    pub maximum_magnitude: f64,
    pub selected_event_types: BTreeSet<EventType>,
    pub use_custom_date_range: bool,
    pub custom_start_time: Option<DateTime<Utc>>,
    pub custom_end_time: Option<DateTime<Utc>>,
}

impl Default for FilterSnapshot {
    fn default() -> Self {
        Self {
            minimum_magnitude: DEFAULT_MINIMUM_MAGNITUDE,
            maximum_magnitude: DEFAULT_MAXIMUM_MAGNITUDE,
            selected_event_types: EventType::DEFAULT_SELECTION.into_iter().collect(),
            use_custom_date_range: false,
            custom_start_time: None,
            custom_end_time: None,
        }
    }
}

impl FilterSnapshot {
    #[must_use]
    pub fn magnitude_range(&self) -> MagnitudeRange {
        MagnitudeRange {
            minimum: self.minimum_magnitude,
            maximum: self.maximum_magnitude,
        }
    }

    /// Whether a fetched event should be displayed.
    ///
    /// `true` iff the event has a magnitude within the inclusive bounds.
    #[must_use]
    pub fn is_included(&self, event: &SeismicEvent) -> bool {
        self.magnitude_range().matches(event)
    }

    /// Query window as seen at `now`.
    ///
    /// Without a custom range this is the last 24 hours. With one, each
    /// unset end falls back to the same default independently.
    #[must_use]
    pub fn effective_range_at(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let default_start = now - Duration::hours(DEFAULT_WINDOW_HOURS);
        if !self.use_custom_date_range {
            return (default_start, now);
        }
        (
            self.custom_start_time.unwrap_or(default_start),
            self.custom_end_time.unwrap_or(now),
        )
    }

    /// Start of the query window, evaluated against the current clock.
    #[must_use]
    pub fn effective_start_time(&self) -> DateTime<Utc> {
        self.effective_range_at(Utc::now()).0
    }

    /// End of the query window, evaluated against the current clock.
    #[must_use]
    pub fn effective_end_time(&self) -> DateTime<Utc> {
        self.effective_range_at(Utc::now()).1
    }
}

/// User filter settings over a [`SettingsStore`].
#[derive(Debug, Default)]
pub struct FilterSettings<S> {
    store: S,
}

impl<S: SettingsStore> FilterSettings<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("ignoring unreadable setting {key}: {e}");
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), QuakesError> {
        let value = serde_json::to_value(value).map_err(|e| QuakesError::Settings(e.to_string()))?;
        self.store.set(key, value)
    }

    fn write_optional<T: Serialize>(
        &mut self,
        key: &str,
        value: Option<&T>,
    ) -> Result<(), QuakesError> {
        match value {
            Some(v) => self.write(key, v),
            None => self.store.remove(key),
        }
    }

    #[must_use]
    pub fn minimum_magnitude(&self) -> f64 {
        self.read(keys::MINIMUM_MAGNITUDE)
            .unwrap_or(DEFAULT_MINIMUM_MAGNITUDE)
    }

    /// Store the minimum magnitude as given. Clamping is the caller's job,
    /// see [`FilterDraft::step_minimum`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_minimum_magnitude(&mut self, value: f64) -> Result<(), QuakesError> {
        self.write(keys::MINIMUM_MAGNITUDE, &value)
    }

    #[must_use]
    pub fn maximum_magnitude(&self) -> f64 {
        self.read(keys::MAXIMUM_MAGNITUDE)
            .unwrap_or(DEFAULT_MAXIMUM_MAGNITUDE)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_maximum_magnitude(&mut self, value: f64) -> Result<(), QuakesError> {
        self.write(keys::MAXIMUM_MAGNITUDE, &value)
    }

    /// Selected event types. Names that no longer parse are dropped.
    #[must_use]
    pub fn selected_event_types(&self) -> BTreeSet<EventType> {
        let Some(names) = self.read::<Vec<String>>(keys::EVENT_TYPES) else {
            return EventType::DEFAULT_SELECTION.into_iter().collect();
        };

        names
            .iter()
            .filter_map(|name| match name.parse::<EventType>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    warn!("dropping stored event type: {e}");
                    None
                }
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_selected_event_types(
        &mut self,
        types: &BTreeSet<EventType>,
    ) -> Result<(), QuakesError> {
        let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
        self.write(keys::EVENT_TYPES, &names)
    }

    #[must_use]
    pub fn use_custom_date_range(&self) -> bool {
        self.read(keys::USE_CUSTOM_DATE_RANGE).unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_use_custom_date_range(&mut self, value: bool) -> Result<(), QuakesError> {
        self.write(keys::USE_CUSTOM_DATE_RANGE, &value)
    }

    #[must_use]
    pub fn custom_start_time(&self) -> Option<DateTime<Utc>> {
        self.read(keys::CUSTOM_START_TIME)
    }

    /// `None` clears the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_custom_start_time(&mut self, value: Option<DateTime<Utc>>) -> Result<(), QuakesError> {
        self.write_optional(keys::CUSTOM_START_TIME, value.as_ref())
    }

    #[must_use]
    pub fn custom_end_time(&self) -> Option<DateTime<Utc>> {
        self.read(keys::CUSTOM_END_TIME)
    }

    /// `None` clears the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the value.
    pub fn set_custom_end_time(&mut self, value: Option<DateTime<Utc>>) -> Result<(), QuakesError> {
        self.write_optional(keys::CUSTOM_END_TIME, value.as_ref())
    }

    /// Read every field at once.
    #[must_use]
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            minimum_magnitude: self.minimum_magnitude(),
            maximum_magnitude: self.maximum_magnitude(),
            selected_event_types: self.selected_event_types(),
            use_custom_date_range: self.use_custom_date_range(),
            custom_start_time: self.custom_start_time(),
            custom_end_time: self.custom_end_time(),
        }
    }

    /// Write every field of `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist a value. Fields written
    /// before the failure stay written.
    pub fn apply(&mut self, snapshot: &FilterSnapshot) -> Result<(), QuakesError> {
        self.set_minimum_magnitude(snapshot.minimum_magnitude)?;
        self.set_maximum_magnitude(snapshot.maximum_magnitude)?;
        self.set_selected_event_types(&snapshot.selected_event_types)?;
        self.set_use_custom_date_range(snapshot.use_custom_date_range)?;
        self.set_custom_start_time(snapshot.custom_start_time)?;
        self.set_custom_end_time(snapshot.custom_end_time)?;
        debug!(?snapshot, "filter settings saved");
        Ok(())
    }

    /// Forget every stored field, restoring defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist the removal.
    pub fn reset(&mut self) -> Result<(), QuakesError> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn effective_start_time(&self) -> DateTime<Utc> {
        self.snapshot().effective_start_time()
    }

    #[must_use]
    pub fn effective_end_time(&self) -> DateTime<Utc> {
        self.snapshot().effective_end_time()
    }

    #[must_use]
    pub fn is_included(&self, event: &SeismicEvent) -> bool {
        self.snapshot().is_included(event)
    }

    /// Start an edit session seeded with the stored values.
    pub fn edit(&mut self) -> FilterDraft<'_, S> {
        let draft = self.snapshot();
        FilterDraft {
            settings: self,
            draft,
        }
    }
}

/// Unsaved edits to [`FilterSettings`]. Nothing is written until [`save`].
///
/// [`save`]: FilterDraft::save
pub struct FilterDraft<'a, S> {
    settings: &'a mut FilterSettings<S>,
    draft: FilterSnapshot,
}

impl<S: SettingsStore> FilterDraft<'_, S> {
    /// Current draft values.
    #[must_use]
    pub fn snapshot(&self) -> &FilterSnapshot {
        &self.draft
    }

    /// Move the minimum stepper; returns the value actually taken.
    pub fn step_minimum(&mut self, requested: f64) -> f64 {
        let value = filters::clamp_minimum(requested, self.draft.maximum_magnitude);
        self.draft.minimum_magnitude = value;
        value
    }

    /// Move the maximum stepper; returns the value actually taken.
    pub fn step_maximum(&mut self, requested: f64) -> f64 {
        let value = filters::clamp_maximum(requested, self.draft.minimum_magnitude);
        self.draft.maximum_magnitude = value;
        value
    }

    /// Flip one event type; returns whether it is now selected.
    pub fn toggle_event_type(&mut self, kind: EventType) -> bool {
        let types = &mut self.draft.selected_event_types;
        if types.remove(&kind) {
            false
        } else {
            types.insert(kind);
            true
        }
    }

    pub fn set_event_types(&mut self, types: impl IntoIterator<Item = EventType>) {
        self.draft.selected_event_types = types.into_iter().collect();
    }

    /// Switch to a custom window. Either end may be left open.
    pub fn set_date_range(&mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        self.draft.use_custom_date_range = true;
        self.draft.custom_start_time = start;
        self.draft.custom_end_time = end;
    }

    /// Switch to a custom window, changing only the ends that are given.
    pub fn update_date_range(
        &mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) {
        let start = start.or(self.draft.custom_start_time);
        let end = end.or(self.draft.custom_end_time);
        self.set_date_range(start, end);
    }

    /// Go back to the rolling 24 hour window. Stored custom times are kept.
    pub fn use_default_date_range(&mut self) {
        self.draft.use_custom_date_range = false;
    }

    /// Persist the draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot persist a value.
    pub fn save(self) -> Result<FilterSnapshot, QuakesError> {
        self.settings.apply(&self.draft)?;
        Ok(self.draft)
    }
}
