//! Client-side event filtering.
//!
//! The webservice already filters by magnitude, type and date when the query
//! is built; these checks re-apply the user's magnitude bounds to events
//! after they have been fetched. The stepper clamps are the policy any UI
//! must follow when the user nudges one bound past the other.

use crate::events::SeismicEvent;

/// Lowest magnitude a user may select.
pub const MINIMUM_ALLOWABLE_MAGNITUDE: f64 = 0.0;

/// Highest magnitude a user may select.
pub const MAXIMUM_ALLOWABLE_MAGNITUDE: f64 = 10.0;

/// Increment of the magnitude steppers.
pub const MAGNITUDE_STEP: f64 = 1.0;

/// Inclusive magnitude bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl MagnitudeRange {
    /// Check a magnitude against the bounds. Absent magnitudes never match.
    #[must_use]
    pub fn contains(&self, magnitude: Option<f64>) -> bool {
        magnitude.is_some_and(|m| m >= self.minimum && m <= self.maximum)
    }

    /// Check if an event passes the magnitude bounds.
    #[must_use]
    pub fn matches(&self, event: &SeismicEvent) -> bool {
        self.contains(event.magnitude)
    }
}

/// New minimum after the user moves the minimum stepper to `requested`.
///
/// Reaching or passing the current maximum pulls the minimum back one step
/// below it.
#[must_use]
pub fn clamp_minimum(requested: f64, current_maximum: f64) -> f64 {
    let mut value = requested.clamp(MINIMUM_ALLOWABLE_MAGNITUDE, MAXIMUM_ALLOWABLE_MAGNITUDE);
    if value >= current_maximum {
        value = current_maximum - MAGNITUDE_STEP;
    }
    value.max(MINIMUM_ALLOWABLE_MAGNITUDE)
}

/// New maximum after the user moves the maximum stepper to `requested`.
///
/// Reaching or passing the current minimum pushes the maximum one step
/// above it.
#[must_use]
pub fn clamp_maximum(requested: f64, current_minimum: f64) -> f64 {
    let mut value = requested.clamp(MINIMUM_ALLOWABLE_MAGNITUDE, MAXIMUM_ALLOWABLE_MAGNITUDE);
    if value <= current_minimum {
        value = current_minimum + MAGNITUDE_STEP;
    }
    value.min(MAXIMUM_ALLOWABLE_MAGNITUDE)
}
