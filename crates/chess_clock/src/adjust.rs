// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scratch values for editing the current time and the time control.
//!
//! While the user drags or key-adjusts a value, fractional deltas accumulate in
//! floating-point scratch values. Each pair is co-dependent: whenever one half of a
//! pair changes it is clamped against the *rounded* value of the other half, so the
//! combined value stays valid no matter which axis the user moves. Deltas are always
//! applied first to the minutes half, then to the seconds half, and both corrected
//! values are produced together.

use std::cmp::Ordering;
use std::time::Duration;

use crate::config::{MAX_DURATION_MINUTES, MAX_INCREMENT_SECONDS, MAX_TIME_SECONDS, MIN_TIME_SECONDS, TimeControl};
use crate::time::{DurationParts, duration_from_secs_f64};

/// Scratch copy of the current player's time, split into minutes and seconds.
///
/// The seconds half may carry a sub-second remainder and may go negative or past
/// 59 as long as the total stays within `[MIN_TIME_SECONDS, MAX_TIME_SECONDS]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SavedTime {
    minutes: f64,
    seconds: f64,
}

impl SavedTime {
    /// Snapshots `time` without clamping it.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "minutes of a clock time are far below 2^52")]
    pub fn snapshot(time: Duration) -> Self {
        let parts = DurationParts::from_duration(time);
        Self {
            minutes: parts.minutes as f64,
            seconds: parts.fractional_seconds(),
        }
    }

    /// The minutes half.
    #[must_use]
    pub const fn minutes(&self) -> f64 {
        self.minutes
    }

    /// The seconds half, including any sub-second remainder.
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Returns the pair after adding the deltas, each half clamped against the other.
    #[must_use]
    pub fn with_deltas(self, add_minutes: f64, add_seconds: f64) -> Self {
        let minutes = clamp_time_minutes(self.minutes + finite_or_zero(add_minutes), self.seconds.round());
        let seconds = clamp_time_seconds(self.seconds + finite_or_zero(add_seconds), minutes.round());
        Self { minutes, seconds }
    }

    /// The time this pair represents.
    ///
    /// Minutes are always rounded. Seconds are rounded too unless `precise` is set, in
    /// which case the sub-second remainder is kept at millisecond precision.
    ///
    /// Rounding sends halves away from zero, so a borrowed `-30.5` seconds counts as
    /// `-31` and `30.5` as `31`.
    #[must_use]
    pub fn to_duration(self, precise: bool) -> Duration {
        let seconds = if precise { self.seconds } else { self.seconds.round() };
        duration_from_secs_f64(self.minutes.round() * 60.0 + seconds)
    }
}

fn clamp_time_minutes(minutes: f64, rounded_seconds: f64) -> f64 {
    let low = ((f64::from(MIN_TIME_SECONDS) - rounded_seconds) / 60.0).ceil();
    let high = ((f64::from(MAX_TIME_SECONDS) - rounded_seconds) / 60.0).floor();
    minutes.clamp(low, high.max(low))
}

fn clamp_time_seconds(seconds: f64, rounded_minutes: f64) -> f64 {
    let low = f64::from(MIN_TIME_SECONDS) - rounded_minutes * 60.0;
    let high = f64::from(MAX_TIME_SECONDS) - rounded_minutes * 60.0;
    seconds.clamp(low, high)
}

/// Scratch copy of the time control: duration minutes and increment seconds.
///
/// Duration stays within `[0, MAX_DURATION_MINUTES]` and increment within
/// `[0, MAX_INCREMENT_SECONDS]`, and the two never round to zero together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SavedConf {
    duration_minutes: f64,
    increment_seconds: f64,
}

impl SavedConf {
    /// Snapshots a time control.
    #[must_use]
    pub fn snapshot(time_control: TimeControl) -> Self {
        Self {
            duration_minutes: f64::from(time_control.duration_minutes()),
            increment_seconds: f64::from(time_control.increment_seconds()),
        }
    }

    /// The duration half, in minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    /// The increment half, in seconds.
    #[must_use]
    pub const fn increment_seconds(&self) -> f64 {
        self.increment_seconds
    }

    /// Returns the pair after adding the deltas, each half clamped against the other.
    #[must_use]
    pub fn with_deltas(self, add_minutes: f64, add_seconds: f64) -> Self {
        let duration_minutes = clamp_not_both_zero(
            self.duration_minutes + finite_or_zero(add_minutes),
            MAX_DURATION_MINUTES,
            self.increment_seconds.round(),
        );
        let increment_seconds = clamp_not_both_zero(
            self.increment_seconds + finite_or_zero(add_seconds),
            MAX_INCREMENT_SECONDS,
            duration_minutes.round(),
        );

        Self {
            duration_minutes,
            increment_seconds,
        }
    }

    /// The time control this pair rounds to.
    #[must_use]
    pub fn to_time_control(self) -> TimeControl {
        TimeControl::new_unchecked(round_to_u32(self.duration_minutes), round_to_u32(self.increment_seconds))
    }
}

fn clamp_not_both_zero(value: f64, max: u32, rounded_counterpart: f64) -> f64 {
    let low = if sign(rounded_counterpart) == 0 { 1.0 } else { 0.0 };
    value.clamp(low, f64::from(max))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "values are clamped to small non-negative ranges before rounding"
)]
fn round_to_u32(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Decides whether an edit of the current time moved it the way the user asked.
///
/// The edit is accepted when the sign of the minutes delta or the sign of the seconds
/// delta matches the sign of `new - old`, or when both deltas are zero. Clamping can
/// make a saturated axis push the total the "wrong" way; such edits are rejected.
#[must_use]
pub fn is_consistent_change(add_minutes: f64, add_seconds: f64, old: Duration, new: Duration) -> bool {
    let change = match new.cmp(&old) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };

    sign(add_minutes) == change || sign(add_seconds) == change || (sign(add_minutes) == 0 && sign(add_seconds) == 0)
}
