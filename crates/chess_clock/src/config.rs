// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Time control configuration and its bounds.

use std::time::Duration;

use crate::{Error, Result};

/// Longest base duration a game can be configured with, in minutes.
pub const MAX_DURATION_MINUTES: u32 = 180;

/// Largest per-move increment a game can be configured with, in seconds.
pub const MAX_INCREMENT_SECONDS: u32 = 30;

/// Upper bound of the time-adjustment window, in seconds (9:59:59).
///
/// The lower bound is one second: an edited clock never shows zero time.
pub const MAX_TIME_SECONDS: u32 = 35_999;

/// Smallest edited time, in seconds.
pub const MIN_TIME_SECONDS: u32 = 1;

const DEFAULT_DURATION_MINUTES: u32 = 5;
const DEFAULT_INCREMENT_SECONDS: u32 = 0;
const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

/// The time control applied to both players whenever the clock is reset.
///
/// Durations are kept in whole minutes and increments in whole seconds, which is
/// the granularity users edit them at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeControl {
    duration_minutes: u32,
    increment_seconds: u32,
}

impl TimeControl {
    /// Creates a time control, validating it against the configuration bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when the duration exceeds [`MAX_DURATION_MINUTES`], the
    /// increment exceeds [`MAX_INCREMENT_SECONDS`], or both are zero.
    pub fn new(duration_minutes: u32, increment_seconds: u32) -> Result<Self> {
        if duration_minutes > MAX_DURATION_MINUTES {
            return Err(Error::from_message(format!(
                "duration of {duration_minutes} minutes exceeds the maximum of {MAX_DURATION_MINUTES}"
            )));
        }

        if increment_seconds > MAX_INCREMENT_SECONDS {
            return Err(Error::from_message(format!(
                "increment of {increment_seconds} seconds exceeds the maximum of {MAX_INCREMENT_SECONDS}"
            )));
        }

        if duration_minutes == 0 && increment_seconds == 0 {
            return Err(Error::from_message("duration and increment cannot both be zero"));
        }

        Ok(Self {
            duration_minutes,
            increment_seconds,
        })
    }

    /// Creates a time control without validation. Callers guarantee the bounds.
    pub(crate) const fn new_unchecked(duration_minutes: u32, increment_seconds: u32) -> Self {
        Self {
            duration_minutes,
            increment_seconds,
        }
    }

    /// Base time per player, in minutes.
    #[must_use]
    pub const fn duration_minutes(self) -> u32 {
        self.duration_minutes
    }

    /// Time added after each completed move, in seconds.
    #[must_use]
    pub const fn increment_seconds(self) -> u32 {
        self.increment_seconds
    }

    /// Base time per player.
    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::from_secs(u64::from(self.duration_minutes) * 60)
    }

    /// Time added after each completed move.
    #[must_use]
    pub fn increment(self) -> Duration {
        Duration::from_secs(u64::from(self.increment_seconds))
    }

    /// Time each player holds right after a reset: the duration plus one increment.
    #[must_use]
    pub fn reset_time(self) -> Duration {
        self.duration() + self.increment()
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_DURATION_MINUTES, DEFAULT_INCREMENT_SECONDS)
    }
}

/// Complete clock configuration.
///
/// The time control given here is the clock's default: it is what
/// [`ChessClock::reset_conf`][crate::ChessClock::reset_conf] restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Time control restored on a full reset.
    pub time_control: TimeControl,
    /// Spacing of tick boundaries, measured backwards from the end-mark.
    pub tick_period: Duration,
}

impl ClockConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.tick_period.is_zero() {
            return Err(Error::from_message("tick period must be positive"));
        }

        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_control: TimeControl::default(),
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClockConfig::default();
        assert_eq!(config.time_control.duration_minutes(), 5);
        assert_eq!(config.time_control.increment_seconds(), 0);
        assert_eq!(config.tick_period, Duration::from_millis(100));
        config.validate().unwrap();
    }

    #[test]
    fn reset_time_adds_one_increment() {
        let control = TimeControl::new(3, 2).unwrap();
        assert_eq!(control.reset_time(), Duration::from_secs(182));
    }

    #[test]
    fn bounds_are_inclusive() {
        TimeControl::new(MAX_DURATION_MINUTES, MAX_INCREMENT_SECONDS).unwrap();
        TimeControl::new(0, 1).unwrap();
        TimeControl::new(1, 0).unwrap();
    }

    #[test]
    fn rejects_out_of_range() {
        let err = TimeControl::new(MAX_DURATION_MINUTES + 1, 0).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));

        let err = TimeControl::new(5, MAX_INCREMENT_SECONDS + 1).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));

        let err = TimeControl::new(0, 0).unwrap_err();
        assert!(err.to_string().contains("both be zero"));
    }

    #[test]
    fn rejects_zero_tick_period() {
        let config = ClockConfig {
            tick_period: Duration::ZERO,
            ..ClockConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
