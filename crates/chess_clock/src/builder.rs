// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`ChessClock`].

use std::time::Duration;

use tick::Clock;
use tokio::runtime::Handle;

use crate::runtime::Runtime;
use crate::{ChessClock, ClockConfig, Result, TimeControl};

/// Builder for constructing a [`ChessClock`].
///
/// Created by calling [`ChessClock::builder`]. Every setting has a default: a
/// 5 minute game without increment, ticking every 100 ms on the Tokio runtime of
/// the calling context.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chess_clock::ChessClock;
/// use tick::Clock;
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
///
/// let clock = ChessClock::builder(Clock::new_frozen())
///     .duration_minutes(3)
///     .increment_seconds(2)
///     .tick_period(Duration::from_millis(50))
///     .runtime(runtime.handle().clone())
///     .build()
///     .unwrap();
///
/// assert_eq!(clock.white_time(), Duration::from_secs(182));
/// ```
#[derive(Debug)]
#[must_use]
pub struct ChessClockBuilder {
    clock: Clock,
    duration_minutes: u32,
    increment_seconds: u32,
    tick_period: Duration,
    runtime: Option<Handle>,
}

impl ChessClockBuilder {
    pub(crate) fn new(clock: Clock) -> Self {
        let defaults = ClockConfig::default();
        Self {
            clock,
            duration_minutes: defaults.time_control.duration_minutes(),
            increment_seconds: defaults.time_control.increment_seconds(),
            tick_period: defaults.tick_period,
            runtime: None,
        }
    }

    /// Base time per player, in minutes.
    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Time credited after each completed move, in seconds.
    pub fn increment_seconds(mut self, seconds: u32) -> Self {
        self.increment_seconds = seconds;
        self
    }

    /// Sets duration and increment from an already validated time control.
    pub fn time_control(self, time_control: TimeControl) -> Self {
        self.duration_minutes(time_control.duration_minutes())
            .increment_seconds(time_control.increment_seconds())
    }

    /// Applies a complete configuration.
    pub fn config(self, config: ClockConfig) -> Self {
        self.time_control(config.time_control).tick_period(config.tick_period)
    }

    /// Spacing of the displayed-time updates while ticking.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Runtime that drives the tick loop. Defaults to the runtime of the context
    /// calling [`build`][Self::build].
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds the clock in [`ClockState::FullReset`][crate::ClockState::FullReset].
    ///
    /// The time control given here is what [`ChessClock::reset_conf`] restores.
    ///
    /// # Errors
    ///
    /// Returns an error when the time control is out of bounds, the tick period is
    /// zero, or no runtime was given and none is running.
    pub fn build(self) -> Result<ChessClock> {
        let config = ClockConfig {
            time_control: TimeControl::new(self.duration_minutes, self.increment_seconds)?,
            tick_period: self.tick_period,
        };
        config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => Runtime::new(handle),
            None => Runtime::current()?,
        };

        Ok(ChessClock::new(self.clock, config, runtime))
    }
}
