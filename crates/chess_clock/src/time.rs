// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Monotonic time marks and duration decomposition.

use std::fmt;
use std::ops::Add;
use std::time::{Duration, Instant};

use jiff::SignedDuration;
use tick::Clock;

const MILLIS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;

/// An opaque point on the monotonic timeline of a [`Clock`].
///
/// Only the difference between two marks is meaningful. Marks never observe
/// wall-clock adjustments because they are sampled via [`Clock::instant`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chess_clock::TimeMark;
/// use tick::Clock;
///
/// let clock = Clock::new_frozen();
/// let start = TimeMark::now(&clock);
/// let end = start + Duration::from_secs(5);
///
/// assert_eq!(end.since(start).as_secs(), 5);
/// assert_eq!(start.since(end).as_secs(), -5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMark(Instant);

impl TimeMark {
    /// Samples the current monotonic time of the clock.
    ///
    /// Marks sampled from the same clock never decrease.
    #[must_use]
    pub fn now(clock: &Clock) -> Self {
        Self(clock.instant())
    }

    /// Returns the signed duration from `earlier` to this mark.
    ///
    /// The result is negative when `earlier` is actually later than `self`.
    #[must_use]
    pub fn since(self, earlier: Self) -> SignedDuration {
        match self.0.checked_duration_since(earlier.0) {
            Some(elapsed) => to_signed(elapsed),
            None => -to_signed(earlier.0.duration_since(self.0)),
        }
    }

    /// Returns the non-negative duration from `earlier` to this mark, or `None`
    /// when this mark is before `earlier`.
    #[must_use]
    pub fn checked_since(self, earlier: Self) -> Option<Duration> {
        self.0.checked_duration_since(earlier.0)
    }
}

impl Add<Duration> for TimeMark {
    type Output = Self;

    /// Shifts the mark forward; saturates at the mark itself if the instant would overflow.
    fn add(self, rhs: Duration) -> Self {
        Self(self.0.checked_add(rhs).unwrap_or(self.0))
    }
}

fn to_signed(duration: Duration) -> SignedDuration {
    SignedDuration::try_from(duration).unwrap_or(SignedDuration::MAX)
}

/// A duration split into whole minutes, whole seconds and a millisecond remainder.
///
/// Splitting and recomposing is lossless at millisecond precision; anything finer
/// than a millisecond is dropped by [`DurationParts::from_duration`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chess_clock::DurationParts;
///
/// let parts = DurationParts::from_duration(Duration::from_millis(125_250));
/// assert_eq!((parts.minutes, parts.seconds, parts.millis), (2, 5, 250));
/// assert_eq!(parts.to_duration(), Duration::from_millis(125_250));
/// assert_eq!(parts.to_string(), "2:05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    /// Whole minutes.
    pub minutes: u64,
    /// Whole seconds in `0..60`.
    pub seconds: u64,
    /// Milliseconds in `0..1000`.
    pub millis: u64,
}

impl DurationParts {
    /// Splits `duration` into minutes, seconds and milliseconds.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        let secs = duration.as_secs();
        Self {
            minutes: secs / SECONDS_PER_MINUTE,
            seconds: secs % SECONDS_PER_MINUTE,
            millis: u64::from(duration.subsec_millis()),
        }
    }

    /// Recomposes the parts into a [`Duration`].
    #[must_use]
    pub fn to_duration(self) -> Duration {
        let secs = self
            .minutes
            .saturating_mul(SECONDS_PER_MINUTE)
            .saturating_add(self.seconds);
        Duration::from_secs(secs).saturating_add(Duration::from_millis(self.millis))
    }

    /// Seconds including the sub-second remainder, e.g. `5.25`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "seconds and millis are bounded below 60 and 1000")]
    pub fn fractional_seconds(self) -> f64 {
        self.seconds as f64 + self.millis as f64 / MILLIS_PER_SECOND as f64
    }
}

impl From<Duration> for DurationParts {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.minutes * SECONDS_PER_MINUTE + self.seconds;

        if total_secs >= SECONDS_PER_HOUR {
            let hours = total_secs / SECONDS_PER_HOUR;
            let minutes = (total_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
            write!(f, "{hours}:{minutes:02}:{:02}", self.seconds)
        } else if total_secs < 10 {
            write!(f, "{}:{:02}.{}", self.minutes, self.seconds, self.millis / 100)
        } else {
            write!(f, "{}:{:02}", self.minutes, self.seconds)
        }
    }
}

/// Converts a fractional number of seconds to a [`Duration`] at millisecond precision.
///
/// Negative and non-finite inputs yield [`Duration::ZERO`].
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is rounded and checked to be non-negative before the cast"
)]
pub(crate) fn duration_from_secs_f64(secs: f64) -> Duration {
    let millis = (secs * 1_000.0).round();
    if millis.is_finite() && millis > 0.0 {
        Duration::from_millis(millis as u64)
    } else {
        Duration::ZERO
    }
}

/// Delay until the next tick boundary, measured from the end-mark rather than from now.
///
/// `remaining` must be positive. The result is always in `(0, period]`.
pub(crate) fn next_tick_delay(remaining: Duration, period: Duration) -> Duration {
    let period_nanos = period.as_nanos().max(1);
    let remaining_nanos = remaining.as_nanos().max(1);
    let delay_nanos = ((remaining_nanos - 1) % period_nanos) + 1;

    // delay_nanos <= period_nanos, which came from a Duration
    Duration::from_nanos(u64::try_from(delay_nanos).unwrap_or(u64::MAX))
}
