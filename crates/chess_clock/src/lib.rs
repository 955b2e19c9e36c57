// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Timing and state engine for a two-player chess clock.
//!
//! A [`ChessClock`] counts down the time of the player to move, credits a per-move
//! increment when the move ends, and stops for good when a player runs out of time.
//! Between games the time control can be edited, and during a pause the current
//! player's time can be corrected; both edits go through clamped, co-dependent
//! minute/second adjustments so the clock never shows an invalid value.
//!
//! Time is read from a [`tick::Clock`], so every timing decision can be driven
//! deterministically in tests through `tick::ClockControl`.
//!
//! The lifecycle is described on [`ClockState`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use chess_clock::{ChessClock, ClockState, Player};
//! use tick::ClockControl;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> chess_clock::Result<()> {
//! let control = ClockControl::new();
//! let clock = ChessClock::builder(control.to_clock()).duration_minutes(3).build()?;
//!
//! clock.start();
//! control.advance(Duration::from_secs(20));
//! clock.play();
//!
//! control.advance(Duration::from_secs(5));
//! clock.pause();
//!
//! let snapshot = clock.snapshot();
//! assert_eq!(snapshot.state, ClockState::Paused);
//! assert_eq!(snapshot.player, Player::Black);
//! assert_eq!(snapshot.white_time, Duration::from_secs(160));
//! assert_eq!(snapshot.black_time, Duration::from_secs(175));
//! # Ok(())
//! # }
//! ```

#![doc(
    html_logo_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/chess_clock/logo.png"
)]
#![doc(
    html_favicon_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/chess_clock/favicon.ico"
)]

mod adjust;
mod builder;
mod config;
mod engine;
mod error;
mod input;
mod observe;
mod runtime;
mod state;
mod telemetry;
mod time;

pub use adjust::{SavedConf, SavedTime, is_consistent_change};
pub use builder::ChessClockBuilder;
pub use config::{ClockConfig, MAX_DURATION_MINUTES, MAX_INCREMENT_SECONDS, MAX_TIME_SECONDS, MIN_TIME_SECONDS, TimeControl};
pub use engine::ChessClock;
pub use error::{Error, Result};
pub use input::{AdjustmentInput, Deltas, InputContext, KeyDirection, LayoutDirection, LeaningSide, Orientation};
pub use observe::ClockSnapshot;
pub use state::{ClockState, Player};
pub use time::{DurationParts, TimeMark};
