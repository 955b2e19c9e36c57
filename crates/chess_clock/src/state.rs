// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Clock states and the player whose time is live.

use std::fmt;

/// The player whose remaining time is currently the "current time".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Player {
    /// The player who moves first. Every reset hands the move back to white.
    #[default]
    White,
    /// The player who moves second.
    Black,
}

impl Player {
    /// Returns the other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns a static string representation of the player.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of the clock.
///
/// The state is owned by [`ChessClock`][crate::ChessClock] and changes only through
/// its commands:
///
/// ```text
///                 start()                    pause()
///  FullReset ───────────────► Ticking ─────────────────► Paused
///  SoftReset ───────────────►  │  ▲  ◄─────────────────┘ start()
///                              │  └── play() / start()
///                              ▼
///                          Finished ── reset_time() ─► SoftReset
///                                   └─ reset_conf() ─► FullReset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClockState {
    /// Time is running down for the current player.
    Ticking,
    /// Stopped mid-game; the current time may be edited.
    Paused,
    /// Times were reset; the configuration differs from the one the clock was built with.
    SoftReset,
    /// Times and configuration are at their construction defaults.
    #[default]
    FullReset,
    /// The current player ran out of time.
    Finished,
}

impl ClockState {
    /// Whether [`ChessClock::start`][crate::ChessClock::start] is accepted in this state.
    #[must_use]
    pub const fn can_start(self) -> bool {
        !matches!(self, Self::Finished)
    }

    /// Whether the clock has been reset and not started since.
    #[must_use]
    pub const fn is_reset(self) -> bool {
        matches!(self, Self::SoftReset | Self::FullReset)
    }

    /// Returns a static string representation of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticking => "ticking",
            Self::Paused => "paused",
            Self::SoftReset => "soft_reset",
            Self::FullReset => "full_reset",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ClockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
