// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Push-updated views of the clock.

use std::time::Duration;

use tokio::sync::watch;

use crate::{ClockState, Player};

/// A consistent view of everything a clock face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// White's remaining time as of the last tick or command.
    pub white_time: Duration,
    /// Black's remaining time as of the last tick or command.
    pub black_time: Duration,
    /// The clock state.
    pub state: ClockState,
    /// The player whose time is live.
    pub player: Player,
}

impl ClockSnapshot {
    /// Remaining time of the player whose time is live.
    #[must_use]
    pub const fn current_time(&self) -> Duration {
        match self.player {
            Player::White => self.white_time,
            Player::Black => self.black_time,
        }
    }
}

/// One watch channel per observable value. Receivers are woken only on real changes.
#[derive(Debug)]
pub(crate) struct Observers {
    white_time: watch::Sender<Duration>,
    black_time: watch::Sender<Duration>,
    state: watch::Sender<ClockState>,
    player: watch::Sender<Player>,
}

impl Observers {
    pub(crate) fn new(initial: &ClockSnapshot) -> Self {
        Self {
            white_time: watch::channel(initial.white_time).0,
            black_time: watch::channel(initial.black_time).0,
            state: watch::channel(initial.state).0,
            player: watch::channel(initial.player).0,
        }
    }

    pub(crate) fn publish(&self, snapshot: &ClockSnapshot) {
        publish_if_changed(&self.white_time, snapshot.white_time);
        publish_if_changed(&self.black_time, snapshot.black_time);
        publish_if_changed(&self.state, snapshot.state);
        publish_if_changed(&self.player, snapshot.player);
    }

    pub(crate) fn white_time(&self) -> watch::Receiver<Duration> {
        self.white_time.subscribe()
    }

    pub(crate) fn black_time(&self) -> watch::Receiver<Duration> {
        self.black_time.subscribe()
    }

    pub(crate) fn state(&self) -> watch::Receiver<ClockState> {
        self.state.subscribe()
    }

    pub(crate) fn player(&self) -> watch::Receiver<Player> {
        self.player.subscribe()
    }
}

fn publish_if_changed<T: PartialEq>(sender: &watch::Sender<T>, value: T) {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}
