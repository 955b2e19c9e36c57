// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The clock engine: commands, the tick loop and observable state.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tick::Clock;
use tokio::sync::watch;

use crate::adjust::{SavedConf, SavedTime, is_consistent_change};
use crate::observe::Observers;
use crate::runtime::{Runtime, TickTask};
use crate::telemetry::{self, ClockEvent};
use crate::time::{TimeMark, next_tick_delay};
use crate::{AdjustmentInput, ChessClockBuilder, ClockConfig, ClockSnapshot, ClockState, InputContext, Player, TimeControl};

/// A two-player chess clock.
///
/// `ChessClock` is a cheap handle: clones share the same clock. Every command is
/// applied atomically with respect to the tick loop and to other commands, so the
/// clock can be driven from any thread. Commands that make no sense in the current
/// [`ClockState`] are ignored and logged as warnings.
///
/// While [`ClockState::Ticking`], a background task on the configured Tokio runtime
/// wakes on every tick boundary (multiples of the tick period before the end-mark)
/// and publishes the remaining time. At most one such task is live at a time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use chess_clock::{ChessClock, ClockState, Player};
/// use tick::ClockControl;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> chess_clock::Result<()> {
/// let control = ClockControl::new();
/// let clock = ChessClock::builder(control.to_clock())
///     .duration_minutes(5)
///     .increment_seconds(2)
///     .build()?;
///
/// clock.start();
/// control.advance(Duration::from_secs(10));
/// clock.play();
///
/// assert_eq!(clock.state(), ClockState::Ticking);
/// assert_eq!(clock.player(), Player::Black);
/// assert_eq!(clock.white_time(), Duration::from_secs(294));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChessClock {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    clock: Clock,
    runtime: Runtime,
    tick_period: Duration,
    defaults: TimeControl,
    observers: Observers,
    core: Mutex<Core>,
}

#[derive(Debug)]
struct Core {
    state: ClockState,
    player: Player,
    white_time: Duration,
    black_time: Duration,
    time_control: TimeControl,
    end_mark: Option<TimeMark>,
    saved_time: SavedTime,
    saved_conf: SavedConf,
    // Bumped on every cancellation; a tick loop only acts while its epoch is current.
    epoch: u64,
    tick_task: Option<TickTask>,
}

impl Core {
    fn new(time_control: TimeControl) -> Self {
        let reset_time = time_control.reset_time();
        Self {
            state: ClockState::FullReset,
            player: Player::White,
            white_time: reset_time,
            black_time: reset_time,
            time_control,
            end_mark: None,
            saved_time: SavedTime::snapshot(reset_time),
            saved_conf: SavedConf::snapshot(time_control),
            epoch: 0,
            tick_task: None,
        }
    }

    fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            white_time: self.white_time,
            black_time: self.black_time,
            state: self.state,
            player: self.player,
        }
    }

    const fn current_time(&self) -> Duration {
        match self.player {
            Player::White => self.white_time,
            Player::Black => self.black_time,
        }
    }

    fn set_current_time(&mut self, time: Duration) {
        match self.player {
            Player::White => self.white_time = time,
            Player::Black => self.black_time = time,
        }
    }

    /// Time left until the end-mark, or zero once it has passed.
    fn remaining_at(&self, now: TimeMark) -> Duration {
        let Some(end_mark) = self.end_mark else {
            return self.current_time();
        };

        let remaining = end_mark.since(now);
        if remaining.is_positive() {
            remaining.unsigned_abs()
        } else {
            Duration::ZERO
        }
    }

    fn cancel_ticking(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(task) = self.tick_task.take() {
            task.abort();
            tracing::debug!(clock.epoch = self.epoch, "clock.tick_loop_cancelled");
        }
    }

    fn reset_times(&mut self) {
        let reset_time = self.time_control.reset_time();
        self.white_time = reset_time;
        self.black_time = reset_time;
        self.player = Player::White;
        self.end_mark = None;
    }
}

impl ChessClock {
    /// Starts building a clock driven by the given time source.
    #[must_use]
    pub fn builder(clock: Clock) -> ChessClockBuilder {
        ChessClockBuilder::new(clock)
    }

    pub(crate) fn new(clock: Clock, config: ClockConfig, runtime: Runtime) -> Self {
        let core = Core::new(config.time_control);
        let observers = Observers::new(&core.snapshot());

        Self {
            shared: Arc::new(Shared {
                clock,
                runtime,
                tick_period: config.tick_period,
                defaults: config.time_control,
                observers,
                core: Mutex::new(core),
            }),
        }
    }

    /// Starts or resumes the current player's countdown.
    ///
    /// Calling `start` while already ticking re-anchors the countdown at the
    /// current remaining time. Ignored once the clock has finished.
    pub fn start(&self) {
        let mut core = self.shared.core.lock();
        if !core.state.can_start() {
            reject("start", &core);
            return;
        }

        let now = self.shared.now();
        let was_ticking = core.state == ClockState::Ticking;
        let remaining = core.remaining_at(now);
        core.cancel_ticking();
        if was_ticking {
            if remaining.is_zero() {
                self.shared.finish(&mut core, "start");
                return;
            }
            core.set_current_time(remaining);
        }

        self.shared.begin_countdown(&mut core, now);
        self.shared.publish(ClockEvent::Started, "start", &core);
    }

    /// Ends the current player's move: credits the increment and hands the clock
    /// to the opponent. Only valid while ticking.
    pub fn play(&self) {
        let mut core = self.shared.core.lock();
        if core.state != ClockState::Ticking {
            reject("play", &core);
            return;
        }

        let now = self.shared.now();
        let remaining = core.remaining_at(now);
        core.cancel_ticking();
        if remaining.is_zero() {
            self.shared.finish(&mut core, "play");
            return;
        }

        let increment = core.time_control.increment();
        core.set_current_time(remaining.saturating_add(increment));
        core.player = core.player.opponent();

        self.shared.begin_countdown(&mut core, now);
        self.shared.publish(ClockEvent::Switched, "play", &core);
    }

    /// Freezes the countdown. Only valid while ticking.
    pub fn pause(&self) {
        let mut core = self.shared.core.lock();
        if core.state != ClockState::Ticking {
            reject("pause", &core);
            return;
        }

        let remaining = core.remaining_at(self.shared.now());
        core.cancel_ticking();
        if remaining.is_zero() {
            self.shared.finish(&mut core, "pause");
            return;
        }

        core.set_current_time(remaining);
        core.end_mark = None;
        core.state = ClockState::Paused;
        self.shared.publish(ClockEvent::Paused, "pause", &core);
    }

    /// Resets both players to the current time control, keeping the configuration.
    ///
    /// The saved time control is re-captured, so a following
    /// [`restore_saved_conf`][Self::restore_saved_conf] starts from the active one.
    pub fn reset_time(&self) {
        let mut core = self.shared.core.lock();
        core.cancel_ticking();
        core.reset_times();
        core.saved_conf = SavedConf::snapshot(core.time_control);
        core.state = ClockState::SoftReset;
        self.shared.publish(ClockEvent::Reset, "reset_time", &core);
    }

    /// Restores the time control the clock was built with and resets both players.
    ///
    /// The saved time control is re-captured as well.
    pub fn reset_conf(&self) {
        let mut core = self.shared.core.lock();
        core.cancel_ticking();
        core.time_control = self.shared.defaults;
        core.reset_times();
        core.saved_conf = SavedConf::snapshot(core.time_control);
        core.state = ClockState::FullReset;
        self.shared.publish(ClockEvent::Reset, "reset_conf", &core);
    }

    /// Captures the current player's time as the base for
    /// [`restore_saved_time`][Self::restore_saved_time]. Only valid while paused.
    pub fn save_time(&self) {
        let mut core = self.shared.core.lock();
        if core.state != ClockState::Paused {
            reject("save_time", &core);
            return;
        }

        core.saved_time = SavedTime::snapshot(core.current_time());
        log(ClockEvent::Saved, "save_time", &core);
    }

    /// Captures the time control as the base for
    /// [`restore_saved_conf`][Self::restore_saved_conf]. Only valid before a game starts.
    pub fn save_conf(&self) {
        let mut core = self.shared.core.lock();
        if !core.state.is_reset() {
            reject("save_conf", &core);
            return;
        }

        core.saved_conf = SavedConf::snapshot(core.time_control);
        log(ClockEvent::Saved, "save_conf", &core);
    }

    /// Applies an adjustment to the saved time and makes the result the current
    /// player's time. Only valid while paused.
    ///
    /// The deltas accumulate into the saved value, and the result is clamped to
    /// `1s..=9:59:59`. The edit is dropped when the time would move against the
    /// direction of the deltas. With `precise` unset, the seconds are rounded to
    /// whole seconds.
    pub fn restore_saved_time(&self, add_minutes: f64, add_seconds: f64, precise: bool) {
        let mut core = self.shared.core.lock();
        if core.state != ClockState::Paused {
            reject("restore_saved_time", &core);
            return;
        }

        let saved = core.saved_time.with_deltas(add_minutes, add_seconds);
        core.saved_time = saved;

        let old = core.current_time();
        let new = saved.to_duration(precise);
        if !is_consistent_change(add_minutes, add_seconds, old, new) {
            log(ClockEvent::AdjustmentRejected, "restore_saved_time", &core);
            return;
        }

        core.cancel_ticking();
        core.set_current_time(new);
        core.end_mark = Some(self.shared.now() + new);
        self.shared.publish(ClockEvent::Adjusted, "restore_saved_time", &core);
    }

    /// Applies an adjustment to the saved time control, makes it the active one and
    /// resets both players to it. Only valid before a game starts.
    ///
    /// The duration is clamped to `0..=180` minutes and the increment to `0..=30`
    /// seconds, never both zero.
    ///
    /// The state becomes [`ClockState::FullReset`] when the result equals the time
    /// control the clock was built with and [`ClockState::SoftReset`] otherwise, so a
    /// zero adjustment of a soft-reset clock at its default time control turns it
    /// into a full reset.
    pub fn restore_saved_conf(&self, add_minutes: f64, add_seconds: f64) {
        let mut core = self.shared.core.lock();
        if !core.state.is_reset() {
            reject("restore_saved_conf", &core);
            return;
        }

        let saved = core.saved_conf.with_deltas(add_minutes, add_seconds);
        core.saved_conf = saved;

        core.cancel_ticking();
        core.time_control = saved.to_time_control();
        core.reset_times();
        core.state = if core.time_control == self.shared.defaults {
            ClockState::FullReset
        } else {
            ClockState::SoftReset
        };
        self.shared.publish(ClockEvent::Adjusted, "restore_saved_conf", &core);
    }

    /// Adjusts the current player's time from a user gesture.
    ///
    /// Drags apply at millisecond precision; key presses snap to whole seconds.
    pub fn adjust_time(&self, input: AdjustmentInput, context: InputContext) {
        let deltas = input.deltas(context);
        self.restore_saved_time(deltas.minutes, deltas.seconds, input.is_precise());
    }

    /// Adjusts the time control from a user gesture.
    pub fn adjust_conf(&self, input: AdjustmentInput, context: InputContext) {
        let deltas = input.deltas(context);
        self.restore_saved_conf(deltas.minutes, deltas.seconds);
    }

    /// The clock state.
    #[must_use]
    pub fn state(&self) -> ClockState {
        self.shared.core.lock().state
    }

    /// The player whose time is live.
    #[must_use]
    pub fn player(&self) -> Player {
        self.shared.core.lock().player
    }

    /// White's time as of the last tick or command.
    #[must_use]
    pub fn white_time(&self) -> Duration {
        self.shared.core.lock().white_time
    }

    /// Black's time as of the last tick or command.
    #[must_use]
    pub fn black_time(&self) -> Duration {
        self.shared.core.lock().black_time
    }

    /// The current player's time as of the last tick or command.
    #[must_use]
    pub fn current_time(&self) -> Duration {
        self.shared.core.lock().current_time()
    }

    /// The current player's time measured against the end-mark right now.
    ///
    /// Unlike [`current_time`][Self::current_time] this does not wait for the next
    /// tick boundary while the clock is ticking.
    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        let core = self.shared.core.lock();
        if core.state == ClockState::Ticking {
            core.remaining_at(self.shared.now())
        } else {
            core.current_time()
        }
    }

    /// The active time control.
    #[must_use]
    pub fn time_control(&self) -> TimeControl {
        self.shared.core.lock().time_control
    }

    /// The time control restored by [`reset_conf`][Self::reset_conf].
    #[must_use]
    pub fn default_time_control(&self) -> TimeControl {
        self.shared.defaults
    }

    /// The saved time scratch value, including any adjustments applied to it.
    #[must_use]
    pub fn saved_time(&self) -> SavedTime {
        self.shared.core.lock().saved_time
    }

    /// The saved time control scratch value, including any adjustments applied to it.
    #[must_use]
    pub fn saved_conf(&self) -> SavedConf {
        self.shared.core.lock().saved_conf
    }

    /// Everything a clock face shows, read atomically.
    #[must_use]
    pub fn snapshot(&self) -> ClockSnapshot {
        self.shared.core.lock().snapshot()
    }

    /// Subscribes to White's time.
    #[must_use]
    pub fn watch_white_time(&self) -> watch::Receiver<Duration> {
        self.shared.observers.white_time()
    }

    /// Subscribes to Black's time.
    #[must_use]
    pub fn watch_black_time(&self) -> watch::Receiver<Duration> {
        self.shared.observers.black_time()
    }

    /// Subscribes to the clock state.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ClockState> {
        self.shared.observers.state()
    }

    /// Subscribes to the current player.
    #[must_use]
    pub fn watch_player(&self) -> watch::Receiver<Player> {
        self.shared.observers.player()
    }
}

impl Shared {
    fn now(&self) -> TimeMark {
        TimeMark::now(&self.clock)
    }

    /// Anchors the end-mark at `now` plus the current time and spawns a fresh tick loop.
    /// The previous loop must already be cancelled.
    fn begin_countdown(self: &Arc<Self>, core: &mut Core, now: TimeMark) {
        core.end_mark = Some(now + core.current_time());
        core.state = ClockState::Ticking;

        let epoch = core.epoch;
        let shared = Arc::downgrade(self);
        let clock = self.clock.clone();
        core.tick_task = Some(self.runtime.spawn(tick_loop(shared, clock, epoch)));
        tracing::debug!(clock.epoch = epoch, "clock.tick_loop_spawned");
    }

    /// Pins the current player's time at zero and stops the clock for good.
    fn finish(&self, core: &mut Core, command: &'static str) {
        core.cancel_ticking();
        core.set_current_time(Duration::ZERO);
        core.end_mark = None;
        core.state = ClockState::Finished;
        self.publish(ClockEvent::Finished, command, core);
    }

    /// Recomputes the remaining time. Returns it while the countdown goes on.
    fn tick(&self, core: &mut Core) -> Option<Duration> {
        if core.state != ClockState::Ticking {
            return None;
        }

        let remaining = core.remaining_at(self.now());
        if remaining.is_zero() {
            self.finish(core, "tick");
            return None;
        }

        core.set_current_time(remaining);
        self.publish(ClockEvent::Tick, "tick", core);
        Some(remaining)
    }

    fn publish(&self, event: ClockEvent, command: &'static str, core: &Core) {
        let snapshot = core.snapshot();
        self.observers.publish(&snapshot);
        telemetry::emit(event, command, &snapshot);
    }
}

fn log(event: ClockEvent, command: &'static str, core: &Core) {
    telemetry::emit(event, command, &core.snapshot());
}

fn reject(command: &'static str, core: &Core) {
    log(ClockEvent::CommandRejected, command, core);
}

/// Sleeps to each tick boundary and publishes the remaining time until the clock
/// finishes, the loop is cancelled, or every handle to the clock is dropped.
async fn tick_loop(shared: Weak<Shared>, clock: Clock, epoch: u64) {
    loop {
        let delay = {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let mut core = shared.core.lock();
            if core.epoch != epoch {
                return;
            }

            match shared.tick(&mut core) {
                Some(remaining) => next_tick_delay(remaining, shared.tick_period),
                None => return,
            }
        };

        clock.delay(delay).await;
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use tick::ClockControl;

    use super::*;

    static_assertions::assert_impl_all!(ChessClock: Send, Sync, Clone);

    fn clock(control: &ClockControl) -> ChessClock {
        ChessClock::builder(control.to_clock()).build().unwrap()
    }

    #[tokio::test]
    async fn initial_state() {
        let control = ClockControl::new();
        let clock = clock(&control);

        let snapshot = clock.snapshot();
        assert_eq!(snapshot.state, ClockState::FullReset);
        assert_eq!(snapshot.player, Player::White);
        assert_eq!(snapshot.white_time, Duration::from_secs(300));
        assert_eq!(snapshot.black_time, Duration::from_secs(300));
        assert_eq!(clock.time_control(), TimeControl::default());
    }

    #[tokio::test]
    async fn commands_cancel_previous_loop() {
        let control = ClockControl::new();
        let clock = clock(&control);

        clock.start();
        let first_epoch = clock.shared.core.lock().epoch;
        clock.start();

        let core = clock.shared.core.lock();
        assert_ne!(core.epoch, first_epoch);
        assert!(core.tick_task.is_some());
    }

    #[tokio::test]
    async fn remaining_at_is_zero_past_end_mark() {
        let control = ClockControl::new();
        let clock = clock(&control);

        clock.start();
        control.advance(Duration::from_secs(301));

        let core = clock.shared.core.lock();
        assert_eq!(core.remaining_at(clock.shared.now()), Duration::ZERO);
    }

    #[tokio::test]
    async fn reset_clears_end_mark_and_task() {
        let control = ClockControl::new();
        let clock = clock(&control);

        clock.start();
        clock.reset_time();

        let core = clock.shared.core.lock();
        assert!(core.end_mark.is_none());
        assert!(core.tick_task.is_none());
        assert_eq!(core.state, ClockState::SoftReset);
    }

    #[tokio::test]
    async fn remaining_time_is_live_while_ticking() {
        let control = ClockControl::new();
        let clock = clock(&control);

        clock.start();
        control.advance(Duration::from_millis(1_234));

        assert_eq!(clock.remaining_time(), Duration::from_millis(298_766));
    }
}
