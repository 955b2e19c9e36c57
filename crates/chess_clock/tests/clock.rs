// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the clock lifecycle and the tick loop.

use std::time::Duration;

use chess_clock::{ChessClock, ClockState, Error, Player};
use testing_aids::LogCapture;
use tick::ClockControl;

type TestResult = Result<(), Error>;

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn new_clock(control: &ClockControl, minutes: u32, increment: u32) -> Result<ChessClock, Error> {
    ChessClock::builder(control.to_clock())
        .duration_minutes(minutes)
        .increment_seconds(increment)
        .build()
}

/// Lets the tick loop run until it parks on its next delay.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn advance(control: &ClockControl, duration: Duration) {
    control.advance(duration);
    settle().await;
}

#[tokio::test]
async fn counts_down_on_tick_boundaries_to_zero() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 1, 0)?;

    clock.start();
    settle().await;
    advance(&control, millis(58_500)).await;
    assert_eq!(clock.white_time(), millis(1_500));

    for step in 1..=14 {
        advance(&control, millis(100)).await;
        assert_eq!(clock.white_time(), millis(1_500 - step * 100));
        assert_eq!(clock.state(), ClockState::Ticking);
    }

    advance(&control, millis(100)).await;
    assert_eq!(clock.white_time(), Duration::ZERO);
    assert_eq!(clock.state(), ClockState::Finished);
    assert_eq!(clock.black_time(), secs(60));
    Ok(())
}

#[tokio::test]
async fn display_lags_until_next_boundary() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    clock.start();
    settle().await;
    advance(&control, millis(50)).await;

    assert_eq!(clock.white_time(), secs(300));
    assert_eq!(clock.remaining_time(), millis(299_950));

    advance(&control, millis(50)).await;
    assert_eq!(clock.white_time(), millis(299_900));
    Ok(())
}

#[tokio::test]
async fn play_hands_over_with_increment() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 3, 2)?;
    assert_eq!(clock.white_time(), secs(182));

    clock.start();
    advance(&control, secs(10)).await;
    clock.play();

    assert_eq!(clock.white_time(), secs(174));
    assert_eq!(clock.black_time(), secs(182));
    assert_eq!(clock.player(), Player::Black);
    assert_eq!(clock.state(), ClockState::Ticking);

    advance(&control, secs(4)).await;
    clock.play();

    assert_eq!(clock.black_time(), secs(180));
    assert_eq!(clock.player(), Player::White);
    Ok(())
}

#[tokio::test]
async fn play_without_increment_matches_elapsed_time() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    clock.start();
    advance(&control, secs(10)).await;
    clock.play();

    let snapshot = clock.snapshot();
    assert_eq!(snapshot.white_time, secs(290));
    assert_eq!(snapshot.black_time, secs(300));
    assert_eq!(snapshot.player, Player::Black);
    Ok(())
}

#[tokio::test]
async fn pause_and_resume_preserve_time() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    clock.start();
    advance(&control, millis(10_250)).await;
    clock.pause();
    assert_eq!(clock.state(), ClockState::Paused);
    assert_eq!(clock.white_time(), millis(289_750));

    advance(&control, secs(60)).await;
    assert_eq!(clock.white_time(), millis(289_750));

    clock.start();
    assert_eq!(clock.state(), ClockState::Ticking);
    assert_eq!(clock.remaining_time(), millis(289_750));

    advance(&control, secs(1)).await;
    assert_eq!(clock.remaining_time(), millis(288_750));
    Ok(())
}

#[tokio::test]
async fn paused_clock_ignores_time_passing() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    clock.start();
    settle().await;
    clock.pause();
    advance(&control, secs(3_600)).await;

    assert_eq!(clock.state(), ClockState::Paused);
    assert_eq!(clock.white_time(), secs(300));
    Ok(())
}

#[tokio::test]
async fn double_start_finishes_once() -> TestResult {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let control = ClockControl::new();
    let clock = new_clock(&control, 1, 0)?;

    clock.start();
    settle().await;
    advance(&control, secs(5)).await;
    clock.start();
    settle().await;
    assert_eq!(clock.remaining_time(), secs(55));

    advance(&control, secs(120)).await;

    assert_eq!(clock.state(), ClockState::Finished);
    assert_eq!(clock.white_time(), Duration::ZERO);
    assert_eq!(capture.count("clock.finished"), 1, "{}", capture.output());
    Ok(())
}

#[tokio::test]
async fn play_after_deadline_finishes_instead_of_switching() -> TestResult {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let control = ClockControl::new();
    let clock = new_clock(&control, 1, 5)?;

    clock.start();
    // The tick loop has not observed the deadline yet.
    control.advance(secs(66));
    clock.play();

    assert_eq!(clock.state(), ClockState::Finished);
    assert_eq!(clock.player(), Player::White);
    assert_eq!(clock.white_time(), Duration::ZERO);

    settle().await;
    assert_eq!(capture.count("clock.finished"), 1, "{}", capture.output());
    Ok(())
}

#[tokio::test]
async fn pause_after_deadline_finishes() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 1, 0)?;

    clock.start();
    control.advance(secs(61));
    clock.pause();

    assert_eq!(clock.state(), ClockState::Finished);
    assert_eq!(clock.white_time(), Duration::ZERO);
    Ok(())
}

#[tokio::test]
async fn finished_clock_rejects_start() -> TestResult {
    let capture = LogCapture::new();
    let _guard = tracing::subscriber::set_default(capture.subscriber());

    let control = ClockControl::new();
    let clock = new_clock(&control, 0, 1)?;

    clock.start();
    advance(&control, secs(2)).await;
    assert_eq!(clock.state(), ClockState::Finished);

    clock.start();
    advance(&control, secs(2)).await;

    assert_eq!(clock.state(), ClockState::Finished);
    assert_eq!(clock.white_time(), Duration::ZERO);
    capture.assert_contains("clock.command_rejected");
    Ok(())
}

#[tokio::test]
async fn play_and_pause_ignored_outside_ticking() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 3)?;

    clock.play();
    clock.pause();

    let snapshot = clock.snapshot();
    assert_eq!(snapshot.state, ClockState::FullReset);
    assert_eq!(snapshot.player, Player::White);
    assert_eq!(snapshot.white_time, secs(303));
    assert_eq!(snapshot.black_time, secs(303));
    Ok(())
}

#[tokio::test]
async fn reset_time_from_any_state() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 1, 0)?;

    clock.start();
    advance(&control, secs(10)).await;
    clock.play();
    advance(&control, secs(70)).await;
    assert_eq!(clock.state(), ClockState::Finished);

    clock.reset_time();
    let snapshot = clock.snapshot();
    assert_eq!(snapshot.state, ClockState::SoftReset);
    assert_eq!(snapshot.player, Player::White);
    assert_eq!(snapshot.white_time, secs(60));
    assert_eq!(snapshot.black_time, secs(60));

    clock.start();
    clock.reset_time();
    advance(&control, secs(600)).await;
    assert_eq!(clock.state(), ClockState::SoftReset);
    assert_eq!(clock.white_time(), secs(60));
    Ok(())
}

#[tokio::test]
async fn reset_conf_restores_construction_defaults() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 10, 5)?;

    clock.save_conf();
    clock.restore_saved_conf(5.0, 0.0);
    assert_eq!(clock.time_control().duration_minutes(), 15);
    assert_eq!(clock.state(), ClockState::SoftReset);

    clock.start();
    advance(&control, secs(30)).await;
    clock.reset_conf();

    let snapshot = clock.snapshot();
    assert_eq!(snapshot.state, ClockState::FullReset);
    assert_eq!(clock.time_control(), clock.default_time_control());
    assert_eq!(snapshot.white_time, secs(605));
    assert_eq!(snapshot.black_time, secs(605));
    Ok(())
}

#[tokio::test]
async fn watchers_see_changes() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    let mut state = clock.watch_state();
    let mut white = clock.watch_white_time();
    let mut black = clock.watch_black_time();
    let mut player = clock.watch_player();

    clock.start();
    settle().await;
    assert!(state.has_changed().unwrap());
    assert_eq!(*state.borrow_and_update(), ClockState::Ticking);
    assert!(!white.has_changed().unwrap());

    advance(&control, secs(1)).await;
    assert!(white.has_changed().unwrap());
    assert_eq!(*white.borrow_and_update(), secs(299));
    assert!(!black.has_changed().unwrap());

    clock.play();
    assert!(player.has_changed().unwrap());
    assert_eq!(*player.borrow_and_update(), Player::Black);
    assert!(!state.has_changed().unwrap());
    Ok(())
}

#[tokio::test]
async fn clones_share_state() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;
    let other = clock.clone();

    clock.start();
    advance(&control, secs(3)).await;
    other.pause();

    assert_eq!(clock.state(), ClockState::Paused);
    assert_eq!(clock.white_time(), secs(297));
    Ok(())
}

#[tokio::test]
async fn commands_from_other_threads() -> TestResult {
    let control = ClockControl::new();
    let clock = new_clock(&control, 5, 0)?;

    clock.start();
    advance(&control, secs(2)).await;

    let remote = clock.clone();
    std::thread::spawn(move || remote.play()).join().unwrap();

    assert_eq!(clock.player(), Player::Black);
    assert_eq!(clock.white_time(), secs(298));
    Ok(())
}
