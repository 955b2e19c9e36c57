// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events emitted by the clock.

use crate::ClockSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClockEvent {
    Started,
    Switched,
    Paused,
    Reset,
    Saved,
    Adjusted,
    AdjustmentRejected,
    Tick,
    Finished,
    CommandRejected,
}

impl ClockEvent {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "clock.started",
            Self::Switched => "clock.switched",
            Self::Paused => "clock.paused",
            Self::Reset => "clock.reset",
            Self::Saved => "clock.saved",
            Self::Adjusted => "clock.adjusted",
            Self::AdjustmentRejected => "clock.adjustment_rejected",
            Self::Tick => "clock.tick",
            Self::Finished => "clock.finished",
            Self::CommandRejected => "clock.command_rejected",
        }
    }

    pub(crate) const fn severity(self) -> Severity {
        match self {
            Self::Tick => Severity::Trace,
            Self::Finished => Severity::Info,
            Self::CommandRejected => Severity::Warn,
            Self::Started | Self::Switched | Self::Paused | Self::Reset | Self::Saved | Self::Adjusted | Self::AdjustmentRejected => {
                Severity::Debug
            }
        }
    }
}

pub(crate) fn emit(event: ClockEvent, command: &'static str, snapshot: &ClockSnapshot) {
    let ev = event.as_str();
    let state = snapshot.state.as_str();
    let player = snapshot.player.as_str();
    let remaining_ms = u64::try_from(snapshot.current_time().as_millis()).unwrap_or(u64::MAX);

    // Tracing level must be constant, so a macro selects it.
    macro_rules! emit_event {
        ($level:ident) => {
            tracing::$level!(
                clock.command = command,
                clock.state = state,
                clock.player = player,
                clock.remaining_ms = remaining_ms,
                "{ev}"
            )
        };
    }

    match event.severity() {
        Severity::Trace => emit_event!(trace),
        Severity::Debug => emit_event!(debug),
        Severity::Info => emit_event!(info),
        Severity::Warn => emit_event!(warn),
    }
}
