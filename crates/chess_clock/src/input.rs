// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Translation of user gestures into adjustment deltas.
//!
//! Gesture recognition itself lives in the UI; this module only decides which
//! half of a value (minutes or seconds) a gesture edits and in which direction,
//! taking screen orientation, reading direction and device tilt into account.

/// A directional key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    /// Adds one minute.
    Up,
    /// Removes one minute.
    Down,
    /// Removes one second, or adds one in right-to-left layouts.
    Left,
    /// Adds one second, or removes one in right-to-left layouts.
    Right,
}

/// Screen orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Upright screen.
    #[default]
    Portrait,
    /// Horizontal and vertical gestures trade places.
    Landscape,
}

/// Reading direction of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutDirection {
    /// Left-to-right scripts.
    #[default]
    LeftToRight,
    /// Right-to-left scripts; horizontal second edits are mirrored.
    RightToLeft,
}

impl LayoutDirection {
    const fn sign(self) -> f64 {
        match self {
            Self::LeftToRight => 1.0,
            Self::RightToLeft => -1.0,
        }
    }
}

/// The side a device in landscape is tilted towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LeaningSide {
    /// Tilted left; landscape gestures are inverted.
    Left,
    /// Tilted right.
    #[default]
    Right,
}

impl LeaningSide {
    const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Layout in effect when a gesture was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputContext {
    /// Screen orientation.
    pub orientation: Orientation,
    /// Reading direction.
    pub layout_direction: LayoutDirection,
    /// Only consulted in [`Orientation::Landscape`].
    pub leaning_side: LeaningSide,
}

/// Minutes and seconds to add to a saved value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Deltas {
    /// Minutes to add; may be fractional or negative.
    pub minutes: f64,
    /// Seconds to add; may be fractional or negative.
    pub seconds: f64,
}

/// A gesture that edits a time or a time control.
///
/// Drag amounts are in pixels along the screen axis; `sensitivity` is the number of
/// minutes or seconds one pixel is worth.
///
/// # Examples
///
/// ```
/// use chess_clock::{AdjustmentInput, InputContext, LayoutDirection};
///
/// let drag = AdjustmentInput::HorizontalDrag { pixels: 40.0, sensitivity: 0.25 };
///
/// assert_eq!(drag.deltas(InputContext::default()).seconds, 10.0);
///
/// let rtl = InputContext {
///     layout_direction: LayoutDirection::RightToLeft,
///     ..InputContext::default()
/// };
/// assert_eq!(drag.deltas(rtl).seconds, -10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentInput {
    /// A directional key press, always one whole unit.
    Key(KeyDirection),
    /// A horizontal drag step.
    HorizontalDrag {
        /// Distance dragged; positive towards the right.
        pixels: f64,
        /// Units per pixel.
        sensitivity: f64,
    },
    /// A vertical drag step.
    VerticalDrag {
        /// Distance dragged; screen coordinates grow downwards, so dragging up is negative.
        pixels: f64,
        /// Units per pixel.
        sensitivity: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl AdjustmentInput {
    /// Resolves the gesture into minute and second deltas.
    #[must_use]
    pub fn deltas(self, context: InputContext) -> Deltas {
        match self {
            Self::Key(direction) => key_deltas(direction, context.layout_direction),
            Self::HorizontalDrag { pixels, sensitivity } => drag_deltas(Axis::Horizontal, pixels * sensitivity, context),
            Self::VerticalDrag { pixels, sensitivity } => drag_deltas(Axis::Vertical, pixels * sensitivity, context),
        }
    }

    /// Whether the resulting time keeps millisecond precision instead of snapping
    /// to whole seconds.
    #[must_use]
    pub const fn is_precise(&self) -> bool {
        !matches!(self, Self::Key(_))
    }
}

fn key_deltas(direction: KeyDirection, layout: LayoutDirection) -> Deltas {
    match direction {
        KeyDirection::Up => Deltas { minutes: 1.0, seconds: 0.0 },
        KeyDirection::Down => Deltas { minutes: -1.0, seconds: 0.0 },
        KeyDirection::Left => Deltas {
            minutes: 0.0,
            seconds: -layout.sign(),
        },
        KeyDirection::Right => Deltas {
            minutes: 0.0,
            seconds: layout.sign(),
        },
    }
}

fn drag_deltas(axis: Axis, amount: f64, context: InputContext) -> Deltas {
    let (axis, lean) = match context.orientation {
        Orientation::Portrait => (axis, 1.0),
        Orientation::Landscape => {
            let swapped = match axis {
                Axis::Horizontal => Axis::Vertical,
                Axis::Vertical => Axis::Horizontal,
            };
            (swapped, context.leaning_side.sign())
        }
    };

    match axis {
        Axis::Horizontal => Deltas {
            minutes: 0.0,
            seconds: amount * context.layout_direction.sign() * lean,
        },
        Axis::Vertical => Deltas {
            minutes: -amount * lean,
            seconds: 0.0,
        },
    }
}
