// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error type for building a clock.

/// An error raised while building a [`ChessClock`][crate::ChessClock].
///
/// Running clocks never fail; the only fallible step is validating the configuration
/// and locating a runtime in [`ChessClockBuilder::build`][crate::ChessClockBuilder::build].
/// The error is opaque; its display output carries the reason.
///
/// # Examples
///
/// ```
/// use chess_clock::Error;
///
/// let error = Error::from_message("tick period must be positive");
/// assert!(error.to_string().contains("tick period must be positive"));
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for clock construction.
pub type Result<T> = std::result::Result<T, Error>;
