//! Controller error types

use thiserror::Error;

use crate::form::Validation;

/// Carousel misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// A carousel needs at least one item
    #[error("carousel requires at least one item")]
    EmptyCollection,

    /// Jump target outside `[0, len)`
    #[error("index {index} out of range for {len} items")]
    OutOfRange { index: isize, len: usize },
}

/// Per-field validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is blank after trimming
    #[error("{0}")]
    Required(String),

    /// Field is present but malformed
    #[error("{0}")]
    Format(String),
}

impl ValidationError {
    /// The user-facing message
    pub fn message(&self) -> &str {
        match self {
            ValidationError::Required(msg) | ValidationError::Format(msg) => msg,
        }
    }
}

/// Failure reported by the mail relay
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The relay answered but refused the message
    #[error("relay rejected message ({status}): {text}")]
    Rejected { status: u16, text: String },

    /// The relay could not be reached
    #[error("relay transport failed: {0}")]
    Transport(String),
}

/// Contact submission failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Fields failed validation; the relay was not called
    #[error("form is invalid ({} field errors)", .0.errors.len())]
    Invalid(Validation),

    /// A submission is already in flight
    #[error("a submission is already in progress")]
    InFlight,

    /// `finish_submit` without a matching `begin_submit`
    #[error("no submission in progress")]
    NotSubmitting,

    /// The relay call failed; the form is in the error state
    #[error(transparent)]
    Relay(#[from] RelayError),
}
