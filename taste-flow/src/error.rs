use thiserror::Error;

use crate::{step::Step, wizard::Input};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// The input is not offered by the step the session is on.
    #[error("{input} is not accepted while on step {step}")]
    InvalidTransition { step: Step, input: String },

    #[error("Session has been closed")]
    SessionClosed,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlowError {
    pub(crate) fn invalid(step: Step, input: &Input) -> Self {
        FlowError::InvalidTransition {
            step,
            input: input.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
