use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::error::{Classify, ErrorKind};

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found")]
    NotFound,
    #[error("There is a user with that email already")]
    EmailTaken,
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Verification not found")]
    VerificationNotFound,
    #[error("Could not {0}")]
    Internal(&'static str),
}

impl UserError {
    pub fn internal(action: &'static str, cause: impl Display) -> Self {
        error!(error = %cause, action, "User operation failed");
        Self::Internal(action)
    }
}

impl Classify for UserError {
    fn kind(&self) -> ErrorKind {
        match self {
            UserError::NotFound | UserError::VerificationNotFound => ErrorKind::NotFound,
            UserError::EmailTaken => ErrorKind::Conflict,
            UserError::InvalidEmail(_) => ErrorKind::Validation,
            UserError::Internal(_) => ErrorKind::Internal,
        }
    }
}
