use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::error::{Classify, ErrorKind};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("You are not allowed to do this")]
    NotAllowed,
    #[error("This transaction was already recorded")]
    DuplicateTransaction,
    #[error("Could not {0}")]
    Internal(&'static str),
}

impl PaymentError {
    pub fn internal(action: &'static str, cause: impl Display) -> Self {
        error!(error = %cause, action, "Payment operation failed");
        Self::Internal(action)
    }
}

impl Classify for PaymentError {
    fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::RestaurantNotFound => ErrorKind::NotFound,
            PaymentError::NotAllowed => ErrorKind::Forbidden,
            PaymentError::DuplicateTransaction => ErrorKind::Conflict,
            PaymentError::Internal(_) => ErrorKind::Internal,
        }
    }
}
