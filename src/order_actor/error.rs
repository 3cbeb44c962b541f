use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::error::{Classify, ErrorKind};

/// Errors that can occur during order operations.
///
/// The display strings are what callers see in the envelope.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("Dish not found")]
    DishNotFound,
    #[error("Order not found")]
    OrderNotFound,
    #[error("You can't see that")]
    CannotView,
    #[error("You can't do that")]
    NotAllowed,
    #[error("This order already has a driver")]
    DriverAlreadyAssigned,
    #[error("Order total is out of range")]
    TotalOutOfRange,
    #[error("Could not {0}")]
    Internal(&'static str),
}

impl OrderError {
    /// Logs the underlying failure and hides it behind a generic message.
    pub fn internal(action: &'static str, cause: impl Display) -> Self {
        error!(error = %cause, action, "Order operation failed");
        Self::Internal(action)
    }
}

impl Classify for OrderError {
    fn kind(&self) -> ErrorKind {
        match self {
            OrderError::RestaurantNotFound | OrderError::DishNotFound | OrderError::OrderNotFound => {
                ErrorKind::NotFound
            }
            OrderError::CannotView | OrderError::NotAllowed => ErrorKind::Forbidden,
            OrderError::DriverAlreadyAssigned => ErrorKind::Conflict,
            OrderError::TotalOutOfRange => ErrorKind::Validation,
            OrderError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_envelope_contract() {
        assert_eq!(OrderError::RestaurantNotFound.to_string(), "Restaurant not found");
        assert_eq!(OrderError::DishNotFound.to_string(), "Dish not found");
        assert_eq!(
            OrderError::DriverAlreadyAssigned.to_string(),
            "This order already has a driver"
        );
        assert_eq!(OrderError::internal("edit order", "boom").to_string(), "Could not edit order");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(OrderError::OrderNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(OrderError::NotAllowed.kind(), ErrorKind::Forbidden);
        assert_eq!(OrderError::DriverAlreadyAssigned.kind(), ErrorKind::Conflict);
        assert_eq!(OrderError::TotalOutOfRange.kind(), ErrorKind::Validation);
        assert_eq!(OrderError::Internal("get order").kind(), ErrorKind::Internal);
    }
}
