use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::error::{Classify, ErrorKind};

/// Errors raised by restaurant and menu operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RestaurantError {
    #[error("Restaurant not found")]
    NotFound,
    #[error("Dish not found")]
    DishNotFound,
    #[error("You can't edit a restaurant that you don't own")]
    NotOwner,
    #[error("You can't delete a restaurant that you don't own")]
    CannotDelete,
    #[error("Category not found")]
    CategoryNotFound,
    #[error("You can't do that")]
    NotAllowed,
    #[error("Invalid dish: {0}")]
    InvalidDish(String),
    #[error("Could not {0}")]
    Internal(&'static str),
}

impl RestaurantError {
    pub fn internal(action: &'static str, cause: impl Display) -> Self {
        error!(error = %cause, action, "Restaurant operation failed");
        Self::Internal(action)
    }
}

impl Classify for RestaurantError {
    fn kind(&self) -> ErrorKind {
        match self {
            RestaurantError::NotFound | RestaurantError::DishNotFound | RestaurantError::CategoryNotFound => {
                ErrorKind::NotFound
            }
            RestaurantError::NotOwner | RestaurantError::CannotDelete | RestaurantError::NotAllowed => {
                ErrorKind::Forbidden
            }
            RestaurantError::InvalidDish(_) => ErrorKind::Validation,
            RestaurantError::Internal(_) => ErrorKind::Internal,
        }
    }
}
