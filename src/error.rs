use serde::Serialize;
use std::fmt::Display;

/// Coarse classification shared by every domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Conflict,
    Validation,
    Internal,
}

/// Implemented by domain errors so the envelope layer can treat them uniformly.
pub trait Classify: Display {
    fn kind(&self) -> ErrorKind;
}
