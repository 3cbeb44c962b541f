//! Restaurant storage, including the promotion action used by payments.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
