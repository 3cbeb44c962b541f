//! Order storage: the entity hooks, the atomic status/driver actions and the order error type.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
