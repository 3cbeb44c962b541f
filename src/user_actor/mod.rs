//! User storage and the pending email verifications that belong to users.

mod actions;
pub mod entity;
pub mod error;
pub mod verification;

pub use actions::*;
pub use error::*;
