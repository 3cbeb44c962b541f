//! Typed handles over the resource stores. Each client owns the domain rules
//! of its entity and translates store failures into domain errors.

#[macro_use]
mod macros;

mod dish_client;
mod order_client;
mod payment_client;
mod restaurant_client;
mod user_client;

pub use dish_client::*;
pub use order_client::*;
pub use payment_client::*;
pub use restaurant_client::*;
pub use user_client::*;
