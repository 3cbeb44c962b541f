pub mod category;
pub mod dish;
pub mod ids;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod user;
pub mod verification;

pub use category::*;
pub use dish::*;
pub use ids::*;
pub use order::*;
pub use payment::*;
pub use restaurant::*;
pub use user::*;
pub use verification::*;
