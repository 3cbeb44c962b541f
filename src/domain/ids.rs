use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Declares a type-safe numeric identifier displayed as `<prefix>_<n>`.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

typed_id!(
    /// Type-safe identifier for users of any role.
    UserId,
    "user"
);
typed_id!(RestaurantId, "restaurant");
typed_id!(DishId, "dish");
typed_id!(
    /// Type-safe identifier for Orders.
    OrderId,
    "order"
);
typed_id!(PaymentId, "payment");
typed_id!(VerificationId, "verification");
