//! Request operations: the envelope-returning entry points a transport layer
//! calls with an authenticated caller and a deserialized input.
//!
//! Every operation declares the roles it accepts. A caller outside them gets
//! [`AccessDenied`] before any store is touched.

mod accounts;
mod orders;
mod payments;
mod restaurants;

pub use accounts::*;
pub use orders::*;
pub use payments::*;
pub use restaurants::*;

use tracing::warn;

use crate::auth::AccessDenied;
use crate::domain::User;
use crate::policy::{is_permitted, AllowedRoles};

pub fn guard(required: AllowedRoles, caller: &User) -> Result<(), AccessDenied> {
    if is_permitted(required, caller.role) {
        Ok(())
    } else {
        warn!(caller = %caller.id, role = ?caller.role, ?required, "Role not allowed");
        Err(AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, UserRole};
    use crate::policy::{ANY, OWNER_ONLY};

    #[test]
    fn test_guard() {
        let client = User::new(UserId(1), "c@x.io", UserRole::Client);
        assert_eq!(guard(ANY, &client), Ok(()));
        assert_eq!(guard(OWNER_ONLY, &client), Err(AccessDenied));
    }
}
