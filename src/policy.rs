//! Who may see, change and call what.

use crate::domain::{Order, OrderStatus, User, UserRole};

/// Roles an operation accepts. Declared next to each request operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedRoles {
    Any,
    Only(&'static [UserRole]),
}

pub const ANY: AllowedRoles = AllowedRoles::Any;
pub const CLIENT_ONLY: AllowedRoles = AllowedRoles::Only(&[UserRole::Client]);
pub const OWNER_ONLY: AllowedRoles = AllowedRoles::Only(&[UserRole::Owner]);
pub const DELIVERY_ONLY: AllowedRoles = AllowedRoles::Only(&[UserRole::Delivery]);

pub fn is_permitted(required: AllowedRoles, caller: UserRole) -> bool {
    match required {
        AllowedRoles::Any => true,
        AllowedRoles::Only(roles) => roles.contains(&caller),
    }
}

/// Clients see their own orders, drivers the orders they took and owners
/// the orders placed at their restaurants.
pub fn can_view(user: &User, order: &Order) -> bool {
    match user.role {
        UserRole::Client => order.customer_id == user.id,
        UserRole::Delivery => order.driver_id == Some(user.id),
        UserRole::Owner => order.owner_id == user.id,
    }
}

/// Statuses a role may set. The current status is not consulted, so an
/// owner may go straight to `Cooked` and a driver straight to `Delivered`.
pub fn can_edit_to(role: UserRole, _current: OrderStatus, new: OrderStatus) -> bool {
    match role {
        UserRole::Client => false,
        UserRole::Owner => matches!(new, OrderStatus::Cooking | OrderStatus::Cooked),
        UserRole::Delivery => matches!(new, OrderStatus::PickedUp | OrderStatus::Delivered),
    }
}
