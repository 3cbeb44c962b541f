use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{DishId, OrderId, Price, RestaurantId, UserId};

/// Lifecycle of an order. `Pending` on creation, `Delivered` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Cooking,
    Cooked,
    PickedUp,
    Delivered,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Snapshot of an option chosen at order time. Decoupled from the dish
/// catalog so later menu edits never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
}

impl OrderItemOption {
    pub fn new(name: impl Into<String>, choice: Option<&str>) -> Self {
        Self {
            name: name.into(),
            choice: choice.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// 1-based line number within the parent order.
    pub id: u32,
    pub dish_id: DishId,
    pub options: Vec<OrderItemOption>,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    /// Owner of the restaurant when the order was placed.
    pub owner_id: UserId,
    pub driver_id: Option<UserId>,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line of an order before it is stored.
#[derive(Debug, Clone)]
pub struct OrderItemCreate {
    pub dish_id: DishId,
    pub options: Vec<OrderItemOption>,
}

/// Payload for creating a new order. The total is priced by the caller.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub owner_id: UserId,
    pub items: Vec<OrderItemCreate>,
    pub total: Price,
}
