//! Order lifecycle events and their delivery to subscribers.
//!
//! [`EventBus`] is constructed once by the system and handed to the order
//! client (publisher side) and to [`OrderFeeds`] (subscriber side).

pub mod bus;
pub mod feeds;

pub use bus::*;
pub use feeds::*;

use serde::Serialize;

use crate::domain::{Order, UserId};

/// The three logical topics orders are published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    NewPendingOrder,
    NewCookedOrder,
    OrderStatusUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", content = "payload", rename_all = "camelCase")]
pub enum OrderEvent {
    /// A customer placed an order; addressed to the restaurant owner.
    #[serde(rename_all = "camelCase")]
    PendingOrder { order: Order, owner_id: UserId },
    /// An owner finished cooking; addressed to drivers.
    CookedOrder(Order),
    /// Any change to an order; addressed to its participants.
    OrderUpdate(Order),
}

impl OrderEvent {
    pub fn topic(&self) -> Topic {
        match self {
            OrderEvent::PendingOrder { .. } => Topic::NewPendingOrder,
            OrderEvent::CookedOrder(_) => Topic::NewCookedOrder,
            OrderEvent::OrderUpdate(_) => Topic::OrderStatusUpdate,
        }
    }

    pub fn order(&self) -> &Order {
        match self {
            OrderEvent::PendingOrder { order, .. } => order,
            OrderEvent::CookedOrder(order) | OrderEvent::OrderUpdate(order) => order,
        }
    }
}
