use crate::domain::{Order, OrderStatus, UserId};

/// Atomic operations on a stored order.
///
/// Each action runs inside the order actor, so the read and the write of an
/// action can never interleave with another request on the same order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Overwrites the status. Authorization happens before the action is sent.
    SetStatus(OrderStatus),
    /// Assigns a driver unless one is already set.
    AssignDriver(UserId),
}

#[derive(Debug, Clone)]
pub enum OrderActionResult {
    /// The action was applied; carries the order after the change.
    Updated(Order),
    /// `AssignDriver` lost: the order keeps this driver.
    DriverAlreadyAssigned(UserId),
}
