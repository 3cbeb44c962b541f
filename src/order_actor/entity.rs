use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId, OrderItem, OrderStatus};

impl Entity for Order {
    type Id = OrderId;
    type CreateParams = OrderCreate;
    type UpdateParams = (); // Orders change only through actions
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates the order together with all of its items.
    ///
    /// # Notes
    /// The order starts `Pending` and the total is taken as priced by the caller.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, String> {
        let now = Utc::now();
        let items = params
            .items
            .into_iter()
            .zip(1..)
            .map(|(item, line)| OrderItem {
                id: line,
                dish_id: item.dish_id,
                options: item.options,
            })
            .collect();

        Ok(Self {
            id,
            customer_id: params.customer_id,
            restaurant_id: params.restaurant_id,
            owner_id: params.owner_id,
            driver_id: None,
            items,
            total: params.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, _update: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::SetStatus(status) => {
                self.status = status;
            }
            OrderAction::AssignDriver(driver_id) => {
                if let Some(existing) = self.driver_id {
                    return Ok(OrderActionResult::DriverAlreadyAssigned(existing));
                }
                self.driver_id = Some(driver_id);
            }
        }
        self.updated_at = Utc::now();
        Ok(OrderActionResult::Updated(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DishId, OrderItemCreate, OrderItemOption, RestaurantId, UserId};

    fn pending_order() -> Order {
        let params = OrderCreate {
            customer_id: UserId(1),
            restaurant_id: RestaurantId(1),
            owner_id: UserId(2),
            items: vec![
                OrderItemCreate {
                    dish_id: DishId(10),
                    options: vec![OrderItemOption::new("Size", Some("Large"))],
                },
                OrderItemCreate {
                    dish_id: DishId(11),
                    options: vec![],
                },
            ],
            total: 21,
        };
        Order::from_create_params(OrderId(1), params).unwrap()
    }

    #[test]
    fn test_created_order_is_pending_with_numbered_items() {
        let order = pending_order();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 21);
        assert_eq!(order.driver_id, None);
        assert_eq!(order.items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(order.items[0].options[0].choice.as_deref(), Some("Large"));
    }

    #[test]
    fn test_set_status_keeps_other_fields() {
        let mut order = pending_order();
        let before = order.clone();

        let result = order.handle_action(OrderAction::SetStatus(OrderStatus::Cooking)).unwrap();

        let OrderActionResult::Updated(updated) = result else {
            panic!("expected Updated");
        };
        assert_eq!(updated.status, OrderStatus::Cooking);
        assert_eq!(updated.total, before.total);
        assert_eq!(updated.items, before.items);
        assert_eq!(updated.created_at, before.created_at);
    }

    #[test]
    fn test_assign_driver_only_once() {
        let mut order = pending_order();

        let first = order.handle_action(OrderAction::AssignDriver(UserId(7))).unwrap();
        assert!(matches!(first, OrderActionResult::Updated(ref o) if o.driver_id == Some(UserId(7))));

        let second = order.handle_action(OrderAction::AssignDriver(UserId(8))).unwrap();
        assert!(matches!(second, OrderActionResult::DriverAlreadyAssigned(UserId(7))));
        assert_eq!(order.driver_id, Some(UserId(7)));
    }
}
