use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::{DishClient, RestaurantClient};
use crate::domain::{Order, OrderCreate, OrderId, OrderItemCreate, OrderStatus, RestaurantId, User, UserRole};
use crate::events::{EventBus, OrderEvent};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::policy::{can_edit_to, can_view};
use crate::pricing::{item_price, order_total};

/// Client for the Order actor and home of the order lifecycle.
///
/// Validates restaurants and dishes through their clients before anything is
/// stored, and publishes lifecycle events once a change is persisted.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    restaurants: RestaurantClient,
    dishes: DishClient,
    events: EventBus,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        restaurants: RestaurantClient,
        dishes: DishClient,
        events: EventBus,
    ) -> Self {
        Self {
            inner,
            restaurants,
            dishes,
            events,
        }
    }

    /// Prices and stores a new `Pending` order, then notifies the restaurant owner.
    ///
    /// Every lookup and the checked pricing happen before the single store
    /// request, so a missing restaurant or dish or an overflowing total
    /// leaves nothing behind.
    #[instrument(skip(self, customer, items), fields(customer_id = %customer.id, items = items.len()))]
    pub async fn create_order(
        &self,
        customer: &User,
        restaurant_id: RestaurantId,
        items: Vec<OrderItemCreate>,
    ) -> Result<OrderId, OrderError> {
        info!("Processing create_order request");

        let restaurant = self
            .restaurants
            .get_restaurant(restaurant_id)
            .await
            .map_err(|e| OrderError::internal("create order", e))?
            .ok_or(OrderError::RestaurantNotFound)?;

        let mut prices = Vec::with_capacity(items.len());
        for item in &items {
            let dish = self
                .dishes
                .get_dish(item.dish_id)
                .await
                .map_err(|e| OrderError::internal("create order", e))?
                .ok_or_else(|| {
                    warn!(dish_id = %item.dish_id, "Dish not found");
                    OrderError::DishNotFound
                })?;
            let price = item_price(&dish, &item.options).map_err(|e| {
                warn!(dish_id = %dish.id, error = %e, "Item price overflows");
                OrderError::TotalOutOfRange
            })?;
            prices.push(price);
        }
        let total = order_total(prices).map_err(|e| {
            warn!(error = %e, "Order total overflows");
            OrderError::TotalOutOfRange
        })?;

        debug!("Sending request");
        let order = self
            .inner
            .create(OrderCreate {
                customer_id: customer.id,
                restaurant_id,
                owner_id: restaurant.owner_id,
                items,
                total,
            })
            .await
            .map_err(|e| OrderError::internal("create order", e))?;

        info!(order_id = %order.id, total, "Order created");
        let order_id = order.id;
        self.events.publish(OrderEvent::PendingOrder {
            order,
            owner_id: restaurant.owner_id,
        });
        Ok(order_id)
    }

    /// Orders the user takes part in, by id, optionally narrowed to one status.
    #[instrument(skip(self, user), fields(user_id = %user.id, role = ?user.role))]
    pub async fn get_orders(&self, user: &User, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        let user_id = user.id;
        let matches_status = move |order: &Order| status.map_or(true, |s| order.status == s);

        debug!("Sending request");
        let listed = match user.role {
            UserRole::Client => {
                self.inner
                    .list(move |o: &Order| o.customer_id == user_id && matches_status(o))
                    .await
            }
            UserRole::Delivery => {
                self.inner
                    .list(move |o: &Order| o.driver_id == Some(user_id) && matches_status(o))
                    .await
            }
            UserRole::Owner => {
                let owned: HashSet<RestaurantId> = self
                    .restaurants
                    .owned_by(user_id)
                    .await
                    .map_err(|e| OrderError::internal("get orders", e))?
                    .into_iter()
                    .map(|r| r.id)
                    .collect();
                self.inner
                    .list(move |o: &Order| owned.contains(&o.restaurant_id) && matches_status(o))
                    .await
            }
        };

        let mut orders = listed.map_err(|e| OrderError::internal("get orders", e))?;
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn get_order(&self, user: &User, id: OrderId) -> Result<Order, OrderError> {
        let order = self.load(id, "get order").await?;
        if !can_view(user, &order) {
            warn!("Order hidden from caller");
            return Err(OrderError::CannotView);
        }
        Ok(order)
    }

    /// Moves an order to `status` when the caller may see it and set that status.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn edit_order(&self, user: &User, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        let current = self.load(id, "edit order").await?;
        if !can_view(user, &current) || !can_edit_to(user.role, current.status, status) {
            warn!(current = %current.status, "Status change refused");
            return Err(OrderError::NotAllowed);
        }

        debug!("Sending request");
        let order = match self.act(id, OrderAction::SetStatus(status), "edit order").await? {
            OrderActionResult::Updated(order) => order,
            OrderActionResult::DriverAlreadyAssigned(_) => return Err(OrderError::Internal("edit order")),
        };
        info!(from = %current.status, to = %status, "Order status changed");

        if status == OrderStatus::Cooked {
            self.events.publish(OrderEvent::CookedOrder(order.clone()));
        }
        self.events.publish(OrderEvent::OrderUpdate(order.clone()));
        Ok(order)
    }

    /// Assigns the calling driver to an order that has none.
    ///
    /// The check and the assignment run as one store action, so of two
    /// concurrent takes exactly one wins.
    #[instrument(skip(self, driver), fields(driver_id = %driver.id))]
    pub async fn take_order(&self, driver: &User, id: OrderId) -> Result<Order, OrderError> {
        debug!("Sending request");
        match self.act(id, OrderAction::AssignDriver(driver.id), "update order").await? {
            OrderActionResult::Updated(order) => {
                info!("Order taken");
                self.events.publish(OrderEvent::OrderUpdate(order.clone()));
                Ok(order)
            }
            OrderActionResult::DriverAlreadyAssigned(existing) => {
                warn!(%existing, "Order already has a driver");
                Err(OrderError::DriverAlreadyAssigned)
            }
        }
    }

    async fn load(&self, id: OrderId, action: &'static str) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .get(id)
            .await
            .map_err(|e| OrderError::internal(action, e))?
            .ok_or(OrderError::OrderNotFound)
    }

    async fn act(
        &self,
        id: OrderId,
        order_action: OrderAction,
        action: &'static str,
    ) -> Result<OrderActionResult, OrderError> {
        self.inner.perform_action(id, order_action).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => OrderError::OrderNotFound,
            e => OrderError::internal(action, e),
        })
    }
}
