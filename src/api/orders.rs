use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::guard;
use crate::auth::AccessDenied;
use crate::clients::OrderClient;
use crate::domain::{DishId, Order, OrderId, OrderItemCreate, OrderItemOption, OrderStatus, RestaurantId, User};
use crate::envelope::Envelope;
use crate::events::{OrderFeeds, OrderStream};
use crate::policy::{ANY, CLIENT_ONLY, DELIVERY_ONLY, OWNER_ONLY};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemInput {
    pub dish_id: DishId,
    #[serde(default)]
    pub options: Vec<OrderItemOption>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub restaurant_id: RestaurantId,
    pub items: Vec<CreateOrderItemInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderOutput {
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetOrdersInput {
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetOrdersOutput {
    pub orders: Vec<Order>,
}

/// Input of every operation addressing a single order.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderInput {
    pub id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetOrderOutput {
    pub order: Order,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EditOrderInput {
    pub id: OrderId,
    pub status: OrderStatus,
}

/// Order queries, mutations and subscriptions.
#[derive(Clone)]
pub struct OrderResolver {
    orders: OrderClient,
    feeds: OrderFeeds,
}

impl OrderResolver {
    pub fn new(orders: OrderClient, feeds: OrderFeeds) -> Self {
        Self { orders, feeds }
    }

    #[instrument(skip_all, fields(caller = %caller.id))]
    pub async fn create_order(
        &self,
        caller: &User,
        input: CreateOrderInput,
    ) -> Result<Envelope<CreateOrderOutput>, AccessDenied> {
        guard(CLIENT_ONLY, caller)?;
        let items = input
            .items
            .into_iter()
            .map(|item| OrderItemCreate {
                dish_id: item.dish_id,
                options: item.options,
            })
            .collect();
        let result = self.orders.create_order(caller, input.restaurant_id, items).await;
        Ok(result.map(|order_id| CreateOrderOutput { order_id }).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn get_orders(
        &self,
        caller: &User,
        input: GetOrdersInput,
    ) -> Result<Envelope<GetOrdersOutput>, AccessDenied> {
        guard(ANY, caller)?;
        let result = self.orders.get_orders(caller, input.status).await;
        Ok(result.map(|orders| GetOrdersOutput { orders }).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn get_order(&self, caller: &User, input: OrderInput) -> Result<Envelope<GetOrderOutput>, AccessDenied> {
        guard(ANY, caller)?;
        let result = self.orders.get_order(caller, input.id).await;
        Ok(result.map(|order| GetOrderOutput { order }).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn edit_order(&self, caller: &User, input: EditOrderInput) -> Result<Envelope<()>, AccessDenied> {
        guard(ANY, caller)?;
        let result = self.orders.edit_order(caller, input.id, input.status).await;
        Ok(result.map(|_| ()).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn take_order(&self, caller: &User, input: OrderInput) -> Result<Envelope<()>, AccessDenied> {
        guard(DELIVERY_ONLY, caller)?;
        let result = self.orders.take_order(caller, input.id).await;
        Ok(result.map(|_| ()).into())
    }

    pub fn pending_orders(&self, caller: &User) -> Result<OrderStream, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        Ok(self.feeds.pending_orders(caller.id))
    }

    pub fn cooked_orders(&self, caller: &User) -> Result<OrderStream, AccessDenied> {
        guard(DELIVERY_ONLY, caller)?;
        Ok(self.feeds.cooked_orders())
    }

    pub fn order_updates(&self, caller: &User, input: OrderInput) -> Result<OrderStream, AccessDenied> {
        guard(ANY, caller)?;
        Ok(self.feeds.order_updates(caller.id, input.id))
    }
}
