use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::api::{AccountResolver, OrderResolver, PaymentResolver, RestaurantResolver};
use crate::auth::{AccessDenied, TokenVerifier};
use crate::clients::{DishClient, OrderClient, PaymentClient, RestaurantClient, UserClient};
use crate::config::AppConfig;
use crate::domain::{
    Dish, DishId, Order, OrderId, Payment, PaymentId, Restaurant, RestaurantId, User, UserId, Verification,
    VerificationId,
};
use crate::events::{EventBus, OrderFeeds};
use crate::mailer::Mailer;

/// The main application system that orchestrates all actors.
///
/// Starts one store per entity, wires the clients and resolvers on top of
/// them and owns the event bus shared by publishers and feeds.
pub struct DeliverySystem {
    pub accounts: AccountResolver,
    pub restaurants: RestaurantResolver,
    pub orders: OrderResolver,
    pub payments: PaymentResolver,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    tokens: Arc<dyn TokenVerifier>,
    events: EventBus,
    handles: Vec<JoinHandle<()>>,
}

/// Spawns a store whose ids count up from 1.
fn spawn_store<T, F>(capacity: usize, make_id: F) -> (ResourceClient<T>, JoinHandle<()>)
where
    T: Entity,
    F: Fn(u64) -> T::Id + Send + Sync + 'static,
{
    let counter = AtomicU64::new(1);
    let next_id = move || make_id(counter.fetch_add(1, Ordering::SeqCst));
    let (actor, client) = ResourceActor::<T>::new(capacity, next_id);
    (client, tokio::spawn(actor.run()))
}

impl DeliverySystem {
    pub fn new(config: &AppConfig, mailer: Arc<dyn Mailer>, tokens: Arc<dyn TokenVerifier>) -> Self {
        let capacity = config.mailbox_capacity;

        let (users, user_handle) = spawn_store::<User, _>(capacity, UserId);
        let (verifications, verification_handle) = spawn_store::<Verification, _>(capacity, VerificationId);
        let (restaurants, restaurant_handle) = spawn_store::<Restaurant, _>(capacity, RestaurantId);
        let (dishes, dish_handle) = spawn_store::<Dish, _>(capacity, DishId);
        let (orders, order_handle) = spawn_store::<Order, _>(capacity, OrderId);
        let (payments, payment_handle) = spawn_store::<Payment, _>(capacity, PaymentId);

        let events = EventBus::new(config.event_capacity);

        let user_client = UserClient::new(users, verifications, mailer);
        let restaurant_client = RestaurantClient::new(restaurants);
        let dish_client = DishClient::new(dishes, restaurant_client.clone());
        let order_client = OrderClient::new(orders, restaurant_client.clone(), dish_client.clone(), events.clone());
        let payment_client = PaymentClient::new(payments, restaurant_client.clone(), config.promotion_days);

        info!(capacity, event_capacity = config.event_capacity, "Delivery system started");

        Self {
            accounts: AccountResolver::new(user_client.clone()),
            restaurants: RestaurantResolver::new(restaurant_client, dish_client),
            orders: OrderResolver::new(order_client.clone(), OrderFeeds::new(events.clone())),
            payments: PaymentResolver::new(payment_client),
            user_client,
            order_client,
            tokens,
            events,
            handles: vec![
                user_handle,
                verification_handle,
                restaurant_handle,
                dish_handle,
                order_handle,
                payment_handle,
            ],
        }
    }

    /// Resolves a bearer token to the calling user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AccessDenied> {
        let Some(user_id) = self.tokens.verify(token).await else {
            warn!("Unknown token");
            return Err(AccessDenied);
        };
        match self.user_client.get_user(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!(%user_id, "Token owner no longer exists");
                Err(AccessDenied)
            }
            Err(e) => {
                error!(error = %e, "Caller lookup failed");
                Err(AccessDenied)
            }
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Drops every client handle, which closes the store mailboxes and ends
    /// open feeds, then waits for the store tasks to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        let Self {
            accounts,
            restaurants,
            orders,
            payments,
            user_client,
            order_client,
            tokens,
            events,
            handles,
        } = self;
        drop((accounts, restaurants, orders, payments, user_client, order_client, tokens, events));

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(format!("Actor task failed: {e}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
