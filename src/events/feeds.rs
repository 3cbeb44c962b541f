use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, instrument, warn};

use super::{EventBus, OrderEvent, Topic};
use crate::domain::{Order, OrderId, UserId};

/// A live feed of order snapshots. Ends when the bus is dropped.
pub type OrderStream = BoxStream<'static, Order>;

/// Per-subscriber predicate applied before an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionFilter {
    /// New orders placed at restaurants owned by `owner`.
    PendingFor { owner: UserId },
    /// Every order that finished cooking.
    Cooked,
    /// Changes to `order_id`, only while `user` takes part in it.
    UpdatesFor { user: UserId, order_id: OrderId },
}

impl SubscriptionFilter {
    pub fn topic(&self) -> Topic {
        match self {
            SubscriptionFilter::PendingFor { .. } => Topic::NewPendingOrder,
            SubscriptionFilter::Cooked => Topic::NewCookedOrder,
            SubscriptionFilter::UpdatesFor { .. } => Topic::OrderStatusUpdate,
        }
    }

    /// Returns the order to deliver, or `None` when the event is not for this subscriber.
    pub fn accept(&self, event: OrderEvent) -> Option<Order> {
        match (self, event) {
            (SubscriptionFilter::PendingFor { owner }, OrderEvent::PendingOrder { order, owner_id }) => {
                (owner_id == *owner).then_some(order)
            }
            (SubscriptionFilter::Cooked, OrderEvent::CookedOrder(order)) => Some(order),
            (SubscriptionFilter::UpdatesFor { user, order_id }, OrderEvent::OrderUpdate(order)) => {
                let participant = order.customer_id == *user
                    || order.driver_id == Some(*user)
                    || order.owner_id == *user;
                (order.id == *order_id && participant).then_some(order)
            }
            _ => None,
        }
    }
}

/// Subscription side of the [`EventBus`].
#[derive(Clone)]
pub struct OrderFeeds {
    bus: EventBus,
}

impl OrderFeeds {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    #[instrument(skip(self))]
    pub fn pending_orders(&self, owner: UserId) -> OrderStream {
        self.subscribe(SubscriptionFilter::PendingFor { owner })
    }

    #[instrument(skip(self))]
    pub fn cooked_orders(&self) -> OrderStream {
        self.subscribe(SubscriptionFilter::Cooked)
    }

    #[instrument(skip(self))]
    pub fn order_updates(&self, user: UserId, order_id: OrderId) -> OrderStream {
        self.subscribe(SubscriptionFilter::UpdatesFor { user, order_id })
    }

    /// Registers a receiver now, so events published after this call are seen
    /// even if the stream is polled later.
    pub fn subscribe(&self, filter: SubscriptionFilter) -> OrderStream {
        debug!(?filter, "Subscribing to order feed");
        let receiver = self.bus.subscribe(filter.topic());
        filtered(receiver, filter)
    }
}

fn filtered(receiver: broadcast::Receiver<OrderEvent>, filter: SubscriptionFilter) -> OrderStream {
    stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(order) = filter.accept(event) {
                        return Some((order, receiver));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(?filter, skipped, "Order feed lagged, oldest events dropped");
                }
                Err(RecvError::Closed) => {
                    debug!(?filter, "Order feed closed");
                    return None;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, RestaurantId};
    use chrono::Utc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn order(id: u64, customer: u64, owner: u64, driver: Option<u64>) -> Order {
        Order {
            id: OrderId(id),
            customer_id: UserId(customer),
            restaurant_id: RestaurantId(1),
            owner_id: UserId(owner),
            driver_id: driver.map(UserId),
            items: vec![],
            total: 12,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn next(stream: &mut OrderStream) -> Option<Order> {
        timeout(Duration::from_millis(200), stream.next()).await.ok().flatten()
    }

    #[test]
    fn test_pending_filter_matches_owner_only() {
        let filter = SubscriptionFilter::PendingFor { owner: UserId(2) };
        let mine = OrderEvent::PendingOrder { order: order(1, 1, 2, None), owner_id: UserId(2) };
        let theirs = OrderEvent::PendingOrder { order: order(2, 1, 5, None), owner_id: UserId(5) };

        assert!(filter.accept(mine).is_some());
        assert!(filter.accept(theirs).is_none());
    }

    #[test]
    fn test_update_filter_requires_participant_and_order_id() {
        let update = |o: Order| OrderEvent::OrderUpdate(o);
        let for_customer = SubscriptionFilter::UpdatesFor { user: UserId(1), order_id: OrderId(7) };
        let for_driver = SubscriptionFilter::UpdatesFor { user: UserId(3), order_id: OrderId(7) };
        let for_owner = SubscriptionFilter::UpdatesFor { user: UserId(2), order_id: OrderId(7) };
        let stranger = SubscriptionFilter::UpdatesFor { user: UserId(9), order_id: OrderId(7) };

        assert!(for_customer.accept(update(order(7, 1, 2, Some(3)))).is_some());
        assert!(for_driver.accept(update(order(7, 1, 2, Some(3)))).is_some());
        assert!(for_owner.accept(update(order(7, 1, 2, Some(3)))).is_some());
        assert!(stranger.accept(update(order(7, 1, 2, Some(3)))).is_none());
        // Right participant, different order.
        assert!(for_customer.accept(update(order(8, 1, 2, Some(3)))).is_none());
    }

    #[test]
    fn test_filter_ignores_other_topics() {
        let cooked = SubscriptionFilter::Cooked;
        assert!(cooked.accept(OrderEvent::OrderUpdate(order(1, 1, 2, None))).is_none());
        assert!(cooked.accept(OrderEvent::CookedOrder(order(1, 1, 2, None))).is_some());
    }

    #[tokio::test]
    async fn test_feeds_deliver_filtered_snapshots() {
        let bus = EventBus::new(16);
        let feeds = OrderFeeds::new(bus.clone());
        let mut pending = feeds.pending_orders(UserId(2));
        let mut cooked = feeds.cooked_orders();

        bus.publish(OrderEvent::PendingOrder { order: order(1, 1, 5, None), owner_id: UserId(5) });
        bus.publish(OrderEvent::PendingOrder { order: order(2, 1, 2, None), owner_id: UserId(2) });
        bus.publish(OrderEvent::CookedOrder(order(2, 1, 2, None)));

        assert_eq!(next(&mut pending).await.map(|o| o.id), Some(OrderId(2)));
        assert_eq!(next(&mut cooked).await.map(|o| o.id), Some(OrderId(2)));
        assert_eq!(next(&mut pending).await, None);
    }

    #[tokio::test]
    async fn test_dropping_feed_deregisters_receiver() {
        let bus = EventBus::new(4);
        let feeds = OrderFeeds::new(bus.clone());

        let updates = feeds.order_updates(UserId(1), OrderId(1));
        assert_eq!(bus.subscriber_count(Topic::OrderStatusUpdate), 1);
        drop(updates);
        assert_eq!(bus.subscriber_count(Topic::OrderStatusUpdate), 0);
    }

    #[tokio::test]
    async fn test_feed_ends_when_bus_is_gone() {
        let bus = EventBus::new(4);
        let mut cooked = OrderFeeds::new(bus.clone()).cooked_orders();
        drop(bus);

        assert_eq!(next(&mut cooked).await, None);
    }

    #[tokio::test]
    async fn test_lagging_feed_skips_to_recent_events() {
        let bus = EventBus::new(2);
        let mut updates = OrderFeeds::new(bus.clone()).order_updates(UserId(1), OrderId(1));

        for _ in 0..5 {
            bus.publish(OrderEvent::OrderUpdate(order(1, 1, 2, None)));
        }

        assert!(next(&mut updates).await.is_some());
        assert!(next(&mut updates).await.is_some());
        assert_eq!(next(&mut updates).await, None);
    }
}
