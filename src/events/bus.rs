use tokio::sync::broadcast;
use tracing::debug;

use super::{OrderEvent, Topic};

/// In-process publish/subscribe bridge with one broadcast channel per topic.
///
/// Publishing never waits: each channel keeps the last `capacity` events and
/// a subscriber that falls further behind loses the oldest ones. Events
/// published while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    pending: broadcast::Sender<OrderEvent>,
    cooked: broadcast::Sender<OrderEvent>,
    updates: broadcast::Sender<OrderEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (pending, _) = broadcast::channel(capacity);
        let (cooked, _) = broadcast::channel(capacity);
        let (updates, _) = broadcast::channel(capacity);
        Self {
            pending,
            cooked,
            updates,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<OrderEvent> {
        match topic {
            Topic::NewPendingOrder => &self.pending,
            Topic::NewCookedOrder => &self.cooked,
            Topic::OrderStatusUpdate => &self.updates,
        }
    }

    /// Publishes on the event's own topic and returns how many subscribers received it.
    pub fn publish(&self, event: OrderEvent) -> usize {
        let topic = event.topic();
        let order_id = event.order().id;
        match self.sender(topic).send(event) {
            Ok(receivers) => {
                debug!(?topic, %order_id, receivers, "Event published");
                receivers
            }
            Err(_) => {
                debug!(?topic, %order_id, "Event published with no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<OrderEvent> {
        self.sender(topic).subscribe()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderId, OrderStatus, RestaurantId, UserId};
    use chrono::Utc;

    fn order(id: u64) -> Order {
        Order {
            id: OrderId(id),
            customer_id: UserId(1),
            restaurant_id: RestaurantId(1),
            owner_id: UserId(2),
            driver_id: None,
            items: vec![],
            total: 10,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_events_route_to_their_topic() {
        let bus = EventBus::new(8);
        let mut cooked = bus.subscribe(Topic::NewCookedOrder);
        let mut updates = bus.subscribe(Topic::OrderStatusUpdate);

        let update = OrderEvent::OrderUpdate(order(1));
        let ready = OrderEvent::CookedOrder(order(2));
        assert_eq!(bus.publish(update.clone()), 1);
        assert_eq!(bus.publish(ready.clone()), 1);

        assert_eq!(updates.recv().await.unwrap(), update);
        assert_eq!(cooked.recv().await.unwrap(), ready);
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(OrderEvent::CookedOrder(order(1))), 0);

        // A late subscriber does not see earlier events.
        let mut late = bus.subscribe(Topic::NewCookedOrder);
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_slow_subscriber_loses_oldest_events() {
        let bus = EventBus::new(2);
        let mut slow = bus.subscribe(Topic::OrderStatusUpdate);

        for id in 1..=4 {
            bus.publish(OrderEvent::OrderUpdate(order(id)));
        }

        assert!(matches!(slow.recv().await, Err(broadcast::error::RecvError::Lagged(2))));
        assert_eq!(slow.recv().await.unwrap().order().id, OrderId(3));
        assert_eq!(slow.recv().await.unwrap().order().id, OrderId(4));
    }

    #[test]
    fn test_subscriber_count_tracks_receivers() {
        let bus = EventBus::new(4);
        let first = bus.subscribe(Topic::NewPendingOrder);
        let _second = bus.subscribe(Topic::NewPendingOrder);
        assert_eq!(bus.subscriber_count(Topic::NewPendingOrder), 2);
        drop(first);
        assert_eq!(bus.subscriber_count(Topic::NewPendingOrder), 1);
        assert_eq!(bus.subscriber_count(Topic::NewCookedOrder), 0);
    }
}
