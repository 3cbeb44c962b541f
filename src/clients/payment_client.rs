use chrono::{Duration, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::RestaurantClient;
use crate::domain::{Payment, PaymentCreate, RestaurantId, UserId};
use crate::payment_actor::PaymentError;
use crate::restaurant_actor::RestaurantError;

/// Client for interacting with the Payment actor.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
    restaurants: RestaurantClient,
    promotion_days: i64,
}

impl PaymentClient {
    pub fn new(inner: ResourceClient<Payment>, restaurants: RestaurantClient, promotion_days: i64) -> Self {
        Self {
            inner,
            restaurants,
            promotion_days,
        }
    }

    /// Records a promotion payment and promotes the restaurant for the configured period.
    ///
    /// The promotion end is computed before anything is written. The payment
    /// is stored first so a duplicate transaction never promotes, and it is
    /// removed again when the promotion fails.
    #[instrument(skip(self))]
    pub async fn create_payment(
        &self,
        owner: UserId,
        transaction_id: String,
        restaurant_id: RestaurantId,
    ) -> Result<Payment, PaymentError> {
        let restaurant = self
            .restaurants
            .get_restaurant(restaurant_id)
            .await
            .map_err(|e| PaymentError::internal("create payment", e))?
            .ok_or(PaymentError::RestaurantNotFound)?;
        if restaurant.owner_id != owner {
            warn!("Payment refused, caller does not own the restaurant");
            return Err(PaymentError::NotAllowed);
        }

        let until = Duration::try_days(self.promotion_days)
            .and_then(|period| Utc::now().checked_add_signed(period))
            .ok_or_else(|| PaymentError::internal("promote restaurant", "promotion period out of range"))?;

        debug!("Sending request");
        let payment = self
            .inner
            .create(PaymentCreate {
                transaction_id,
                user_id: owner,
                restaurant_id,
            })
            .await
            .map_err(|e| match e {
                FrameworkError::Conflict(_) => PaymentError::DuplicateTransaction,
                e => PaymentError::internal("create payment", e),
            })?;
        info!(payment_id = %payment.id, "Payment recorded");

        if let Err(e) = self.restaurants.promote(restaurant_id, until).await {
            warn!(payment_id = %payment.id, error = %e, "Promotion failed, removing payment");
            if let Err(rollback) = self.inner.delete(payment.id).await {
                error!(payment_id = %payment.id, error = %rollback, "Could not remove payment");
            }
            return Err(match e {
                RestaurantError::NotFound => PaymentError::RestaurantNotFound,
                e => PaymentError::internal("promote restaurant", e),
            });
        }
        Ok(payment)
    }

    #[instrument(skip(self))]
    pub async fn get_payments(&self, owner: UserId) -> Result<Vec<Payment>, PaymentError> {
        debug!("Sending request");
        let mut payments = self
            .inner
            .list(move |p: &Payment| p.user_id == owner)
            .await
            .map_err(|e| PaymentError::internal("load payments", e))?;
        payments.sort_by_key(|p| p.id);
        Ok(payments)
    }
}
