use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Payment, PaymentCreate, PaymentId};

impl Entity for Payment {
    type Id = PaymentId;
    type CreateParams = PaymentCreate;
    type UpdateParams = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &PaymentId {
        &self.id
    }

    fn from_create_params(id: PaymentId, params: PaymentCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            transaction_id: params.transaction_id,
            user_id: params.user_id,
            restaurant_id: params.restaurant_id,
            created_at: Utc::now(),
        })
    }

    /// A transaction can only be recorded once.
    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (self.transaction_id == existing.transaction_id)
            .then(|| format!("transaction {} already recorded", self.transaction_id))
    }

    fn on_update(&mut self, _update: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
