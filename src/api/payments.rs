use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::guard;
use crate::auth::AccessDenied;
use crate::clients::PaymentClient;
use crate::domain::{Payment, RestaurantId, User};
use crate::envelope::Envelope;
use crate::policy::OWNER_ONLY;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentInput {
    pub transaction_id: String,
    pub restaurant_id: RestaurantId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetPaymentsOutput {
    pub payments: Vec<Payment>,
}

#[derive(Clone)]
pub struct PaymentResolver {
    payments: PaymentClient,
}

impl PaymentResolver {
    pub fn new(payments: PaymentClient) -> Self {
        Self { payments }
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn create_payment(&self, caller: &User, input: CreatePaymentInput) -> Result<Envelope<()>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let result = self
            .payments
            .create_payment(caller.id, input.transaction_id, input.restaurant_id)
            .await;
        Ok(result.map(|_| ()).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn get_payments(&self, caller: &User) -> Result<Envelope<GetPaymentsOutput>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let result = self.payments.get_payments(caller.id).await;
        Ok(result.map(|payments| GetPaymentsOutput { payments }).into())
    }
}
