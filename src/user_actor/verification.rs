use uuid::Uuid;

use crate::actor_framework::Entity;
use crate::domain::{Verification, VerificationCreate, VerificationId};

impl Entity for Verification {
    type Id = VerificationId;
    type CreateParams = VerificationCreate;
    type UpdateParams = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &VerificationId {
        &self.id
    }

    /// Issues a fresh random code.
    fn from_create_params(id: VerificationId, params: VerificationCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            code: Uuid::new_v4().to_string(),
            user_id: params.user_id,
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (self.user_id == existing.user_id).then(|| format!("{} already has a pending verification", self.user_id))
    }

    fn on_update(&mut self, _update: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
