use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::guard;
use crate::auth::AccessDenied;
use crate::clients::UserClient;
use crate::domain::{User, UserCreate, UserId, UserPatch, UserRole};
use crate::envelope::Envelope;
use crate::policy::ANY;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountInput {
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInput {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfileOutput {
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditProfileInput {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailInput {
    pub code: String,
}

#[derive(Clone)]
pub struct AccountResolver {
    users: UserClient,
}

impl AccountResolver {
    pub fn new(users: UserClient) -> Self {
        Self { users }
    }

    /// Public sign-up.
    #[instrument(skip(self))]
    pub async fn create_account(&self, input: CreateAccountInput) -> Envelope<()> {
        let params = UserCreate {
            email: input.email,
            role: input.role,
        };
        self.users.create_account(params).await.map(|_| ()).into()
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn user_profile(
        &self,
        caller: &User,
        input: UserProfileInput,
    ) -> Result<Envelope<UserProfileOutput>, AccessDenied> {
        guard(ANY, caller)?;
        let result = self.users.user_profile(input.user_id).await;
        Ok(result.map(|user| UserProfileOutput { user }).into())
    }

    /// The caller's own profile, as currently stored.
    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn me(&self, caller: &User) -> Result<Envelope<UserProfileOutput>, AccessDenied> {
        guard(ANY, caller)?;
        let result = self.users.user_profile(caller.id).await;
        Ok(result.map(|user| UserProfileOutput { user }).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn edit_profile(&self, caller: &User, input: EditProfileInput) -> Result<Envelope<()>, AccessDenied> {
        guard(ANY, caller)?;
        let patch = UserPatch { email: input.email };
        Ok(self.users.edit_profile(caller.id, patch).await.map(|_| ()).into())
    }

    /// Public: the code itself proves who is verifying.
    #[instrument(skip(self, input))]
    pub async fn verify_email(&self, input: VerifyEmailInput) -> Envelope<()> {
        self.users.verify_email(&input.code).await.map(|_| ()).into()
    }
}
