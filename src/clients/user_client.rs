use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{User, UserCreate, UserId, UserPatch, Verification, VerificationCreate};
use crate::mailer::Mailer;
use crate::user_actor::{UserAction, UserError};

/// Client for interacting with the User actor and its pending verifications.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
    verifications: ResourceClient<Verification>,
    mailer: Arc<dyn Mailer>,
}

impl_client_methods!(UserClient, User, UserError, user);

impl UserClient {
    pub fn new(
        inner: ResourceClient<User>,
        verifications: ResourceClient<Verification>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            inner,
            verifications,
            mailer,
        }
    }

    /// Registers a user and mails a verification code in the background.
    ///
    /// The store rejects a duplicate email atomically, so two concurrent
    /// sign-ups with the same address cannot both succeed.
    #[instrument(skip(self), fields(email = %params.email))]
    pub async fn create_account(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        let user = self.inner.create(params).await.map_err(store_error("create account"))?;
        info!(user_id = %user.id, "Account created");

        self.issue_verification(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn user_profile(&self, id: UserId) -> Result<User, UserError> {
        self.get_user(id).await?.ok_or(UserError::NotFound)
    }

    /// Applies `patch` to the user's own profile. A new email replaces any
    /// pending verification and is mailed a fresh code.
    #[instrument(skip(self, patch))]
    pub async fn edit_profile(&self, id: UserId, patch: UserPatch) -> Result<User, UserError> {
        let current = self.user_profile(id).await?;

        debug!("Sending request");
        let user = self.inner.update(id, patch).await.map_err(store_error("edit profile"))?;

        if user.email != current.email {
            info!("Email changed, verification required");
            self.discard_verifications(id).await?;
            self.issue_verification(&user).await?;
        }
        Ok(user)
    }

    /// Confirms the email the code was sent to. Each code works once.
    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, code: &str) -> Result<User, UserError> {
        let wanted = code.to_string();
        debug!("Sending request");
        let verification = self
            .verifications
            .list(move |v: &Verification| v.code == wanted)
            .await
            .map_err(|e| UserError::internal("verify email", e))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!("Unknown verification code");
                UserError::VerificationNotFound
            })?;

        let user = self
            .inner
            .perform_action(verification.user_id, UserAction::MarkVerified)
            .await
            .map_err(store_error("verify email"))?;

        match self.verifications.delete(verification.id).await {
            // A concurrent verification with the same code already removed it.
            Ok(_) | Err(FrameworkError::NotFound(_)) => {}
            Err(e) => return Err(UserError::internal("verify email", e)),
        }
        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    async fn issue_verification(&self, user: &User) -> Result<(), UserError> {
        let verification = self
            .verifications
            .create(VerificationCreate { user_id: user.id })
            .await
            .map_err(|e| UserError::internal("create verification", e))?;

        let mailer = Arc::clone(&self.mailer);
        let email = user.email.clone();
        tokio::spawn(
            async move {
                if let Err(e) = mailer.send_verification(&email, &verification.code).await {
                    error!(error = %e, "Verification email failed");
                }
            }
            .in_current_span(),
        );
        Ok(())
    }

    async fn discard_verifications(&self, user_id: UserId) -> Result<(), UserError> {
        let pending = self
            .verifications
            .list(move |v: &Verification| v.user_id == user_id)
            .await
            .map_err(|e| UserError::internal("edit profile", e))?;
        for verification in pending {
            match self.verifications.delete(verification.id).await {
                Ok(_) | Err(FrameworkError::NotFound(_)) => {}
                Err(e) => return Err(UserError::internal("edit profile", e)),
            }
        }
        Ok(())
    }
}

/// Maps user store failures shared by create, update and verify.
fn store_error(action: &'static str) -> impl Fn(FrameworkError) -> UserError {
    move |e| match e {
        FrameworkError::NotFound(_) => UserError::NotFound,
        FrameworkError::Conflict(_) => UserError::EmailTaken,
        FrameworkError::Rejected(email) => UserError::InvalidEmail(email),
        e => UserError::internal(action, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::domain::{UserRole, VerificationId};
    use crate::mailer::testing::ChannelMailer;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn start() -> (UserClient, mpsc::UnboundedReceiver<(String, String)>) {
        let user_ids = AtomicU64::new(1);
        let verification_ids = AtomicU64::new(1);
        let (actor, inner) = ResourceActor::new(8, move || UserId(user_ids.fetch_add(1, Ordering::SeqCst)));
        let (verification_actor, verifications) =
            ResourceActor::new(8, move || VerificationId(verification_ids.fetch_add(1, Ordering::SeqCst)));
        tokio::spawn(actor.run());
        tokio::spawn(verification_actor.run());
        let (sent, outbox) = mpsc::unbounded_channel();
        (UserClient::new(inner, verifications, Arc::new(ChannelMailer(sent))), outbox)
    }

    fn sign_up(email: &str) -> UserCreate {
        UserCreate { email: email.to_string(), role: UserRole::Client }
    }

    fn new_email(email: &str) -> UserPatch {
        UserPatch { email: Some(email.to_string()) }
    }

    #[tokio::test]
    async fn test_create_account_sends_verification() {
        let (client, mut outbox) = start();

        let user = client.create_account(sign_up("Ana@Example.com")).await.unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert!(!user.verified);

        let (to, code) = outbox.recv().await.unwrap();
        assert_eq!(to, "ana@example.com");
        assert!(Uuid::parse_str(&code).is_ok());
    }

    #[tokio::test]
    async fn test_mailed_code_verifies_once() {
        let (client, mut outbox) = start();
        let user = client.create_account(sign_up("ana@example.com")).await.unwrap();
        let (_, code) = outbox.recv().await.unwrap();

        assert_eq!(client.verify_email("not-a-code").await, Err(UserError::VerificationNotFound));
        assert!(!client.user_profile(user.id).await.unwrap().verified);

        let verified = client.verify_email(&code).await.unwrap();
        assert_eq!(verified.id, user.id);
        assert!(verified.verified);
        assert!(client.user_profile(user.id).await.unwrap().verified);

        assert_eq!(client.verify_email(&code).await, Err(UserError::VerificationNotFound));
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_emails() {
        let (client, _outbox) = start();
        client.create_account(sign_up("ana@example.com")).await.unwrap();

        let again = client.create_account(sign_up("ANA@example.com")).await;
        assert_eq!(again, Err(UserError::EmailTaken));
        assert_eq!(again.unwrap_err().to_string(), "There is a user with that email already");

        let invalid = client.create_account(sign_up("not-an-email")).await;
        assert!(matches!(invalid, Err(UserError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_user_profile() {
        let (client, _outbox) = start();
        let user = client.create_account(sign_up("bo@example.com")).await.unwrap();

        assert_eq!(client.user_profile(user.id).await, Ok(user));
        assert_eq!(client.user_profile(UserId(77)).await, Err(UserError::NotFound));
    }

    #[tokio::test]
    async fn test_edit_profile_reverifies_new_email() {
        let (client, mut outbox) = start();
        let user = client.create_account(sign_up("ana@example.com")).await.unwrap();
        let (_, first_code) = outbox.recv().await.unwrap();
        client.verify_email(&first_code).await.unwrap();

        let unchanged = client.edit_profile(user.id, UserPatch::default()).await.unwrap();
        assert!(unchanged.verified);

        let edited = client.edit_profile(user.id, new_email("Ana@New.io")).await.unwrap();
        assert_eq!(edited.email, "ana@new.io");
        assert!(!edited.verified);

        let (to, code) = outbox.recv().await.unwrap();
        assert_eq!(to, "ana@new.io");
        assert!(client.verify_email(&code).await.unwrap().verified);
    }

    #[tokio::test]
    async fn test_email_change_replaces_pending_code() {
        let (client, mut outbox) = start();
        let user = client.create_account(sign_up("ana@example.com")).await.unwrap();
        let (_, stale) = outbox.recv().await.unwrap();

        client.edit_profile(user.id, new_email("ana@new.io")).await.unwrap();
        let (_, fresh) = outbox.recv().await.unwrap();

        assert_eq!(client.verify_email(&stale).await, Err(UserError::VerificationNotFound));
        assert!(client.verify_email(&fresh).await.unwrap().verified);
    }

    #[tokio::test]
    async fn test_edit_profile_rejections() {
        let (client, _outbox) = start();
        let ana = client.create_account(sign_up("ana@example.com")).await.unwrap();
        client.create_account(sign_up("bo@example.com")).await.unwrap();

        assert_eq!(
            client.edit_profile(ana.id, new_email("BO@example.com")).await,
            Err(UserError::EmailTaken)
        );
        assert!(matches!(
            client.edit_profile(ana.id, new_email("broken")).await,
            Err(UserError::InvalidEmail(_))
        ));
        assert_eq!(
            client.edit_profile(UserId(77), new_email("x@y.io")).await,
            Err(UserError::NotFound)
        );
        assert_eq!(client.user_profile(ana.id).await.unwrap().email, "ana@example.com");
    }
}
