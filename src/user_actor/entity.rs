use super::actions::UserAction;
use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId, UserPatch};

/// Trims and lowercases `raw`, rejecting it without a local part and a domain.
fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(raw.to_string()),
    }
}

impl Entity for User {
    type Id = UserId;
    type CreateParams = UserCreate;
    type UpdateParams = UserPatch;
    type Action = UserAction;
    type ActionResult = User;

    fn id(&self) -> &UserId {
        &self.id
    }

    /// Creates a new, unverified User.
    ///
    /// # Errors
    /// Rejects emails without a local part and a domain.
    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, String> {
        let email = normalize_email(&params.email)?;
        Ok(Self::new(id, email, params.role))
    }

    /// Emails are unique across all roles.
    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (self.email == existing.email).then(|| self.email.clone())
    }

    /// A changed email must be confirmed again.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(raw) = patch.email {
            let email = normalize_email(&raw)?;
            if email != self.email {
                self.email = email;
                self.verified = false;
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<User, String> {
        match action {
            UserAction::MarkVerified => self.verified = true,
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    #[test]
    fn test_email_is_normalized() {
        let params = UserCreate {
            email: " Alice@Example.com ".to_string(),
            role: UserRole::Client,
        };
        let user = User::from_create_params(UserId(1), params).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(!user.verified);
    }

    #[test]
    fn test_rejects_malformed_email() {
        for email in ["", "alice", "@example.com", "alice@"] {
            let params = UserCreate {
                email: email.to_string(),
                role: UserRole::Owner,
            };
            assert_eq!(User::from_create_params(UserId(1), params), Err(email.to_string()));
        }
    }

    #[test]
    fn test_changed_email_drops_verification() {
        let mut user = User::new(UserId(1), "a@x.io", UserRole::Client);
        user.handle_action(UserAction::MarkVerified).unwrap();

        user.on_update(UserPatch { email: Some(" A@X.io".into()) }).unwrap();
        assert!(user.verified);

        user.on_update(UserPatch::default()).unwrap();
        assert!(user.verified);

        user.on_update(UserPatch { email: Some("b@x.io".into()) }).unwrap();
        assert_eq!(user.email, "b@x.io");
        assert!(!user.verified);

        assert_eq!(user.on_update(UserPatch { email: Some("nope".into()) }), Err("nope".to_string()));
    }

    #[test]
    fn test_same_email_conflicts() {
        let a = User::new(UserId(1), "a@x.io", UserRole::Client);
        let b = User::new(UserId(2), "a@x.io", UserRole::Delivery);
        let c = User::new(UserId(3), "c@x.io", UserRole::Client);
        assert!(b.conflicts_with(&a).is_some());
        assert!(c.conflicts_with(&a).is_none());
    }
}
