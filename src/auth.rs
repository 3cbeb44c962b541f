//! Bearer token resolution. Tokens are opaque: issuance and verification
//! belong to an external collaborator, [`IssuedTokens`] stands in for it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::UserId;
use crate::error::{Classify, ErrorKind};

/// Returned before any core logic runs when the caller is unknown or lacks the required role.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Forbidden resource")]
pub struct AccessDenied;

impl Classify for AccessDenied {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Forbidden
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolves a token to the user it was issued for.
    async fn verify(&self, token: &str) -> Option<UserId>;
}

/// In-memory token table.
#[derive(Clone, Default)]
pub struct IssuedTokens {
    tokens: Arc<RwLock<HashMap<String, UserId>>>,
}

impl IssuedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), user_id);
        debug!(%user_id, "Token issued");
        token
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

#[async_trait]
impl TokenVerifier for IssuedTokens {
    async fn verify(&self, token: &str) -> Option<UserId> {
        self.tokens.read().await.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issued_tokens_resolve_until_revoked() {
        let tokens = IssuedTokens::new();
        let token = tokens.issue(UserId(3)).await;

        assert_eq!(tokens.verify(&token).await, Some(UserId(3)));
        assert_eq!(tokens.verify("made-up").await, None);

        assert!(tokens.revoke(&token).await);
        assert_eq!(tokens.verify(&token).await, None);
    }

    #[test]
    fn test_access_denied_message() {
        assert_eq!(AccessDenied.to_string(), "Forbidden resource");
        assert_eq!(AccessDenied.kind(), ErrorKind::Forbidden);
    }
}
