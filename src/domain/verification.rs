use super::{UserId, VerificationId};

/// A pending email confirmation. At most one exists per user.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub id: VerificationId,
    pub code: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct VerificationCreate {
    pub user_id: UserId,
}
