/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Marks the email as confirmed.
    MarkVerified,
}
