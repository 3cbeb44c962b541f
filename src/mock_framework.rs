//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! mailbox. Then use helpers like [`expect_create`] or [`expect_action`] to
//! assert which store requests an orchestration issues and to answer them.

use crate::actor_framework::{Entity, Filter, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

pub type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;
pub type MockReceiver<T> = mpsc::Receiver<ResourceRequest<T>>;

/// Creates a mock client and a receiver for asserting requests.
///
/// No `ResourceActor` runs behind the client: every request lands on the
/// returned receiver and the test decides the reply (success, failure or
/// silence), which keeps orchestration tests deterministic.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, MockReceiver<T>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::CreateParams, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::Id, Reply<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(Filter<T>, Reply<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut MockReceiver<T>,
) -> Option<(T::Id, T::Action, Reply<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(receiver: &mut MockReceiver<T>) -> Option<(T::Id, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Asserts that no request is waiting in the mailbox.
pub fn expect_idle<T: Entity>(receiver: &mut MockReceiver<T>) {
    assert!(receiver.try_recv().is_err(), "unexpected store request");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserCreate, UserId, UserRole};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move {
            let params = UserCreate { email: "test@example.com".to_string(), role: UserRole::Client };
            client.create(params).await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.email, "test@example.com");
        let user = User::new(UserId(1), payload.email, payload.role);
        responder.send(Ok(user.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(user));
        expect_idle(&mut receiver);
    }

    #[tokio::test]
    async fn test_list_filter_is_handed_to_the_test() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let list_task = tokio::spawn(async move { client.list(|u: &User| u.role == UserRole::Owner).await });

        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let owner = User::new(UserId(1), "o@x.io", UserRole::Owner);
        let client_user = User::new(UserId(2), "c@x.io", UserRole::Client);
        assert!(filter(&owner));
        assert!(!filter(&client_user));
        responder.send(Ok(vec![owner.clone()])).unwrap();

        assert_eq!(list_task.await.unwrap(), Ok(vec![owner]));
    }
}
