//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;
use tracing::warn;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so orchestration code
/// (e.g. `SaleClient::create_sale`) can be driven step by step and each
/// reply, success or failure, chosen deterministically.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Receives the next request and hands it to `pick`. Logs and yields `None`
/// when the channel closed or `pick` rejects the request.
async fn next_request<T: Entity, R>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
    pick: impl FnOnce(ResourceRequest<T>) -> Result<R, ResourceRequest<T>>,
) -> Option<R> {
    let Some(request) = receiver.recv().await else {
        warn!("Mock channel closed while a request was expected");
        return None;
    };
    match pick(request) {
        Ok(picked) => Some(picked),
        Err(other) => {
            warn!(request = request_kind(&other), "Unexpected request");
            None
        }
    }
}

fn request_kind<T: Entity>(request: &ResourceRequest<T>) -> &'static str {
    match request {
        ResourceRequest::Create { .. } => "create",
        ResourceRequest::Get { .. } => "get",
        ResourceRequest::List { .. } => "list",
        ResourceRequest::Update { .. } => "update",
        ResourceRequest::Delete { .. } => "delete",
        ResourceRequest::Action { .. } => "action",
    }
}

/// Next request must be a Create; returns its payload and responder.
pub async fn expect_create<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::CreatePayload, Response<T::Id>)> {
    next_request(receiver, |request| match request {
        ResourceRequest::Create { payload, respond_to } => Ok((payload, respond_to)),
        other => Err(other),
    })
    .await
}

pub async fn expect_get<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, Response<Option<T>>)> {
    next_request(receiver, |request| match request {
        ResourceRequest::Get { id, respond_to } => Ok((id, respond_to)),
        other => Err(other),
    })
    .await
}

pub async fn expect_list<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<Response<Vec<T>>> {
    next_request(receiver, |request| match request {
        ResourceRequest::List { respond_to } => Ok(respond_to),
        other => Err(other),
    })
    .await
}

/// Next request must be an Action; stock reservations arrive this way.
pub async fn expect_action<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    next_request(receiver, |request| match request {
        ResourceRequest::Action { id, action, respond_to } => Ok((id, action, respond_to)),
        other => Err(other),
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let create_task = tokio::spawn(async move { client.create(ProductCreate::new("Yerba Mate", 4.5, 10)).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Yerba Mate");
        responder.send(Ok("product_00001".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("product_00001".to_string()));
    }

    #[tokio::test]
    async fn test_unexpected_request_is_none() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let list_task = tokio::spawn(async move { client.list().await });
        assert!(expect_get(&mut receiver).await.is_none());

        // The rejected request was dropped along with its responder
        assert!(list_task.await.unwrap().is_err());
        assert!(expect_list(&mut receiver).await.is_none());
    }
}
