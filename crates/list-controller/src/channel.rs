//! # Channel-backed Source
//!
//! `ChannelSource` turns every source call into a [`SourceRequest`] sent over
//! a Tokio mpsc channel, with a oneshot channel for the reply. Whoever holds
//! the receiving end decides *when* and *how* each call completes, which is
//! what tests need to reproduce out-of-order responses and in-flight submits.
//!
//! ```rust
//! use list_controller::channel::{create_channel_source, expect_fetch};
//! use list_controller::{Resource, ResourceListController};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug, Deserialize)]
//! struct Role { id: u32 }
//! #[derive(Clone, Debug, Serialize)]
//! struct RoleDraft;
//! impl Resource for Role {
//!     type Id = u32; type Draft = RoleDraft;
//!     const NAME: &'static str = "Role"; const PLURAL: &'static str = "roles";
//!     fn id(&self) -> u32 { self.id }
//!     fn to_draft(&self) -> RoleDraft { RoleDraft }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (source, mut requests) = create_channel_source::<Role, ()>(8);
//!     let controller = ResourceListController::new(source);
//!
//!     let (collection, ()) = tokio::join!(controller.load(()), async {
//!         let (_params, respond_to) = expect_fetch(&mut requests).await.unwrap();
//!         respond_to.send(Ok(json!([{"id": 7}]))).unwrap();
//!     });
//!     assert_eq!(collection.items()[0].id, 7);
//! }
//! ```

use crate::error::ApiError;
use crate::resource::Resource;
use crate::source::ResourceSource;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use std::marker::PhantomData;
use tokio::sync::{mpsc, oneshot};

/// Reply channel of one request.
pub type Reply<R> = oneshot::Sender<Result<R, ApiError>>;

/// One source call, waiting for an answer.
#[derive(Debug)]
pub enum SourceRequest<T: Resource, P> {
    Fetch {
        params: P,
        respond_to: Reply<Value>,
    },
    Create {
        draft: T::Draft,
        respond_to: Reply<()>,
    },
    Update {
        id: T::Id,
        draft: T::Draft,
        respond_to: Reply<()>,
    },
    Delete {
        id: T::Id,
        respond_to: Reply<()>,
    },
    SetActive {
        id: T::Id,
        active: bool,
        respond_to: Reply<()>,
    },
}

/// A [`ResourceSource`] whose calls are answered by the owner of the receiver.
pub struct ChannelSource<T: Resource, P> {
    sender: mpsc::Sender<SourceRequest<T, P>>,
    _params: PhantomData<fn() -> P>,
}

impl<T: Resource, P> Clone for ChannelSource<T, P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            _params: PhantomData,
        }
    }
}

impl<T: Resource, P> ChannelSource<T, P> {
    pub fn new(sender: mpsc::Sender<SourceRequest<T, P>>) -> Self {
        Self {
            sender,
            _params: PhantomData,
        }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Reply<R>) -> SourceRequest<T, P>,
    ) -> Result<R, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| ApiError::Network("source closed".into()))?;
        response
            .await
            .map_err(|_| ApiError::Network("source dropped the request".into()))?
    }
}

#[async_trait]
impl<T, P> ResourceSource<T> for ChannelSource<T, P>
where
    T: Resource,
    P: Clone + Debug + Default + Send + Sync + 'static,
{
    type Params = P;

    async fn fetch(&self, params: &P) -> Result<Value, ApiError> {
        let params = params.clone();
        self.call(|respond_to| SourceRequest::Fetch { params, respond_to })
            .await
    }

    async fn create(&self, draft: &T::Draft) -> Result<(), ApiError> {
        let draft = draft.clone();
        self.call(|respond_to| SourceRequest::Create { draft, respond_to })
            .await
    }

    async fn update(&self, id: &T::Id, draft: &T::Draft) -> Result<(), ApiError> {
        let (id, draft) = (id.clone(), draft.clone());
        self.call(|respond_to| SourceRequest::Update {
            id,
            draft,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ApiError> {
        let id = id.clone();
        self.call(|respond_to| SourceRequest::Delete { id, respond_to })
            .await
    }

    async fn set_active(&self, id: &T::Id, active: bool) -> Result<(), ApiError> {
        let id = id.clone();
        self.call(|respond_to| SourceRequest::SetActive {
            id,
            active,
            respond_to,
        })
        .await
    }
}

/// A channel source plus the receiver its requests arrive on.
pub fn create_channel_source<T: Resource, P>(
    buffer_size: usize,
) -> (ChannelSource<T, P>, mpsc::Receiver<SourceRequest<T, P>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelSource::new(sender), receiver)
}

/// Next request, if it is a fetch.
pub async fn expect_fetch<T: Resource, P>(
    receiver: &mut mpsc::Receiver<SourceRequest<T, P>>,
) -> Option<(P, Reply<Value>)> {
    match receiver.recv().await {
        Some(SourceRequest::Fetch { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a create.
pub async fn expect_create<T: Resource, P>(
    receiver: &mut mpsc::Receiver<SourceRequest<T, P>>,
) -> Option<(T::Draft, Reply<()>)> {
    match receiver.recv().await {
        Some(SourceRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an update.
pub async fn expect_update<T: Resource, P>(
    receiver: &mut mpsc::Receiver<SourceRequest<T, P>>,
) -> Option<(T::Id, T::Draft, Reply<()>)> {
    match receiver.recv().await {
        Some(SourceRequest::Update {
            id,
            draft,
            respond_to,
        }) => Some((id, draft, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a delete.
pub async fn expect_delete<T: Resource, P>(
    receiver: &mut mpsc::Receiver<SourceRequest<T, P>>,
) -> Option<(T::Id, Reply<()>)> {
    match receiver.recv().await {
        Some(SourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a status toggle.
pub async fn expect_set_active<T: Resource, P>(
    receiver: &mut mpsc::Receiver<SourceRequest<T, P>>,
) -> Option<(T::Id, bool, Reply<()>)> {
    match receiver.recv().await {
        Some(SourceRequest::SetActive {
            id,
            active,
            respond_to,
        }) => Some((id, active, respond_to)),
        _ => None,
    }
}
