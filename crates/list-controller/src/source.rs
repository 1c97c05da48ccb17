//! # ResourceSource Trait
//!
//! The seam between the controller and whatever actually stores the data.
//! Production code binds it to the REST API; tests bind it to the doubles in
//! [`mock`](crate::mock).

use crate::error::ApiError;
use crate::resource::Resource;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Asynchronous CRUD access to one kind of [`Resource`].
///
/// `fetch` returns the raw body on purpose: envelope handling lives in the
/// controller ([`normalize_list`](crate::envelope::normalize_list)), not in
/// every source.
///
/// `delete` and `set_active` are provided methods that report
/// [`ApiError::Unsupported`]; sources override them when the backend has the
/// endpoint.
#[async_trait]
pub trait ResourceSource<T: Resource>: Send + Sync + 'static {
    /// Query parameters of a list call (status filter, parent id, ...).
    type Params: Clone + Debug + Default + Send + Sync + 'static;

    async fn fetch(&self, params: &Self::Params) -> Result<Value, ApiError>;

    async fn create(&self, draft: &T::Draft) -> Result<(), ApiError>;

    async fn update(&self, id: &T::Id, draft: &T::Draft) -> Result<(), ApiError>;

    async fn delete(&self, _id: &T::Id) -> Result<(), ApiError> {
        Err(ApiError::Unsupported("delete"))
    }

    async fn set_active(&self, _id: &T::Id, _active: bool) -> Result<(), ApiError> {
        Err(ApiError::Unsupported("set_active"))
    }
}
