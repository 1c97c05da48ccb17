//! # Mock Source & Testing Guide
//!
//! `MockSource<T, P>` implements [`ResourceSource`] entirely in memory from a
//! queue of expectations, and records every call it receives. It is the fast
//! way to test controller behaviour when the timing of responses does not
//! matter.
//!
//! ## When to use which double
//!
//! | Double | Answers | Use Case |
//! |--------|---------|----------|
//! | [`MockSource`] | Immediately, from queued expectations | Flows: load, submit, refresh, notices |
//! | [`ChannelSource`](crate::channel::ChannelSource) | When the test replies on a oneshot | Ordering: stale responses, in-flight submits |
//!
//! ## Example
//!
//! ```rust
//! use list_controller::mock::{Call, MockSource};
//! use list_controller::{ApiError, Resource, ResourceListController, SubmitError};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug, Deserialize)]
//! struct Permission { id: u32, code: String }
//! #[derive(Clone, Debug, Serialize)]
//! struct PermissionDraft { code: String }
//! impl Resource for Permission {
//!     type Id = u32; type Draft = PermissionDraft;
//!     const NAME: &'static str = "Permission"; const PLURAL: &'static str = "permissions";
//!     fn id(&self) -> u32 { self.id }
//!     fn to_draft(&self) -> PermissionDraft { PermissionDraft { code: self.code.clone() } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = MockSource::<Permission>::new();
//!     // Simulate the server refusing the payload
//!     source.expect_create().return_err(ApiError::Validation {
//!         status: 409,
//!         message: Some("Code already exists".into()),
//!     });
//!
//!     let controller = ResourceListController::new(source.clone());
//!     let session = controller.begin_create(PermissionDraft { code: "READ".into() });
//!     let result = controller.submit(&session).await;
//!
//!     assert!(matches!(result, Err(SubmitError::Api(_))));
//!     assert!(session.is_open());
//!     assert_eq!(controller.notice().unwrap().text, "Code already exists");
//!     assert!(matches!(source.calls()[0], Call::Create(_)));
//!     source.verify();
//! }
//! ```

use crate::error::ApiError;
use crate::resource::Resource;
use crate::source::ResourceSource;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

#[derive(Debug)]
enum Expectation {
    Fetch(Result<Value, ApiError>),
    Create(Result<(), ApiError>),
    Update(Result<(), ApiError>),
    Delete(Result<(), ApiError>),
    SetActive(Result<(), ApiError>),
}

/// A call the mock received, in arrival order.
#[derive(Debug, Clone)]
pub enum Call<T: Resource, P> {
    Fetch(P),
    Create(T::Draft),
    Update(T::Id, T::Draft),
    Delete(T::Id),
    SetActive(T::Id, bool),
}

/// In-memory source answering from queued expectations.
///
/// Clones share the same queue and call log, so a test can keep one handle
/// while the controller owns another.
pub struct MockSource<T: Resource, P = ()> {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<Call<T, P>>>>,
}

impl<T: Resource, P> Clone for MockSource<T, P> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<T: Resource, P> Default for MockSource<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource, P> MockSource<T, P> {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects a `fetch` call.
    pub fn expect_fetch(&self) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `create` call.
    pub fn expect_create(&self) -> MutationExpectationBuilder {
        self.mutation(Expectation::Create)
    }

    /// Expects an `update` call.
    pub fn expect_update(&self) -> MutationExpectationBuilder {
        self.mutation(Expectation::Update)
    }

    /// Expects a `delete` call.
    pub fn expect_delete(&self) -> MutationExpectationBuilder {
        self.mutation(Expectation::Delete)
    }

    /// Expects a `set_active` call.
    pub fn expect_set_active(&self) -> MutationExpectationBuilder {
        self.mutation(Expectation::SetActive)
    }

    fn mutation(&self, wrap: fn(Result<(), ApiError>) -> Expectation) -> MutationExpectationBuilder {
        MutationExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call<T, P>>
    where
        P: Clone,
    {
        self.calls.lock().unwrap().clone()
    }

    /// Parameters of every fetch received so far.
    pub fn fetch_params(&self) -> Vec<P>
    where
        P: Clone,
    {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::Fetch(params) => Some(params.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls other than fetches.
    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| !matches!(call, Call::Fetch(_)))
            .count()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), exps);
        }
    }

    fn record(&self, call: Call<T, P>) -> Expectation {
        let name = match &call {
            Call::Fetch(_) => "fetch",
            Call::Create(_) => "create",
            Call::Update(..) => "update",
            Call::Delete(_) => "delete",
            Call::SetActive(..) => "set_active",
        };
        self.calls.lock().unwrap().push(call);
        self.expectations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected {name} call: no expectation left"))
    }
}

fn mismatch(call: &str, expectation: Expectation) -> ! {
    panic!("Unexpected {call} call, next expectation was {expectation:?}")
}

#[async_trait]
impl<T, P> ResourceSource<T> for MockSource<T, P>
where
    T: Resource,
    P: Clone + Debug + Default + Send + Sync + 'static,
{
    type Params = P;

    async fn fetch(&self, params: &P) -> Result<Value, ApiError> {
        match self.record(Call::Fetch(params.clone())) {
            Expectation::Fetch(response) => response,
            other => mismatch("fetch", other),
        }
    }

    async fn create(&self, draft: &T::Draft) -> Result<(), ApiError> {
        match self.record(Call::Create(draft.clone())) {
            Expectation::Create(response) => response,
            other => mismatch("create", other),
        }
    }

    async fn update(&self, id: &T::Id, draft: &T::Draft) -> Result<(), ApiError> {
        match self.record(Call::Update(id.clone(), draft.clone())) {
            Expectation::Update(response) => response,
            other => mismatch("update", other),
        }
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ApiError> {
        match self.record(Call::Delete(id.clone())) {
            Expectation::Delete(response) => response,
            other => mismatch("delete", other),
        }
    }

    async fn set_active(&self, id: &T::Id, active: bool) -> Result<(), ApiError> {
        match self.record(Call::SetActive(id.clone(), active)) {
            Expectation::SetActive(response) => response,
            other => mismatch("set_active", other),
        }
    }
}

/// Builder for `fetch` expectations.
pub struct FetchExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl FetchExpectationBuilder {
    /// Answer with this raw body.
    pub fn return_ok(self, body: Value) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Fetch(Ok(body)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Fetch(Err(error)));
    }
}

/// Builder for create/update/delete/set_active expectations.
pub struct MutationExpectationBuilder {
    wrap: fn(Result<(), ApiError>) -> Expectation,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl MutationExpectationBuilder {
    pub fn return_ok(self) {
        self.expectations.lock().unwrap().push_back((self.wrap)(Ok(())));
    }

    pub fn return_err(self, error: ApiError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(Err(error)));
    }
}
