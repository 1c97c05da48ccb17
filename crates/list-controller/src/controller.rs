//! # Resource List Controller
//!
//! `ResourceListController` owns the whole lifecycle of one admin screen:
//! load a collection, filter it, stage an edit, submit it, report the outcome
//! and re-fetch.
//!
//! ## State & Concurrency
//!
//! All state lives behind one mutex that is only held for synchronous
//! bookkeeping, never across an `.await`. The controller itself is a cheap
//! handle (`Clone` shares the same state), so the rendering layer and spawned
//! tasks can all hold one.
//!
//! Two rules keep concurrent calls sane:
//!
//! * **Stale responses**: every `load` takes a ticket. Only the most recently
//!   issued ticket may commit its result; earlier responses arriving late are
//!   dropped.
//! * **Single submit**: a session can have one submit in flight. A second
//!   `submit` on the same session returns [`SubmitError::InFlight`] without
//!   touching the source.
//!
//! ## Usage
//!
//! ```rust
//! use list_controller::mock::MockSource;
//! use list_controller::{Resource, ResourceListController};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug, Deserialize)]
//! struct Faculty { id: u32, name: String }
//! #[derive(Clone, Debug, Serialize)]
//! struct FacultyDraft { name: String }
//!
//! impl Resource for Faculty {
//!     type Id = u32;
//!     type Draft = FacultyDraft;
//!     const NAME: &'static str = "Faculty";
//!     const PLURAL: &'static str = "faculties";
//!     fn id(&self) -> u32 { self.id }
//!     fn to_draft(&self) -> FacultyDraft { FacultyDraft { name: self.name.clone() } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = MockSource::<Faculty>::new();
//!     source.expect_fetch().return_ok(json!({"data": [{"id": 1, "name": "Engineering"}]}));
//!     source.expect_create().return_ok();
//!     source.expect_fetch().return_ok(json!({"data": [
//!         {"id": 1, "name": "Engineering"},
//!         {"id": 2, "name": "Law"}
//!     ]}));
//!
//!     let controller = ResourceListController::new(source.clone()).with_required_fields(["name"]);
//!     controller.load(()).await;
//!
//!     let mut session = controller.begin_create(FacultyDraft { name: String::new() });
//!     session.draft_mut().name = "Law".into();
//!     controller.submit(&session).await.unwrap();
//!
//!     assert_eq!(controller.collection().items().len(), 2);
//!     source.verify();
//! }
//! ```

use crate::collection::{Filter, LoadStatus, ResourceCollection};
use crate::envelope::decode_list;
use crate::error::{ApiError, Mutation, SubmitError};
use crate::notice::{Notice, NoticeKind, DEFAULT_NOTICE_TTL};
use crate::resource::Resource;
use crate::session::{EditMode, EditSession};
use crate::source::ResourceSource;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// What the rendering layer draws: the collection and the current notice.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub collection: ResourceCollection<T>,
    pub notice: Option<Notice>,
}

struct State<T, P> {
    view: ListView<T>,
    ticket: u64,
    last_params: Option<P>,
    notice_seq: u64,
}

struct Shared<T, P> {
    state: Mutex<State<T, P>>,
    updates: watch::Sender<ListView<T>>,
}

impl<T: Clone, P> Shared<T, P> {
    /// Mutate the state and publish the resulting view to subscribers.
    fn update<R>(&self, f: impl FnOnce(&mut State<T, P>) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut state);
        self.updates.send_replace(state.view.clone());
        out
    }

    fn read<R>(&self, f: impl FnOnce(&State<T, P>) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

/// Generic list/edit/submit workflow for one resource type.
pub struct ResourceListController<T: Resource, S: ResourceSource<T>> {
    source: Arc<S>,
    shared: Arc<Shared<T, S::Params>>,
    required_fields: Arc<[String]>,
    notice_ttl: Duration,
}

impl<T: Resource, S: ResourceSource<T>> Clone for ResourceListController<T, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            shared: self.shared.clone(),
            required_fields: self.required_fields.clone(),
            notice_ttl: self.notice_ttl,
        }
    }
}

impl<T: Resource, S: ResourceSource<T>> ResourceListController<T, S> {
    /// Creates an idle controller over `source`.
    pub fn new(source: S) -> Self {
        let view = ListView {
            collection: ResourceCollection::new(),
            notice: None,
        };
        let (updates, _) = watch::channel(view.clone());
        let state = State {
            view,
            ticket: 0,
            last_params: None,
            notice_seq: 0,
        };
        Self {
            source: Arc::new(source),
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
            }),
            required_fields: Arc::from(Vec::new()),
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }

    /// Draft fields that must be present and non-blank before a submit reaches the source.
    pub fn with_required_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// How long success notices stay up.
    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // --- Reading ---

    pub fn snapshot(&self) -> ListView<T> {
        self.shared.read(|s| s.view.clone())
    }

    pub fn collection(&self) -> ResourceCollection<T> {
        self.shared.read(|s| s.view.collection.clone())
    }

    pub fn status(&self) -> LoadStatus {
        self.shared.read(|s| s.view.collection.status())
    }

    pub fn notice(&self) -> Option<Notice> {
        self.shared.read(|s| s.view.notice.clone())
    }

    /// Parameters of the most recent `load`.
    pub fn last_params(&self) -> Option<S::Params> {
        self.shared.read(|s| s.last_params.clone())
    }

    /// Receive a fresh [`ListView`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ListView<T>> {
        self.shared.updates.subscribe()
    }

    // --- Loading & filtering ---

    /// Fetch the list with `params` and commit it unless a newer load was
    /// issued in the meantime.
    ///
    /// Failures end in `LoadStatus::Error` plus an error notice; an
    /// unrecognized or malformed body ends in an empty `Loaded` list.
    #[instrument(skip(self), fields(resource = T::PLURAL))]
    pub async fn load(&self, params: S::Params) -> ResourceCollection<T> {
        let ticket = self.shared.update(|s| {
            s.ticket += 1;
            s.last_params = Some(params.clone());
            s.view.collection.begin_loading();
            s.ticket
        });
        debug!(ticket, "Load started");

        let outcome = self.source.fetch(&params).await.map(decode_list::<T>);

        let failure = self.shared.update(|s| {
            if s.ticket != ticket {
                debug!(ticket, latest = s.ticket, "Discarding stale response");
                return None;
            }
            match outcome {
                Ok(items) => {
                    info!(ticket, count = items.len(), "Loaded");
                    s.view.collection.finish_loading(items);
                    None
                }
                Err(ApiError::Malformed(detail)) => {
                    warn!(ticket, %detail, "Malformed response, showing an empty list");
                    s.view.collection.finish_loading(Vec::new());
                    None
                }
                Err(e) => {
                    warn!(ticket, error = %e, "Load failed");
                    let message = e.load_message(T::LABEL);
                    s.view.collection.fail_loading(message.clone());
                    Some(message)
                }
            }
        });
        if let Some(message) = failure {
            self.notify(NoticeKind::Error, message);
        }
        self.collection()
    }

    /// Load again with the last-used parameters (defaults before the first load).
    pub async fn refresh(&self) -> ResourceCollection<T> {
        let params = self.last_params().unwrap_or_default();
        self.load(params).await
    }

    /// Replace the client-side filter; `None` shows every item.
    pub fn apply_filter(&self, filter: Option<Filter<T>>) {
        self.shared.update(|s| s.view.collection.set_filter(filter));
    }

    // --- Editing ---

    pub fn begin_create(&self, defaults: T::Draft) -> EditSession<T> {
        debug!(resource = T::PLURAL, "Create form opened");
        EditSession::create(defaults)
    }

    pub fn begin_edit(&self, item: &T) -> EditSession<T> {
        debug!(resource = T::PLURAL, id = %item.id(), "Edit form opened");
        EditSession::edit(item)
    }

    /// Throw a session away. The collection is not touched.
    pub fn cancel(&self, session: EditSession<T>) {
        debug!(resource = T::PLURAL, mode = ?session.mode(), "Edit cancelled");
    }

    /// Send the session's draft to the source.
    ///
    /// On success the session is closed, a success notice is posted and the
    /// list is reloaded once with the last-used parameters. On failure the
    /// session stays open so the user's input survives.
    #[instrument(skip_all, fields(resource = T::PLURAL, mode = ?session.mode()))]
    pub async fn submit(&self, session: &EditSession<T>) -> Result<(), SubmitError> {
        let in_flight = session.start_submit().inspect_err(|e| {
            debug!(error = %e, "Submit rejected");
        })?;

        let missing = self.missing_fields(session.draft());
        if !missing.is_empty() {
            drop(in_flight);
            debug!(?missing, "Required fields missing");
            self.notify(
                NoticeKind::Error,
                format!("Please fill in: {}", missing.join(", ")),
            );
            return Err(SubmitError::MissingFields(missing));
        }

        let mutation = match session.mode() {
            EditMode::Create => Mutation::Create,
            EditMode::Edit => Mutation::Update,
        };
        debug!(draft = ?session.draft(), "Submitting");
        let result = match session.target() {
            Some(target) => self.source.update(&target.id(), session.draft()).await,
            None => self.source.create(session.draft()).await,
        };

        match result {
            Ok(()) => {
                in_flight.close();
                info!(%mutation, "Submitted");
                self.notify(NoticeKind::Success, mutation.success_message(T::NAME));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                drop(in_flight);
                warn!(%mutation, error = %e, "Submit failed");
                self.notify(NoticeKind::Error, e.user_message(mutation, T::LABEL));
                Err(e.into())
            }
        }
    }

    // --- Other mutations ---

    pub async fn delete(&self, item: &T) -> Result<(), ApiError> {
        let id = item.id();
        self.run_mutation(Mutation::Delete, self.source.delete(&id))
            .await
    }

    /// The status toggle of list rows (activate / deactivate).
    pub async fn set_active(&self, item: &T, active: bool) -> Result<(), ApiError> {
        let id = item.id();
        self.run_mutation(Mutation::SetStatus, self.source.set_active(&id, active))
            .await
    }

    /// Await a mutation, report it, and reload on success.
    ///
    /// Used for side actions that do not fit create/update/delete (approving a
    /// request, assigning a role). Each call reports independently of any
    /// other in-flight operation.
    #[instrument(skip_all, fields(resource = T::PLURAL, %mutation))]
    pub async fn run_mutation<F>(&self, mutation: Mutation, call: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        match call.await {
            Ok(()) => {
                info!("Mutation ok");
                self.notify(NoticeKind::Success, mutation.success_message(T::NAME));
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Mutation failed");
                self.notify(NoticeKind::Error, e.user_message(mutation, T::LABEL));
                Err(e)
            }
        }
    }

    // --- Notices ---

    pub fn dismiss_message(&self) {
        self.shared.update(|s| s.view.notice = None);
    }

    fn notify(&self, kind: NoticeKind, text: String) {
        let seq = self.shared.update(|s| {
            s.notice_seq += 1;
            s.view.notice = Some(Notice {
                kind,
                text,
                seq: s.notice_seq,
            });
            s.notice_seq
        });
        if kind == NoticeKind::Success {
            self.schedule_clear(seq);
        }
    }

    fn schedule_clear(&self, seq: u64) {
        // Weak, so a pending timer does not keep an unmounted screen alive.
        let shared = Arc::downgrade(&self.shared);
        let ttl = self.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(shared) = shared.upgrade() {
                shared.update(|s| {
                    if s.view.notice.as_ref().is_some_and(|n| n.seq == seq) {
                        s.view.notice = None;
                    }
                });
            }
        });
    }

    fn missing_fields(&self, draft: &T::Draft) -> Vec<String> {
        if self.required_fields.is_empty() {
            return Vec::new();
        }
        let value = serde_json::to_value(draft).unwrap_or(Value::Null);
        self.required_fields
            .iter()
            .filter(|field| is_blank(value.get(field.as_str())))
            .cloned()
            .collect()
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_values() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&json!("   "))));
        assert!(!is_blank(Some(&json!("Law"))));
        assert!(!is_blank(Some(&json!(0))));
        assert!(!is_blank(Some(&json!(false))));
    }
}
