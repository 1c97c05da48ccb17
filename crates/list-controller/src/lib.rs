//! # List Controller
//!
//! Every admin screen does the same thing: fetch a list, show it (maybe
//! filtered), open a form, submit a create or update, say whether it worked,
//! fetch the list again. This crate is that workflow, written once.
//!
//! ## Layers
//!
//! 1. **Resource Layer** ([`Resource`]) - what an item and its editable draft look like
//! 2. **Source Layer** ([`ResourceSource`]) - how the data is fetched and mutated
//! 3. **Controller Layer** ([`ResourceListController`]) - load, filter, edit, submit, notify
//!
//! A screen implements the first two for its entity and gets the third for free.
//!
//! ## Guarantees
//!
//! - Drafts live in an [`EditSession`], never in the collection: cancelling a
//!   form leaves the list untouched.
//! - After any successful mutation the list is fetched again, never patched locally.
//! - Only the latest load may commit; late responses to superseded loads are dropped.
//! - A session has at most one submit in flight.
//! - Every failure ends up in the [`Notice`] slot; none escapes to crash a screen.
//!
//! ## Testing
//!
//! [`mock::MockSource`] answers from queued expectations;
//! [`channel::ChannelSource`] hands every call to the test over a channel so
//! responses can be delayed and reordered.

pub mod channel;
pub mod collection;
pub mod controller;
pub mod envelope;
pub mod error;
pub mod mock;
pub mod notice;
pub mod resource;
pub mod session;
pub mod source;
pub mod tracing;

// Re-export core types for convenience
pub use collection::{filter, Filter, LoadStatus, ResourceCollection};
pub use controller::{ListView, ResourceListController};
pub use envelope::{decode_list, normalize_list};
pub use error::{ApiError, Mutation, SubmitError};
pub use notice::{Notice, NoticeKind, DEFAULT_NOTICE_TTL};
pub use resource::Resource;
pub use session::{EditMode, EditSession};
pub use source::ResourceSource;
