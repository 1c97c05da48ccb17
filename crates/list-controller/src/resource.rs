//! # Resource Trait
//!
//! The `Resource` trait is the contract every entity shown on an admin screen
//! (Faculty, Program, Role, ...) implements so one generic
//! [`ResourceListController`](crate::ResourceListController) can drive all of
//! them.
//!
//! Associated types keep the pieces apart: the persisted item `T` is what the
//! list renders, `T::Draft` is what the form edits and what gets sent to the
//! server. A `FacultyDraft` can never be submitted through a program screen.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// An entity that can be listed, edited through a draft, and mutated on a
/// remote source.
pub trait Resource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Server-assigned identifier.
    type Id: Clone + Debug + Display + PartialEq + Send + Sync + 'static;

    /// The editable fields, staged in an [`EditSession`](crate::EditSession).
    ///
    /// Must serialize to a JSON object; required-field checks look the
    /// declared names up in that object.
    type Draft: Clone + Debug + Serialize + Send + Sync + 'static;

    /// Human-readable singular name, used in notices ("Faculty created successfully").
    const NAME: &'static str;

    /// Plural name as the API spells it. Also one of the keys a list
    /// envelope may use (`{"requiredDocuments": [...]}`).
    const PLURAL: &'static str;

    /// Plural noun for notices ("Could not load required documents").
    const LABEL: &'static str = Self::PLURAL;

    fn id(&self) -> Self::Id;

    /// Copy the editable fields into a fresh draft.
    fn to_draft(&self) -> Self::Draft;
}
