//! # Edit Sessions
//!
//! An `EditSession` is the staged state of one create/edit form. The draft is
//! an owned value, separate from anything in the collection, so cancelling a
//! form can never leak into the list.

use crate::error::SubmitError;
use crate::resource::Resource;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Submitting,
    Closed,
}

/// Staged form state for creating or editing one item.
#[derive(Debug)]
pub struct EditSession<T: Resource> {
    mode: EditMode,
    draft: T::Draft,
    target: Option<T>,
    phase: Mutex<Phase>,
}

impl<T: Resource> EditSession<T> {
    pub(crate) fn create(defaults: T::Draft) -> Self {
        Self {
            mode: EditMode::Create,
            draft: defaults,
            target: None,
            phase: Mutex::new(Phase::Open),
        }
    }

    pub(crate) fn edit(item: &T) -> Self {
        Self {
            mode: EditMode::Edit,
            draft: item.to_draft(),
            target: Some(item.clone()),
            phase: Mutex::new(Phase::Open),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &T::Draft {
        &self.draft
    }

    /// Mutable access for the form bindings.
    pub fn draft_mut(&mut self) -> &mut T::Draft {
        &mut self.draft
    }

    /// The item being edited; `None` in create mode.
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Open and not currently submitting.
    pub fn is_open(&self) -> bool {
        self.phase() == Phase::Open
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == Phase::Submitting
    }

    pub fn is_closed(&self) -> bool {
        self.phase() == Phase::Closed
    }

    fn phase(&self) -> Phase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `Open -> Submitting`, or explain why not.
    ///
    /// The returned guard puts the session back to `Open` when dropped
    /// without [`InFlight::close`], which also covers a submit future that
    /// is dropped halfway.
    pub(crate) fn start_submit(&self) -> Result<InFlight<'_, T>, SubmitError> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        match *phase {
            Phase::Open => {
                *phase = Phase::Submitting;
                Ok(InFlight {
                    session: self,
                    closed: false,
                })
            }
            Phase::Submitting => Err(SubmitError::InFlight),
            Phase::Closed => Err(SubmitError::Closed),
        }
    }

    fn set_phase(&self, next: Phase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Marks a session as submitting for as long as it lives.
pub(crate) struct InFlight<'a, T: Resource> {
    session: &'a EditSession<T>,
    closed: bool,
}

impl<T: Resource> InFlight<'_, T> {
    /// The mutation went through: the form is done.
    pub(crate) fn close(mut self) {
        self.closed = true;
        self.session.set_phase(Phase::Closed);
    }
}

impl<T: Resource> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.closed {
            self.session.set_phase(Phase::Open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Tag {
        id: u32,
        label: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct TagDraft {
        label: String,
    }

    impl Resource for Tag {
        type Id = u32;
        type Draft = TagDraft;
        const NAME: &'static str = "Tag";
        const PLURAL: &'static str = "tags";

        fn id(&self) -> u32 {
            self.id
        }

        fn to_draft(&self) -> TagDraft {
            TagDraft {
                label: self.label.clone(),
            }
        }
    }

    #[test]
    fn edit_draft_is_independent_of_target() {
        let tag = Tag {
            id: 1,
            label: "old".into(),
        };
        let mut session = EditSession::edit(&tag);
        session.draft_mut().label = "new".into();

        assert_eq!(session.mode(), EditMode::Edit);
        assert_eq!(session.target(), Some(&tag));
        assert_eq!(tag.label, "old");
        assert_eq!(session.draft().label, "new");
    }

    #[test]
    fn second_start_is_rejected_while_in_flight() {
        let session = EditSession::<Tag>::create(TagDraft {
            label: String::new(),
        });
        let guard = session.start_submit().unwrap();
        assert!(session.is_submitting());
        assert_eq!(session.start_submit().err(), Some(SubmitError::InFlight));

        drop(guard);
        assert!(session.is_open());

        session.start_submit().unwrap().close();
        assert!(session.is_closed());
        assert_eq!(session.start_submit().err(), Some(SubmitError::Closed));
    }
}
