//! # Domain Models
//!
//! One module per admin screen. Each entity implements
//! [`Resource`](list_controller::Resource) with a matching `*Draft` holding the
//! fields its form edits. Drafts serialize in the API's camelCase, which is
//! also the name required-field checks use.

pub mod access;
pub mod council;
pub mod document;
pub mod faculty;
pub mod modality;
pub mod program;
pub mod requirement;
pub mod user;

pub use access::*;
pub use council::*;
pub use document::*;
pub use faculty::*;
pub use modality::*;
pub use program::*;
pub use requirement::*;
pub use user::*;

/// Declares server-assigned numeric identifiers.
///
/// `Display` is the bare number because ids are interpolated into endpoint
/// paths (`programs/12`).
macro_rules! resource_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
                serde::Serialize, serde::Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }
        )*
    };
}

resource_id!(
    FacultyId,
    ProgramId,
    ModalityId,
    /// Identifier of a program/modality link.
    ProgramModalityId,
    DocumentId,
    RequirementId,
    RoleId,
    PermissionId,
    UserId,
    CancellationRequestId,
);

pub(crate) fn default_true() -> bool {
    true
}
