//! The single transient message slot shared by success and failure reports.

use std::time::Duration;

/// How long a success notice stays up unless dismissed earlier.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    // Sequence number; a delayed clear only removes the notice it was scheduled for.
    pub(crate) seq: u64,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}
