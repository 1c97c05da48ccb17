//! Cancellation requests reviewed by the program council.

use super::CancellationRequestId;
use list_controller::{filter, Filter, Resource};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationStatus {
    Pending,
    Approved,
    Rejected,
}

impl CancellationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancellationStatus::Pending => "PENDING",
            CancellationStatus::Approved => "APPROVED",
            CancellationStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationRequest {
    pub id: CancellationRequestId,
    pub student_name: String,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub modality_name: Option<String>,
    pub reason: String,
    pub status: CancellationStatus,
    #[serde(default)]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub council_comment: Option<String>,
}

/// Students only edit the reason; the council decides through [`CouncilDecision`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationDraft {
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    /// Past participle used in the success notice.
    pub fn done_label(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }
}

/// Body of the council's decision on a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouncilDecision {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CancellationRequest {
    pub fn is_pending(&self) -> bool {
        self.status == CancellationStatus::Pending
    }

    /// Filter for the council's "to review" tab.
    pub fn pending_only() -> Filter<CancellationRequest> {
        filter(CancellationRequest::is_pending)
    }
}

impl Resource for CancellationRequest {
    type Id = CancellationRequestId;
    type Draft = CancellationDraft;
    const NAME: &'static str = "Cancellation request";
    const PLURAL: &'static str = "cancellationRequests";
    const LABEL: &'static str = "cancellation requests";

    fn id(&self) -> CancellationRequestId {
        self.id
    }

    fn to_draft(&self) -> CancellationDraft {
        CancellationDraft {
            reason: self.reason.clone(),
        }
    }
}

impl fmt::Display for CancellationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {:<9} {} ({}) - {}",
            self.id,
            self.status.as_str(),
            self.student_name,
            self.modality_name.as_deref().unwrap_or("no modality"),
            self.reason
        )
    }
}
