use super::{default_true, ModalityId, RequirementId};
use list_controller::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An academic condition a student must meet to enrol in a modality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: RequirementId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub modality_id: ModalityId,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDraft {
    pub name: String,
    pub description: Option<String>,
    pub modality_id: Option<ModalityId>,
}

impl Resource for Requirement {
    type Id = RequirementId;
    type Draft = RequirementDraft;
    const NAME: &'static str = "Requirement";
    const PLURAL: &'static str = "requirements";

    fn id(&self) -> RequirementId {
        self.id
    }

    fn to_draft(&self) -> RequirementDraft {
        RequirementDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            modality_id: Some(self.modality_id),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {} [modality {}]", self.id, self.name, self.modality_id)
    }
}
