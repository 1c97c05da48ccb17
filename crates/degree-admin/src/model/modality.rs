use super::{default_true, ModalityId, ProgramId, ProgramModalityId};
use list_controller::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A way of obtaining a degree (thesis, internship, exam, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DegreeModality {
    pub id: ModalityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalityDraft {
    pub name: String,
    pub description: Option<String>,
}

impl Resource for DegreeModality {
    type Id = ModalityId;
    type Draft = ModalityDraft;
    const NAME: &'static str = "Modality";
    const PLURAL: &'static str = "modalities";

    fn id(&self) -> ModalityId {
        self.id
    }

    fn to_draft(&self) -> ModalityDraft {
        ModalityDraft {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for DegreeModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {}", self.id, self.name)?;
        if let Some(description) = &self.description {
            write!(f, " - {description}")?;
        }
        Ok(())
    }
}

/// Offers a modality within a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramModality {
    pub id: ProgramModalityId,
    pub program_id: ProgramId,
    pub modality_id: ModalityId,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub modality_name: Option<String>,
    #[serde(default)]
    pub credits_required: Option<u32>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramModalityDraft {
    pub program_id: Option<ProgramId>,
    pub modality_id: Option<ModalityId>,
    pub credits_required: Option<u32>,
}

impl Resource for ProgramModality {
    type Id = ProgramModalityId;
    type Draft = ProgramModalityDraft;
    const NAME: &'static str = "Program modality";
    const PLURAL: &'static str = "programModalities";
    const LABEL: &'static str = "program modalities";

    fn id(&self) -> ProgramModalityId {
        self.id
    }

    fn to_draft(&self) -> ProgramModalityDraft {
        ProgramModalityDraft {
            program_id: Some(self.program_id),
            modality_id: Some(self.modality_id),
            credits_required: self.credits_required,
        }
    }
}

impl fmt::Display for ProgramModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self
            .program_name
            .clone()
            .unwrap_or_else(|| format!("program {}", self.program_id));
        let modality = self
            .modality_name
            .clone()
            .unwrap_or_else(|| format!("modality {}", self.modality_id));
        write!(f, "{:>4}  {program} / {modality}", self.id)?;
        if let Some(credits) = self.credits_required {
            write!(f, " ({credits} credits)")?;
        }
        Ok(())
    }
}
