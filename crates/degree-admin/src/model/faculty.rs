use super::{default_true, FacultyId};
use list_controller::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDraft {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

impl Resource for Faculty {
    type Id = FacultyId;
    type Draft = FacultyDraft;
    const NAME: &'static str = "Faculty";
    const PLURAL: &'static str = "faculties";

    fn id(&self) -> FacultyId {
        self.id
    }

    fn to_draft(&self) -> FacultyDraft {
        FacultyDraft {
            name: self.name.clone(),
            code: self.code.clone().unwrap_or_default(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {:<10} {}",
            self.id,
            self.code.as_deref().unwrap_or("-"),
            self.name
        )?;
        if !self.active {
            write!(f, " (inactive)")?;
        }
        Ok(())
    }
}
