use super::{default_true, FacultyId, ProgramId};
use list_controller::{filter, Filter, Resource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An academic program, owned by a faculty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicProgram {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub faculty_id: FacultyId,
    /// Denormalized by some endpoints; absent on others.
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDraft {
    pub name: String,
    pub code: String,
    pub faculty_id: Option<FacultyId>,
}

impl AcademicProgram {
    /// Client-side "programs of this faculty" filter for the programs screen.
    pub fn of_faculty(faculty: FacultyId) -> Filter<AcademicProgram> {
        filter(move |program: &AcademicProgram| program.faculty_id == faculty)
    }
}

impl Resource for AcademicProgram {
    type Id = ProgramId;
    type Draft = ProgramDraft;
    const NAME: &'static str = "Program";
    const PLURAL: &'static str = "programs";

    fn id(&self) -> ProgramId {
        self.id
    }

    fn to_draft(&self) -> ProgramDraft {
        ProgramDraft {
            name: self.name.clone(),
            code: self.code.clone().unwrap_or_default(),
            faculty_id: Some(self.faculty_id),
        }
    }
}

impl fmt::Display for AcademicProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faculty = match &self.faculty_name {
            Some(name) => name.clone(),
            None => format!("faculty {}", self.faculty_id),
        };
        write!(
            f,
            "{:>4}  {:<10} {} [{}]",
            self.id,
            self.code.as_deref().unwrap_or("-"),
            self.name,
            faculty
        )
    }
}
