//! Documents a student has to upload for a modality.

use super::{default_true, DocumentId, ModalityId};
use list_controller::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredDocument {
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub modality_id: ModalityId,
    /// Comma separated, as stored by the backend: `"pdf, docx"`.
    #[serde(default)]
    pub allowed_extensions: Option<String>,
    #[serde(default)]
    pub max_size_mb: Option<u32>,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    pub name: String,
    pub description: Option<String>,
    pub modality_id: Option<ModalityId>,
    pub allowed_extensions: Option<String>,
    pub max_size_mb: Option<u32>,
    pub mandatory: bool,
}

/// Label shown next to a document in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBadge {
    Pdf,
    Word,
    Image,
    Spreadsheet,
    Other(String),
    Mandatory,
    Optional,
}

impl DocumentBadge {
    fn for_extension(ext: &str) -> Self {
        match ext {
            "pdf" => DocumentBadge::Pdf,
            "doc" | "docx" | "odt" => DocumentBadge::Word,
            "png" | "jpg" | "jpeg" | "gif" | "webp" => DocumentBadge::Image,
            "xls" | "xlsx" | "ods" | "csv" => DocumentBadge::Spreadsheet,
            other => DocumentBadge::Other(other.to_uppercase()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DocumentBadge::Pdf => "PDF",
            DocumentBadge::Word => "Word",
            DocumentBadge::Image => "Image",
            DocumentBadge::Spreadsheet => "Spreadsheet",
            DocumentBadge::Other(ext) => ext,
            DocumentBadge::Mandatory => "Mandatory",
            DocumentBadge::Optional => "Optional",
        }
    }
}

impl RequiredDocument {
    /// File-type badges (deduplicated, in declaration order) followed by the
    /// mandatory/optional badge.
    pub fn badges(&self) -> Vec<DocumentBadge> {
        let mut badges: Vec<DocumentBadge> = Vec::new();
        let extensions = self.allowed_extensions.as_deref().unwrap_or_default();
        for ext in extensions.split([',', ';', ' ']) {
            let ext = ext.trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let badge = DocumentBadge::for_extension(&ext);
            if !badges.contains(&badge) {
                badges.push(badge);
            }
        }
        badges.push(if self.mandatory {
            DocumentBadge::Mandatory
        } else {
            DocumentBadge::Optional
        });
        badges
    }
}

impl Resource for RequiredDocument {
    type Id = DocumentId;
    type Draft = DocumentDraft;
    const NAME: &'static str = "Required document";
    const PLURAL: &'static str = "requiredDocuments";
    const LABEL: &'static str = "required documents";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn to_draft(&self) -> DocumentDraft {
        DocumentDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            modality_id: Some(self.modality_id),
            allowed_extensions: self.allowed_extensions.clone(),
            max_size_mb: self.max_size_mb,
            mandatory: self.mandatory,
        }
    }
}

impl fmt::Display for RequiredDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let badges = self.badges();
        let labels: Vec<&str> = badges.iter().map(DocumentBadge::label).collect();
        write!(f, "{:>4}  {} [{}]", self.id, self.name, labels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(extensions: Option<&str>, mandatory: bool) -> RequiredDocument {
        RequiredDocument {
            id: DocumentId(1),
            name: "Final report".into(),
            description: None,
            modality_id: ModalityId(2),
            allowed_extensions: extensions.map(str::to_owned),
            max_size_mb: None,
            mandatory,
            active: true,
        }
    }

    #[test]
    fn badges_follow_extensions() {
        let doc = document(Some(".PDF, docx;doc  png,zip"), true);
        assert_eq!(
            doc.badges(),
            vec![
                DocumentBadge::Pdf,
                DocumentBadge::Word,
                DocumentBadge::Image,
                DocumentBadge::Other("ZIP".into()),
                DocumentBadge::Mandatory,
            ]
        );
    }

    #[test]
    fn no_extensions_only_marks_optionality() {
        assert_eq!(document(None, false).badges(), vec![DocumentBadge::Optional]);
        assert_eq!(document(Some(" , "), true).to_string(), "   1  Final report [Mandatory]");
    }
}
