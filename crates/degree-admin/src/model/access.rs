//! Roles and the permissions they grant.

use super::{PermissionId, RoleId};
use list_controller::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: PermissionId,
    /// Stable machine name, e.g. `MODALITY_EDIT`.
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDraft {
    pub code: String,
    pub description: Option<String>,
}

impl Resource for Permission {
    type Id = PermissionId;
    type Draft = PermissionDraft;
    const NAME: &'static str = "Permission";
    const PLURAL: &'static str = "permissions";

    fn id(&self) -> PermissionId {
        self.id
    }

    fn to_draft(&self) -> PermissionDraft {
        PermissionDraft {
            code: self.code.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {}", self.id, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Roles are saved with the ids of the permissions they grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDraft {
    pub name: String,
    pub description: Option<String>,
    pub permission_ids: Vec<PermissionId>,
}

impl Resource for Role {
    type Id = RoleId;
    type Draft = RoleDraft;
    const NAME: &'static str = "Role";
    const PLURAL: &'static str = "roles";

    fn id(&self) -> RoleId {
        self.id
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            permission_ids: self.permissions.iter().map(|p| p.id).collect(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.permissions.iter().map(|p| p.code.as_str()).collect();
        write!(f, "{:>4}  {} ({})", self.id, self.name, codes.join(", "))
    }
}
