//! # User Role Client
//!
//! Role assignment lives under the user it applies to.
use super::http::ApiClient;
use crate::model::{RoleId, UserId};
use list_controller::ApiError;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct UserRoleClient {
    client: ApiClient,
}

impl UserRoleClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST users/{id}/roles` with `{"roleId": ..}`
    #[instrument(skip(self))]
    pub async fn assign_role(&self, user: UserId, role: RoleId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.client
            .send_json(
                Method::POST,
                &format!("users/{user}/roles"),
                Some(&json!({ "roleId": role })),
            )
            .await
    }

    /// `DELETE users/{id}/roles/{roleId}`
    #[instrument(skip(self))]
    pub async fn revoke_role(&self, user: UserId, role: RoleId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.client
            .send_json::<Value>(Method::DELETE, &format!("users/{user}/roles/{role}"), None)
            .await
    }
}
