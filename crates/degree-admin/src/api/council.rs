//! # Council Client
//!
//! The council does not edit cancellation requests, it decides on them.
use super::http::ApiClient;
use crate::model::{CancellationRequestId, CouncilDecision};
use list_controller::ApiError;
use reqwest::Method;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct CouncilClient {
    client: ApiClient,
}

impl CouncilClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST cancellation-requests/{id}/decision`
    #[instrument(skip(self))]
    pub async fn decide(
        &self,
        id: CancellationRequestId,
        decision: &CouncilDecision,
    ) -> Result<(), ApiError> {
        debug!("Sending request");
        self.client
            .send_json(
                Method::POST,
                &format!("cancellation-requests/{id}/decision"),
                Some(decision),
            )
            .await
    }
}
