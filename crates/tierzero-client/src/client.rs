//! Typed operations on the alert responder API.
//!
//! Each operation is one transport call followed by one decode. The client
//! owns no state beyond the transport handle.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::model::{
    AlertResponder, CreateAlertResponderRequest, ListAlertRespondersResponse,
    UpdateAlertResponderRequest,
};
use crate::transport::{DynTransport, Method, Transport};

const COLLECTION_PATH: &str = "/alert-responders";

#[derive(Clone)]
pub struct TierZeroClient {
    transport: DynTransport,
}

impl TierZeroClient {
    pub fn new(transport: DynTransport) -> Self {
        Self { transport }
    }

    pub fn from_transport(transport: impl Transport + 'static) -> Self {
        Self::new(Arc::new(transport))
    }

    pub async fn create(
        &self,
        request: &CreateAlertResponderRequest,
    ) -> Result<AlertResponder, ClientError> {
        const OP: &str = "create alert responder";
        let body = encode(OP, request)?;
        tracing::debug!(team_name = %request.team_name, name = %request.name, "Creating alert responder");
        self.call(OP, None, Method::Post, COLLECTION_PATH.to_string(), Some(body))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<AlertResponder, ClientError> {
        const OP: &str = "get alert responder";
        tracing::debug!(responder_id = %id, "Fetching alert responder");
        self.call(OP, Some(id), Method::Get, item_path(id), None).await
    }

    /// List responders, optionally restricted to one team.
    pub async fn list(&self, team_name: Option<&str>) -> Result<Vec<AlertResponder>, ClientError> {
        const OP: &str = "list alert responders";
        let path = match team_name.filter(|t| !t.is_empty()) {
            Some(team) => {
                let encoded: String = url::form_urlencoded::byte_serialize(team.as_bytes()).collect();
                format!("{COLLECTION_PATH}?team_name={encoded}")
            }
            None => COLLECTION_PATH.to_string(),
        };
        tracing::debug!(team_name = ?team_name, "Listing alert responders");
        let response: ListAlertRespondersResponse =
            self.call(OP, None, Method::Get, path, None).await?;
        Ok(response.alert_responders)
    }

    /// Partial update: only fields set in `request` change remotely.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateAlertResponderRequest,
    ) -> Result<AlertResponder, ClientError> {
        const OP: &str = "update alert responder";
        let body = encode(OP, request)?;
        tracing::debug!(responder_id = %id, "Updating alert responder");
        self.call(OP, Some(id), Method::Put, item_path(id), Some(body))
            .await
    }

    /// Soft delete.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        const OP: &str = "delete alert responder";
        tracing::debug!(responder_id = %id, "Deleting alert responder");
        self.transport
            .do_request(Method::Delete, &item_path(id), None)
            .await
            .map_err(|e| ClientError::from_transport(OP, Some(id), e))?;
        Ok(())
    }

    /// Sets status to ACTIVE.
    pub async fn enable(&self, id: &str) -> Result<AlertResponder, ClientError> {
        const OP: &str = "enable alert responder";
        tracing::debug!(responder_id = %id, "Enabling alert responder");
        let path = format!("{}/enable", item_path(id));
        self.call(OP, Some(id), Method::Post, path, None).await
    }

    /// Sets status to PAUSED.
    pub async fn disable(&self, id: &str) -> Result<AlertResponder, ClientError> {
        const OP: &str = "disable alert responder";
        tracing::debug!(responder_id = %id, "Disabling alert responder");
        let path = format!("{}/disable", item_path(id));
        self.call(OP, Some(id), Method::Post, path, None).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        id: Option<&str>,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let bytes = self
            .transport
            .do_request(method, &path, body)
            .await
            .map_err(|e| ClientError::from_transport(operation, id, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::decode(operation, e))
    }
}

fn item_path(id: &str) -> String {
    format!("{COLLECTION_PATH}/{id}")
}

fn encode<T: serde::Serialize>(operation: &'static str, request: &T) -> Result<Value, ClientError> {
    serde_json::to_value(request).map_err(|e| ClientError::decode(operation, e))
}
