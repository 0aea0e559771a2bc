//! Mail relay collaborator
//!
//! The contact form hands a validated [`ContactPayload`] to a [`MailRelay`].
//! Delivery itself is outside this crate; only the send contract lives here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RelayError;

/// Template parameters sent for one contact message
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Successful relay answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub status: u16,
    pub text: String,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            text: "OK".to_string(),
        }
    }
}

/// Delivers contact messages through a templated mail service
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &ContactPayload,
    ) -> Result<RelayResponse, RelayError>;
}

/// Logs the payload instead of delivering it
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunRelay;

#[async_trait]
impl MailRelay for DryRunRelay {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        payload: &ContactPayload,
    ) -> Result<RelayResponse, RelayError> {
        let body = serde_json::to_string(payload)
            .map_err(|err| RelayError::Transport(err.to_string()))?;
        info!(service_id, template_id, %body, "dry run: contact message not delivered");
        Ok(RelayResponse::ok())
    }
}

/// Relay used when no mail service is configured
#[derive(Clone, Copy, Debug, Default)]
pub struct MissingMailRelay;

#[async_trait]
impl MailRelay for MissingMailRelay {
    async fn send(
        &self,
        service_id: &str,
        _template_id: &str,
        _payload: &ContactPayload,
    ) -> Result<RelayResponse, RelayError> {
        Err(RelayError::Transport(format!(
            "mail service {service_id:?} is not configured"
        )))
    }
}
