//! Client for the external document-generation endpoint.
//!
//! The endpoint takes the flattened record as a form body (repeated fields sent
//! once per entry, plus `template` and `color`) and answers with the finished
//! document bytes. One attempt per request; failures go back to the user, who
//! can resubmit.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec::{serialize, to_form_pairs};
use crate::models::ResumeRecord;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),

    #[error("A document is already being generated")]
    InFlight,

    #[error("Document endpoint returned {status}: {body}")]
    EndpointStatus { status: u16, body: String },

    #[error("Document endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GenerationError {
    /// True for failures of the endpoint itself, as opposed to a request that
    /// was never sent.
    pub fn is_endpoint_failure(&self) -> bool {
        matches!(
            self,
            GenerationError::EndpointStatus { .. } | GenerationError::Transport(_)
        )
    }
}

/// Backend that turns a record into a document. Carried in `AppState` as
/// `Arc<dyn DocumentGenerator>`.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, record: &ResumeRecord) -> Result<Bytes, GenerationError>;
}

#[derive(Clone)]
pub struct HttpGenerator {
    client: Client,
    endpoint: String,
}

impl HttpGenerator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl DocumentGenerator for HttpGenerator {
    async fn generate(&self, record: &ResumeRecord) -> Result<Bytes, GenerationError> {
        let form = to_form_pairs(&serialize(record));

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Document endpoint request failed: {e}");
                GenerationError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Document endpoint returned {status}: {body}");
            return Err(GenerationError::EndpointStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!("Document endpoint returned {} bytes", bytes.len());
        Ok(bytes)
    }
}
