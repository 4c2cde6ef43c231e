use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::Transport;
use crate::config::PipelineConfig;
use crate::envelope::EventEnvelope;
use crate::error::{PipelineError, TransportError};

/// Carries the session id, which is not part of the JSON body.
pub const SESSION_HEADER: &str = "X-Session-Id";

/// POSTs each envelope as JSON.
///
/// Success means a 2xx response whose body parses as JSON. Connection
/// errors, timeouts, other statuses and non-JSON bodies are all failures.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        Self::new(config.endpoint.clone(), Duration::from_millis(config.request_timeout_ms))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, envelope: &EventEnvelope) -> Result<(), TransportError> {
        let body = envelope
            .payload()
            .map_err(|e| TransportError::Serialization(e.to_string()))?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(session) = envelope.session_id() {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let ack = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        serde_json::from_slice::<serde_json::Value>(&ack)
            .map_err(|e| TransportError::MalformedAck(e.to_string()))?;

        debug!(
            url = %self.endpoint,
            event_type = %envelope.event_type(),
            status = %status,
            "Event delivered"
        );
        Ok(())
    }
}
