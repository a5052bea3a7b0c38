//! Outbound call to the external endpoint.
//!
//! One POST per relayed message. No retries: a failed attempt is returned to
//! the caller as either `RelayError::Downstream` (the endpoint answered with a
//! non-2xx status) or `RelayError::Transport` (the request never completed).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ForwardConfig;
use crate::error::RelayError;
use crate::models::RelayRequest;

/// Abstraction over the transport used to reach the external endpoint.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Send `request` to `endpoint`. Returns the response body text on 2xx.
    async fn forward(&self, endpoint: &str, request: &RelayRequest) -> Result<String, RelayError>;
}

/// reqwest-backed forwarder.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    pub fn new(config: &ForwardConfig) -> Result<Self, RelayError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, endpoint: &str, request: &RelayRequest) -> Result<String, RelayError> {
        tracing::info!(
            conversation_id = %request.conversation_id,
            "Calling external endpoint"
        );

        // .json() sets Content-Type: application/json
        let response = self.client.post(endpoint).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "External endpoint call failed"
            );
            return Err(RelayError::Downstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        tracing::info!(result = %body, "External endpoint call successful");
        Ok(body)
    }
}
