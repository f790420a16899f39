use crate::types::{OrderPayload, SubmitResponse};
use crate::{OrderError, Result};
use std::future::Future;
use std::time::Duration;

/// Default request timeout for [`HttpOrderClient`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Outbound order submission.
///
/// Implementations make exactly one attempt per call.
pub trait OrderClient {
    fn submit(&self, payload: &OrderPayload) -> impl Future<Output = Result<()>> + Send;
}

/// JSON-over-HTTP submission endpoint
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOrderClient {
    /// Create a client posting to `endpoint`
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the submission endpoint
    /// * `timeout` - Limit for the whole request, including the upload
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OrderClient for HttpOrderClient {
    async fn submit(&self, payload: &OrderPayload) -> Result<()> {
        if payload.image_base64.is_empty() {
            return Err(OrderError::EmptyImage);
        }

        log::info!(
            "Submitting order {} ({} bytes of base64) to {}",
            payload.order_id,
            payload.image_base64.len(),
            self.endpoint
        );
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match interpret_response(status, &body) {
            Ok(()) => {
                log::info!("Order {} accepted", payload.order_id);
                Ok(())
            }
            Err(e) => {
                log::warn!("Order {} failed: {}", payload.order_id, e);
                Err(e)
            }
        }
    }
}

/// Map an endpoint reply to the submission outcome.
///
/// Non-2xx is a status error carrying the body's `error` field when there is
/// one; a 2xx reply must be JSON with `success: true`.
pub fn interpret_response(status: u16, body: &str) -> Result<()> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<SubmitResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(OrderError::Status { status, message });
    }

    let response: SubmitResponse = serde_json::from_str(body)?;
    if response.success {
        Ok(())
    } else {
        Err(OrderError::Rejected(
            response.error.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}
