use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{error_message, LeadClient, PaymentIntentClient};
use crate::errors::BookingError;
use crate::models::{LeadAck, LeadRecord, PaymentIntentRequest, PaymentIntentResponse};

const LEADS_PATH: &str = "/leads/";
const CREATE_INTENT_PATH: &str = "/payments/create-intent/";

/// Lead-intake and payment-intent endpoints of the website backend.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BookingError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url, "backend request failed");
                BookingError::Network(e)
            })?;

        if !resp.status().is_success() {
            let err = error_from_response(resp).await;
            tracing::warn!(error = %err, url, "backend rejected request");
            return Err(err);
        }

        resp.json::<T>()
            .await
            .map_err(|e| BookingError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LeadClient for HttpBackend {
    async fn submit(&self, record: &LeadRecord) -> Result<LeadAck, BookingError> {
        let ack: LeadAck = self.post_json(LEADS_PATH, record).await?;
        tracing::info!(lead_id = ?ack.lead_id, "lead submitted");
        Ok(ack)
    }
}

#[async_trait]
impl PaymentIntentClient for HttpBackend {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, BookingError> {
        let resp: PaymentIntentResponse = self.post_json(CREATE_INTENT_PATH, request).await?;
        tracing::info!(payment_id = ?resp.payment_id, "payment intent created");
        Ok(resp)
    }
}

/// Maps a non-2xx response to `Server` when a JSON body names the problem,
/// otherwise to `ServerStatus`.
pub(crate) async fn error_from_response(resp: reqwest::Response) -> BookingError {
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(body) = resp.json::<serde_json::Value>().await {
            if let Some(message) = error_message(&body) {
                return BookingError::Server {
                    status: status.as_u16(),
                    message,
                };
            }
        }
    }

    BookingError::ServerStatus {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}
