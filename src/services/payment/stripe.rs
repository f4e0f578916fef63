use async_trait::async_trait;
use serde::Deserialize;

use super::PaymentUi;
use crate::errors::BookingError;
use crate::models::{ConfirmOutcome, PaymentDetails, PaymentWidget};
use crate::services::api::http::error_from_response;

pub struct StripePaymentUi {
    publishable_key: String,
    api_base: String,
    client: reqwest::Client,
}

impl StripePaymentUi {
    pub fn new(publishable_key: String, api_base: String) -> Self {
        Self {
            publishable_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntentStatus {
    status: String,
    #[serde(default)]
    next_action: Option<NextAction>,
    #[serde(default)]
    last_payment_error: Option<LastPaymentError>,
}

#[derive(Debug, Deserialize)]
struct NextAction {
    #[serde(default)]
    redirect_to_url: Option<RedirectToUrl>,
}

#[derive(Debug, Deserialize)]
struct RedirectToUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct LastPaymentError {
    #[serde(default)]
    message: Option<String>,
}

/// `pi_123_secret_abc` -> `pi_123`.
pub fn intent_id_from_secret(client_secret: &str) -> Option<&str> {
    let (id, secret) = client_secret.split_once("_secret_")?;
    (id.starts_with("pi_") && id.len() > 3 && !secret.is_empty()).then_some(id)
}

#[async_trait]
impl PaymentUi for StripePaymentUi {
    async fn mount(&self, client_secret: &str) -> Result<PaymentWidget, BookingError> {
        if self.publishable_key.is_empty() {
            return Err(BookingError::Config(
                "STRIPE_PUBLISHABLE_KEY is not set".to_string(),
            ));
        }
        let intent_id = intent_id_from_secret(client_secret)
            .ok_or_else(|| BookingError::Decode("malformed client secret".to_string()))?;

        Ok(PaymentWidget {
            intent_id: intent_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    async fn submit(
        &self,
        _widget: &PaymentWidget,
        details: &PaymentDetails,
    ) -> Result<(), BookingError> {
        let method = details.payment_method.trim();
        if method.is_empty() {
            return Err(BookingError::PaymentValidation(
                "Your payment details are incomplete.".to_string(),
            ));
        }
        if !method.starts_with("pm_") {
            return Err(BookingError::PaymentValidation(
                "Your payment method is invalid.".to_string(),
            ));
        }
        Ok(())
    }

    async fn confirm(
        &self,
        widget: &PaymentWidget,
        details: &PaymentDetails,
        return_url: &str,
    ) -> Result<ConfirmOutcome, BookingError> {
        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.api_base, widget.intent_id
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.publishable_key)
            .form(&[
                ("client_secret", widget.client_secret.as_str()),
                ("payment_method", details.payment_method.trim()),
                ("return_url", return_url),
            ])
            .send()
            .await
            .map_err(|e| BookingError::PaymentConfirmation(e.to_string()))?;

        if !resp.status().is_success() {
            let err = error_from_response(resp).await;
            return Err(BookingError::PaymentConfirmation(err.to_string()));
        }

        let intent: IntentStatus = resp
            .json()
            .await
            .map_err(|e| BookingError::PaymentConfirmation(e.to_string()))?;

        tracing::info!(intent_id = %widget.intent_id, status = %intent.status, "payment confirmation returned");

        match intent.status.as_str() {
            "succeeded" => Ok(ConfirmOutcome::Succeeded),
            "processing" => Ok(ConfirmOutcome::Processing),
            "requires_action" => match intent.next_action.and_then(|a| a.redirect_to_url) {
                Some(redirect) => Ok(ConfirmOutcome::RedirectRequired(redirect.url)),
                None => Err(BookingError::PaymentConfirmation(
                    "Additional authentication is required.".to_string(),
                )),
            },
            _ => Err(BookingError::PaymentConfirmation(
                intent
                    .last_payment_error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "Payment failed".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> StripePaymentUi {
        StripePaymentUi::new("pk_test_123".to_string(), "https://api.stripe.com/".to_string())
    }

    #[test]
    fn test_intent_id_from_secret() {
        assert_eq!(intent_id_from_secret("pi_3Nx_secret_abc"), Some("pi_3Nx"));
        assert_eq!(intent_id_from_secret("pi__secret_abc"), None);
        assert_eq!(intent_id_from_secret("seti_1_secret_abc"), None);
        assert_eq!(intent_id_from_secret("pi_3Nx_secret_"), None);
        assert_eq!(intent_id_from_secret("garbage"), None);
    }

    #[tokio::test]
    async fn test_mount_requires_key() {
        let ui = StripePaymentUi::new(String::new(), "https://api.stripe.com".to_string());
        let err = ui.mount("pi_1_secret_2").await.unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
    }

    #[tokio::test]
    async fn test_mount_and_validate() {
        let ui = ui();
        let widget = ui.mount("pi_1_secret_2").await.unwrap();
        assert_eq!(widget.intent_id, "pi_1");

        let empty = PaymentDetails::default();
        assert!(matches!(
            ui.submit(&widget, &empty).await,
            Err(BookingError::PaymentValidation(_))
        ));

        let bad = PaymentDetails {
            payment_method: "4242424242424242".to_string(),
        };
        assert!(ui.submit(&widget, &bad).await.is_err());

        let good = PaymentDetails {
            payment_method: "pm_card_visa".to_string(),
        };
        assert!(ui.submit(&widget, &good).await.is_ok());
    }
}
