pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::BookingError;
use crate::models::{LeadAck, LeadRecord, PaymentIntentRequest, PaymentIntentResponse};

#[async_trait]
pub trait LeadClient: Send + Sync {
    async fn submit(&self, record: &LeadRecord) -> Result<LeadAck, BookingError>;
}

#[async_trait]
pub trait PaymentIntentClient: Send + Sync {
    async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, BookingError>;
}

/// User-facing message from a JSON error body: `errors` first, then `error`.
pub fn error_message(body: &Value) -> Option<String> {
    body.get("errors")
        .and_then(flatten_message)
        .or_else(|| body.get("error").and_then(flatten_message))
}

fn flatten_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_message).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message") {
                return Some(message.clone());
            }
            // Field errors, e.g. {"email": ["Enter a valid email address."]}
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, v)| {
                    flatten_message(v).map(|m| {
                        if field == "non_field_errors" {
                            m
                        } else {
                            format!("{field}: {m}")
                        }
                    })
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_errors() {
        assert_eq!(
            error_message(&json!({"success": false, "errors": "Duplicate email"})),
            Some("Duplicate email".to_string())
        );
        assert_eq!(
            error_message(&json!({"error": "Invalid amount"})),
            Some("Invalid amount".to_string())
        );
    }

    #[test]
    fn test_errors_preferred_over_error() {
        let body = json!({"errors": "first", "error": "second"});
        assert_eq!(error_message(&body), Some("first".to_string()));
    }

    #[test]
    fn test_field_errors_flattened() {
        let body = json!({"errors": {"email": ["Enter a valid email address."]}});
        assert_eq!(
            error_message(&body),
            Some("email: Enter a valid email address.".to_string())
        );
        let body = json!({"errors": {"non_field_errors": ["Already booked."]}});
        assert_eq!(error_message(&body), Some("Already booked.".to_string()));
    }

    #[test]
    fn test_nested_processor_error() {
        let body = json!({"error": {"type": "card_error", "message": "Your card was declined."}});
        assert_eq!(error_message(&body), Some("Your card was declined.".to_string()));
    }

    #[test]
    fn test_no_message() {
        assert_eq!(error_message(&json!({"success": false})), None);
        assert_eq!(error_message(&json!({"error": ""})), None);
        assert_eq!(error_message(&json!({"error": 500})), None);
    }
}
