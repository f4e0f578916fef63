use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "gbp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntentRequest {
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    #[serde(default)]
    pub payment_id: Option<i64>,
}

/// Payment method collected by the hosted payment form, e.g. `pm_card_visa`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentDetails {
    #[serde(default)]
    pub payment_method: String,
}

/// Handle to a payment form bound to one intent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentWidget {
    pub intent_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Succeeded,
    Processing,
    RedirectRequired(String),
}
