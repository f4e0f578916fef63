use serde::Serialize;

use crate::models::CustomerInfoForm;
use crate::services::slots::BookableSlots;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Info,
    Payment,
    Success,
}

impl BookingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStep::Info => "info",
            BookingStep::Payment => "payment",
            BookingStep::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaymentPhase {
    /// Intent creation in flight.
    Loading,
    Ready { client_secret: String },
    Failed { message: String },
    Redirecting { url: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingSession {
    pub step: BookingStep,
    pub customer_info: CustomerInfoForm,
    pub error: Option<String>,
    pub is_submitting: bool,
    pub payment: Option<PaymentPhase>,
    pub lead_id: Option<i64>,
    pub slots: BookableSlots,
}

impl Default for BookingSession {
    fn default() -> Self {
        Self {
            step: BookingStep::Info,
            customer_info: CustomerInfoForm::default(),
            error: None,
            is_submitting: false,
            payment: None,
            lead_id: None,
            slots: BookableSlots::empty(),
        }
    }
}

impl BookingSession {
    pub fn new(slots: BookableSlots) -> Self {
        Self {
            slots,
            ..Default::default()
        }
    }

    /// Back to an empty info step. Offered slots are kept.
    pub fn reset(&mut self) {
        let slots = std::mem::replace(&mut self.slots, BookableSlots::empty());
        *self = Self::new(slots);
    }

    pub fn client_secret(&self) -> Option<&str> {
        match &self.payment {
            Some(PaymentPhase::Ready { client_secret }) => Some(client_secret.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_reset_clears_everything_but_slots() {
        let slots = BookableSlots::generate(7, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        let mut session = BookingSession::new(slots.clone());
        session.step = BookingStep::Payment;
        session.customer_info.name = Some("Jane".to_string());
        session.error = Some("boom".to_string());
        session.is_submitting = true;
        session.payment = Some(PaymentPhase::Ready {
            client_secret: "pi_1_secret_2".to_string(),
        });
        session.lead_id = Some(3);

        session.reset();

        assert_eq!(session.step, BookingStep::Info);
        assert!(session.customer_info.is_empty());
        assert!(session.error.is_none());
        assert!(!session.is_submitting);
        assert!(session.payment.is_none());
        assert!(session.lead_id.is_none());
        assert_eq!(session.slots, slots);
    }

    #[test]
    fn test_serialized_shape() {
        let mut session = BookingSession::default();
        session.step = BookingStep::Payment;
        session.payment = Some(PaymentPhase::Failed {
            message: "nope".to_string(),
        });
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["step"], "payment");
        assert_eq!(value["payment"]["state"], "failed");
        assert_eq!(value["payment"]["message"], "nope");
    }
}
