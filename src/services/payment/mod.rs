pub mod stripe;

use async_trait::async_trait;

use crate::errors::BookingError;
use crate::models::{ConfirmOutcome, PaymentDetails, PaymentWidget};

/// Hosted payment form bound to a payment intent.
#[async_trait]
pub trait PaymentUi: Send + Sync {
    async fn mount(&self, client_secret: &str) -> Result<PaymentWidget, BookingError>;

    /// Field-level validation of the collected details. Errors are
    /// `BookingError::PaymentValidation`.
    async fn submit(
        &self,
        widget: &PaymentWidget,
        details: &PaymentDetails,
    ) -> Result<(), BookingError>;

    /// Errors are `BookingError::PaymentConfirmation`.
    async fn confirm(
        &self,
        widget: &PaymentWidget,
        details: &PaymentDetails,
        return_url: &str,
    ) -> Result<ConfirmOutcome, BookingError>;
}
