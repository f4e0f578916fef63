use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use uuid::Uuid;

use crate::errors::BookingError;
use crate::models::payment::DEFAULT_CURRENCY;
use crate::models::{
    AppointmentOffering, BookingSession, BookingStep, ConfirmOutcome, CustomerInfo,
    CustomerInfoForm, LeadRecord, PaymentDetails, PaymentIntentRequest, PaymentPhase,
    PaymentWidget,
};
use crate::services::api::{LeadClient, PaymentIntentClient};
use crate::services::payment::PaymentUi;
use crate::services::slots::BookableSlots;

pub const PAYMENT_INIT_FAILED: &str = "Failed to initialize payment. Please try again.";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WizardEventKind {
    Opened,
    StepChanged { step: BookingStep },
    Closed,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WizardEvent {
    pub wizard_id: Uuid,
    #[serde(flatten)]
    pub kind: WizardEventKind,
}

/// What a reader sees of a wizard, published on every change so it can be
/// read while a submission holds the wizard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WizardSnapshot {
    pub id: Uuid,
    pub open: bool,
    pub offering: AppointmentOffering,
    pub session: BookingSession,
}

/// Collaborators shared by every wizard.
#[derive(Clone)]
pub struct BookingServices {
    pub leads: Arc<dyn LeadClient>,
    pub payments: Arc<dyn PaymentIntentClient>,
    pub payment_ui: Arc<dyn PaymentUi>,
    pub return_url: String,
    pub window_days: u32,
    pub events: broadcast::Sender<WizardEvent>,
}

/// Drives one booking dialog: info, then payment when the offering is not
/// free, then success. Every collaborator failure ends up in
/// `session().error` or the payment phase; only misuse (validation,
/// wrong step, duplicate submission) is returned as `Err`.
pub struct BookingWizard {
    id: Uuid,
    offering: AppointmentOffering,
    services: BookingServices,
    open: bool,
    session: BookingSession,
    widget: Option<PaymentWidget>,
    snapshots: watch::Sender<WizardSnapshot>,
}

/// Holds `is_submitting` for the length of a collaborator call. Dropping it
/// clears the flag even when the call's future is dropped before it
/// resolves, so the session never stays locked.
struct InFlight<'a> {
    session: &'a mut BookingSession,
    snapshots: &'a watch::Sender<WizardSnapshot>,
}

impl<'a> InFlight<'a> {
    fn begin(
        session: &'a mut BookingSession,
        snapshots: &'a watch::Sender<WizardSnapshot>,
    ) -> Self {
        session.error = None;
        session.is_submitting = true;
        snapshots.send_modify(|s| s.session = session.clone());
        Self { session, snapshots }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.session.is_submitting = false;
        // An intent call that never finished cannot be retried in place
        if self.session.payment == Some(PaymentPhase::Loading) {
            self.session.payment = Some(PaymentPhase::Failed {
                message: PAYMENT_INIT_FAILED.to_string(),
            });
        }
        self.snapshots
            .send_modify(|s| s.session = self.session.clone());
    }
}

impl BookingWizard {
    pub fn new(id: Uuid, offering: AppointmentOffering, services: BookingServices) -> Self {
        let session = BookingSession::default();
        let (snapshots, _) = watch::channel(WizardSnapshot {
            id,
            open: false,
            offering: offering.clone(),
            session: session.clone(),
        });
        Self {
            id,
            offering,
            services,
            open: false,
            session,
            widget: None,
            snapshots,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn offering(&self) -> &AppointmentOffering {
        &self.offering
    }

    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Follows the wizard's state without taking the wizard itself.
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn open(&mut self, reference_date: NaiveDate) -> &BookingSession {
        if self.open {
            return &self.session;
        }

        self.session = BookingSession::new(BookableSlots::generate(
            self.services.window_days,
            reference_date,
        ));
        self.widget = None;
        self.open = true;

        tracing::info!(wizard = %self.id, offering = %self.offering.id, "booking wizard opened");
        self.emit(WizardEventKind::Opened);
        self.publish();
        &self.session
    }

    pub fn update_info(&mut self, form: CustomerInfoForm) -> Result<&BookingSession, BookingError> {
        self.guard("update info", BookingStep::Info)?;
        self.session.customer_info = form;
        self.publish();
        Ok(&self.session)
    }

    pub async fn submit_info(&mut self) -> Result<BookingStep, BookingError> {
        self.guard("submit info", BookingStep::Info)?;
        let customer = self.session.customer_info.validate(&self.session.slots)?;

        let record = LeadRecord::for_booking(&self.offering, &customer);
        let result = {
            let _in_flight = InFlight::begin(&mut self.session, &self.snapshots);
            self.services.leads.submit(&record).await
        };

        let ack = match result {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(wizard = %self.id, error = %e, "lead submission failed");
                self.session.error = Some(e.to_string());
                self.publish();
                return Ok(self.session.step);
            }
        };

        self.session.lead_id = ack.lead_id;

        if self.offering.is_free() {
            self.set_step(BookingStep::Success);
        } else {
            self.widget = None;
            self.session.payment = Some(PaymentPhase::Loading);
            self.set_step(BookingStep::Payment);
            self.initialize_payment(&customer).await;
        }

        self.publish();
        Ok(self.session.step)
    }

    async fn initialize_payment(&mut self, customer: &CustomerInfo) {
        let request = PaymentIntentRequest {
            amount: self.offering.amount(),
            currency: DEFAULT_CURRENCY.to_string(),
            description: self.offering.payment_description(),
            customer_email: customer.email.clone(),
            customer_name: Some(customer.name.clone()),
            lead_id: self.session.lead_id,
        };

        let in_flight = InFlight::begin(&mut self.session, &self.snapshots);
        let mounted = match self.services.payments.create_intent(&request).await {
            Ok(intent) => self.services.payment_ui.mount(&intent.client_secret).await,
            Err(e) => Err(e),
        };

        match mounted {
            Ok(widget) => {
                in_flight.session.payment = Some(PaymentPhase::Ready {
                    client_secret: widget.client_secret.clone(),
                });
                self.widget = Some(widget);
            }
            Err(e) => {
                tracing::error!(wizard = %self.id, error = %e, "failed to initialize payment");
                in_flight.session.payment = Some(PaymentPhase::Failed {
                    message: PAYMENT_INIT_FAILED.to_string(),
                });
            }
        }
    }

    /// Leaves the payment step. Entered info is kept.
    pub fn back_to_info(&mut self) -> Result<BookingStep, BookingError> {
        self.guard("go back", BookingStep::Payment)?;
        self.session.payment = None;
        self.session.error = None;
        self.widget = None;
        self.set_step(BookingStep::Info);
        self.publish();
        Ok(self.session.step)
    }

    pub async fn submit_payment(
        &mut self,
        details: PaymentDetails,
    ) -> Result<BookingStep, BookingError> {
        self.guard("submit payment", BookingStep::Payment)?;
        let widget = self
            .widget
            .clone()
            .ok_or(BookingError::InvalidTransition {
                step: BookingStep::Payment.as_str(),
                action: "submit payment before the payment form is ready",
            })?;

        let outcome = {
            let _in_flight = InFlight::begin(&mut self.session, &self.snapshots);
            match self.services.payment_ui.submit(&widget, &details).await {
                Ok(()) => {
                    self.services
                        .payment_ui
                        .confirm(&widget, &details, &self.services.return_url)
                        .await
                }
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok(ConfirmOutcome::Succeeded) | Ok(ConfirmOutcome::Processing) => {
                self.widget = None;
                self.session.payment = None;
                self.set_step(BookingStep::Success);
            }
            Ok(ConfirmOutcome::RedirectRequired(url)) => {
                tracing::info!(wizard = %self.id, "payment requires redirect");
                self.session.payment = Some(PaymentPhase::Redirecting { url });
            }
            Err(e) => {
                tracing::warn!(wizard = %self.id, error = %e, "payment not confirmed");
                self.session.error = Some(e.to_string());
            }
        }

        self.publish();
        Ok(self.session.step)
    }

    /// Dismisses the dialog from any step and starts the next opening fresh.
    /// An intent that was created but never confirmed is left to expire.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }

        if let Some(widget) = self.widget.take() {
            tracing::info!(
                wizard = %self.id,
                intent_id = %widget.intent_id,
                "abandoning unconfirmed payment intent"
            );
        }

        self.session.reset();
        self.open = false;

        tracing::info!(wizard = %self.id, "booking wizard closed");
        self.emit(WizardEventKind::Closed);
        self.publish();
    }

    fn guard(&self, action: &'static str, expected: BookingStep) -> Result<(), BookingError> {
        if !self.open {
            return Err(BookingError::InvalidTransition {
                step: "closed",
                action,
            });
        }
        if self.session.is_submitting {
            return Err(BookingError::Busy);
        }
        if self.session.step != expected {
            return Err(BookingError::InvalidTransition {
                step: self.session.step.as_str(),
                action,
            });
        }
        Ok(())
    }

    fn set_step(&mut self, step: BookingStep) {
        tracing::info!(
            wizard = %self.id,
            from = self.session.step.as_str(),
            to = step.as_str(),
            "booking step changed"
        );
        self.session.step = step;
        self.emit(WizardEventKind::StepChanged { step });
    }

    fn publish(&self) {
        let open = self.open;
        self.snapshots.send_modify(|s| {
            s.open = open;
            s.session = self.session.clone();
        });
    }

    fn emit(&self, kind: WizardEventKind) {
        // No subscribers is fine
        let _ = self.services.events.send(WizardEvent {
            wizard_id: self.id,
            kind,
        });
    }
}
