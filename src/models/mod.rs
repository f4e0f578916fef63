pub mod customer;
pub mod lead;
pub mod offering;
pub mod payment;
pub mod session;

pub use customer::{CustomerInfo, CustomerInfoForm};
pub use lead::{LeadAck, LeadRecord};
pub use offering::AppointmentOffering;
pub use payment::{
    ConfirmOutcome, PaymentDetails, PaymentIntentRequest, PaymentIntentResponse, PaymentWidget,
};
pub use session::{BookingSession, BookingStep, PaymentPhase};
