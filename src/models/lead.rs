use serde::{Deserialize, Serialize};

use crate::models::{AppointmentOffering, CustomerInfo};
use crate::services::slots::{format_date_for_display, format_time};

pub const NOT_SPECIFIED: &str = "Not specified";

/// Payload accepted by the lead-intake endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    // Basic information
    pub business_name: String,
    pub contact_person: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub business_address: String,

    // Business details
    pub nature_of_business: String,
    pub business_activities: String,
    pub industry: String,
    pub products_services: String,
    pub target_market: String,

    // Company information
    pub years_operation: String,
    pub business_structure: String,
    pub employees: String,
    pub locations: String,

    // Goals and challenges
    pub short_term_goals: String,
    pub long_term_goals: String,
    pub challenges: String,
    pub services_seeking: String,
    pub additional_info: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_contact_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
}

impl LeadRecord {
    /// Lead for an appointment booking. Questionnaire fields the booking
    /// form does not collect carry the `Not specified` placeholder.
    pub fn for_booking(offering: &AppointmentOffering, customer: &CustomerInfo) -> Self {
        let price_info = offering.price_info();
        Self {
            contact_person: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            years_operation: NOT_SPECIFIED.to_string(),
            business_structure: NOT_SPECIFIED.to_string(),
            employees: NOT_SPECIFIED.to_string(),
            locations: NOT_SPECIFIED.to_string(),
            short_term_goals: format!("Booking: {} - {price_info}", offering.title),
            long_term_goals: NOT_SPECIFIED.to_string(),
            challenges: NOT_SPECIFIED.to_string(),
            services_seeking: offering.title.clone(),
            additional_info: format!(
                "Appointment booking - {} - {price_info} - Date: {} - Time: {}",
                offering.duration,
                format_date_for_display(customer.date),
                format_time(customer.time),
            ),
            ..Default::default()
        }
    }
}

/// Acknowledgment body from the lead-intake endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeadAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lead_id: Option<i64>,
}
