use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::services::slots::{format_date_for_input, format_time, BookableSlots};

/// Raw info-step input as the form submits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfoForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl CustomerInfoForm {
    pub fn is_empty(&self) -> bool {
        *self == CustomerInfoForm::default()
    }

    /// Checks required fields and that date/time are among the offered slots.
    pub fn validate(&self, slots: &BookableSlots) -> Result<CustomerInfo, BookingError> {
        let name = required(&self.name, "name")?;

        let email = required(&self.email, "email")?;
        if !email.contains('@') {
            return Err(BookingError::validation("email", "must contain '@'"));
        }

        let date_raw = required(&self.date, "date")?;
        let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
            .map_err(|_| BookingError::validation("date", format!("invalid date: {date_raw}")))?;
        if !slots.contains_date(date) {
            return Err(BookingError::validation(
                "date",
                format!("{date_raw} is not an available date"),
            ));
        }

        let time_raw = required(&self.time, "time")?;
        let time = NaiveTime::parse_from_str(&time_raw, "%H:%M")
            .map_err(|_| BookingError::validation("time", format!("invalid time: {time_raw}")))?;
        if !slots.contains_time(time) {
            return Err(BookingError::validation(
                "time",
                format!("{time_raw} is not an available time"),
            ));
        }

        Ok(CustomerInfo {
            name,
            email,
            phone: self
                .phone
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            date,
            time,
        })
    }
}

impl From<&CustomerInfo> for CustomerInfoForm {
    fn from(info: &CustomerInfo) -> Self {
        Self {
            name: Some(info.name.clone()),
            email: Some(info.email.clone()),
            phone: Some(info.phone.clone()),
            date: Some(format_date_for_input(info.date)),
            time: Some(format_time(info.time)),
        }
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, BookingError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BookingError::validation(field, "is required"))
}
