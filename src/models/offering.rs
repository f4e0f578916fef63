use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentOffering {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub price: String,
}

impl AppointmentOffering {
    pub fn new(id: &str, title: &str, duration: &str, price: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            duration: duration.to_string(),
            price: price.to_string(),
        }
    }

    pub fn is_free(&self) -> bool {
        is_free_price(&self.price)
    }

    /// Numeric amount in major currency units. Unparseable labels yield 0.
    pub fn amount(&self) -> f64 {
        parse_price_amount(&self.price)
    }

    /// Price as written into lead descriptions.
    pub fn price_info(&self) -> &str {
        if self.is_free() {
            "Free"
        } else {
            &self.price
        }
    }

    pub fn payment_description(&self) -> String {
        format!("{} - {}", self.title, self.duration)
    }
}

/// Exact label match; a padded label such as `" Free "` is a paid price.
pub fn is_free_price(price: &str) -> bool {
    price.eq_ignore_ascii_case("free") || price == "£0"
}

pub fn parse_price_amount(price: &str) -> f64 {
    let cleaned: String = price.chars().filter(|c| *c != '£' && *c != ',').collect();
    match leading_decimal(cleaned.trim_start()) {
        Some(amount) => amount,
        None => {
            tracing::warn!(price, "price label is not numeric, using amount 0");
            0.0
        }
    }
}

// Longest prefix of the form [+-]digits[.digits], parsed.
fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn catalog() -> Vec<AppointmentOffering> {
    vec![
        AppointmentOffering::new(
            "business-consultancy",
            "Business Setup Consultation",
            "1 hr",
            "£100",
        ),
        AppointmentOffering::new(
            "general-consultation",
            "General Consultation",
            "45 mins",
            "£70",
        ),
        AppointmentOffering::new(
            "marketing-enquiries",
            "Marketing Enquiries",
            "30 mins",
            "Free",
        ),
    ]
}

pub fn find_offering(id: &str) -> Option<AppointmentOffering> {
    catalog().into_iter().find(|o| o.id == id)
}
