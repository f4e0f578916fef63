use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::models::offering::catalog;
use crate::models::AppointmentOffering;
use crate::services::slots::BookableSlots;
use crate::state::AppState;

const MAX_WINDOW_DAYS: u32 = 366;

// GET /api/offerings
pub async fn list_offerings() -> Json<Vec<AppointmentOffering>> {
    Json(catalog())
}

// GET /api/slots?from=2025-06-16&days=30
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub from: Option<NaiveDate>,
    pub days: Option<u32>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Json<BookableSlots> {
    let from = query.from.unwrap_or_else(|| Local::now().date_naive());
    let days = query
        .days
        .unwrap_or(state.config.booking_window_days)
        .min(MAX_WINDOW_DAYS);
    Json(BookableSlots::generate(days, from))
}
