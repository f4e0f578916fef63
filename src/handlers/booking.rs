use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::errors::BookingError;
use crate::models::offering::find_offering;
use crate::models::{CustomerInfoForm, PaymentDetails};
use crate::services::booking::{BookingWizard, WizardEvent, WizardEventKind, WizardSnapshot};
use crate::state::{AppState, WizardHandle};

fn lookup(state: &AppState, id: Uuid) -> Result<WizardHandle, BookingError> {
    state
        .wizard(id)
        .ok_or_else(|| BookingError::NotFound(format!("booking {id}")))
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct OpenBooking {
    pub offering_id: String,
    pub from: Option<NaiveDate>,
}

pub async fn open_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OpenBooking>,
) -> Result<(StatusCode, Json<WizardSnapshot>), BookingError> {
    let offering = find_offering(&payload.offering_id)
        .ok_or_else(|| BookingError::NotFound(format!("offering {}", payload.offering_id)))?;

    let mut wizard = BookingWizard::new(Uuid::new_v4(), offering, state.services.clone());
    wizard.open(payload.from.unwrap_or_else(|| Local::now().date_naive()));
    let snapshot = wizard.snapshot();
    state.insert_wizard(wizard);

    Ok((StatusCode::CREATED, Json(snapshot)))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, BookingError> {
    let handle = lookup(&state, id)?;
    let snapshot = handle.snapshot.borrow().clone();
    Ok(Json(snapshot))
}

// PUT /api/bookings/:id/info
pub async fn update_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(form): Json<CustomerInfoForm>,
) -> Result<Json<WizardSnapshot>, BookingError> {
    let handle = lookup(&state, id)?;
    let mut wizard = handle.wizard.try_lock().map_err(|_| BookingError::Busy)?;
    wizard.update_info(form)?;
    Ok(Json(wizard.snapshot()))
}

// POST /api/bookings/:id/info/submit
pub async fn submit_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, BookingError> {
    let handle = lookup(&state, id)?;
    let mut wizard = handle.wizard.try_lock().map_err(|_| BookingError::Busy)?;
    wizard.submit_info().await?;
    Ok(Json(wizard.snapshot()))
}

// POST /api/bookings/:id/payment
pub async fn submit_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(details): Json<PaymentDetails>,
) -> Result<Json<WizardSnapshot>, BookingError> {
    let handle = lookup(&state, id)?;
    let mut wizard = handle.wizard.try_lock().map_err(|_| BookingError::Busy)?;
    wizard.submit_payment(details).await?;
    Ok(Json(wizard.snapshot()))
}

// POST /api/bookings/:id/back
pub async fn back_to_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardSnapshot>, BookingError> {
    let handle = lookup(&state, id)?;
    let mut wizard = handle.wizard.try_lock().map_err(|_| BookingError::Busy)?;
    wizard.back_to_info()?;
    Ok(Json(wizard.snapshot()))
}

// POST /api/bookings/:id/close
pub async fn close_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BookingError> {
    let handle = state
        .remove_wizard(id)
        .ok_or_else(|| BookingError::NotFound(format!("booking {id}")))?;

    match handle.wizard.try_lock() {
        Ok(mut wizard) => wizard.close(),
        Err(_) => {
            // A call is still in flight; its result lands on the detached
            // wizard and is dropped with it.
            tracing::info!(wizard = %id, "closed booking with a submission in flight");
            let _ = state.services.events.send(WizardEvent {
                wizard_id: id,
                kind: WizardEventKind::Closed,
            });
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/bookings/events (SSE)
#[derive(Deserialize)]
pub struct EventsQuery {
    pub wizard: Option<Uuid>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.services.events.subscribe();
    let only = query.wizard;

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if only.map_or(true, |id| id == event.wizard_id) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok::<_, Infallible>(
                Event::default().data(data).event("wizard_event"),
            ))
        }
        Ok(_) => None,
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => None,
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok::<_, Infallible>(Event::default().comment("keepalive")),
    );

    Sse::new(StreamExt::merge(live_stream, keepalive_stream))
}
