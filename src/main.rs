use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use booking_wizard::config::AppConfig;
use booking_wizard::db;
use booking_wizard::handlers;
use booking_wizard::services::api::http::HttpBackend;
use booking_wizard::services::booking::BookingServices;
use booking_wizard::services::payment::stripe::StripePaymentUi;
use booking_wizard::services::preferences::SqlitePreferences;
use booking_wizard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.stripe_publishable_key.is_empty() {
        tracing::warn!("STRIPE_PUBLISHABLE_KEY not set, paid bookings will fail to load the payment form");
    }
    tracing::info!("using booking backend at {}", config.api_base_url);

    let backend = Arc::new(HttpBackend::new(config.api_base_url.clone()));
    let payment_ui = StripePaymentUi::new(
        config.stripe_publishable_key.clone(),
        config.stripe_api_base.clone(),
    );

    let (events, _) = broadcast::channel(256);

    let services = BookingServices {
        leads: backend.clone(),
        payments: backend,
        payment_ui: Arc::new(payment_ui),
        return_url: config.site_origin.clone(),
        window_days: config.booking_window_days,
        events,
    };

    let state = Arc::new(AppState::new(
        config.clone(),
        services,
        Box::new(SqlitePreferences::new(Arc::new(Mutex::new(conn)))),
    ));

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
