use std::env;

const PRODUCTION_API_BASE_URL: &str = "https://brincesolutions.com/api";
const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// Base URL of the lead/payment backend, without a trailing slash.
    pub api_base_url: String,
    pub stripe_publishable_key: String,
    pub stripe_api_base: String,
    /// Origin the payment processor returns to after a redirect-based confirmation.
    pub site_origin: String,
    pub booking_window_days: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "preferences.db".to_string()),
            api_base_url: resolve_api_base_url(env::var("API_BASE_URL").ok(), production),
            stripe_publishable_key: env::var("STRIPE_PUBLISHABLE_KEY").unwrap_or_default(),
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            site_origin: env::var("SITE_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            booking_window_days: env::var("BOOKING_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::services::slots::DEFAULT_WINDOW_DAYS),
        }
    }
}

fn resolve_api_base_url(override_url: Option<String>, production: bool) -> String {
    let url = match override_url.filter(|u| !u.trim().is_empty()) {
        Some(u) => u,
        None if production => PRODUCTION_API_BASE_URL.to_string(),
        None => DEVELOPMENT_API_BASE_URL.to_string(),
    };
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let url = resolve_api_base_url(Some("https://staging.example.com/api/".to_string()), true);
        assert_eq!(url, "https://staging.example.com/api");
    }

    #[test]
    fn test_defaults_by_environment() {
        assert_eq!(resolve_api_base_url(None, true), PRODUCTION_API_BASE_URL);
        assert_eq!(resolve_api_base_url(None, false), DEVELOPMENT_API_BASE_URL);
        assert_eq!(resolve_api_base_url(Some("  ".to_string()), false), DEVELOPMENT_API_BASE_URL);
    }
}
