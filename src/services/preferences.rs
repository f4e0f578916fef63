use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::BookingError;

pub const COOKIE_CONSENT_KEY: &str = "cookieConsent";
pub const LEAD_POPUP_SEEN_KEY: &str = "leadGenPopupSeen";

/// Small key/value store for visitor flags.
pub trait PreferencesStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, BookingError>;
    fn set(&self, key: &str, value: &str) -> Result<(), BookingError>;
    /// `true` when a value was stored under `key`.
    fn remove(&self, key: &str) -> Result<bool, BookingError>;
}

#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl PreferencesStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, BookingError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BookingError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, BookingError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.remove(key).is_some())
    }
}

pub struct SqlitePreferences {
    db: Arc<Mutex<Connection>>,
}

impl SqlitePreferences {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

impl PreferencesStore for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>, BookingError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        Ok(queries::get_preference(&db, key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BookingError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        queries::set_preference(&db, key, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, BookingError> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        Ok(queries::delete_preference(&db, key)?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CookieConsent {
    Accepted,
    Declined,
}

impl CookieConsent {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookieConsent::Accepted => "accepted",
            CookieConsent::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(CookieConsent::Accepted),
            "declined" => Some(CookieConsent::Declined),
            _ => None,
        }
    }
}

/// `None` until the visitor answers the banner.
pub fn cookie_consent(store: &dyn PreferencesStore) -> Result<Option<CookieConsent>, BookingError> {
    Ok(store
        .get(COOKIE_CONSENT_KEY)?
        .as_deref()
        .and_then(CookieConsent::parse))
}

pub fn record_cookie_consent(
    store: &dyn PreferencesStore,
    consent: CookieConsent,
) -> Result<(), BookingError> {
    store.set(COOKIE_CONSENT_KEY, consent.as_str())
}

/// Forgets the visitor's answer so the banner is shown again.
pub fn withdraw_cookie_consent(store: &dyn PreferencesStore) -> Result<(), BookingError> {
    store.remove(COOKIE_CONSENT_KEY)?;
    Ok(())
}

pub fn should_show_lead_popup(store: &dyn PreferencesStore) -> Result<bool, BookingError> {
    Ok(store.get(LEAD_POPUP_SEEN_KEY)?.is_none())
}

pub fn mark_lead_popup_seen(store: &dyn PreferencesStore) -> Result<(), BookingError> {
    store.set(LEAD_POPUP_SEEN_KEY, "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_consent_flow_in_memory() {
        let store = MemoryPreferences::default();
        assert_eq!(cookie_consent(&store).unwrap(), None);

        record_cookie_consent(&store, CookieConsent::Declined).unwrap();
        assert_eq!(cookie_consent(&store).unwrap(), Some(CookieConsent::Declined));

        withdraw_cookie_consent(&store).unwrap();
        assert_eq!(cookie_consent(&store).unwrap(), None);
        assert!(!store.remove(COOKIE_CONSENT_KEY).unwrap());
    }

    #[test]
    fn test_unknown_consent_value_is_unanswered() {
        let store = MemoryPreferences::default();
        store.set(COOKIE_CONSENT_KEY, "maybe").unwrap();
        assert_eq!(cookie_consent(&store).unwrap(), None);
    }

    #[test]
    fn test_lead_popup_shown_once() {
        let conn = db::init_db(":memory:").unwrap();
        let store = SqlitePreferences::new(Arc::new(Mutex::new(conn)));

        assert!(should_show_lead_popup(&store).unwrap());
        mark_lead_popup_seen(&store).unwrap();
        assert!(!should_show_lead_popup(&store).unwrap());
        assert_eq!(store.get(LEAD_POPUP_SEEN_KEY).unwrap().as_deref(), Some("true"));

        assert!(store.remove(LEAD_POPUP_SEEN_KEY).unwrap());
        assert!(should_show_lead_popup(&store).unwrap());
    }
}
