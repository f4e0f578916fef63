use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::services::booking::{BookingServices, BookingWizard, WizardSnapshot};
use crate::services::preferences::PreferencesStore;

/// A registered wizard: the wizard itself for actions, and its published
/// state for reads that must not wait on an action in flight.
#[derive(Clone)]
pub struct WizardHandle {
    pub wizard: Arc<tokio::sync::Mutex<BookingWizard>>,
    pub snapshot: watch::Receiver<WizardSnapshot>,
}

pub struct AppState {
    pub config: AppConfig,
    pub services: BookingServices,
    pub wizards: Mutex<HashMap<Uuid, WizardHandle>>,
    pub preferences: Box<dyn PreferencesStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        services: BookingServices,
        preferences: Box<dyn PreferencesStore>,
    ) -> Self {
        Self {
            config,
            services,
            wizards: Mutex::new(HashMap::new()),
            preferences,
        }
    }

    pub fn wizard(&self, id: Uuid) -> Option<WizardHandle> {
        let wizards = self.wizards.lock().unwrap_or_else(|e| e.into_inner());
        wizards.get(&id).cloned()
    }

    pub fn insert_wizard(&self, wizard: BookingWizard) -> WizardHandle {
        let id = wizard.id();
        let handle = WizardHandle {
            snapshot: wizard.subscribe(),
            wizard: Arc::new(tokio::sync::Mutex::new(wizard)),
        };
        let mut wizards = self.wizards.lock().unwrap_or_else(|e| e.into_inner());
        wizards.insert(id, handle.clone());
        handle
    }

    pub fn remove_wizard(&self, id: Uuid) -> Option<WizardHandle> {
        let mut wizards = self.wizards.lock().unwrap_or_else(|e| e.into_inner());
        wizards.remove(&id)
    }
}
