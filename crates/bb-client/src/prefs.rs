//! Persisted UI preferences (dark mode, colorblind mode, hand mode).

use std::sync::Arc;

use bb_types::web::UiPreferences;
use tracing::debug;

use crate::{error::ClientResult, storage::ClientStorage};

/// Storage key holding the preferences JSON.
pub const PREFERENCES_KEY: &str = "preferences";

#[derive(Clone)]
pub struct PreferencesStore {
    storage: Arc<ClientStorage>,
}

impl PreferencesStore {
    pub fn new(storage: Arc<ClientStorage>) -> Self {
        Self { storage }
    }

    /// Stored preferences, or defaults when absent or unreadable.
    pub fn load(&self) -> UiPreferences {
        self.storage.get_json(PREFERENCES_KEY).unwrap_or_default()
    }

    pub fn save(&self, prefs: &UiPreferences) -> ClientResult<()> {
        self.storage.set_json(PREFERENCES_KEY, prefs)?;
        debug!(?prefs, "preferences saved");
        Ok(())
    }

    /// Load, apply `change`, save, and return the result.
    pub fn update(&self, change: impl FnOnce(&mut UiPreferences)) -> ClientResult<UiPreferences> {
        let mut prefs = self.load();
        change(&mut prefs);
        self.save(&prefs)?;
        Ok(prefs)
    }

    pub fn reset(&self) -> ClientResult<()> {
        self.storage.remove(PREFERENCES_KEY)?;
        Ok(())
    }
}
