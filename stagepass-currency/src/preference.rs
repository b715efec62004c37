use crate::currency;
use crate::engine::detect_preferred_currency;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

/// Persistence for the single preferred-currency entry
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, code: &str);
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    preferred_currency: String,
}

/// JSON-file backed store, one key-value entry
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let stored: StoredPreference = serde_json::from_str(&raw).ok()?;
        Some(stored.preferred_currency)
    }

    fn save(&self, code: &str) {
        let stored = StoredPreference {
            preferred_currency: code.to_string(),
        };
        let Ok(raw) = serde_json::to_string(&stored) else {
            return;
        };
        if let Err(e) = std::fs::write(&self.path, raw) {
            // A failed write must not break the flow; the in-memory value
            // still wins for this process lifetime.
            tracing::warn!(error = %e, "failed to persist currency preference");
        }
    }
}

/// In-memory store for tests and headless runs
#[derive(Default)]
pub struct MemoryPreferenceStore {
    value: Mutex<Option<String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<String> {
        self.value.lock().ok()?.clone()
    }

    fn save(&self, code: &str) {
        if let Ok(mut guard) = self.value.lock() {
            *guard = Some(code.to_string());
        }
    }
}

/// Process-wide preferred currency. Initialised once at startup as the
/// persisted value if still supported, else locale detection; writes go
/// through to the store synchronously on every accepted change.
pub struct CurrencyPreference {
    store: Arc<dyn PreferenceStore>,
    current: RwLock<String>,
}

impl CurrencyPreference {
    pub fn init(store: Arc<dyn PreferenceStore>, fallback: &str) -> Self {
        let initial = match store.load() {
            Some(code) if currency::is_supported(&code) => code,
            _ => detect_preferred_currency(fallback),
        };
        Self {
            store,
            current: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> String {
        self.current
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Change the preference. Codes outside the supported set are ignored.
    pub fn set(&self, code: &str) {
        if !currency::is_supported(code) {
            tracing::debug!(currency = code, "ignoring unsupported preferred currency");
            return;
        }
        match self.current.write() {
            Ok(mut guard) => *guard = code.to_string(),
            Err(poisoned) => *poisoned.into_inner() = code.to_string(),
        }
        self.store.save(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rejects_unsupported() {
        let store = Arc::new(MemoryPreferenceStore::default());
        let pref = CurrencyPreference::init(store.clone(), "INR");
        let before = pref.get();

        pref.set("XYZ");
        assert_eq!(pref.get(), before);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_set_writes_through() {
        let store = Arc::new(MemoryPreferenceStore::default());
        let pref = CurrencyPreference::init(store.clone(), "INR");

        pref.set("USD");
        assert_eq!(pref.get(), "USD");
        assert_eq!(store.load().as_deref(), Some("USD"));
    }

    #[test]
    fn test_init_prefers_valid_persisted_value() {
        let store = Arc::new(MemoryPreferenceStore::default());
        store.save("GBP");
        let pref = CurrencyPreference::init(store, "INR");
        assert_eq!(pref.get(), "GBP");
    }

    #[test]
    fn test_init_discards_invalid_persisted_value() {
        let store = Arc::new(MemoryPreferenceStore::default());
        store.save("NOPE");
        // Detection falls through to the fallback when the locale gives no region
        std::env::remove_var("LC_ALL");
        std::env::remove_var("LC_MONETARY");
        std::env::remove_var("LANG");
        let pref = CurrencyPreference::init(store, "SGD");
        assert_eq!(pref.get(), "SGD");
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("stagepass-pref-{}.json", std::process::id()));
        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.load(), None);

        store.save("EUR");
        assert_eq!(store.load().as_deref(), Some("EUR"));
        let _ = std::fs::remove_file(&path);
    }
}
