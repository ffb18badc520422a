//! Client-side translation provider.
//!
//! An [`I18nProvider`] is uninitialized until [`I18nProvider::mount`], which
//! seeds the active locale synchronously and returns the [`I18nContext`]
//! that every consumer reads from. The active locale lives in a single
//! `watch` channel: changes are one atomic replace (last write wins) and
//! subscribers are woken to re-render.

use crate::{Catalog, I18nError, Locale, Namespace, Translator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Storage for the last explicitly chosen locale.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored locale code, if any.
    fn load(&self) -> Option<String>;

    /// Stores the chosen locale.
    fn save(&self, locale: Locale) -> Result<(), I18nError>;
}

/// Preference kept in memory, shared between clones.
///
/// Handing a clone to a second provider simulates the next visit.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a stored value, which need not be a supported code.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, locale: Locale) -> Result<(), I18nError> {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = Some(locale.code().to_string());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StoredPreference {
    locale: Option<String>,
}

/// Preference kept in a small JSON file.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for JsonFilePreferences {
    /// Returns `None` if the file is absent or unreadable.
    fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str::<StoredPreference>(&contents)
            .ok()?
            .locale
    }

    fn save(&self, locale: Locale) -> Result<(), I18nError> {
        let stored = StoredPreference {
            locale: Some(locale.code().to_string()),
        };
        let contents = serde_json::to_string(&stored).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Picks the locale a provider mounts with: the server-determined locale,
/// then the stored preference, then the default.
pub fn seed_locale(server_locale: Option<Locale>, preferences: &dyn PreferenceStore) -> Locale {
    server_locale
        .or_else(|| preferences.load().as_deref().and_then(Locale::from_code))
        .unwrap_or(Locale::DEFAULT)
}

/// A provider that has not been mounted yet.
pub struct I18nProvider {
    catalog: Arc<Catalog>,
    preferences: Arc<dyn PreferenceStore>,
}

impl I18nProvider {
    pub fn new(catalog: Arc<Catalog>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            catalog,
            preferences,
        }
    }

    /// Activates the provider with the locale determined by the server, if
    /// any (see [`seed_locale`]). The seed locale's bundle is loaded before
    /// this returns, so the first read already has its strings.
    pub fn mount(self, server_locale: Option<Locale>) -> I18nContext {
        let locale = seed_locale(server_locale, self.preferences.as_ref());
        self.catalog.bundle(locale);
        tracing::debug!(locale = %locale, "i18n provider mounted");
        let (sender, _) = watch::channel(locale);
        I18nContext {
            catalog: self.catalog,
            preferences: self.preferences,
            active: Arc::new(sender),
        }
    }
}

/// A mounted provider. Clones share the same active locale.
#[derive(Clone)]
pub struct I18nContext {
    catalog: Arc<Catalog>,
    preferences: Arc<dyn PreferenceStore>,
    active: Arc<watch::Sender<Locale>>,
}

impl I18nContext {
    /// The active locale.
    pub fn current_locale(&self) -> Locale {
        *self.active.borrow()
    }

    /// An unscoped translator for the active locale.
    pub fn i18n(&self) -> Translator {
        self.catalog.translator(self.current_locale())
    }

    /// A translator for the active locale scoped to `namespace`.
    pub fn scoped_i18n(&self, namespace: Namespace) -> Translator {
        self.catalog.scoped(self.current_locale(), namespace)
    }

    /// A receiver that is notified whenever the active locale changes.
    pub fn subscribe(&self) -> watch::Receiver<Locale> {
        self.active.subscribe()
    }

    /// Switches the active locale.
    ///
    /// An unsupported code is logged and leaves everything unchanged. A
    /// supported one is persisted (failures are logged, not returned) and
    /// published to subscribers, unless it is already active.
    pub fn change_locale(&self, code: &str) -> Result<Locale, I18nError> {
        let locale = code.parse::<Locale>().inspect_err(|_| {
            tracing::warn!(code, "ignoring change to unsupported locale");
        })?;
        self.catalog.bundle(locale);
        if let Err(e) = self.preferences.save(locale) {
            tracing::error!(locale = %locale, error = %e, "failed to persist locale preference");
        }
        let changed = self.active.send_if_modified(|active| {
            let previous = *active;
            *active = locale;
            previous != locale
        });
        if changed {
            tracing::info!(locale = %locale, "locale changed");
        }
        Ok(locale)
    }

    /// Ends this handle's part of the session. Once every clone is gone,
    /// subscribers see the channel close.
    pub fn unmount(self) {
        drop(self);
    }
}

impl std::fmt::Debug for I18nContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18nContext")
            .field("locale", &self.current_locale())
            .finish()
    }
}
