//! Server-side translation resolution.
//!
//! # Failure policy
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Bundle for a locale fails to load | `error` log, default locale's bundle is served, load retried next call |
//! | Default bundle fails to load too | empty bundle, every key renders as itself |
//! | Key missing from a bundle | full dotted key, `warn` log (see [`Translator`]) |

use crate::{Bundle, BundleSource, EmbeddedSource, I18nError, Locale, Namespace, Translator};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

/// Loads bundles on demand and caches them for the life of the process.
pub struct Catalog {
    source: Box<dyn BundleSource>,
    bundles: RwLock<HashMap<Locale, Arc<Bundle>>>,
}

/// A key present in one locale's bundle but absent from another's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub locale: Locale,
    pub key: String,
    /// The locale that does define the key.
    pub defined_in: Locale,
}

impl Catalog {
    pub fn new(source: impl BundleSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            bundles: RwLock::new(HashMap::new()),
        }
    }

    /// A catalog over the bundles compiled into the binary.
    pub fn embedded() -> Self {
        Self::new(EmbeddedSource)
    }

    /// Loads a locale's bundle without caching or falling back.
    pub fn load(&self, locale: Locale) -> Result<Bundle, I18nError> {
        let document = self.source.load(locale)?;
        Bundle::from_json_str(locale, &document)
    }

    /// Returns the bundle for a locale, loading it on first use.
    ///
    /// Never fails; see the module docs for the fallback chain.
    pub fn bundle(&self, locale: Locale) -> Arc<Bundle> {
        if let Some(bundle) = self.cached(locale) {
            return bundle;
        }
        match self.load_and_cache(locale) {
            Ok(bundle) => bundle,
            Err(e) => {
                tracing::error!(locale = %locale, error = %e, "failed to load translation bundle");
                if locale.is_default() {
                    Arc::new(Bundle::empty(locale))
                } else {
                    self.bundle(Locale::DEFAULT)
                }
            }
        }
    }

    /// Returns true if the locale's own bundle is loaded.
    pub fn is_loaded(&self, locale: Locale) -> bool {
        self.cached(locale).is_some()
    }

    /// An unscoped translator, keys are full dotted keys.
    #[tracing::instrument(skip(self))]
    pub fn translator(&self, locale: Locale) -> Translator {
        Translator::new(self.bundle(locale), locale, None)
    }

    /// A translator whose keys are relative to `namespace`.
    #[tracing::instrument(skip(self))]
    pub fn scoped(&self, locale: Locale, namespace: Namespace) -> Translator {
        Translator::new(self.bundle(locale), locale, Some(namespace))
    }

    /// Compares every locale's keys with the default locale's, both ways.
    ///
    /// Bundles that fail to load are reported through the error instead.
    pub fn missing_keys(&self) -> Result<Vec<MissingKey>, I18nError> {
        let reference = self.load(Locale::DEFAULT)?;
        let reference_keys = reference.keys();
        let mut missing = Vec::new();
        for locale in Locale::ALL.into_iter().filter(|l| !l.is_default()) {
            let bundle = self.load(locale)?;
            let keys = bundle.keys();
            missing.extend(difference(&reference_keys, &keys, locale, Locale::DEFAULT));
            missing.extend(difference(&keys, &reference_keys, Locale::DEFAULT, locale));
        }
        Ok(missing)
    }

    fn cached(&self, locale: Locale) -> Option<Arc<Bundle>> {
        let bundles = self.bundles.read().unwrap_or_else(|e| e.into_inner());
        bundles.get(&locale).cloned()
    }

    fn load_and_cache(&self, locale: Locale) -> Result<Arc<Bundle>, I18nError> {
        let bundle = Arc::new(self.load(locale)?);
        let mut bundles = self.bundles.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have loaded it meanwhile; keep the first one.
        let cached = bundles.entry(locale).or_insert(bundle);
        tracing::debug!(locale = %locale, keys = cached.len(), "translation bundle loaded");
        Ok(cached.clone())
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<Locale> = Locale::ALL
            .into_iter()
            .filter(|l| self.is_loaded(*l))
            .collect();
        f.debug_struct("Catalog").field("loaded", &loaded).finish()
    }
}

fn difference(
    present: &BTreeSet<&str>,
    other: &BTreeSet<&str>,
    missing_in: Locale,
    defined_in: Locale,
) -> Vec<MissingKey> {
    present
        .difference(other)
        .map(|key| MissingKey {
            locale: missing_in,
            key: (*key).to_string(),
            defined_in,
        })
        .collect()
}
