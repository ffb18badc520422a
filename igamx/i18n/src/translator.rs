use crate::interpolate::interpolate;
use crate::{Bundle, Locale, Namespace};
use std::sync::Arc;

/// A lookup function bound to one locale and, optionally, one namespace.
///
/// Holds its bundle by `Arc`, so a render keeps the same strings for its
/// whole lifetime and never goes back to the catalog per key.
///
/// A key with no entry resolves to the full dotted key
/// (`navbar.no_such_key`) and logs a warning. This is the same in every
/// build profile.
#[derive(Debug, Clone)]
pub struct Translator {
    bundle: Arc<Bundle>,
    locale: Locale,
    namespace: Option<Namespace>,
}

impl Translator {
    /// `locale` is the locale that was asked for; the bundle may belong to
    /// the default locale when loading the requested one failed.
    pub fn new(bundle: Arc<Bundle>, locale: Locale, namespace: Option<Namespace>) -> Self {
        Self {
            bundle,
            locale,
            namespace,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }

    /// Returns a translator for `namespace` sharing this one's bundle.
    pub fn scoped(&self, namespace: Namespace) -> Translator {
        Translator::new(self.bundle.clone(), self.locale, Some(namespace))
    }

    /// Resolves a key relative to the namespace.
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// Resolves a key and substitutes `{name}` placeholders from `params`.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let full_key = self.full_key(key);
        match self.bundle.get(&full_key) {
            Some(template) => interpolate(template, params),
            None => {
                tracing::warn!(locale = %self.locale, key = %full_key, "missing translation key");
                full_key
            }
        }
    }

    /// Returns true if the key resolves without falling back.
    pub fn has(&self, key: &str) -> bool {
        self.bundle.get(&self.full_key(key)).is_some()
    }

    fn full_key(&self, key: &str) -> String {
        match self.namespace {
            Some(namespace) => format!("{}.{key}", namespace.as_str()),
            None => key.to_string(),
        }
    }
}
