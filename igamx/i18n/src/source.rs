use crate::{I18nError, Locale};
use std::path::PathBuf;

/// Where bundle documents come from.
pub trait BundleSource: Send + Sync {
    /// Returns the raw JSON document for a locale.
    fn load(&self, locale: Locale) -> Result<String, I18nError>;
}

/// Bundles compiled into the binary from `locales/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl BundleSource for EmbeddedSource {
    fn load(&self, locale: Locale) -> Result<String, I18nError> {
        let document = match locale {
            Locale::En => include_str!("../locales/en.json"),
            Locale::Zh => include_str!("../locales/zh.json"),
            Locale::Fr => include_str!("../locales/fr.json"),
        };
        Ok(document.to_string())
    }
}

/// Bundles read from `{dir}/{code}.json` at load time.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, locale: Locale) -> PathBuf {
        self.dir.join(format!("{}.json", locale.code()))
    }
}

impl BundleSource for DirectorySource {
    fn load(&self, locale: Locale) -> Result<String, I18nError> {
        let path = self.path_for(locale);
        std::fs::read_to_string(&path).map_err(|e| I18nError::BundleLoad {
            locale,
            reason: format!("{}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_every_embedded_bundle() {
        for locale in Locale::ALL {
            let document = EmbeddedSource.load(locale).unwrap();
            assert!(document.trim_start().starts_with('{'));
        }
    }

    #[test]
    fn can_load_bundle_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fr.json"), r#"{"navbar":{"services":"Services"}}"#).unwrap();

        let source = DirectorySource::new(dir.path());
        assert!(source.load(Locale::Fr).unwrap().contains("Services"));
    }

    #[test]
    fn can_report_missing_directory_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let error = source.load(Locale::Zh).unwrap_err();
        assert!(matches!(error, I18nError::BundleLoad { locale: Locale::Zh, .. }));
        assert!(error.to_string().contains("zh.json"));
    }
}
