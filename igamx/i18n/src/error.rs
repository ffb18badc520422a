use crate::Locale;

/// Error type for locale and translation operations.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// A locale code outside the registered set.
    #[error("Unsupported locale '{0}'")]
    UnsupportedLocale(String),
    /// A namespace name outside the known set.
    #[error("Unknown translation namespace '{0}'")]
    UnknownNamespace(String),
    /// The bundle resource for a locale could not be read.
    #[error("Failed to load translation bundle for '{locale}': {reason}")]
    BundleLoad { locale: Locale, reason: String },
    /// The bundle resource was read but is not a valid bundle document.
    #[error("Malformed translation bundle for '{locale}'")]
    BundleParse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },
    /// Represents an I/O error outside bundle loading (preference files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
