//! Locale registry, translation bundles and locale routing for the iGamX site.
//!
//! The crate has no HTTP dependencies. The web crate wires [`routing`] into a
//! tower layer and hands [`Catalog`] translators to its templates, while
//! [`provider`] holds the client-side active locale.
pub mod bundle;
pub mod catalog;
pub mod error;
pub mod interpolate;
pub mod locale;
pub mod namespace;
pub mod provider;
pub mod routing;
pub mod source;
pub mod translator;

pub use bundle::Bundle;
pub use catalog::{Catalog, MissingKey};
pub use error::I18nError;
pub use locale::Locale;
pub use namespace::Namespace;
pub use provider::{
    I18nContext, I18nProvider, JsonFilePreferences, MemoryPreferences, PreferenceStore,
};
pub use routing::{LocaleHints, RouteDecision, RoutingStrategy};
pub use source::{BundleSource, DirectorySource, EmbeddedSource};
pub use translator::Translator;
