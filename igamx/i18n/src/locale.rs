//! The locale registry.
//!
//! The supported set is closed: adding a locale means adding a variant, a
//! bundle under `locales/` and an arm in each match below.

use crate::I18nError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Locale {
    En,
    Zh,
    Fr,
}

impl Locale {
    /// Every supported locale, in display order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Zh, Locale::Fr];

    /// The locale used when nothing else applies.
    pub const DEFAULT: Locale = Locale::En;

    /// Returns the code used in URLs, cookies and bundle file names.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::Fr => "fr",
        }
    }

    /// Returns the language name written in the language itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Zh => "中文",
            Locale::Fr => "Français",
        }
    }

    /// Returns true if this is [`Locale::DEFAULT`].
    pub fn is_default(self) -> bool {
        self == Locale::DEFAULT
    }

    /// Parses a locale code or language tag.
    ///
    /// Accepts bare codes in any case (`FR`) and region-qualified tags
    /// (`zh-CN`, `fr_FR`), matched on their primary subtag.
    pub fn from_code(code: &str) -> Option<Locale> {
        let code = code.trim();
        let primary = code.split(['-', '_']).next().unwrap_or(code);
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(primary))
    }

    /// Matches a URL segment, which must be exactly a supported code.
    pub fn from_segment(segment: &str) -> Option<Locale> {
        Locale::ALL
            .into_iter()
            .find(|locale| locale.code() == segment)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s).ok_or_else(|| I18nError::UnsupportedLocale(s.to_string()))
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for &'static str {
    fn from(locale: Locale) -> Self {
        locale.code()
    }
}
