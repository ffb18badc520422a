use crate::{I18nError, Locale, Namespace};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// The translated strings of one locale.
///
/// Built from a nested JSON document (`namespace -> key -> string`, keys may
/// nest further) and flattened to dotted keys such as `hero.badge` or
/// `privacy_policy_page.personal_data_list.email`. Immutable once built.
#[derive(Debug, Clone)]
pub struct Bundle {
    locale: Locale,
    document: Value,
    messages: HashMap<String, String>,
}

impl Bundle {
    /// Parses a bundle document.
    ///
    /// Non-string leaves (numbers, booleans) are kept as their JSON text;
    /// `null` and arrays are ignored.
    pub fn from_json_str(locale: Locale, json: &str) -> Result<Self, I18nError> {
        let document: Value = serde_json::from_str(json)
            .map_err(|source| I18nError::BundleParse { locale, source })?;
        let Value::Object(root) = &document else {
            return Err(I18nError::BundleLoad {
                locale,
                reason: "bundle root must be an object".to_string(),
            });
        };
        let mut messages = HashMap::new();
        flatten_into(&mut messages, None, root);
        Ok(Self {
            locale,
            document,
            messages,
        })
    }

    /// A bundle without any strings; every lookup against it misses.
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            document: Value::Object(Map::new()),
            messages: HashMap::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks up a full dotted key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Returns the nested document of a namespace, as stored in the source.
    pub fn namespace(&self, namespace: Namespace) -> Option<&Value> {
        self.document.get(namespace.as_str())
    }

    /// Returns the whole nested document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// All dotted keys, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.messages.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten_into(out: &mut HashMap<String, String>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            Value::Object(nested) => flatten_into(out, Some(&full_key), nested),
            Value::Number(number) => {
                out.insert(full_key, number.to_string());
            }
            Value::Bool(flag) => {
                out.insert(full_key, flag.to_string());
            }
            Value::Null | Value::Array(_) => {}
        }
    }
}
