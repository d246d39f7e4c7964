//! Key-value settings with JSON-encoded values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Record;
use crate::schema::{self, TableDef};
use crate::storage::row::{RowBuilder, RowValues};
use crate::store::Store;

/// UI theme (`"light"`, `"dark"` or `"system"`).
pub const THEME: &str = "theme";
/// Weekday numbers treated as weekend, Sunday = 0.
pub const WEEKEND_DAYS: &str = "weekendDays";
/// Completion streak, see [`StreakData`].
pub const STREAK: &str = "streak";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Day of the last completion, empty when there is none yet
    pub last_completed_date: String,
}

/// One row of the settings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    /// JSON text
    pub value: Option<String>,
}

impl Setting {
    pub fn encode<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            value: Some(serde_json::to_string(value)?),
        })
    }

    /// Decode the stored JSON, or return `default`.
    ///
    /// A [`THEME`] value that is not valid JSON is tried once more as a bare
    /// string, which covers themes written unquoted by older builds. Any
    /// other key with invalid JSON reads as `default`.
    pub fn value_or<T: DeserializeOwned>(&self, default: T) -> T {
        let raw = match self.value.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => return default,
        };
        if self.key == THEME && serde_json::from_str::<serde_json::Value>(raw).is_err() {
            if let Ok(value) = serde_json::from_value(serde_json::Value::String(raw.to_string())) {
                return value;
            }
        }
        crate::value::decode_json_or(Some(raw), default, &self.key)
    }
}

impl Record for Setting {
    fn table() -> &'static TableDef {
        &schema::SETTINGS
    }

    fn id(&self) -> &str {
        &self.key
    }

    fn encode(&self, row: RowBuilder) -> RowBuilder {
        row.text("key", &self.key)
            .opt_text("value", self.value.as_deref())
    }

    fn decode(row: &RowValues) -> Result<Self> {
        Ok(Self {
            key: row.text("key")?,
            value: row.opt_text("value")?,
        })
    }
}

/// Settings view over a [`Store`].
///
/// Follows the store's degradation rules: reads fall back to the caller's
/// default, writes are dropped (and logged) when they cannot be applied.
pub struct Settings<'a> {
    store: &'a Store,
}

impl<'a> Settings<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Read `key`, falling back to `default` when it is absent, undecodable,
    /// or the store is not ready.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get::<Setting>(key) {
            Some(setting) => setting.value_or(default),
            None => default,
        }
    }

    /// Raw JSON text stored under `key`.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.store.get::<Setting>(key).and_then(|setting| setting.value)
    }

    /// Store `value` under `key`. Returns whether the write was applied.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let setting = match Setting::encode(key, value) {
            Ok(setting) => setting,
            Err(err) => {
                tracing::warn!(key, error = %err, "setting value could not be encoded");
                return false;
            }
        };
        self.store.upsert(&setting).await
    }

    pub fn all(&self) -> Vec<Setting> {
        self.store.get_all::<Setting>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(raw: Option<&str>) -> Setting {
        Setting {
            key: THEME.to_string(),
            value: raw.map(str::to_string),
        }
    }

    #[test]
    fn test_value_or_decodes_json() {
        let setting = Setting::encode(WEEKEND_DAYS, &[0, 6]).unwrap();
        assert_eq!(setting.value.as_deref(), Some("[0,6]"));
        assert_eq!(setting.value_or(Vec::<u8>::new()), vec![0, 6]);
    }

    #[test]
    fn test_unquoted_text_reads_as_string() {
        assert_eq!(stored(Some("dark")).value_or("system".to_string()), "dark");
    }

    #[test]
    fn test_unquoted_text_under_other_keys_falls_back() {
        let setting = Setting {
            key: "k".to_string(),
            value: Some("{not json".to_string()),
        };
        assert_eq!(setting.value_or("D".to_string()), "D");

        let setting = Setting {
            key: WEEKEND_DAYS.to_string(),
            value: Some("dark".to_string()),
        };
        assert_eq!(setting.value_or("none".to_string()), "none");
    }

    #[test]
    fn test_unusable_value_falls_back() {
        assert_eq!(stored(None).value_or("system".to_string()), "system");
        assert_eq!(stored(Some("")).value_or(7u32), 7);
        assert_eq!(stored(Some("{broken")).value_or(vec![0u8, 6]), vec![0, 6]);
        assert_eq!(stored(Some("\"dark\"")).value_or(3u32), 3);
    }

    #[test]
    fn test_streak_uses_camel_case() {
        let json = serde_json::to_string(&StreakData::default()).unwrap();
        assert_eq!(
            json,
            r#"{"currentStreak":0,"longestStreak":0,"lastCompletedDate":""}"#
        );
    }
}
