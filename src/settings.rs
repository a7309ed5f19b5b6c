//! Persisted key/value settings.
//!
//! The panel only needs a handful of typed values (window geometry, the
//! stay-on-top flag, shortcut bindings), so the store is a flat map of
//! slash-namespaced keys such as `Main/x`. Two backends are provided:
//!
//! - [`JsonSettings`] keeps the map in memory and writes it as pretty JSON on
//!   [`SettingsStore::sync`].
//! - [`MemorySettings`] never touches disk. Clones share the same storage so
//!   a test can keep a handle and inspect what the panel persisted.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    /// Integer view of the value. Text is accepted when it parses.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            SettingValue::Text(s) => s.trim().parse().ok(),
            SettingValue::Bool(_) => None,
        }
    }

    /// Boolean view of the value. Integers are true when non-zero.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            SettingValue::Int(v) => Some(*v != 0),
            SettingValue::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(value.into())
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Process-wide persisted key/value store.
pub trait SettingsStore {
    fn value(&self, key: &str) -> Option<SettingValue>;

    fn set_value(&mut self, key: &str, value: SettingValue);

    fn remove(&mut self, key: &str);

    /// Flush pending writes to durable storage.
    fn sync(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Returns the value as an `i32`, or `None` when missing, of the wrong
    /// type, or out of range.
    fn int(&self, key: &str) -> Option<i32> {
        self.value(key)
            .and_then(|v| v.to_int())
            .and_then(|v| i32::try_from(v).ok())
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(|v| v.to_bool())
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.set_value(key, value.into());
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.set_value(key, value.into());
    }

    fn set_text(&mut self, key: &str, value: &str) {
        self.set_value(key, value.into());
    }
}

/// In-memory settings. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Rc<RefCell<BTreeMap<String, SettingValue>>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}

impl SettingsStore for MemorySettings {
    fn value(&self, key: &str) -> Option<SettingValue> {
        self.values.borrow().get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Settings persisted to a JSON file.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    values: BTreeMap<String, SettingValue>,
    dirty: bool,
}

impl JsonSettings {
    /// Location used when no explicit path is configured.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rim-panel")
            .join("settings.json")
    }

    /// Load settings from `path`. A missing file yields an empty store.
    ///
    /// A file that does not parse is moved aside to `<name>.bad` and the
    /// store starts empty, so callers fall back to their defaults. Only I/O
    /// failures are reported.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let mut dirty = false;
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(source) => {
                    let err = SettingsError::Parse {
                        path: path.clone(),
                        source,
                    };
                    tracing::warn!(error = %err, "discarding unreadable settings");
                    Self::quarantine(&path);
                    dirty = true;
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "loaded settings");
        Ok(Self {
            path,
            values,
            dirty,
        })
    }

    /// Where a malformed settings file is kept for inspection.
    pub fn quarantine_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".bad");
        path.with_file_name(name)
    }

    fn quarantine(path: &Path) {
        let target = Self::quarantine_path(path);
        if let Err(err) = fs::rename(path, &target) {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "could not move bad settings aside"
            );
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn io_error(&self, source: io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonSettings {
    fn value(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: SettingValue) {
        if self.values.get(key) == Some(&value) {
            return;
        }
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.dirty = true;
        }
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        // Write beside the target and rename so a crash never leaves a
        // truncated file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "settings synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_storage() {
        let mut a = MemorySettings::new();
        let b = a.clone();
        a.set_int("Main/x", 42);
        assert_eq!(b.int("Main/x"), Some(42));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn typed_views_reject_wrong_types() {
        let mut s = MemorySettings::new();
        s.set_bool("Main/topHint", true);
        s.set_text("Main/x", "not a number");
        s.set_text("Main/y", " 17 ");
        s.set_value("Main/width", SettingValue::Int(i64::MAX));
        assert_eq!(s.int("Main/topHint"), None);
        assert_eq!(s.int("Main/x"), None);
        assert_eq!(s.int("Main/y"), Some(17));
        assert_eq!(s.int("Main/width"), None);
        assert_eq!(s.bool("Main/topHint"), Some(true));
        assert_eq!(s.bool("missing"), None);
    }

    #[test]
    fn int_values_read_as_bool() {
        let mut s = MemorySettings::new();
        s.set_int("flag", 0);
        assert_eq!(s.bool("flag"), Some(false));
        s.set_int("flag", 3);
        assert_eq!(s.bool("flag"), Some(true));
    }

    #[test]
    fn json_sync_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut s = JsonSettings::open(&path).unwrap();
        assert!(!s.contains("Main/x"));
        s.set_int("Main/x", 10);
        s.set_bool("Main/topHint", true);
        assert!(s.is_dirty());
        s.sync().unwrap();
        assert!(!s.is_dirty());

        let reopened = JsonSettings::open(&path).unwrap();
        assert_eq!(reopened.int("Main/x"), Some(10));
        assert_eq!(reopened.bool("Main/topHint"), Some(true));
    }

    #[test]
    fn json_reads_handwritten_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            indoc::indoc! {r#"
                {
                    "Main/x": 5,
                    "Main/topHint": false,
                    "Shortcut/Quit": "Ctrl+Q"
                }
            "#},
        )
        .unwrap();
        let s = JsonSettings::open(&path).unwrap();
        assert_eq!(s.int("Main/x"), Some(5));
        assert_eq!(s.bool("Main/topHint"), Some(false));
        assert_eq!(
            s.value("Shortcut/Quit").as_ref().and_then(|v| v.as_text()),
            Some("Ctrl+Q")
        );
    }

    #[test]
    fn json_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "Main/x": 3, "Main/y": 4, "Main/wid"#).unwrap();
        let mut s = JsonSettings::open(&path).unwrap();
        assert_eq!(s.int("Main/x"), None);
        assert!(s.is_dirty());

        let bad = JsonSettings::quarantine_path(&path);
        assert_eq!(bad, dir.path().join("settings.json.bad"));
        assert!(std::fs::read_to_string(&bad).unwrap().contains("Main/wid"));

        s.set_int("Main/x", 7);
        s.sync().unwrap();
        let reopened = JsonSettings::open(&path).unwrap();
        assert_eq!(reopened.int("Main/x"), Some(7));
    }

    #[test]
    fn unchanged_value_does_not_mark_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = JsonSettings::open(dir.path().join("s.json")).unwrap();
        s.set_int("Main/x", 1);
        s.sync().unwrap();
        s.set_int("Main/x", 1);
        assert!(!s.is_dirty());
    }
}
