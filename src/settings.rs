//! Persisted client preferences.
//!
//! Everything here is best-effort UI state: the admin credential, theme,
//! navigation layout, and per-resource table preferences. Storage goes
//! through the `SettingsStore` trait so the console can run against an
//! in-memory store in tests; the binary wires up the disk store at
//! `~/.foliodesk/settings.json`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Navigation column width, in terminal characters.
pub const SIDEBAR_WIDTH_DEFAULT: u16 = 22;
pub const SIDEBAR_WIDTH_MIN: u16 = 18;
pub const SIDEBAR_WIDTH_MAX: u16 = 30;

/// Table column width, in terminal characters.
pub const COLUMN_WIDTH_DEFAULT: u16 = 18;
pub const COLUMN_WIDTH_MIN: u16 = 12;
pub const COLUMN_WIDTH_MAX: u16 = 32;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to read settings: {0}")]
    Read(std::io::Error),

    #[error("Failed to write settings: {0}")]
    Write(std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Per-resource table preferences. Columns missing from the maps use the
/// defaults: visible, standard width.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableSettings {
    pub visible_columns: HashMap<String, bool>,
    pub column_widths: HashMap<String, u16>,
    pub show_table_options: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            visible_columns: HashMap::new(),
            column_widths: HashMap::new(),
            show_table_options: true,
        }
    }
}

impl TableSettings {
    pub fn is_visible(&self, column: &str) -> bool {
        self.visible_columns.get(column).copied().unwrap_or(true)
    }

    pub fn toggle_column(&mut self, column: &str) {
        let next = !self.is_visible(column);
        self.visible_columns.insert(column.to_string(), next);
    }

    pub fn set_visible(&mut self, column: &str, visible: bool) {
        self.visible_columns.insert(column.to_string(), visible);
    }

    pub fn width(&self, column: &str) -> u16 {
        self.column_widths
            .get(column)
            .copied()
            .unwrap_or(COLUMN_WIDTH_DEFAULT)
    }

    pub fn set_width(&mut self, column: &str, width: u16) {
        let clamped = width.clamp(COLUMN_WIDTH_MIN, COLUMN_WIDTH_MAX);
        self.column_widths.insert(column.to_string(), clamped);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Basic credential attached to every admin request.
    pub admin_auth: Option<String>,
    pub admin_user: Option<String>,
    pub theme: Theme,
    pub sidebar_compact: bool,
    pub sidebar_width: u16,
    /// Overrides the built-in collaborator base URL.
    pub api_base: Option<String>,
    /// Table preferences keyed by resource key.
    pub tables: HashMap<String, TableSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_auth: None,
            admin_user: None,
            theme: Theme::default(),
            sidebar_compact: false,
            sidebar_width: SIDEBAR_WIDTH_DEFAULT,
            api_base: None,
            tables: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn set_sidebar_width(&mut self, width: u16) {
        self.sidebar_width = width.clamp(SIDEBAR_WIDTH_MIN, SIDEBAR_WIDTH_MAX);
    }

    pub fn table(&self, resource_key: &str) -> TableSettings {
        self.tables.get(resource_key).cloned().unwrap_or_default()
    }

    pub fn table_mut(&mut self, resource_key: &str) -> &mut TableSettings {
        self.tables.entry(resource_key.to_string()).or_default()
    }

    /// Bring persisted values back into range after a load. Out-of-range
    /// numbers can appear when the file was hand-edited.
    fn normalize(&mut self) {
        self.sidebar_width = self.sidebar_width.clamp(SIDEBAR_WIDTH_MIN, SIDEBAR_WIDTH_MAX);
        for table in self.tables.values_mut() {
            for width in table.column_widths.values_mut() {
                *width = (*width).clamp(COLUMN_WIDTH_MIN, COLUMN_WIDTH_MAX);
            }
        }
    }
}

/// Load/save seam for preferences.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings persisted as pretty JSON on disk.
pub struct DiskSettings {
    path: PathBuf,
}

impl DiskSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Canonical location: `~/.foliodesk/settings.json`.
    pub fn at_default_location() -> Result<Self, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeDirNotFound)?;
        Ok(Self::new(home.join(".foliodesk").join("settings.json")))
    }
}

impl SettingsStore for DiskSettings {
    fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path).map_err(SettingsError::Read)?;
        let mut settings: Settings = match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                // Preferences are best-effort; a corrupt file starts fresh.
                log::warn!("unreadable settings at {}: {}", self.path.display(), e);
                Settings::default()
            }
        };
        settings.normalize();
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(SettingsError::Write)?;
            }
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(SettingsError::Write)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemorySettings {
    inner: Mutex<Settings>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.inner.lock().expect("settings lock").clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.inner.lock().expect("settings lock") = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sidebar_width, SIDEBAR_WIDTH_DEFAULT);
        assert!(!settings.sidebar_compact);
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.admin_auth.is_none());
    }

    #[test]
    fn test_sidebar_width_clamped() {
        let mut settings = Settings::default();
        settings.set_sidebar_width(500);
        assert_eq!(settings.sidebar_width, SIDEBAR_WIDTH_MAX);
        settings.set_sidebar_width(1);
        assert_eq!(settings.sidebar_width, SIDEBAR_WIDTH_MIN);
    }

    #[test]
    fn test_columns_default_visible_with_standard_width() {
        let table = TableSettings::default();
        assert!(table.is_visible("title"));
        assert_eq!(table.width("title"), COLUMN_WIDTH_DEFAULT);
        assert!(table.show_table_options);
    }

    #[test]
    fn test_toggle_and_width_clamp() {
        let mut table = TableSettings::default();
        table.toggle_column("title");
        assert!(!table.is_visible("title"));
        table.toggle_column("title");
        assert!(table.is_visible("title"));

        table.set_width("title", 2);
        assert_eq!(table.width("title"), COLUMN_WIDTH_MIN);
        table.set_width("title", 99);
        assert_eq!(table.width("title"), COLUMN_WIDTH_MAX);
    }

    #[test]
    fn test_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskSettings::new(dir.path().join("settings.json"));

        let mut settings = Settings::default();
        settings.admin_user = Some("admin".to_string());
        settings.theme = Theme::Dark;
        settings.table_mut("projects").set_width("title", 24);
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.table("projects").width("title"), 24);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskSettings::new(dir.path().join("absent.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let store = DiskSettings::new(path);
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_out_of_range_values_normalized_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"sidebarWidth": 4000, "tables": {"projects": {"columnWidths": {"title": 1}}}}"#,
        )
        .unwrap();
        let store = DiskSettings::new(path);
        let loaded = store.load().unwrap();
        assert_eq!(loaded.sidebar_width, SIDEBAR_WIDTH_MAX);
        assert_eq!(loaded.table("projects").width("title"), COLUMN_WIDTH_MIN);
    }
}
