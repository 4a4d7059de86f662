use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::analysis::config::{AnalysisConfig, DEFAULT_INACTIVE_COLOR, DEFAULT_PALETTE};
use crate::models::ClosingBoundary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub palette: Vec<String>,
    pub inactive_color: String,
    pub poll_interval_ms: u64,
    pub closing_boundary: ClosingBoundary,
    /// Relative to the data root.
    pub users_dir: String,
    /// Relative to the data root.
    pub catalog_path: String,
    pub max_selected_users: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
            inactive_color: DEFAULT_INACTIVE_COLOR.into(),
            poll_interval_ms: 200,
            closing_boundary: ClosingBoundary::VideoLength,
            users_dir: "Users".into(),
            catalog_path: "Video/VideoLabels.csv".into(),
            max_selected_users: 5,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            bail!("palette must contain at least one color");
        }
        for color in &self.palette {
            validate_color(color)?;
        }
        validate_color(&self.inactive_color)?;

        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.users_dir.trim().is_empty() || self.catalog_path.trim().is_empty() {
            bail!("users_dir and catalog_path must not be empty");
        }
        Ok(())
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            closing_boundary: self.closing_boundary,
            palette: self.palette.clone(),
            inactive_color: self.inactive_color.clone(),
            max_selected_users: self.max_selected_users,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn users_path(&self, root: &Path) -> PathBuf {
        root.join(&self.users_dir)
    }

    pub fn catalog_file(&self, root: &Path) -> PathBuf {
        root.join(&self.catalog_path)
    }
}

pub fn validate_color(color: &str) -> Result<()> {
    let Some(hex_part) = color.strip_prefix('#') else {
        bail!("Invalid color format {color:?}. Must be hex (#RRGGBB)");
    };

    if hex_part.len() != 6 && hex_part.len() != 8 {
        bail!("Invalid color format {color:?}. Must be hex (#RRGGBB or #RRGGBBAA)");
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid color format {color:?}. Must be hex (#RRGGBB)");
    }

    Ok(())
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Load from `path`, falling back to defaults when the file is missing,
    /// is not valid JSON, or holds invalid values.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) if settings.validate().is_ok() => settings,
                Ok(_) | Err(_) => {
                    log::warn!("Ignoring invalid settings in {}", path.display());
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        self.read().clone()
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        self.read().analysis_config()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        {
            let mut guard = self.write();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    pub fn update_palette(&self, palette: Vec<String>) -> Result<()> {
        let mut settings = self.settings();
        settings.palette = palette;
        self.update(settings)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        data.validate()?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("moodscan.json")).unwrap();
        let settings = store.settings();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.palette.len(), 7);
        assert_eq!(settings.poll_interval(), Duration::from_millis(200));
        assert_eq!(store.analysis_config(), AnalysisConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodscan.json");
        fs::write(&path, r#"{ "closingBoundary": "lastSample", "pollIntervalMs": 50 }"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.closing_boundary, ClosingBoundary::LastSample);
        assert_eq!(settings.poll_interval_ms, 50);
        assert_eq!(settings.users_dir, "Users");
    }

    #[test]
    fn garbage_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodscan.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().settings(), Settings::default());
    }

    #[test]
    fn updates_are_validated_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moodscan.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        assert!(store.update_palette(vec!["red".into()]).is_err());
        assert!(store.update_palette(Vec::new()).is_err());
        assert!(!path.exists());

        store
            .update_palette(vec!["#112233".into(), "#445566FF".into()])
            .unwrap();
        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.settings().palette, vec!["#112233", "#445566FF"]);
        reloaded.reload().unwrap();
    }

    #[test]
    fn color_validation() {
        assert!(validate_color("#FF1FA9").is_ok());
        assert!(validate_color("#ff1fa9cc").is_ok());
        assert!(validate_color("FF1FA9").is_err());
        assert!(validate_color("#FF1FA").is_err());
        assert!(validate_color("#GG1FA9").is_err());
    }
}
