use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

const TICK_OVERRIDE_ENV: &str = "MOODLENS_TICK_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionSettings {
    /// Gap between two classifier calls while detecting.
    pub tick_interval_ms: u64,
    /// A classifier call running longer than this counts as a failed tick.
    pub classifier_timeout_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            classifier_timeout_ms: 5000,
        }
    }
}

impl DetectionSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.classifier_timeout_ms == 0 {
            bail!("classifier_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    /// Applies `MOODLENS_TICK_MS` when it holds a positive integer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(TICK_OVERRIDE_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.tick_interval_ms = ms,
                _ => warn!("ignoring {TICK_OVERRIDE_ENV}={raw:?}: not a positive integer"),
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    #[serde(default)]
    detection: DetectionSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            let parsed: UserSettings = match serde_json::from_str(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("unreadable settings in {}: {err}; using defaults", path.display());
                    UserSettings::default()
                }
            };
            if let Err(err) = parsed.detection.validate() {
                warn!("invalid detection settings in {}: {err}; using defaults", path.display());
                UserSettings::default()
            } else {
                parsed
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn detection(&self) -> DetectionSettings {
        self.data
            .read()
            .map(|guard| guard.detection.clone())
            .unwrap_or_default()
    }

    pub fn update_detection(&self, settings: DetectionSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        guard.detection = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("moodlens-settings-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let store = SettingsStore::new(scratch_path()).unwrap();
        assert_eq!(store.detection(), DetectionSettings::default());
    }

    #[test]
    fn updates_persist_across_reloads() {
        let path = scratch_path();
        let store = SettingsStore::new(path.clone()).unwrap();
        let custom = DetectionSettings {
            tick_interval_ms: 250,
            ..DetectionSettings::default()
        };
        store.update_detection(custom.clone()).unwrap();

        let reloaded = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.detection(), custom);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_zero_interval() {
        let store = SettingsStore::new(scratch_path()).unwrap();
        let bad = DetectionSettings {
            tick_interval_ms: 0,
            ..DetectionSettings::default()
        };
        assert!(store.update_detection(bad).is_err());
        assert_eq!(store.detection().tick_interval_ms, 1000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch_path();
        fs::write(&path, r#"{"detection":{"tickIntervalMs":500}}"#).unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        let settings = store.detection();
        assert_eq!(settings.tick_interval_ms, 500);
        assert_eq!(settings.classifier_timeout_ms, 5000);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = scratch_path();
        fs::write(&path, "{ not json").unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.detection(), DetectionSettings::default());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let path = scratch_path();
        fs::write(
            &path,
            r#"{"detection":{"tickIntervalMs":750,"modelUrl":"/models"}}"#,
        )
        .unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.detection().tick_interval_ms, 750);
        let _ = fs::remove_file(path);
    }
}
