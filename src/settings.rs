use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::db::{models::DEFAULT_PROCESS_NAME, DEFAULT_LIMIT, DEFAULT_WINDOW_DAYS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub default_process: String,
    pub history_days: i64,
    pub list_limit: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_process: DEFAULT_PROCESS_NAME.into(),
            history_days: DEFAULT_WINDOW_DAYS,
            list_limit: DEFAULT_LIMIT,
        }
    }
}

/// Partial update applied by [`SettingsStore::update`].
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub default_process: Option<String>,
    pub history_days: Option<i64>,
    pub list_limit: Option<usize>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.default_process.is_none() && self.history_days.is_none() && self.list_limit.is_none()
    }
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
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> UserSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, patch: SettingsPatch) -> Result<UserSettings> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut next = guard.clone();
        if let Some(process) = patch.default_process {
            next.default_process = process;
        }
        if let Some(days) = patch.history_days {
            next.history_days = days;
        }
        if let Some(limit) = patch.list_limit {
            next.list_limit = limit;
        }

        self.persist(&next)?;
        *guard = next.clone();
        Ok(next)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
