use crate::model::Page;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Language {
    Danish,
    English,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct JupiterSettings {
    pub(crate) tick_ms: u64,
    pub(crate) step_minutes: i64,
    pub(crate) offset_range_hours: i64,
}

impl Default for JupiterSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            step_minutes: 30,
            offset_range_hours: 240,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct VenusSettings {
    pub(crate) tick_ms: u64,
    pub(crate) step_degrees: f64,
}

impl Default for VenusSettings {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            step_degrees: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    pub(crate) language: Language,
    pub(crate) start_page: Page,
    pub(crate) show_labels: bool,
    pub(crate) log_level: String,
    pub(crate) jupiter: JupiterSettings,
    pub(crate) venus: VenusSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            language: Language::Danish,
            start_page: Page::Jupiter,
            show_labels: true,
            log_level: "info".to_string(),
            jupiter: JupiterSettings::default(),
            venus: VenusSettings::default(),
        }
    }
}

/// One week.
pub(crate) const MAX_STEP_MINUTES: i64 = 7 * 24 * 60;
/// Ten years either side of the entered date.
pub(crate) const MAX_OFFSET_RANGE_HOURS: i64 = 10 * 365 * 24;

impl Settings {
    /// Pull hand-edited values back into the ranges the widgets handle.
    pub(crate) fn clamped(mut self) -> Self {
        self.fps_cap = self.fps_cap.clamp(10, 240);
        self.jupiter.tick_ms = self.jupiter.tick_ms.max(1);
        self.jupiter.step_minutes = self.jupiter.step_minutes.clamp(1, MAX_STEP_MINUTES);
        self.jupiter.offset_range_hours =
            self.jupiter.offset_range_hours.clamp(1, MAX_OFFSET_RANGE_HOURS);
        self.venus.tick_ms = self.venus.tick_ms.max(1);
        if !self.venus.step_degrees.is_finite() {
            self.venus.step_degrees = VenusSettings::default().step_degrees;
        }
        self.venus.step_degrees = self.venus.step_degrees.clamp(-360.0, 360.0);
        self
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_dir: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("dk", "himlen", "Himlen")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_dir: dir,
    })
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v.clamped();
        }
    }
    Settings::default()
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    if path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
