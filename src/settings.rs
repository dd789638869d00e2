use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Presentation settings. The city itself is never saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    pub enable_color: bool,
    pub reduce_motion: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 30,
            enable_color: true,
            reduce_motion: false,
            export_dir: None,
        }
    }
}

pub fn settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "futurecity", "FutureCity")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating settings directory {}", dir.display()))?;
    Ok(dir.join("settings.json"))
}

/// Unreadable or malformed files yield the defaults.
pub fn load_settings(path: &Path) -> Settings {
    let Ok(s) = fs::read_to_string(path) else {
        return Settings::default();
    };
    match serde_json::from_str::<Settings>(&s) {
        Ok(v) => v,
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring malformed settings file");
            Settings::default()
        }
    }
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename does not replace an existing file on every platform
    if to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming to {}", to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load() {
        let dir = tempdir().expect("scratch dir");
        let path = dir.path().join("settings.json");
        let s = Settings {
            fps_cap: 24,
            enable_color: false,
            reduce_motion: true,
            export_dir: Some(PathBuf::from("/tmp/exports")),
        };
        save_settings_atomic(&path, &s).expect("save");
        assert_eq!(load_settings(&path), s);
        save_settings_atomic(&path, &Settings::default()).expect("overwrite");
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn malformed_or_partial_files_fall_back() {
        let dir = tempdir().expect("scratch dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(load_settings(&path), Settings::default());
        fs::write(&path, r#"{"fps_cap": 12}"#).expect("write");
        let s = load_settings(&path);
        assert_eq!(s.fps_cap, 12);
        assert!(s.enable_color);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().expect("scratch dir");
        assert_eq!(load_settings(&dir.path().join("absent.json")), Settings::default());
    }
}
