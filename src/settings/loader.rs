//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first successfully parsed `Settings` (by file name)
//! is used. If no RON files are found or none parse, default settings are used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher, RonWatcher};
use crate::settings::Settings;
use bevy::log::info;
use bevy::prelude::{Res, ResMut, Resource};
use std::path::{Path, PathBuf};

pub const SETTINGS_DIR: &str = "data/settings";

/// Watches the settings directory and remembers where to reload from.
#[derive(Resource)]
pub struct SettingsWatcher {
    pub watcher: RonWatcher,
    pub dir: PathBuf,
}

/// Load settings from `path` (directory).
///
/// # Example
/// ```
/// let settings = rollaball::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.player.mass > 0.0);
/// ```
#[must_use]
pub fn load_settings_from_dir(path: impl AsRef<Path>) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_else(Settings::defaults)
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Returns the `notify` error when the OS watcher cannot be created.
pub fn setup_settings_watcher(path: impl AsRef<Path>) -> Result<SettingsWatcher, notify::Error> {
    let dir = path.as_ref().to_path_buf();
    setup_ron_watcher(&dir).map(|watcher| SettingsWatcher { watcher, dir })
}

/// Reload the settings resource when the watcher reports a change.
///
/// Unchanged content is not written back so `Res<Settings>::is_changed`
/// only fires on real edits.
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if !watcher.watcher.take_changed() {
        return;
    }
    let reloaded = load_settings_from_dir(&watcher.dir);
    if *settings != reloaded {
        info!("Settings changed, reloading from {}", watcher.dir.display());
        *settings = reloaded;
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher { watcher: RonWatcher::stub(), dir: PathBuf::from(SETTINGS_DIR) }
    }
}
