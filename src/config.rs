use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use piechart::{ChartStyle, Color, KeyedDataSource, SliceKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SliceConfig {
    pub key: SliceKey,
    pub value: f64,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub chart: ChartStyle,
    #[serde(default)]
    pub slices: Vec<SliceConfig>,
    #[serde(default)]
    pub show_key_labels: bool,
    #[serde(default)]
    pub legend: bool,
}

impl Config {
    /// Keyed data source with slices in the order they are listed.
    pub fn data_source(&self) -> KeyedDataSource {
        let order: Vec<SliceKey> = self.slices.iter().map(|s| s.key.clone()).collect();
        let values: HashMap<SliceKey, f64> = self
            .slices
            .iter()
            .map(|s| (s.key.clone(), s.value))
            .collect();
        let colors: HashMap<SliceKey, Color> = self
            .slices
            .iter()
            .filter_map(|s| s.color.map(|c| (s.key.clone(), c)))
            .collect();

        KeyedDataSource::with_key_order(values, order)
            .with_colors(colors)
            .with_key_labels(self.show_key_labels)
    }

    /// The bundled sample configuration.
    pub fn builtin() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap_or_else(|e| {
                log::error!("Bundled config is invalid: {}", e);
                Config::default()
            })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "pieview", "pieview").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("PIEVIEW").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads `path`, falling back to the bundled sample when the file is missing or broken.
pub fn load_or_builtin(path: &Path) -> Config {
    if !path.exists() {
        log::info!("No config at {}, using the bundled sample", path.display());
        return Config::builtin();
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            Config::builtin()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Makes a user-supplied config path absolute so the watcher has a real
/// directory to watch.
pub fn resolve_config_path(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Whether `event` changed the file at `config_path`. Only the config's own
/// directory is watched, so the file name is enough; editors that save by
/// renaming a temp file still match on the final name.
fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    let changed = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    changed
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == config_path.file_name())
}

/// Sends [`AppEvent::ConfigReload`] whenever the config file changes.
pub async fn run_async_watcher(tx: Sender<AppEvent>, config_path: PathBuf) {
    let Some(config_dir) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        log::warn!("Not watching {}: no parent directory", config_path.display());
        return;
    };

    if let Err(e) = fs_err::create_dir_all(config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )
    .and_then(|mut w| w.watch(config_dir, RecursiveMode::NonRecursive).map(|()| w));

    // dropping the watcher stops it
    let _watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!(
                "Config reload disabled for {}: {}",
                config_path.display(),
                ConfigError::from(e)
            );
            return;
        }
    };
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches_config(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
