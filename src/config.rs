use crate::events::AppEvent;
use crate::wheel::rotation::{SpinProfile, SpinRange, SpinTuning};
use crate::wheel::{CATEGORY_CYCLES, CategorySlug, DeviceSignals, NavPath};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Where the fixed pointer sits around the wheel.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PointerPosition {
    #[default]
    #[strum(serialize = "Top", serialize = "t", serialize = "0")]
    Top,
    #[strum(serialize = "Right", serialize = "r", serialize = "90")]
    Right,
    #[strum(serialize = "Bottom", serialize = "b", serialize = "180")]
    Bottom,
    #[strum(serialize = "Left", serialize = "l", serialize = "270")]
    Left,
}

impl PointerPosition {
    /// Clockwise offset from 12 o'clock.
    pub fn offset_degrees(&self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Right => 90.0,
            Self::Bottom => 180.0,
            Self::Left => 270.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub name: String,
    pub slug: CategorySlug,
    pub path: NavPath,
    pub color: String,
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

impl CategoryConfig {
    fn new(name: &str, slug: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: CategorySlug::new(slug),
            path: NavPath::new(format!("/{slug}/")),
            color: color.to_string(),
            icon: None,
        }
    }
}

pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("Overlooked Objects", "objects", "#F87171"),
        CategoryConfig::new("Daily Habits", "habits", "#60A5FA"),
        CategoryConfig::new("Perspective Flips", "perspective", "#34D399"),
        CategoryConfig::new("Spotting Opportunities", "opportunities", "#A78BFA"),
        CategoryConfig::new("Value Creation", "value", "#FBBF24"),
        CategoryConfig::new("Quiz", "quiz", "#F472B6"),
        CategoryConfig::new("Today's Fortune", "todays-fortune", "#6EE7B7"),
        CategoryConfig::new("Hidden Spaces", "spaces", "#93C5FD"),
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpinConfig {
    pub normal: SpinProfile,
    pub reduced: SpinProfile,
    pub settle_delay_ms: u64,
    pub cycles: usize,
    pub pointer: PointerPosition,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            normal: SpinProfile {
                duration_ms: SpinRange::new(3000.0, 5000.0),
                rotations: SpinRange::new(3.0, 5.0),
            },
            reduced: SpinProfile {
                duration_ms: SpinRange::new(1000.0, 1500.0),
                rotations: SpinRange::new(1.0, 2.0),
            },
            settle_delay_ms: 100,
            cycles: CATEGORY_CYCLES,
            pointer: PointerPosition::Top,
        }
    }
}

impl SpinConfig {
    pub fn tuning(&self) -> SpinTuning {
        SpinTuning {
            normal: self.normal,
            reduced: self.reduced,
            pointer_offset: self.pointer.offset_degrees(),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CelebrationConfig {
    pub particle_count: usize,
    pub touch_particle_count: usize,
    pub duration_ms: u64,
    pub spread: f64,
    pub secondary_spread: f64,
    pub gravity: f64,
    pub dual_burst: bool,
    pub secondary_delay_ms: u64,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            touch_particle_count: 80,
            duration_ms: 1500,
            spread: 70.0,
            secondary_spread: 80.0,
            gravity: 1.0,
            dual_burst: true,
            secondary_delay_ms: 300,
        }
    }
}

impl CelebrationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn secondary_delay(&self) -> Duration {
        Duration::from_millis(self.secondary_delay_ms)
    }

    pub fn count(&self, touch: bool) -> usize {
        if touch {
            self.touch_particle_count
        } else {
            self.particle_count
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub labels: bool,
    pub preview_panel: bool,
    pub resize_debounce_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            labels: true,
            preview_panel: true,
            resize_debounce_ms: 100,
        }
    }
}

impl LayoutConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub spin: SpinConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub signals: DeviceSignals,
    /// Category paths are opened relative to this; unset means log only.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            spin: SpinConfig::default(),
            celebration: CelebrationConfig::default(),
            layout: LayoutConfig::default(),
            signals: DeviceSignals::default(),
            base_url: None,
        }
    }
}

impl Config {
    pub fn destination(&self, path: &NavPath) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), path))
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
    let proj_dirs = ProjectDirs::from("org", "fortune", "fortune-wheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("WHEEL")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Falls back to the built-in wheel when the file is missing or broken.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        log::info!("No config at {}, using the default wheel", path.display());
        return Config::default();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
