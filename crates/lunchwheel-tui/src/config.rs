use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lunchwheel_core::animation::Easing;
use lunchwheel_core::error::CoreError;
use lunchwheel_core::food::{FoodOption, SegmentColor};
use lunchwheel_core::resolver::SpinSettings;

/// A user-defined food option stored in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionConfig {
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SegmentColor>,
}

impl OptionConfig {
    /// Convert to a catalog option. `index` picks the palette color when none is set.
    pub fn to_food_option(&self, index: usize) -> Result<FoodOption, CoreError> {
        let color = self.color.unwrap_or_else(|| SegmentColor::for_index(index));
        FoodOption::new(self.label.clone(), self.icon.clone(), color)
    }
}

impl From<&FoodOption> for OptionConfig {
    fn from(option: &FoodOption) -> Self {
        Self {
            label: option.label.clone(),
            icon: option.icon.clone(),
            color: Some(option.color),
        }
    }
}

fn is_true(v: &bool) -> bool {
    *v
}

fn default_true() -> bool {
    true
}

/// Spin tuning. Converted into the core `SpinSettings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub min_full_turns: u32,
    pub extra_range_degrees: f64,
    pub duration_ms: u64,
    pub easing: Easing,
    pub quick_stop: bool,
    pub quick_stop_min_degrees: f64,
    pub quick_stop_duration_ms: u64,
    /// Redraw interval while the wheel is moving.
    pub frame_interval_ms: u64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        let settings = SpinSettings::default();
        Self {
            min_full_turns: settings.min_full_turns,
            extra_range_degrees: settings.extra_range_degrees,
            duration_ms: settings.duration.as_millis() as u64,
            easing: settings.easing,
            quick_stop: settings.quick_stop,
            quick_stop_min_degrees: settings.quick_stop_min_degrees,
            quick_stop_duration_ms: settings.quick_stop_duration.as_millis() as u64,
            frame_interval_ms: 33,
        }
    }
}

impl SpinConfig {
    pub fn to_settings(&self) -> SpinSettings {
        SpinSettings {
            min_full_turns: self.min_full_turns,
            extra_range_degrees: self.extra_range_degrees,
            duration: Duration::from_millis(self.duration_ms),
            easing: self.easing,
            quick_stop: self.quick_stop,
            quick_stop_min_degrees: self.quick_stop_min_degrees,
            quick_stop_duration: Duration::from_millis(self.quick_stop_duration_ms),
            ..SpinSettings::default()
        }
    }
}

/// Configurable keybindings.
/// Each field holds a key string like "Ctrl+c", "q", "Space", "F3", etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: String,
    pub force_quit: String,
    pub spin: String,
    pub back: String,
    pub show_help: String,
    pub toggle_history: String,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            force_quit: "Ctrl+c".to_string(),
            spin: "Space".to_string(),
            back: "Esc".to_string(),
            show_help: "?".to_string(),
            toggle_history: "h".to_string(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub spin: SpinConfig,
    #[serde(default)]
    pub keybindings: KeybindingConfig,
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    /// Where this config was loaded from, for appending custom options.
    #[serde(skip)]
    pub path: Option<PathBuf>,
    /// True when no config file was found on disk (first launch).
    #[serde(skip)]
    pub first_launch: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the detected city shown on the result screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub remember_custom_options: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}
fn default_tick_rate() -> u64 {
    250
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate(),
            log_level: default_log_level(),
            city: None,
            remember_custom_options: true,
        }
    }
}

impl AppConfig {
    /// ~/.config/lunchwheel/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lunchwheel").join("config.toml"))
    }

    /// Load config from `path` (or the default location) layered with
    /// `LUNCHWHEEL__SECTION__KEY` environment overrides. Falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(config_path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            let mut config = Self::default();
            config.first_launch = true;
            return config;
        };

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config {:?}: {:#}", config_path, e);
                let mut config = Self {
                    path: Some(config_path),
                    ..Self::default()
                };
                config.first_launch = true;
                config
            }
        }
    }

    /// Load from a specific file (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let exists = path.exists();
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(
                config::Environment::with_prefix("LUNCHWHEEL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("reading {}", path.display()))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("parsing {}", path.display()))?;
        config.path = Some(path.to_path_buf());
        config.first_launch = !exists;
        debug!(
            "config loaded from {:?} ({} custom options)",
            path,
            config.options.len()
        );
        Ok(config)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// User-defined options from the `[[options]]` blocks, with palette colors
    /// continuing after `builtin_count` entries.
    pub fn custom_options(&self, builtin_count: usize) -> Result<Vec<FoodOption>, CoreError> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, opt)| opt.to_food_option(builtin_count + i))
            .collect()
    }

    /// Append an `[[options]]` block to the config file at `path`.
    /// Creates the directory and file if they don't exist.
    pub fn append_option(path: &Path, option: &OptionConfig) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating config dir {}", dir.display()))?;
        }

        let mut content = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?
        } else {
            String::new()
        };

        let block = toml::to_string(option).context("serializing option")?;

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str("\n[[options]]\n");
        content.push_str(&block);

        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Frame interval used while a spin is animating.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.spin.frame_interval_ms.max(1))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.general.tick_rate_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.general.tick_rate_ms, 250);
        assert!(config.general.remember_custom_options);
        assert_eq!(config.spin.min_full_turns, 10);
        assert_eq!(config.spin.duration_ms, 4000);
        assert!(config.spin.quick_stop);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[general]
theme = "nord"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.general.theme, "nord");
        assert_eq!(config.spin.extra_range_degrees, 3600.0);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[general]
theme = "light"
tick_rate_ms = 100
log_level = "debug"
city = "Lisbon"

[spin]
min_full_turns = 4
extra_range_degrees = 720
duration_ms = 2500
easing = "linear"
quick_stop = false

[[options]]
label = "Bibimbap"
icon = "🍚"
color = "magenta"

[[options]]
label = "Falafel"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.general.city.as_deref(), Some("Lisbon"));
        assert_eq!(config.spin.min_full_turns, 4);
        assert_eq!(config.spin.easing, Easing::Linear);
        // Unspecified spin fields keep defaults
        assert_eq!(config.spin.quick_stop_duration_ms, 1200);

        let settings = config.spin.to_settings();
        assert_eq!(settings.duration, Duration::from_millis(2500));
        assert_eq!(settings.extra_range_degrees, 720.0);
        assert!(!settings.quick_stop);
        assert!(settings.validate().is_ok());

        let custom = config.custom_options(12).unwrap();
        assert_eq!(custom.len(), 2);
        assert_eq!(custom[0].color, SegmentColor::Magenta);
        assert_eq!(custom[1].icon, "");
        assert_eq!(custom[1].color, SegmentColor::for_index(13));
    }

    #[test]
    fn test_parse_keybindings_section() {
        let toml = r#"
[keybindings]
spin = "Enter"
show_help = "F1"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.keybindings.spin, "Enter");
        assert_eq!(config.keybindings.show_help, "F1");
        // Non-specified fields keep defaults
        assert_eq!(config.keybindings.quit, "q");
        assert_eq!(config.keybindings.force_quit, "Ctrl+c");
    }

    #[test]
    fn test_invalid_custom_option() {
        let toml = r#"
[[options]]
label = "  "
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        assert!(matches!(
            config.custom_options(0),
            Err(CoreError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_remember_true_not_serialized() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        assert!(!serialized.contains("remember_custom_options"));
        assert!(!serialized.contains("city"));
    }

    #[test]
    fn test_append_option_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[general]\ntheme = \"nord\"").unwrap();

        let option = OptionConfig {
            label: "Poke".to_string(),
            icon: "🐟".to_string(),
            color: Some(SegmentColor::Cyan),
        };
        AppConfig::append_option(&path, &option).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(!config.first_launch);
        assert_eq!(config.general.theme, "nord");
        assert_eq!(config.options, vec![option]);
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_append_option_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lunchwheel").join("config.toml");
        let option = OptionConfig {
            label: "Kebab".to_string(),
            icon: "🥙".to_string(),
            color: None,
        };
        AppConfig::append_option(&path, &option).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[[options]]"));
        assert!(content.contains("Kebab"));
        assert!(!content.contains("color"));
    }

    #[test]
    fn test_load_missing_file_is_first_launch() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(config.first_launch);
        assert_eq!(config.general.theme, "dark");
    }
}
