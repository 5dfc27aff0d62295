//! Settings persistence using TOML
//!
//! Stored in ~/.config/matchgrid/settings.toml (or platform equivalent)
//! unless a path is given explicitly.

use crate::error::ConfigError;
use crate::level::Level;
use crate::presenter::Easing;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Board settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Matching and gravity rules
    pub rules: RulesSettings,
    /// Presentation pacing
    pub timing: TimingSettings,
    /// Block types, in palette order
    pub palette: Vec<BlockStyle>,
    /// Level layout
    pub level: LevelSettings,
    /// Terminal key bindings
    pub keys: KeySettings,
}

/// Matching and gravity rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    /// Shortest run that gets destroyed
    pub matching_blocks_needed: usize,
    /// How many wall cells in a row a falling piece may pass through
    pub fall_through_walls: u32,
    /// Seed for piece colors; random when absent
    pub seed: Option<u64>,
}

/// Animation and delay durations, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Time to spawn the whole board at start, split evenly between cells
    pub total_spawn_time_ms: u64,
    /// Pause after the last piece of the initial fill
    pub delay_after_fill_ms: u64,
    /// Duration of the swap animation, each way
    pub switch_time_ms: u64,
    /// Pause after matched pieces are destroyed
    pub delay_after_destroy_ms: u64,
    /// Fall animation time per cell travelled
    pub fall_time_per_cell_ms: u64,
    /// Motion curve of falling pieces
    pub fall_easing: Easing,
}

/// A configured block type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStyle {
    pub name: String,
    /// Character drawn for the block
    pub glyph: String,
    /// Display color as "#rrggbb"
    pub color: String,
}

/// Key bindings for the terminal frontend.
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub cursor_up: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub cursor_down: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub cursor_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub cursor_right: Vec<String>,
    /// Grab the piece under the cursor, or let go of it
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub select: Vec<String>,
    /// Toggle the legal swap overlay
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hints: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a key name or a list of key names")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: a lone key as a string, several as an array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Level layout, see [`Level::parse`] for the tile characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub layout: String,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            matching_blocks_needed: 3,
            fall_through_walls: 1,
            seed: None,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            total_spawn_time_ms: 1000,
            delay_after_fill_ms: 1000,
            switch_time_ms: 500,
            delay_after_destroy_ms: 250,
            fall_time_per_cell_ms: 120,
            fall_easing: Easing::EaseIn,
        }
    }
}

impl TimingSettings {
    /// Settings with every delay and animation set to zero
    pub fn instant() -> Self {
        Self {
            total_spawn_time_ms: 0,
            delay_after_fill_ms: 0,
            switch_time_ms: 0,
            delay_after_destroy_ms: 0,
            fall_time_per_cell_ms: 0,
            fall_easing: Easing::Linear,
        }
    }

    pub fn total_spawn_time(&self) -> Duration {
        Duration::from_millis(self.total_spawn_time_ms)
    }

    pub fn delay_after_fill(&self) -> Duration {
        Duration::from_millis(self.delay_after_fill_ms)
    }

    pub fn switch_time(&self) -> Duration {
        Duration::from_millis(self.switch_time_ms)
    }

    pub fn delay_after_destroy(&self) -> Duration {
        Duration::from_millis(self.delay_after_destroy_ms)
    }

    /// Fall animation time for a drop of `cells` rows
    pub fn fall_time(&self, cells: u32) -> Duration {
        Duration::from_millis(self.fall_time_per_cell_ms.saturating_mul(cells as u64))
    }
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            layout: [
                "##########",
                "..........",
                "..........",
                "..........",
                "....##....",
                "..........",
                "..........",
                "..........",
            ]
            .join("\n"),
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        let keys = |names: &[&str]| names.iter().map(|k| k.to_string()).collect();
        Self {
            cursor_up: keys(&["Up", "k"]),
            cursor_down: keys(&["Down", "j"]),
            cursor_left: keys(&["Left", "h"]),
            cursor_right: keys(&["Right", "l"]),
            select: keys(&["Space", "Enter"]),
            hints: keys(&["Tab"]),
            quit: keys(&["q", "Esc"]),
        }
    }
}

impl BlockStyle {
    pub fn new(name: &str, glyph: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            glyph: glyph.to_string(),
            color: color.to_string(),
        }
    }

    /// Parse `color` as "#rrggbb"
    pub fn rgb(&self) -> Result<(u8, u8, u8), ConfigError> {
        let invalid = || ConfigError::InvalidColor(self.color.clone());
        let hex = self.color.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// The default palette (One Dark colors)
pub fn default_palette() -> Vec<BlockStyle> {
    vec![
        BlockStyle::new("ruby", "●", "#E06C75"),
        BlockStyle::new("amber", "◆", "#E5C07B"),
        BlockStyle::new("jade", "▲", "#98C379"),
        BlockStyle::new("sapphire", "■", "#61AFEF"),
        BlockStyle::new("amethyst", "★", "#C678DD"),
    ]
}

impl Settings {
    /// Defaults with the built-in palette
    pub fn with_default_palette() -> Self {
        Self {
            palette: default_palette(),
            ..Self::default()
        }
    }

    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "matchgrid", "matchgrid").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the config directory, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::with_default_palette();
        };
        if !path.exists() {
            return Self::with_default_palette();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::with_default_palette()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML. A missing palette gets the default one.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = toml::from_str(contents)?;
        if settings.palette.is_empty() && !contents.contains("palette") {
            settings.palette = default_palette();
        }
        Ok(settings)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::settings_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check everything a board needs at start-up and parse the level
    pub fn validate(&self) -> Result<Level, ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.palette.len() > 256 {
            return Err(ConfigError::PaletteTooLarge(self.palette.len()));
        }
        for style in &self.palette {
            style.rgb()?;
        }
        if self.rules.matching_blocks_needed < 2 {
            return Err(ConfigError::MatchLengthTooShort(self.rules.matching_blocks_needed));
        }
        let level = Level::parse(&self.level.layout)?;
        level.validate(self.palette.len())?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::with_default_palette();
        let level = settings.validate().unwrap();
        assert_eq!(level.width(), 10);
        assert_eq!(level.height(), 8);
    }

    #[test]
    fn test_empty_palette_is_fatal() {
        let settings = Settings::default();
        assert!(matches!(settings.validate(), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_match_length_too_short() {
        let mut settings = Settings::with_default_palette();
        settings.rules.matching_blocks_needed = 1;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MatchLengthTooShort(1))
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
[rules]
matching_blocks_needed = 4

[timing]
fall_easing = "ease_in_out"
"#,
        )
        .unwrap();
        assert_eq!(settings.rules.matching_blocks_needed, 4);
        assert_eq!(settings.rules.fall_through_walls, 1);
        assert_eq!(settings.timing.fall_easing, Easing::EaseInOut);
        assert_eq!(settings.timing.switch_time_ms, 500);
        assert_eq!(settings.palette, default_palette());
    }

    #[test]
    fn test_toml_palette_and_level() {
        let settings = Settings::from_toml(
            r##"
[[palette]]
name = "red"
glyph = "R"
color = "#ff0000"

[[palette]]
name = "blue"
glyph = "B"
color = "#0000ff"

[level]
layout = """
###
.ab
"""
"##,
        )
        .unwrap();
        assert_eq!(settings.palette.len(), 2);
        assert_eq!(settings.palette[0].rgb().unwrap(), (255, 0, 0));
        let level = settings.validate().unwrap();
        assert_eq!(level.presets().len(), 2);
    }

    #[test]
    fn test_keys_accept_string_or_list() {
        let settings = Settings::from_toml(
            r#"
[keys]
select = "x"
quit = ["q", "Esc"]
"#,
        )
        .unwrap();
        assert_eq!(settings.keys.select, vec!["x".to_string()]);
        assert_eq!(settings.keys.quit.len(), 2);
        assert_eq!(settings.keys.cursor_up, KeySettings::default().cursor_up);

        let saved = toml::to_string_pretty(&settings).unwrap();
        assert!(saved.contains("select = \"x\""));
        assert_eq!(Settings::from_toml(&saved).unwrap().keys, settings.keys);
    }

    #[test]
    fn test_invalid_color() {
        let style = BlockStyle::new("x", "x", "ff0000");
        assert!(matches!(style.rgb(), Err(ConfigError::InvalidColor(_))));
        let style = BlockStyle::new("x", "x", "#ff00zz");
        assert!(style.rgb().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("matchgrid-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::with_default_palette();
        settings.rules.seed = Some(99);
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.rules.seed, Some(99));
        assert_eq!(loaded.palette, settings.palette);
        assert_eq!(loaded.level.layout, settings.level.layout);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_fall_time_scales_with_distance() {
        let timing = TimingSettings::default();
        assert_eq!(timing.fall_time(3), Duration::from_millis(360));
        assert_eq!(TimingSettings::instant().fall_time(3), Duration::ZERO);
    }
}
