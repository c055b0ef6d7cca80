//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const HIGH_SCORES_FILE: &str = "high_scores.txt";

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Audio settings
    pub audio: AudioSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// File locations
    pub files: FileSettings,
}

/// Key bindings (stored as strings for easy editing). Arrow keys, Enter and
/// Backspace are fixed and not listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hold: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub toggle_music: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    })
}

/// Serialize keys: single key as string, multiple as array
#[allow(clippy::ptr_arg)]
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match keys.as_slice() {
        [single] => serializer.serialize_str(single),
        many => many.serialize(serializer),
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Show where the current piece will land
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Play background music. When on, missing music assets are fatal.
    pub music_enabled: bool,
    /// BGM volume (0-100)
    pub bgm_volume: u32,
}

/// Gameplay settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Fixed seed for the piece sequence; random when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// File locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Override for the high score file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_scores: Option<PathBuf>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            rotate_left: vec!["z".to_string()],
            rotate_right: vec!["x".to_string()],
            hard_drop: vec!["Space".to_string()],
            hold: vec!["c".to_string()],
            pause: vec!["p".to_string()],
            toggle_music: vec!["m".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_enabled: false,
            bgm_volume: 25,
        }
    }
}

impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "blockfall", "blockfall")
    }

    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Directory for the high score file and logs
    pub fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("blockfall"))
    }

    /// Where the high score ledger lives
    pub fn high_scores_path(&self) -> PathBuf {
        self.files
            .high_scores
            .clone()
            .unwrap_or_else(|| Self::data_dir().join(HIGH_SCORES_FILE))
    }

    /// Load settings from file, or create default
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "bad settings file, using defaults: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Write a default settings file for the user to edit, unless one
    /// already exists. An existing file is never touched, even a broken one.
    pub fn write_default_if_missing() -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };

        if Self::default().save_if_missing(&path)? {
            tracing::info!(path = %path.display(), "wrote default settings");
        }
        Ok(())
    }

    /// Returns whether the file was written
    fn save_if_missing(&self, path: &Path) -> Result<bool, String> {
        if path.exists() {
            return Ok(false);
        }
        self.save_to(path)?;
        Ok(true)
    }

    fn save_to(&self, path: &Path) -> Result<(), String> {
        // Create directory if needed
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_accept_string_or_list() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            hold = "Shift"
            quit = ["q", "Esc"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.hold, vec!["Shift"]);
        assert_eq!(settings.keys.quit, vec!["q", "Esc"]);
        // Missing entries keep their defaults
        assert_eq!(settings.keys.rotate_left, vec!["z"]);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.gameplay.seed = Some(1234);
        settings.audio.music_enabled = true;
        let text = toml::to_string_pretty(&settings).unwrap();
        let back = Settings::from_toml(&text).unwrap();
        assert_eq!(back.gameplay.seed, Some(1234));
        assert!(back.audio.music_enabled);
        assert_eq!(back.keys.hard_drop, vec!["Space"]);
    }

    #[test]
    fn test_high_scores_override() {
        let mut settings = Settings::default();
        assert!(settings.high_scores_path().ends_with(HIGH_SCORES_FILE));
        settings.files.high_scores = Some(PathBuf::from("/tmp/scores.txt"));
        assert_eq!(settings.high_scores_path(), PathBuf::from("/tmp/scores.txt"));
    }

    #[test]
    fn test_existing_settings_file_is_never_overwritten() {
        let dir = std::env::temp_dir().join(format!("blockfall-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        fs::create_dir_all(&dir).unwrap();
        let user_text = "[keys]\nhold = \"Shift\"\n[audio]\nbgm_volume = \"loud\"\n";
        fs::write(&path, user_text).unwrap();

        // The broken file falls back to defaults when parsed...
        assert!(Settings::from_toml(user_text).is_err());
        // ...but writing defaults leaves it as the user left it
        assert!(!Settings::default().save_if_missing(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), user_text);

        fs::remove_file(&path).unwrap();
        assert!(Settings::default().save_if_missing(&path).unwrap());
        let written = Settings::from_toml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.keys.hold, vec!["c"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars().0, "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), ("[]", ".."));
    }
}
