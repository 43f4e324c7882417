// Keyclack Config - TOML with Serde
// Player, asset, exit chord and sound table configuration

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::playback::{SessionEnv, DEFAULT_ASSETS_DIR, DEFAULT_PLAYER, DEFAULT_SESSION_UID};
use crate::sounds::MAX_KEY_CODE;
use crate::{ExitChord, Key, SoundMap};

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key code out of range for a sound (max {max}): {key}")]
    KeyOutOfRange { key: String, max: u16 },

    #[error("Exit chord needs at least one modifier")]
    NoExitModifiers,
}

/// Root TOML table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub general: Option<GeneralConfig>,

    #[serde(default)]
    pub exit: Option<ExitConfig>,

    #[serde(default)]
    pub session: Option<SessionConfig>,

    /// Key name to sample filename; an empty filename removes a default
    #[serde(default)]
    pub sounds: BTreeMap<String, String>,
}

/// General settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Player binary
    pub player: Option<String>,
    /// Directory containing the samples
    pub assets_dir: Option<PathBuf>,
    /// Explicit device node; skips udev discovery
    pub device: Option<PathBuf>,
}

/// Exit chord settings
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ExitConfig {
    pub modifiers: Option<Vec<String>>,
    pub key: Option<String>,
}

/// Audio session settings used when running as root
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    pub uid: Option<u32>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub player: String,
    pub assets_dir: PathBuf,
    pub device: Option<PathBuf>,
    pub exit_chord: ExitChord,
    pub session_uid: u32,
    pub sounds: SoundMap,
    source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER.to_string(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            device: None,
            exit_chord: ExitChord::default(),
            session_uid: DEFAULT_SESSION_UID,
            sounds: SoundMap::with_defaults(),
            source_path: None,
        }
    }
}

impl Config {
    /// Parse config from a TOML string
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let raw: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Load config from a TOML file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(&path)?;
        let mut config = Self::from_toml(&content)?;
        config.source_path = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// Default config path (~/.config/keyclack/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyclack").join("config.toml"))
    }

    /// Load from the default location, falling back to built-in defaults
    /// when no file exists there.
    pub fn load_default() -> ConfigResult<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_toml_path(path);
            }
        }
        Ok(Self::default())
    }

    /// Load an explicit path if given, otherwise the default location.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::from_toml_path(path),
            None => Self::load_default(),
        }
    }

    /// File this config was read from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Environment for spawned players
    pub fn session_env(&self) -> SessionEnv {
        SessionEnv::detect(self.session_uid)
    }

    fn from_raw(raw: ConfigToml) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(general) = raw.general {
            if let Some(player) = general.player {
                config.player = player;
            }
            if let Some(assets_dir) = general.assets_dir {
                config.assets_dir = assets_dir;
            }
            config.device = general.device;
        }

        if let Some(exit) = raw.exit {
            let modifiers = match exit.modifiers {
                Some(names) => {
                    let keys = names
                        .iter()
                        .map(|name| parse_key(name))
                        .collect::<ConfigResult<Vec<_>>>()?;
                    if keys.is_empty() {
                        return Err(ConfigError::NoExitModifiers);
                    }
                    keys
                }
                None => config.exit_chord.modifiers().to_vec(),
            };
            let exit_key = match exit.key {
                Some(name) => parse_key(&name)?,
                None => config.exit_chord.exit_key(),
            };
            config.exit_chord = ExitChord::new(modifiers, exit_key);
        }

        if let Some(session) = raw.session {
            if let Some(uid) = session.uid {
                config.session_uid = uid;
            }
        }

        for (name, file) in raw.sounds {
            let key = parse_key(&name)?;
            if key.code() >= MAX_KEY_CODE {
                return Err(ConfigError::KeyOutOfRange {
                    key: name,
                    max: MAX_KEY_CODE - 1,
                });
            }
            if file.is_empty() {
                log::debug!("Sound for {} disabled by config", key);
                config.sounds.remove(key);
            } else {
                config.sounds.insert(key, file);
            }
        }

        Ok(config)
    }
}

fn parse_key(name: &str) -> ConfigResult<Key> {
    name.parse::<Key>()
        .map_err(|_| ConfigError::InvalidKey(name.to_string()))
}

/// Starter config for a new installation
pub fn default_config_content() -> &'static str {
    r#"# Keyclack Settings
# Place this file at: ~/.config/keyclack/config.toml

[general]
# Player binary, called as: <player> '<assets_dir>/<file>'
player = "paplay"
assets_dir = "./assets"
# Use a specific device instead of the first udev keyboard
# device = "/dev/input/event3"

[exit]
# Holding any of these and pressing `key` stops keyclack
modifiers = ["LEFT_CTRL", "RIGHT_CTRL"]
key = "C"

[session]
# When run as root, players are pointed at this user's audio session
uid = 1000

[sounds]
# Override or extend the built-in table; "" silences a key
# ESC = "enter.wav"
# CAPSLOCK = ""
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.player, "paplay");
        assert_eq!(config.assets_dir, PathBuf::from("./assets"));
        assert_eq!(config.device, None);
        assert_eq!(config.exit_chord, ExitChord::default());
        assert_eq!(config.session_uid, 1000);
        assert_eq!(config.sounds, SoundMap::with_defaults());
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config = Config::from_toml(default_config_content()).unwrap();
        assert_eq!(config.player, "paplay");
        assert_eq!(config.exit_chord, ExitChord::default());
        assert_eq!(config.sounds, SoundMap::with_defaults());
    }

    #[test]
    fn test_general_section() {
        let config = Config::from_toml(
            r#"
[general]
player = "aplay"
assets_dir = "/usr/share/keyclack"
device = "/dev/input/event7"
"#,
        )
        .unwrap();
        assert_eq!(config.player, "aplay");
        assert_eq!(config.assets_dir, PathBuf::from("/usr/share/keyclack"));
        assert_eq!(config.device, Some(PathBuf::from("/dev/input/event7")));
    }

    #[test]
    fn test_sound_overrides() {
        let config = Config::from_toml(
            r#"
[sounds]
ESC = "enter.wav"
A = "space.wav"
CAPSLOCK = ""
"#,
        )
        .unwrap();
        assert_eq!(config.sounds.lookup(Key::ESC.code()), Some("enter.wav"));
        assert_eq!(config.sounds.lookup(Key::A.code()), Some("space.wav"));
        assert_eq!(config.sounds.lookup(Key::CAPSLOCK.code()), None);
        // Untouched defaults survive
        assert_eq!(config.sounds.lookup(Key::S.code()), Some("s.wav"));
    }

    #[test]
    fn test_unknown_sound_key_rejected() {
        let err = Config::from_toml("[sounds]\nNOPE = \"a.wav\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey(ref k) if k == "NOPE"));
    }

    #[test]
    fn test_sound_key_out_of_range_rejected() {
        let err = Config::from_toml("[sounds]\n\"300\" = \"a.wav\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::KeyOutOfRange { ref key, max: 255 } if key == "300"
        ));
    }

    #[test]
    fn test_upper_codes_mappable() {
        let config = Config::from_toml(
            r#"
[sounds]
F13 = "f13.wav"
"250" = "raw.wav"
"#,
        )
        .unwrap();
        assert_eq!(config.sounds.lookup(183), Some("f13.wav"));
        assert_eq!(config.sounds.lookup(250), Some("raw.wav"));
    }

    #[test]
    fn test_exit_chord_override() {
        let config = Config::from_toml(
            r#"
[exit]
modifiers = ["LEFTALT"]
key = "q"
"#,
        )
        .unwrap();
        assert_eq!(config.exit_chord, ExitChord::new(vec![Key::LEFT_ALT], Key::Q));
    }

    #[test]
    fn test_exit_key_only_keeps_default_modifiers() {
        let config = Config::from_toml("[exit]\nkey = \"ESC\"\n").unwrap();
        assert_eq!(
            config.exit_chord,
            ExitChord::new(vec![Key::LEFT_CTRL, Key::RIGHT_CTRL], Key::ESC)
        );
    }

    #[test]
    fn test_empty_exit_modifiers_rejected() {
        let err = Config::from_toml("[exit]\nmodifiers = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoExitModifiers));
    }

    #[test]
    fn test_session_uid() {
        let config = Config::from_toml("[session]\nuid = 1001\n").unwrap();
        assert_eq!(config.session_uid, 1001);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = Config::from_toml("[general]\nvolume = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_from_toml_path_records_source() {
        let path = std::env::temp_dir().join(format!("keyclack-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[general]\nplayer = \"aplay\"\n").unwrap();

        let config = Config::from_toml_path(&path).unwrap();
        assert_eq!(config.player, "aplay");
        assert_eq!(config.source_path(), Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Some(Path::new("/nonexistent/keyclack.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
