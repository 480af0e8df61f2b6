use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::core::oscillator::Waveform;

/// How a single tone sounds and fades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub waveform: Waveform,
    /// Gain of a held note
    pub gain: f32,
    /// Seconds from release until the oscillator is halted
    pub decay_seconds: f32,
    /// Gain the release ramp heads toward. Must stay above zero.
    pub floor: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            gain: 0.3,
            decay_seconds: 0.5,
            floor: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 360.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tone: ToneConfig,
    pub window: WindowConfig,
}

impl Config {
    /// Load the user's config file, falling back to defaults when there is none.
    /// A broken file is reported and ignored; the piano still starts.
    pub fn load() -> Self {
        let path = match Self::path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{}, using default settings", e);
                return Self::default();
            }
        };

        if !path.exists() {
            log::info!("No config at {}, using default settings", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config at {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let config: Config = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let tone = &self.tone;
        if !(tone.gain > 0.0 && tone.gain <= 1.0) {
            anyhow::bail!("tone.gain must be in (0, 1], got {}", tone.gain);
        }
        if !(tone.decay_seconds > 0.0) {
            anyhow::bail!("tone.decay_seconds must be positive, got {}", tone.decay_seconds);
        }
        if !(tone.floor > 0.0 && tone.floor < tone.gain) {
            anyhow::bail!(
                "tone.floor must be positive and below tone.gain, got {}",
                tone.floor
            );
        }
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push("virtual-piano");
        path.push("config.json");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_stock_piano() {
        let config = Config::default();
        assert_eq!(config.tone.waveform, Waveform::Sine);
        assert_eq!(config.tone.gain, 0.3);
        assert_eq!(config.tone.decay_seconds, 0.5);
        assert_eq!(config.tone.floor, 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "tone": { "waveform": "square", "gain": 0.5 } }"#).unwrap();
        assert_eq!(config.tone.waveform, Waveform::Square);
        assert_eq!(config.tone.gain, 0.5);
        assert_eq!(config.tone.decay_seconds, 0.5);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = Config::default();
        config.tone.gain = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tone.decay_seconds = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tone.floor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("virtual-piano-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{ "tone": { "decay_seconds": 1.0 } }"#).unwrap();
        drop(file);

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tone.decay_seconds, 1.0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load_from(Path::new("/nonexistent/virtual-piano.json")).is_err());
    }
}
