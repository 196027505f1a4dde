use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chorder_core::{
    ChorderError, DEFAULT_MAX_SPAN, IdentifierKind, Instrument, InstrumentProfile, REFERENCE_FREQUENCY, SAMPLE_RATE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub defaults: Defaults,
    /// User-defined instruments keyed by name
    #[serde(default)]
    pub instruments: BTreeMap<String, Instrument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Defaults {
    pub instrument: String,
    pub max_span: u8,
    pub max_root_fret: Option<u8>,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub reference_frequency: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            instrument: InstrumentProfile::Ukulele.name().to_string(),
            max_span: DEFAULT_MAX_SPAN,
            max_root_fret: None,
            duration_secs: 1.0,
            sample_rate: SAMPLE_RATE,
            reference_frequency: REFERENCE_FREQUENCY,
        }
    }
}

impl AppConfig {
    /// Built-in profiles first, then user-defined instruments
    pub fn resolve_instrument(&self, name: &str) -> Result<Instrument, ChorderError> {
        if let Ok(profile) = name.parse::<InstrumentProfile>() {
            return Ok(profile.instrument());
        }
        self.instruments
            .get(name)
            .map(|instrument| instrument.clone().with_name(name))
            .ok_or_else(|| ChorderError::UnknownIdentifier {
                kind: IdentifierKind::Instrument,
                name: name.to_string(),
            })
    }

    pub fn instrument_names(&self) -> Vec<String> {
        InstrumentProfile::ALL
            .iter()
            .map(|p| p.name().to_string())
            .chain(self.instruments.keys().cloned())
            .collect()
    }
}

pub(crate) fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chorder")
        .join("config.toml")
}

/// Load an explicit config file (must exist) or the default one (optional)
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()));
    }

    let path = config_path();
    let Ok(text) = std::fs::read_to_string(&path) else {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    };
    match toml::from_str(&text) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(path = %path.display(), "Ignoring malformed config: {}", e);
            Ok(AppConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.defaults.instrument, "ukulele");
        assert_eq!(config.defaults.max_span, 5);
        assert_eq!(config.defaults.sample_rate, 44100);
        assert!(config.instruments.is_empty());
    }

    #[test]
    fn test_partial_defaults() {
        let config: AppConfig = toml::from_str("[defaults]\nmax_span = 4\ninstrument = \"guitar\"\n").unwrap();
        assert_eq!(config.defaults.max_span, 4);
        assert_eq!(config.defaults.instrument, "guitar");
        assert_eq!(config.defaults.duration_secs, 1.0);
    }

    #[test]
    fn test_custom_instrument() {
        let text = r#"
[instruments.baritone]
frets = 18
strings = [
    { open = 7, tuning_offset = 5 },
    { open = 2, tuning_offset = 10 },
    { open = 10, tuning_offset = 14 },
    { open = 5, tuning_offset = 19 },
]
"#;
        let config: AppConfig = toml::from_str(text).unwrap();
        let baritone = config.resolve_instrument("baritone").unwrap();
        assert_eq!(baritone.name(), "baritone");
        assert_eq!(baritone.num_strings(), 4);
        assert_eq!(baritone.frets(), 18);
        assert!(config.instrument_names().contains(&"baritone".to_string()));
    }

    #[test]
    fn test_invalid_custom_instrument_rejected() {
        let one_string = "[instruments.mono]\nfrets = 12\nstrings = [{ open = 0, tuning_offset = 0 }]\n";
        assert!(toml::from_str::<AppConfig>(one_string).is_err());
        let bad_pitch = "[instruments.odd]\nfrets = 12\nstrings = [{ open = 12, tuning_offset = 0 }, { open = 0, tuning_offset = 0 }]\n";
        assert!(toml::from_str::<AppConfig>(bad_pitch).is_err());
    }

    #[test]
    fn test_builtin_wins_and_unknown_fails() {
        let config = AppConfig::default();
        assert_eq!(config.resolve_instrument("Guitar").unwrap().num_strings(), 6);
        assert!(matches!(
            config.resolve_instrument("sitar"),
            Err(ChorderError::UnknownIdentifier { kind: IdentifierKind::Instrument, .. })
        ));
    }
}
