use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::GrowthPolicy;
use crate::debug::ListingOptions;

pub const DEFAULT_CONFIG_FILE: &str = "lox.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub initial_capacity: usize,
    pub growth_factor: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        let policy = GrowthPolicy::default();
        ChunkConfig {
            initial_capacity: policy.initial_capacity(),
            growth_factor: policy.factor(),
        }
    }
}

impl ChunkConfig {
    pub fn growth_policy(&self) -> GrowthPolicy {
        GrowthPolicy::new(self.initial_capacity, self.growth_factor)
    }
}

/// Contenu de `lox.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chunk: ChunkConfig,
    pub disassembler: ListingOptions,
}

impl Config {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk.initial_capacity == 0 {
            return Err(ConfigError::Invalid(
                "chunk.initial_capacity must be at least 1".into(),
            ));
        }
        if self.chunk.growth_factor < 2 {
            return Err(ConfigError::Invalid(format!(
                "chunk.growth_factor must be at least 2 (got {})",
                self.chunk.growth_factor
            )));
        }
        Ok(())
    }
}

/// Charge la configuration.
///
/// Sans chemin explicite, on cherche `lox.toml` dans le répertoire courant et
/// son absence n'est pas une erreur. Un chemin explicite doit exister.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let config = Config::from_toml(&content, &path)?;
    info!("configuration loaded from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("", Path::new("lox.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.chunk.growth_policy(), GrowthPolicy::DEFAULT);
        assert!(!config.disassembler.show_constants);
    }

    #[test]
    fn reads_every_section() {
        let content = r#"
[chunk]
initial_capacity = 16
growth_factor = 3

[disassembler]
show_constants = true
"#;
        let config = Config::from_toml(content, Path::new("lox.toml")).unwrap();
        assert_eq!(config.chunk.growth_policy(), GrowthPolicy::new(16, 3));
        assert!(config.disassembler.show_constants);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[chunk]\ngrowth_factor = 4\n", Path::new("x.toml")).unwrap();
        assert_eq!(config.chunk.initial_capacity, 8);
        assert_eq!(config.chunk.growth_factor, 4);
    }

    #[test]
    fn rejects_bad_growth_parameters() {
        let err = Config::from_toml("[chunk]\ninitial_capacity = 0\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_toml("[chunk]\ngrowth_factor = 1\n", Path::new("x.toml")).unwrap_err();
        assert!(err.to_string().contains("growth_factor"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::from_toml("[chunk\n", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lox.toml");
        fs::write(&path, "[disassembler]\nshow_constants = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(config.disassembler.show_constants);
    }
}
