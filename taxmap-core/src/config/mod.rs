//! Configuration types for Taxmap

use crate::TaxmapError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Default values for traversal option flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default = "default_include_input")]
    pub include_input: bool,
    #[serde(default = "default_simplify")]
    pub simplify: bool,
    #[serde(default = "default_return_index")]
    pub return_index: bool,
    #[serde(default = "default_missing_as_na")]
    pub missing_as_na: bool,
}

/// Default values for the sampling engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Seed for the shared random source (reused draws are reproducible)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Sample sibling subtrees on worker threads. Changes reproducibility
    /// semantics: each subtree gets its own derived random stream.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

// Default value functions
fn default_recursive() -> bool { true }
fn default_include_input() -> bool { false }
fn default_simplify() -> bool { false }
fn default_return_index() -> bool { false }
fn default_missing_as_na() -> bool { false }
fn default_parallel() -> bool { false }

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            include_input: default_include_input(),
            simplify: default_simplify(),
            return_index: default_return_index(),
            missing_as_na: default_missing_as_na(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: default_parallel(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, TaxmapError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| TaxmapError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), TaxmapError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| TaxmapError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.traversal.recursive);
        assert!(!config.traversal.include_input);
        assert!(!config.traversal.simplify);
        assert!(!config.traversal.return_index);
        assert!(!config.traversal.missing_as_na);

        assert_eq!(config.sampling.seed, None);
        assert!(!config.sampling.parallel);
    }

    #[test]
    fn test_partial_config_parse() {
        let toml_str = r#"
[sampling]
seed = 42
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sampling.seed, Some(42));
        assert!(!config.sampling.parallel);
        assert!(config.traversal.recursive); // Default
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.sampling.seed = Some(7);
        config.traversal.simplify = true;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.sampling.seed, Some(7));
        assert!(parsed.traversal.simplify);
    }
}
