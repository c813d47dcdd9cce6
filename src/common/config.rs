//! Harness configuration file handling
//!
//! An optional `config.toml` lets a site point tool names at local builds
//! (e.g. a development `lmr`) and change the default stage timeout without
//! editing every scenario file.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Tool name -> executable path overrides, applied to a stage command's
    /// first token before spawning
    #[serde(default)]
    pub tools: HashMap<String, PathBuf>,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Default wall-clock timeout for a stage, used when the stage declares
    /// none. Solver runs dominate, so the default is generous.
    #[serde(default = "default_stage_timeout")]
    pub stage_default_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            stage_default_secs: default_stage_timeout(),
        }
    }
}

fn default_stage_timeout() -> u64 {
    900
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| super::Error::file_read(&path, e))?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }

    /// Resolve a tool name to an executable path
    ///
    /// Checks explicit overrides first, then PATH. An unresolvable name is
    /// returned as-is so the spawn reports the failure against the command
    /// the scenario actually wrote.
    pub fn resolve_tool(&self, name: &str) -> PathBuf {
        if let Some(path) = self.tools.get(name) {
            return path.clone();
        }
        which::which(name).unwrap_or_else(|_| PathBuf::from(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = Config::default();
        assert_eq!(config.timeouts.stage_default_secs, 900);
    }

    #[test]
    fn test_resolve_tool_prefers_override() {
        let mut config = Config::default();
        config
            .tools
            .insert("lmr".to_string(), PathBuf::from("/opt/lmr/bin/lmr"));
        assert_eq!(config.resolve_tool("lmr"), PathBuf::from("/opt/lmr/bin/lmr"));
    }

    #[test]
    fn test_resolve_tool_falls_back_to_name() {
        let config = Config::default();
        let resolved = config.resolve_tool("definitely-not-on-path-xyzzy");
        assert_eq!(resolved, PathBuf::from("definitely-not-on-path-xyzzy"));
    }

    #[test]
    fn test_parse_config_toml() {
        let config: Config = toml::from_str(
            r#"
            [tools]
            lmr = "/opt/lmr/bin/lmr"

            [timeouts]
            stage_default_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.timeouts.stage_default_secs, 60);
        assert!(config.tools.contains_key("lmr"));
    }
}
