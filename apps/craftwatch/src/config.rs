//! craftwatch configuration.
//!
//! Optional TOML file. Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `$HOME/.config/craftwatch/craftwatch.toml` (if present)
//! 3. built-in defaults
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use craftwatch_classifier::RulePatterns;
use craftwatch_game_log::TailerConfig;
use craftwatch_webhook::ClientConfig;
use serde::{Deserialize, Serialize};

/// craftwatch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sleep between polls at end of file, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Capacity of the queue between tailer and dispatcher.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Echo every log line to stdout.
    #[serde(default = "default_true")]
    pub echo_lines: bool,

    /// Reopen the log path when rotation replaces the file.
    #[serde(default = "default_true")]
    pub follow_rotation: bool,

    /// Wait after a 429 without a usable hint, in seconds.
    #[serde(default = "default_rate_limit_fallback_secs")]
    pub rate_limit_fallback_secs: u64,

    /// Webhook request timeout in seconds (0 = none).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Classifier pattern overrides.
    #[serde(default)]
    pub rules: RulePatterns,
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_queue_capacity() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_rate_limit_fallback_secs() -> u64 {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            queue_capacity: default_queue_capacity(),
            echo_lines: default_true(),
            follow_rotation: default_true(),
            rate_limit_fallback_secs: default_rate_limit_fallback_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            rules: RulePatterns::default(),
        }
    }
}

impl Config {
    /// Loads the explicit config file, else the default location if it
    /// exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("can't read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Queue capacity, at least 1.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }

    pub fn tailer_config(&self) -> TailerConfig {
        let poll_interval = match self.poll_interval_ms {
            0 => Duration::from_millis(default_poll_interval_ms()),
            ms => Duration::from_millis(ms),
        };

        TailerConfig {
            poll_interval,
            follow_rotation: self.follow_rotation,
            echo: self.echo_lines,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            fallback_wait: Duration::from_secs(self.rate_limit_fallback_secs),
            timeout: match self.request_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

/// Returns the default configuration file path, if `HOME` is set.
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("craftwatch")
            .join("craftwatch.toml"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.queue_capacity, 2);
        assert!(config.echo_lines);
        assert!(config.follow_rotation);
        assert_eq!(config.rate_limit_fallback_secs, 1);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.rules, RulePatterns::default());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            poll_interval_ms: 250,
            queue_capacity: 8,
            echo_lines: false,
            follow_rotation: false,
            rate_limit_fallback_secs: 3,
            request_timeout_secs: 0,
            rules: RulePatterns {
                player_joined: r"^(\w+) connected$".into(),
                ..RulePatterns::default()
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = r#"
            poll_interval_ms = 100

            [rules]
            player_left = '^(\w+) disconnected$'
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.queue_capacity, 2);
        assert!(config.echo_lines);
        assert_eq!(config.rules.player_left, r"^(\w+) disconnected$");
        assert_eq!(config.rules.player_joined, RulePatterns::default().player_joined);
    }

    #[test]
    fn derived_component_configs() {
        let config = Config {
            poll_interval_ms: 0,
            queue_capacity: 0,
            request_timeout_secs: 0,
            rate_limit_fallback_secs: 2,
            ..Config::default()
        };

        assert_eq!(config.queue_capacity(), 1);
        assert_eq!(config.tailer_config().poll_interval, Duration::from_millis(500));
        assert_eq!(config.client_config().timeout, None);
        assert_eq!(config.client_config().fallback_wait, Duration::from_secs(2));
    }

    #[test]
    fn load_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("craftwatch.toml");
        std::fs::write(&path, "echo_lines = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.echo_lines);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn load_invalid_toml_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "queue_capacity = \"lots\"\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn config_path_not_empty() {
        if let Some(path) = default_config_path() {
            assert!(path.to_string_lossy().contains("craftwatch"));
        }
    }
}
