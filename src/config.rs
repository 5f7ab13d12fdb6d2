//! Runtime configuration from environment variables.

use std::path::PathBuf;

use crate::adapters::artifacts::LoadOptions;
use crate::domain::chat::DEFAULT_CHAT_CAPACITY;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub require_manifest: bool,
    pub chat_capacity: usize,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("models"),
            require_manifest: false,
            chat_capacity: DEFAULT_CHAT_CAPACITY,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("cardiosense.log"),
        }
    }
}

impl AppConfig {
    /// Read configuration from `CARDIOSENSE_*` variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let chat_capacity = lookup("CARDIOSENSE_CHAT_CAPACITY")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.chat_capacity);

        Self {
            artifact_dir: lookup("CARDIOSENSE_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            require_manifest: lookup("CARDIOSENSE_REQUIRE_MANIFEST")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.require_manifest),
            chat_capacity,
            log_mode: lookup("CARDIOSENSE_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: lookup("CARDIOSENSE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_manifest: self.require_manifest,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.artifact_dir, PathBuf::from("models"));
        assert!(!config.require_manifest);
        assert_eq!(config.chat_capacity, DEFAULT_CHAT_CAPACITY);
        assert_eq!(config.log_mode, LogMode::Auto);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CARDIOSENSE_ARTIFACT_DIR", "/opt/artifacts"),
            ("CARDIOSENSE_REQUIRE_MANIFEST", "YES"),
            ("CARDIOSENSE_CHAT_CAPACITY", "25"),
            ("CARDIOSENSE_LOG_MODE", "stdout"),
        ]);
        assert_eq!(config.artifact_dir, PathBuf::from("/opt/artifacts"));
        assert!(config.require_manifest);
        assert!(config.load_options().require_manifest);
        assert_eq!(config.chat_capacity, 25);
        assert_eq!(config.log_mode, LogMode::Stdout);
    }

    #[test]
    fn test_invalid_capacity_falls_back() {
        for bad in ["0", "-3", "many"] {
            let config = config_from(&[("CARDIOSENSE_CHAT_CAPACITY", bad)]);
            assert_eq!(config.chat_capacity, DEFAULT_CHAT_CAPACITY);
        }
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
