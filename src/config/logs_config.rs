use crate::config::root_dir;
use crate::errors::ErrorKind;
use anyhow::Context;
use serde::{Deserialize, Deserializer};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Where diagnostics go. Without `storage_path` they are written to stderr,
/// stdout stays reserved for the prompt.
#[derive(Deserialize, Debug, Clone)]
pub struct LogsConfig {
    #[serde(deserialize_with = "parse_level", default = "default_level")]
    pub level: Level,
    pub storage_path: Option<String>,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            storage_path: None,
            file_name: default_file_name(),
        }
    }
}

impl LogsConfig {
    /// Resolves the log file, creating its directory when missing.
    /// A relative `storage_path` is taken from the working directory.
    pub fn log_file(&self) -> anyhow::Result<Option<PathBuf>> {
        let Some(storage_path) = &self.storage_path else {
            return Ok(None);
        };
        if Path::new(&self.file_name).file_name() != Some(OsStr::new(&self.file_name)) {
            return Err(ErrorKind::Config(format!(
                "log file name `{}` must be a plain file name",
                self.file_name
            ))
            .into());
        }
        let dir = Path::new(storage_path);
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            root_dir()?.join(dir)
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create logs directory {dir:?}"))?;
        Ok(Some(dir.join(&self.file_name)))
    }
}

fn default_level() -> Level {
    Level::INFO
}

fn default_file_name() -> String {
    "pricewatch.log".to_string()
}

fn parse_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.trim()
        .parse::<Level>()
        .map_err(|_| serde::de::Error::custom(format!("Unsupported log level: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logs(content: &str) -> LogsConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_level_names() {
        assert_eq!(logs("level = \"warn\"").level, Level::WARN);
        assert_eq!(logs("level = \"TRACE\"").level, Level::TRACE);
        assert_eq!(logs("level = \" error \"").level, Level::ERROR);
        assert_eq!(logs("").level, Level::INFO);
        let err = toml::from_str::<LogsConfig>("level = \"verbose\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported log level: verbose"));
    }

    #[test]
    fn test_stderr_without_storage_path() {
        let config = LogsConfig::default();
        assert_eq!(config.file_name, "pricewatch.log");
        assert_eq!(config.log_file().unwrap(), None);
    }

    #[test]
    fn test_log_file_creates_directory() {
        let dir = std::env::temp_dir().join(format!("pricewatch-logs-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let config = logs(&format!(
            "storage_path = {:?}\nfile_name = \"session.log\"",
            dir.join("nested").to_string_lossy()
        ));

        let file = config.log_file().unwrap().unwrap();
        assert!(dir.join("nested").is_dir());
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(file, dir.join("nested").join("session.log"));
    }

    #[test]
    fn test_file_name_must_not_be_a_path() {
        for file_name in ["", "../escape.log", "logs/pricewatch.log"] {
            let config = LogsConfig {
                storage_path: Some(std::env::temp_dir().to_string_lossy().into_owned()),
                file_name: file_name.to_string(),
                ..LogsConfig::default()
            };
            let err = config.log_file().unwrap_err();
            assert!(
                matches!(err.downcast_ref::<ErrorKind>(), Some(ErrorKind::Config(_))),
                "{file_name}: {err:#}"
            );
        }
    }
}
