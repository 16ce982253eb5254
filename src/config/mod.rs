use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::path::PathBuf;

pub mod catalog_config;
pub mod console_config;
pub mod logs_config;

pub use catalog_config::{ObserverConfig, ProductConfig};
pub use console_config::ConsoleConfig;
pub use logs_config::LogsConfig;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub log: LogsConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default = "catalog_config::default_products")]
    pub products: Vec<ProductConfig>,
    #[serde(default = "catalog_config::default_observers")]
    pub observers: Vec<ObserverConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogsConfig::default(),
            console: ConsoleConfig::default(),
            products: catalog_config::default_products(),
            observers: catalog_config::default_observers(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| {
            "Error: Failed to parse configuration file.\n\
            Please check the file syntax is valid TOML syntax"
        })?;
        catalog_config::validate(&config.products, &config.observers)?;
        Ok(config)
    }
}

pub(crate) fn root_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().with_context(|| "Error: Failed to read current directory")
}

fn parse_config_path(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<PathBuf>> {
    args.next();
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            return match args.next() {
                Some(path) => Ok(Some(PathBuf::from(path))),
                None => Err(anyhow!(
                    "Error: Please specify path string for -c argument."
                )),
            };
        }
    }
    Ok(None)
}

/// Loads the file given by `-c`/`--config`, falling back to the built-in catalog.
pub fn load(args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let Some(path) = parse_config_path(args)? else {
        return Ok(Config::default());
    };
    if !path.is_file() {
        return Err(anyhow!(
            "Error: Configuration file not found or invalid.\n\
        Please make sure that the configuration file exists and is a valid TOML file.\n\
        Expected file path: {:?}",
            path
        ));
    }
    let content = std::fs::read_to_string(&path).with_context(|| {
        "Error: Failed to read configuration file.\n\
        Please check the file path and file permissions, and make sure the file is valid accessible"
    })?;
    Config::from_toml(&content)
}
