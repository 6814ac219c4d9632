use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "lesezeichen")]
#[command(about = "Runs the lesezeichen bookmark service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lesezeichen")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

fn default_port() -> u16 {
    8080
}

fn default_database() -> String {
    "lesezeichen.db".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_database")]
    database: String,
}

impl Default for App {
    fn default() -> Self {
        App {
            port: default_port(),
            database: default_database(),
        }
    }
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_db(&self) -> &str {
        &self.database
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: App,
}

impl Config {
    /// Loads the config file when it exists, falls back to defaults when it
    /// does not, then applies `PORT` / `DB_PATH` environment overrides on top.
    pub fn new(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            Config::load_config(path)?
        } else {
            tracing::info!(path = ?path, "no config file, using defaults");
            Config::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn load_config(path: &Path) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    /// Environment variables outrank the config file, which outranks the
    /// hardcoded defaults.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.app.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring non-numeric PORT override"),
            }
        }
        if let Ok(db_path) = env::var("DB_PATH") {
            if !db_path.is_empty() {
                self.app.database = db_path;
            }
        }
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // Handle default values like ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!(var = %var_name, "environment variable not found");
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
