use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_PATH: &str = "todos.db";
const DEFAULT_ASSETS_DIR: &str = "./assets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub assets_dir: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {var}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl Config {
    /// Reads `TODOS_PORT`, `TODOS_DB_PATH` and `TODOS_ASSETS_DIR`, falling back
    /// to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("TODOS_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
                var: "TODOS_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let db_path = lookup("TODOS_DB_PATH")
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let assets_dir = lookup("TODOS_ASSETS_DIR")
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string());

        Ok(Config {
            port,
            db_path: db_path.into(),
            assets_dir: assets_dir.into(),
        })
    }
}
