use crate::errors::{AppError, AppResult};
use crate::models::Theme;
use crate::ui::messages::success;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Directory receiving exported timesheets; empty means the working dir.
    #[serde(default)]
    pub export_dir: String,
    #[serde(default)]
    pub theme: Theme,
}

fn default_app_name() -> String {
    "TIMELY".to_string()
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            app_name: default_app_name(),
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            export_dir: String::new(),
            theme: Theme::default(),
        }
    }

    /// `~/.timely` on every platform (falls back to the working dir when no
    /// home directory can be resolved).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timely")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timely.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timely.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Create the config directory, the config file (unless `is_test`) and an
    /// empty database file. Returns the configuration that was written.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            fs::create_dir_all(&dir)?;
            fs::write(Self::config_file(), config.to_yaml()?)?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.app_name, "TIMELY");
        assert_eq!(cfg.currency_symbol, "$");
        assert_eq!(cfg.theme.accent_hex(), "#1E3A8A");
    }

    #[test]
    fn theme_section_round_trips_through_yaml() {
        let yaml = "database: db.sqlite\ntheme:\n  mode: dark\n  accent_dark: '#00F0FF'\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.theme.accent_hex(), "#00F0FF");
    }
}
