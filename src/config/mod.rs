use crate::errors::{AppError, AppResult};
use crate::models::session::MAX_SESSION_HOURS;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How the leaderboard decides that two spellings belong to the same customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatch {
    /// Names with more than two words are keyed on first + last word.
    FirstLast,
    /// The cleaned full name is the key.
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: i64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_extension_rate")]
    pub extension_rate: i64,
    #[serde(default = "default_exclusive_rate")]
    pub exclusive_rate: i64,
    #[serde(default = "default_grind_price")]
    pub grind_price: i64,
    #[serde(default = "default_focus_price")]
    pub focus_price: i64,
    #[serde(default = "default_leaderboard_match")]
    pub leaderboard_match: NameMatch,
}

fn default_operator() -> String {
    "front-desk".to_string()
}
fn default_session_hours() -> i64 {
    12
}
fn default_page_size() -> usize {
    10
}
fn default_currency_symbol() -> String {
    "₱".to_string()
}
fn default_extension_rate() -> i64 {
    49
}
fn default_exclusive_rate() -> i64 {
    999
}
fn default_grind_price() -> i64 {
    2609
}
fn default_focus_price() -> i64 {
    5099
}
fn default_leaderboard_match() -> NameMatch {
    NameMatch::FirstLast
}

/// Keys written by `init`; used by `config --check` to spot stale files.
const KNOWN_KEYS: [&str; 10] = [
    "database",
    "operator",
    "session_hours",
    "page_size",
    "currency_symbol",
    "extension_rate",
    "exclusive_rate",
    "grind_price",
    "focus_price",
    "leaderboard_match",
];

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            operator: default_operator(),
            session_hours: default_session_hours(),
            page_size: default_page_size(),
            currency_symbol: default_currency_symbol(),
            extension_rate: default_extension_rate(),
            exclusive_rate: default_exclusive_rate(),
            grind_price: default_grind_price(),
            focus_price: default_focus_price(),
            leaderboard_match: default_leaderboard_match(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("dmdhub")
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".dmdhub")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("dmdhub.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("dmdhub.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be at least 1".into()));
        }
        if self.session_hours <= 0 || self.session_hours > MAX_SESSION_HOURS {
            return Err(AppError::Config(format!(
                "session_hours must be between 1 and {MAX_SESSION_HOURS}"
            )));
        }
        if self.extension_rate < 0 || self.exclusive_rate < 0 {
            return Err(AppError::Config("rates cannot be negative".into()));
        }
        Ok(())
    }

    /// Keys from `KNOWN_KEYS` that the YAML file does not set explicitly.
    pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path)?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

        let missing = KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| yaml.get(*k).is_none())
            .collect();
        Ok(missing)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("dmdhub.sqlite"),
        };

        let config = Self::with_database(db_path.clone());

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.extension_rate, 49);
        assert_eq!(cfg.exclusive_rate, 999);
        assert_eq!(cfg.leaderboard_match, NameMatch::FirstLast);
    }

    #[test]
    fn leaderboard_match_is_kebab_case() {
        let cfg: Config =
            serde_yaml::from_str("database: x\nleaderboard_match: exact\n").unwrap();
        assert_eq!(cfg.leaderboard_match, NameMatch::Exact);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut cfg = Config::with_database(PathBuf::from("x"));
        cfg.page_size = 0;
        assert!(cfg.validate().is_err());
    }
}
