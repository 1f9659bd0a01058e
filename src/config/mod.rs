use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Reader device path; `-` reads tags from stdin.
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_opening_hour")]
    pub opening_hour: u32,
    #[serde(default = "default_closing_hour")]
    pub closing_hour: u32,
    #[serde(default = "default_standard_daily_minutes")]
    pub standard_daily_minutes: i64,
    #[serde(default = "default_friday_daily_minutes")]
    pub friday_daily_minutes: i64,
    #[serde(default = "default_behind_margin_minutes")]
    pub behind_margin_minutes: i64,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_max_retry_delay_secs")]
    pub max_retry_delay_secs: u64,
}

fn default_device() -> String {
    "-".to_string()
}
fn default_read_timeout_ms() -> u64 {
    20_000
}
fn default_opening_hour() -> u32 {
    6
}
fn default_closing_hour() -> u32 {
    21
}
fn default_standard_daily_minutes() -> i64 {
    7 * 60 + 50
}
fn default_friday_daily_minutes() -> i64 {
    6 * 60 + 10
}
fn default_behind_margin_minutes() -> i64 {
    120
}
fn default_retry_delay_secs() -> u64 {
    10
}
fn default_max_retry_delay_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    /// Defaults for everything except the database path.
    pub fn with_database(database: String) -> Self {
        Self {
            database,
            device: default_device(),
            read_timeout_ms: default_read_timeout_ms(),
            opening_hour: default_opening_hour(),
            closing_hour: default_closing_hour(),
            standard_daily_minutes: default_standard_daily_minutes(),
            friday_daily_minutes: default_friday_daily_minutes(),
            behind_margin_minutes: default_behind_margin_minutes(),
            retry_delay_secs: default_retry_delay_secs(),
            max_retry_delay_secs: default_max_retry_delay_secs(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        let base = if cfg!(target_os = "windows") {
            dirs::config_dir()
        } else {
            dirs::home_dir()
        };
        let base = base.unwrap_or_else(|| PathBuf::from("."));

        if cfg!(target_os = "windows") {
            base.join("rtagclock")
        } else {
            base.join(".rtagclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtagclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtagclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("cannot parse configuration: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject schedules the terminal cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if self.opening_hour >= 24 || self.closing_hour >= 24 {
            return Err(AppError::Config(format!(
                "opening/closing hour out of range: {}-{}",
                self.opening_hour, self.closing_hour
            )));
        }
        if self.opening_hour >= self.closing_hour {
            return Err(AppError::Config(format!(
                "opening hour {} must be earlier than closing hour {}",
                self.opening_hour, self.closing_hour
            )));
        }
        if self.standard_daily_minutes < 0 || self.friday_daily_minutes < 0 {
            return Err(AppError::Config(
                "daily minutes must not be negative".to_string(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(AppError::Config(
                "read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.retry_delay_secs == 0 {
            return Err(AppError::Config(
                "retry_delay_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_retry_delay_secs < self.retry_delay_secs {
            return Err(AppError::Config(format!(
                "max_retry_delay_secs {} is shorter than retry_delay_secs {}",
                self.max_retry_delay_secs, self.retry_delay_secs
            )));
        }
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config::with_database(db_path.to_string_lossy().to_string());

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {e}", db_path.display()))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
