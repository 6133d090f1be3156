use crate::error::{Result, TimeclockError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `ragic.api_key`.
pub const API_KEY_ENV: &str = "RAGIC_API_KEY";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RagicConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagicConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_members_route")]
    pub members_route: String,
    #[serde(default = "default_attendance_route")]
    pub attendance_route: String,
    #[serde(default = "default_hours_route")]
    pub hours_route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "https://na3.ragic.com".to_string()
}

fn default_members_route() -> String {
    "lynvolunteer/lyn-temp/53".to_string()
}

fn default_attendance_route() -> String {
    "lynvolunteer/lyn-temp/9".to_string()
}

fn default_hours_route() -> String {
    "lynvolunteer/lyn-temp/55".to_string()
}

impl Default for RagicConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            members_route: default_members_route(),
            attendance_route: default_attendance_route(),
            hours_route: default_hours_route(),
            api_key: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ClockConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_min_dwell")]
    pub min_dwell_minutes: i64,
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_date_format() -> String {
    "%Y/%m/%d".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

fn default_min_dwell() -> i64 {
    10
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            min_dwell_minutes: default_min_dwell(),
        }
    }
}

// ---------------------------------------------------------------------------
// MembersConfig / ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_id_prefix() -> String {
    "LYN".to_string()
}

impl Default for MembersConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Kiosk sessions untouched for this long are forgotten.
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_session_idle_minutes() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            session_idle_minutes: default_session_idle_minutes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ragic: RagicConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub members: MembersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// `~/.config/volunteer_hours/config.yaml`
    pub fn default_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(TimeclockError::HomeNotFound)?;
        Ok(home
            .join(".config")
            .join("volunteer_hours")
            .join("config.yaml"))
    }

    /// Load the config at `path` and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TimeclockError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let mut cfg: Config = serde_yaml::from_str(&data)?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Resolve the config for a process.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and the built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = Self::default_path()?;
        if path.exists() {
            return Self::load(&path);
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        let mut cfg = Config::default();
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.ragic.api_key = Some(key);
            }
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.ragic
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TimeclockError::MissingApiKey)
    }

    /// A copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.ragic.api_key.is_some() {
            cfg.ragic.api_key = Some("********".to_string());
        }
        cfg
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.clock.timezone.parse::<chrono_tz::Tz>().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unknown timezone '{}'", self.clock.timezone),
            });
        }

        for (key, pattern) in [
            ("date_format", &self.clock.date_format),
            ("time_format", &self.clock.time_format),
        ] {
            if crate::time::check_format(pattern).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("clock.{key} '{pattern}' is not a valid strftime pattern"),
                });
            }
        }

        for (key, route) in [
            ("members_route", &self.ragic.members_route),
            ("attendance_route", &self.ragic.attendance_route),
            ("hours_route", &self.ragic.hours_route),
        ] {
            if route.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("ragic.{key} is empty"),
                });
            }
        }

        if self.api_key().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("no API key configured (set {API_KEY_ENV})"),
            });
        }

        if self.server.session_idle_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.session_idle_minutes=0 forgets every scan immediately".to_string(),
            });
        }

        if self.clock.min_dwell_minutes <= 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "clock.min_dwell_minutes={} allows clock-out immediately after clock-in",
                    self.clock.min_dwell_minutes
                ),
            });
        }

        if self.members.id_prefix.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "members.id_prefix is empty: any member id is accepted".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
