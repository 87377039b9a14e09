//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset outside of production.
const DEV_JWT_SECRET: &str = "development-only-secret";

const DEFAULT_FACE_MATCH_THRESHOLD: f32 = 0.4;

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Lifetime of a freshly opened or extended check-in session.
    pub session_ttl_seconds: u64,
    /// Minimum cosine similarity for a face embedding to be accepted.
    pub face_match_threshold: f32,
    pub recent_checkins_limit: u64,
    pub session_sweep_interval_seconds: u64,
    pub session_retention_minutes: u64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    ///
    /// # Panics
    /// Panics if `JWT_SECRET` is missing while `APP_ENV=production`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if env_name.eq_ignore_ascii_case("production") => {
                panic!("JWT_SECRET is required in production")
            }
            _ => DEV_JWT_SECRET.into(),
        };

        Self {
            env: env_name,
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "roll-call".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/attendance.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_or("PORT", 3000),
            jwt_secret,
            jwt_duration_minutes: parse_or("JWT_DURATION_MINUTES", 60),
            session_ttl_seconds: parse_or("SESSION_TTL_SECONDS", 300),
            face_match_threshold: parse_or("FACE_MATCH_THRESHOLD", DEFAULT_FACE_MATCH_THRESHOLD),
            recent_checkins_limit: parse_or("RECENT_CHECKINS_LIMIT", 10),
            session_sweep_interval_seconds: parse_or("SESSION_SWEEP_INTERVAL_SECONDS", 60),
            session_retention_minutes: parse_or("SESSION_RETENTION_MINUTES", 1440),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }

    pub fn set_session_ttl_seconds(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.session_ttl_seconds = value.into());
    }

    pub fn set_face_match_threshold(value: f32) {
        AppConfig::set_field(|cfg| cfg.face_match_threshold = value);
    }
}

// --- Free accessors used by binaries and middleware ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn session_sweep_interval() -> Duration {
    Duration::from_secs(AppConfig::global().session_sweep_interval_seconds.max(1))
}

pub fn session_retention() -> chrono::Duration {
    retention_from_minutes(AppConfig::global().session_retention_minutes)
}

fn retention_from_minutes(minutes: u64) -> chrono::Duration {
    i64::try_from(minutes)
        .ok()
        .and_then(chrono::Duration::try_minutes)
        .unwrap_or_else(|| chrono::Duration::days(1))
}

/// Similarity threshold taken from the environment. Values outside the
/// cosine range are clamped; anything non-finite falls back to the default.
fn face_threshold(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(-1.0, 1.0)
    } else {
        DEFAULT_FACE_MATCH_THRESHOLD
    }
}

fn ttl_from_seconds(seconds: u64) -> chrono::Duration {
    i64::try_from(seconds.max(1))
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or_else(|| chrono::Duration::minutes(5))
}

/// Tunables of the attendance engine, injected wherever a check-in is
/// opened, verified or summarised.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendancePolicy {
    pub session_ttl: chrono::Duration,
    pub face_match_threshold: f32,
    pub recent_checkins_limit: u64,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::minutes(5),
            face_match_threshold: DEFAULT_FACE_MATCH_THRESHOLD,
            recent_checkins_limit: 10,
        }
    }
}

impl AttendancePolicy {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            session_ttl: ttl_from_seconds(cfg.session_ttl_seconds),
            face_match_threshold: face_threshold(cfg.face_match_threshold),
            recent_checkins_limit: cfg.recent_checkins_limit.max(1),
        }
    }

    pub fn with_face_match_threshold(mut self, threshold: f32) -> Self {
        self.face_match_threshold = threshold;
        self
    }
}
