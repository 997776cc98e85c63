use std::{
    collections::HashMap,
    env, fmt,
    net::{IpAddr, Ipv4Addr},
    str::FromStr,
    time::Duration,
};

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEnv {
    Development,
    Production,
    Test,
}

impl NodeEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeEnv::Development => "development",
            NodeEnv::Production => "production",
            NodeEnv::Test => "test",
        }
    }
}

impl FromStr for NodeEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(NodeEnv::Development),
            "production" => Ok(NodeEnv::Production),
            "test" => Ok(NodeEnv::Test),
            other => Err(format!(
                "expected one of development, production, test, received '{other}'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!(
                "expected one of error, warn, info, debug, received '{other}'"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub idle_timeout_ms: u64,
    pub connection_timeout_ms: u64,
}

impl PoolConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            idle_timeout_ms: 30_000,
            connection_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub database: String,
    pub url: SecretString,
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    /// Checks the fields the pool cannot work without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();
        let mut non_empty = |field: &'static str, value: &str| {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::new(field, "must not be empty"));
            }
        };
        non_empty("DATABASE_HOST", &self.host);
        non_empty("DATABASE_USERNAME", &self.username);
        non_empty("DATABASE_PASSWORD", self.password.expose_secret());
        non_empty("DATABASE_NAME", &self.database);

        if self.port == 0 {
            issues.push(ConfigIssue::new("DATABASE_PORT", "must be a positive integer"));
        }
        if self.pool.max_connections == 0 {
            issues.push(ConfigIssue::new("DB_POOL_MAX", "must be a positive integer"));
        }
        if self.pool.min_connections > self.pool.max_connections {
            issues.push(ConfigIssue::new(
                "DB_POOL_MIN",
                format!(
                    "must not exceed DB_POOL_MAX ({})",
                    self.pool.max_connections
                ),
            ));
        }
        ConfigError::from_issues(issues)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.database)
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub node_env: NodeEnv,
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: SecretString,
    /// Requests per minute.
    pub api_rate_limit: u64,
    pub log_level: LogLevel,
    pub log_file_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every invalid field found while reading the environment.
#[derive(Debug, Error)]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigError {
    fn from_issues(issues: Vec<ConfigIssue>) -> Result<(), ConfigError> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { issues })
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.field).collect()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment validation failed:")?;
        for issue in &self.issues {
            write!(f, "\n{}: {}", issue.field, issue.message)?;
        }
        Ok(())
    }
}

struct EnvReader {
    vars: HashMap<String, String>,
    issues: Vec<ConfigIssue>,
}

impl EnvReader {
    fn new(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            issues: Vec::new(),
        }
    }

    fn get(&self, field: &str) -> Option<&str> {
        self.vars
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, field: &'static str) -> String {
        match self.get(field) {
            Some(v) => v.to_string(),
            None => {
                self.issues.push(ConfigIssue::new(field, "is required"));
                String::new()
            }
        }
    }

    fn parse_or<T>(&mut self, field: &'static str, default: T) -> T
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(field).map(|v| v.parse::<T>()) {
            None => default,
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                self.issues.push(ConfigIssue::new(field, e.to_string()));
                default
            }
        }
    }

    fn integer_or<T>(&mut self, field: &'static str, default: T, positive: bool) -> T
    where
        T: FromStr + PartialEq + Default + Copy,
    {
        let Some(raw) = self.get(field).map(str::to_owned) else {
            return default;
        };
        match raw.parse::<T>() {
            Ok(v) if positive && v == T::default() => {
                self.issues
                    .push(ConfigIssue::new(field, "must be a positive integer"));
                default
            }
            Ok(v) => v,
            Err(_) => {
                let kind = if positive { "a positive" } else { "a non-negative" };
                self.issues.push(ConfigIssue::new(
                    field,
                    format!("expected {kind} integer, received '{raw}'"),
                ));
                default
            }
        }
    }

    // Only the literal `true` switches a flag on.
    fn flag(&self, field: &str) -> bool {
        self.get(field) == Some("true")
    }

    fn database_url(&mut self) -> String {
        let url = self.required("DATABASE_URL");
        if url.is_empty() {
            return url;
        }
        let scheme_ok = url.starts_with("postgres://") || url.starts_with("postgresql://");
        if !scheme_ok || PgConnectOptions::from_str(&url).is_err() {
            self.issues
                .push(ConfigIssue::new("DATABASE_URL", "must be a valid postgres:// URL"));
        }
        url
    }

    fn finish<T>(self, value: T) -> Result<T, ConfigError> {
        ConfigError::from_issues(self.issues).map(|_| value)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Builds the configuration from an explicit variable set.
    ///
    /// Missing optional values fall back to their defaults; every invalid
    /// or missing required value is collected before returning.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut env = EnvReader::new(vars);

        let node_env = env.parse_or("NODE_ENV", NodeEnv::Development);
        let host = env.parse_or("APP_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = env.integer_or("PORT", 3000u16, true);

        let pool = PoolConfig {
            min_connections: env.integer_or("DB_POOL_MIN", 2u32, false),
            max_connections: env.integer_or("DB_POOL_MAX", 10u32, true),
            idle_timeout_ms: env.integer_or("DB_POOL_IDLE_TIMEOUT", 30_000u64, false),
            connection_timeout_ms: env.integer_or("DB_POOL_CONNECTION_TIMEOUT", 5_000u64, false),
        };
        let database = DatabaseConfig {
            host: env.required("DATABASE_HOST"),
            port: env.integer_or("DATABASE_PORT", 5432u16, true),
            username: env.required("DATABASE_USERNAME"),
            password: SecretString::from(env.required("DATABASE_PASSWORD")),
            database: env.required("DATABASE_NAME"),
            url: SecretString::from(env.database_url()),
            pool,
        };
        if pool.min_connections > pool.max_connections {
            env.issues.push(ConfigIssue::new(
                "DB_POOL_MIN",
                format!("must not exceed DB_POOL_MAX ({})", pool.max_connections),
            ));
        }

        let jwt_secret = env.required("JWT_SECRET");
        if !jwt_secret.is_empty() && jwt_secret.chars().count() < 8 {
            env.issues.push(ConfigIssue::new(
                "JWT_SECRET",
                "must contain at least 8 characters",
            ));
        }

        let api_rate_limit = env.integer_or("API_RATE_LIMIT", 100u64, true);
        let log_level = env.parse_or("LOG_LEVEL", LogLevel::Info);
        let log_file_enabled = env.flag("LOG_FILE_ENABLED");

        env.finish(AppConfig {
            node_env,
            host,
            port,
            database,
            jwt_secret: SecretString::from(jwt_secret),
            api_rate_limit,
            log_level,
            log_file_enabled,
        })
    }
}

/// Loads `.env.<NODE_ENV>` and then `.env`. Variables already present in
/// the process environment are never overwritten.
pub fn load_env_files() {
    let node_env = env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string());
    let env_file = format!(".env.{node_env}");
    if dotenvy::from_filename(&env_file).is_ok() {
        tracing::debug!(file = %env_file, "loaded environment file");
    }
    dotenvy::dotenv().ok();
}
