use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU8, AtomicUsize, Ordering},
    time::Duration,
};

use serde::Serialize;
use sqlx::{
    PgPool, Postgres,
    error::ErrorKind,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{ConfigError, ConfigIssue, DatabaseConfig, PoolConfig};

pub type DbPool = PgPool;
pub type DbConn = PoolConnection<Postgres>;

/// How long `shutdown` waits for checked-out connections to come back.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

// A configured acquisition timeout of 0 means "wait forever".
const UNBOUNDED_ACQUIRE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    Check,
    ForeignKey,
    NotNull,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::Check => "check",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
        })
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("connection pool exhausted: all {max} connections busy for {timeout_ms}ms")]
    PoolExhausted { max: u32, timeout_ms: u64 },

    #[error("timed out after {timeout_ms}ms waiting for a database connection")]
    ConnectionTimeout { timeout_ms: u64 },

    #[error("connection pool is closed")]
    Closed,

    #[error("{kind} constraint {} violated", constraint.as_deref().unwrap_or("<unnamed>"))]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: Option<String>,
        message: String,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sea_orm::DbErr),
}

impl DbError {
    /// Exhaustion and connect timeouts may succeed if the caller retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::PoolExhausted { .. } | DbError::ConnectionTimeout { .. }
        )
    }

    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::ConstraintViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }
}

// Pool timeouts are mapped by `PoolManager::acquire`, which knows the
// pool sizing; everything else goes through here.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolClosed => return DbError::Closed,
            sqlx::Error::Database(db) => {
                let kind = match db.kind() {
                    ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                    ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                    ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                    ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                    _ => None,
                };
                if let Some(kind) = kind {
                    return DbError::ConstraintViolation {
                        kind,
                        constraint: db.constraint().map(str::to_owned),
                        message: db.message().to_owned(),
                    };
                }
            }
            _ => {}
        }
        DbError::Query(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PoolState {
    Ready,
    Draining,
    Closed,
}

impl PoolState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => PoolState::Ready,
            1 => PoolState::Draining,
            _ => PoolState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            PoolState::Ready => 0,
            PoolState::Draining => 1,
            PoolState::Closed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatus {
    pub state: PoolState,
    pub total_count: u32,
    pub idle_count: u32,
    pub waiting_count: u32,
    pub max_connections: u32,
}

struct WaitGuard<'a>(&'a AtomicUsize);

impl<'a> WaitGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the Postgres connection pool for the lifetime of the process.
///
/// Lifecycle is `Ready -> Draining -> Closed`; there is no way back to
/// `Ready`. Once draining starts, [`PoolManager::handle`] and
/// [`PoolManager::acquire`] return [`DbError::Closed`].
pub struct PoolManager {
    pool: DbPool,
    settings: PoolConfig,
    state: AtomicU8,
    waiting: AtomicUsize,
}

impl PoolManager {
    /// Validates the configuration and prepares a lazy pool. No connection
    /// is opened until the first query. Must be called inside a Tokio
    /// runtime, since the pool spawns its idle reaper.
    pub fn initialize(config: &DatabaseConfig) -> Result<Self, DbError> {
        config.validate()?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "preparing connection pool"
        );
        Ok(Self::with_options(config.connect_options(), config.pool))
    }

    /// Like [`PoolManager::initialize`], but connects through a
    /// `postgres://` URL. Used by the command-line tools and tests.
    pub fn connect_url(url: &str, settings: PoolConfig) -> Result<Self, DbError> {
        let mut issues = Vec::new();
        let scheme_ok = url.starts_with("postgres://") || url.starts_with("postgresql://");
        let options = if scheme_ok {
            PgConnectOptions::from_str(url).ok()
        } else {
            None
        };
        if options.is_none() {
            issues.push(ConfigIssue::new("DATABASE_URL", "must be a valid postgres:// URL"));
        }
        if settings.max_connections == 0 {
            issues.push(ConfigIssue::new("DB_POOL_MAX", "must be a positive integer"));
        }
        if settings.min_connections > settings.max_connections {
            issues.push(ConfigIssue::new(
                "DB_POOL_MIN",
                format!("must not exceed DB_POOL_MAX ({})", settings.max_connections),
            ));
        }
        match options {
            Some(options) if issues.is_empty() => {
                tracing::info!(host = %options.get_host(), "preparing connection pool");
                Ok(Self::with_options(options, settings))
            }
            _ => Err(DbError::Configuration(ConfigError { issues })),
        }
    }

    fn with_options(options: PgConnectOptions, settings: PoolConfig) -> Self {
        let idle_timeout = (settings.idle_timeout_ms > 0).then(|| settings.idle_timeout());
        let acquire_timeout = if settings.connection_timeout_ms > 0 {
            settings.connection_timeout()
        } else {
            UNBOUNDED_ACQUIRE
        };

        let pool = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .idle_timeout(idle_timeout)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);

        tracing::debug!(
            min = settings.min_connections,
            max = settings.max_connections,
            idle_timeout_ms = settings.idle_timeout_ms,
            connection_timeout_ms = settings.connection_timeout_ms,
            "connection pool prepared"
        );

        Self {
            pool,
            settings,
            state: AtomicU8::new(PoolState::Ready.as_u8()),
            waiting: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Shared query handle. Cheap to clone and safe to use from many tasks.
    pub fn handle(&self) -> Result<DbPool, DbError> {
        match self.state() {
            PoolState::Ready => Ok(self.pool.clone()),
            PoolState::Draining | PoolState::Closed => Err(DbError::Closed),
        }
    }

    /// Checks out one connection, blocking up to the acquisition timeout.
    pub async fn acquire(&self) -> Result<DbConn, DbError> {
        let pool = self.handle()?;
        let result = {
            let _waiting = WaitGuard::enter(&self.waiting);
            pool.acquire().await
        };
        result.map_err(|err| self.acquire_error(err))
    }

    fn acquire_error(&self, err: sqlx::Error) -> DbError {
        match err {
            sqlx::Error::PoolTimedOut => {
                let saturated = self.pool.size() >= self.settings.max_connections
                    && self.pool.num_idle() == 0;
                let timeout_ms = self.settings.connection_timeout_ms;
                if saturated {
                    tracing::warn!(
                        max = self.settings.max_connections,
                        timeout_ms,
                        "connection pool exhausted"
                    );
                    DbError::PoolExhausted {
                        max: self.settings.max_connections,
                        timeout_ms,
                    }
                } else {
                    tracing::warn!(timeout_ms, "timed out connecting to database");
                    DbError::ConnectionTimeout { timeout_ms }
                }
            }
            other => DbError::from(other),
        }
    }

    /// Round-trips `SELECT 1` so startup fails fast on a bad database.
    pub async fn verify(&self) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&mut *conn)
            .await?;
        Ok(())
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            state: self.state(),
            total_count: self.pool.size(),
            idle_count: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            waiting_count: u32::try_from(self.waiting.load(Ordering::SeqCst))
                .unwrap_or(u32::MAX),
            max_connections: self.settings.max_connections,
        }
    }

    /// Drains and closes the pool. Only the first call does any work.
    pub async fn shutdown(&self) {
        let transitioned = self.state.compare_exchange(
            PoolState::Ready.as_u8(),
            PoolState::Draining.as_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if transitioned.is_err() {
            tracing::debug!(state = ?self.state(), "pool shutdown already requested");
            return;
        }

        let status = self.status();
        tracing::info!(
            total = status.total_count,
            idle = status.idle_count,
            "draining connection pool"
        );

        if tokio::time::timeout(DRAIN_TIMEOUT, self.pool.close())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout_secs = DRAIN_TIMEOUT.as_secs(),
                "in-flight queries did not finish before the drain timeout"
            );
        }

        self.state
            .store(PoolState::Closed.as_u8(), Ordering::SeqCst);
        tracing::info!("connection pool closed");
    }
}
