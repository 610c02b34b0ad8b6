//! Database connection management
//!
//! A [`ConnectionManager`] opens the sqlx `PgPool` on first use, pings it,
//! and hands the same pool (or the same failure) to every later caller.
//! The open is attempted once per manager; a failure is cached, not retried.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool};
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::config::DatabaseSettings;

/// Failure to establish or verify the shared database handle.
///
/// Cloneable so the manager can hand the cached failure to every caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectionError {
    #[error("unable to open database connection: {0}")]
    InvalidOptions(#[source] Arc<sqlx::Error>),

    #[error("unable to connect to database: {0}")]
    Unreachable(#[source] Arc<sqlx::Error>),
}

impl ConnectionError {
    pub fn invalid_options(err: sqlx::Error) -> Self {
        Self::InvalidOptions(Arc::new(err))
    }

    pub fn unreachable(err: sqlx::Error) -> Self {
        Self::Unreachable(Arc::new(err))
    }
}

/// Strategy for opening the shared pool.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a pool and verify it is reachable.
    async fn open(&self) -> Result<PgPool, ConnectionError>;

    /// Human-readable target for log lines. Must not include credentials.
    fn describe(&self) -> String {
        "database".to_string()
    }
}

/// Opens a PostgreSQL pool from [`DatabaseSettings`] and pings it.
#[derive(Debug, Clone)]
pub struct PgConnector {
    settings: DatabaseSettings,
}

impl PgConnector {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn open(&self) -> Result<PgPool, ConnectionError> {
        let options = self.settings.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_lazy_with(options);

        ping(&pool).await?;
        Ok(pool)
    }

    fn describe(&self) -> String {
        self.settings.display_target()
    }
}

/// Round-trip a ping on one pooled connection.
pub async fn ping(pool: &PgPool) -> Result<(), ConnectionError> {
    let mut conn = pool.acquire().await.map_err(ConnectionError::unreachable)?;
    conn.ping().await.map_err(ConnectionError::unreachable)
}

/// Open-once holder for the shared pool.
///
/// Construct one at startup and share it (`Arc<ConnectionManager>`) with
/// every component that needs the database.
///
/// The open runs as a single shared future: callers that are dropped mid-open
/// leave its progress in place for the next caller, so it is never restarted.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    handle: Shared<BoxFuture<'static, Result<PgPool, ConnectionError>>>,
    attempts: Arc<AtomicUsize>,
}

impl ConnectionManager {
    pub fn new(connector: impl Connector + 'static) -> Self {
        let connector: Arc<dyn Connector> = Arc::new(connector);
        let attempts = Arc::new(AtomicUsize::new(0));
        let handle = open(connector.clone(), attempts.clone()).boxed().shared();

        Self {
            connector,
            handle,
            attempts,
        }
    }

    /// Manager backed by [`PgConnector`].
    pub fn postgres(settings: DatabaseSettings) -> Self {
        Self::new(PgConnector::new(settings))
    }

    /// Get the shared pool, opening it on first call.
    ///
    /// Concurrent first callers wait on the same open attempt.
    ///
    /// # Errors
    ///
    /// Returns the (cached) [`ConnectionError`] if the first open failed.
    pub async fn get(&self) -> Result<PgPool, ConnectionError> {
        self.handle.clone().await
    }

    /// Number of open attempts made so far (0 or 1).
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// Whether the pool has been opened successfully.
    pub fn is_connected(&self) -> bool {
        matches!(self.handle.peek(), Some(Ok(_)))
    }
}

/// Nothing runs until the first `get()` polls the shared future.
async fn open(
    connector: Arc<dyn Connector>,
    attempts: Arc<AtomicUsize>,
) -> Result<PgPool, ConnectionError> {
    attempts.fetch_add(1, Ordering::AcqRel);
    let target = connector.describe();
    tracing::info!(db = %target, "Connecting to PostgreSQL...");

    match connector.open().await {
        Ok(pool) => {
            tracing::info!(db = %target, "Successfully connected to the database");
            Ok(pool)
        }
        Err(err) => {
            tracing::error!(db = %target, error = %err, "Database connection failed");
            Err(err)
        }
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("target", &self.connector.describe())
            .field("attempts", &self.attempts())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseTarget;
    use std::time::Duration;

    /// Counts open attempts; hands out a lazy pool or a fixed failure.
    struct CountingConnector {
        opens: Arc<AtomicUsize>,
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        async fn open(&self) -> Result<PgPool, ConnectionError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(ConnectionError::unreachable(sqlx::Error::PoolTimedOut));
            }
            Ok(PgPoolOptions::new()
                .connect_lazy("postgres://games:pw@127.0.0.1:1/catalog")
                .expect("lazy pool"))
        }
    }

    fn manager_with_delay(fail: bool, delay: Duration) -> (Arc<ConnectionManager>, Arc<AtomicUsize>) {
        let opens = Arc::new(AtomicUsize::new(0));
        let manager = ConnectionManager::new(CountingConnector {
            opens: opens.clone(),
            delay,
            fail,
        });
        (Arc::new(manager), opens)
    }

    fn manager(fail: bool) -> (Arc<ConnectionManager>, Arc<AtomicUsize>) {
        // Widen the race window for concurrent callers
        manager_with_delay(fail, Duration::from_millis(20))
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_open() {
        let (manager, opens) = manager(false);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get().await })
            })
            .collect();

        let mut pools = Vec::new();
        for handle in handles {
            let pool = handle.await.expect("task panicked").expect("open failed");
            pools.push(pool);
        }

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(manager.attempts(), 1);
        assert!(manager.is_connected());

        // Clones of one pool share state: closing one closes them all
        pools[0].close().await;
        assert!(pools.iter().all(|pool| pool.is_closed()));
        assert!(manager.get().await.unwrap().is_closed());
    }

    #[tokio::test]
    async fn failure_is_cached() {
        let (manager, opens) = manager(true);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get().await })
            })
            .collect();

        for handle in handles {
            let err = handle.await.expect("task panicked").unwrap_err();
            assert!(matches!(err, ConnectionError::Unreachable(_)));
        }

        // Sequential callers after the failure do not retry either
        assert!(manager.get().await.is_err());
        assert!(manager.get().await.is_err());

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn cancelled_first_caller_does_not_restart_open() {
        let (manager, opens) = manager_with_delay(true, Duration::from_millis(200));

        let first = tokio::time::timeout(Duration::from_millis(20), manager.get()).await;
        assert!(first.is_err(), "first caller should time out mid-open");
        assert_eq!(opens.load(Ordering::SeqCst), 1);

        let err = manager.get().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Unreachable(_)));

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(manager.attempts(), 1);
    }

    #[tokio::test]
    async fn cancelled_first_caller_still_yields_pool() {
        let (manager, opens) = manager_with_delay(false, Duration::from_millis(200));

        assert!(tokio::time::timeout(Duration::from_millis(20), manager.get())
            .await
            .is_err());
        assert!(manager.get().await.is_ok());

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn nothing_opens_until_first_get() {
        let (manager, opens) = manager(false);
        assert_eq!(opens.load(Ordering::SeqCst), 0);
        assert_eq!(manager.attempts(), 0);

        manager.get().await.unwrap();
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pg_connector_reports_invalid_url() {
        let settings = DatabaseSettings::new(DatabaseTarget::Url("not a url".into()));
        let manager = ConnectionManager::postgres(settings);

        let err = manager.get().await.unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidOptions(_)));
        assert!(err.to_string().starts_with("unable to open database connection"));
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p gamecat-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pg_connector_pings() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let manager = ConnectionManager::postgres(DatabaseSettings::new(DatabaseTarget::Url(url)));

        let pool = manager.get().await.expect("connect failed");
        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
