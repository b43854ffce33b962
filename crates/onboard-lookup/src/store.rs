//! Lookup provider backed by the persisted transporter store (libsql).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Value, params_from_iter};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::geo::GeoDirectory;
use crate::sql::exists_sql;
use crate::{LookupError, LookupProvider, Result};

/// Where the persisted store lives and which columns hold the unique values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
    pub auth_token: Option<String>,
    /// Upper bound on existence queries running at once.
    pub max_concurrent_queries: usize,
    pub timeout_ms: u64,
    pub retry_attempts: usize,
    pub transporters_table: String,
    pub business_name_column: String,
    pub contacts_table: String,
    pub email_column: String,
}

impl StoreConfig {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: ":memory:".to_string(),
            auth_token: None,
            max_concurrent_queries: 1,
            timeout_ms: 5_000,
            retry_attempts: 0,
            transporters_table: "transporters".to_string(),
            business_name_column: "business_name".to_string(),
            contacts_table: "transporter_contacts".to_string(),
            email_column: "email_id".to_string(),
        }
    }

    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            database_url: path.into(),
            max_concurrent_queries: 8,
            ..Self::in_memory()
        }
    }

    #[must_use]
    pub fn remote(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            database_url: url.into(),
            auth_token: Some(auth_token.into()),
            max_concurrent_queries: 8,
            ..Self::in_memory()
        }
    }

    fn is_remote(&self) -> bool {
        let url = self.database_url.trim();
        url.starts_with("libsql://") || url.starts_with("https://") || url.starts_with("http://")
    }

    fn check(&self) -> Result<()> {
        let invalid = |details: &str| {
            Err(LookupError::Config {
                details: details.to_string(),
            })
        };
        if self.database_url.trim().is_empty() {
            return invalid("database_url must be provided");
        }
        if self.max_concurrent_queries == 0 {
            return invalid("max_concurrent_queries must be greater than zero");
        }
        if self.timeout_ms == 0 {
            return invalid("timeout_ms must be greater than zero");
        }
        if self.is_remote() && self.auth_token.is_none() {
            return invalid("auth_token is required for remote databases");
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Geography from a [`GeoDirectory`], uniqueness from the persisted store.
#[derive(Clone)]
pub struct StoreLookup {
    geo: GeoDirectory,
    store: Arc<Store>,
    business_name_sql: String,
    contact_email_sql: String,
}

/// One shared connection; the semaphore bounds in-flight queries.
struct Store {
    // The connection is only valid while its database is alive.
    _database: Database,
    connection: Connection,
    queries: Semaphore,
}

impl fmt::Debug for StoreLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreLookup")
            .field("countries", &self.geo.len())
            .finish_non_exhaustive()
    }
}

impl StoreLookup {
    /// Open the store, retrying with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the database
    /// cannot be opened within the configured attempts.
    pub async fn connect(config: StoreConfig, geo: GeoDirectory) -> Result<Self> {
        config.check()?;

        let attempts = config.retry_attempts + 1;
        let mut last_error = None;
        for attempt in 0..attempts {
            match open_store(&config).await {
                Ok(store) => {
                    tracing::debug!(url = %config.database_url, attempt, "connected to store");
                    return Ok(Self {
                        geo,
                        store: Arc::new(store),
                        business_name_sql: exists_sql(
                            &config.transporters_table,
                            &config.business_name_column,
                        ),
                        contact_email_sql: exists_sql(
                            &config.contacts_table,
                            &config.email_column,
                        ),
                    });
                }
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "store connection failed");
                    last_error = Some(err);
                    if attempt + 1 < attempts {
                        let delay_ms = 100 * (1_u64 << attempt.min(6));
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LookupError::unavailable(format!(
                "Failed to connect after {attempts} attempt(s): exhausted retries"
            ))
        }))
    }

    #[must_use]
    pub fn geo(&self) -> &GeoDirectory {
        &self.geo
    }

    async fn exists(&self, sql: &str, value: &str) -> Result<bool> {
        let sql_error = |source| LookupError::Sql {
            statement: sql.to_string(),
            source,
        };

        let _permit = self
            .store
            .queries
            .acquire()
            .await
            .map_err(|_| LookupError::unavailable("Store is closed"))?;
        tracing::trace!(statement = sql, "store lookup");
        let mut rows = self
            .store
            .connection
            .query(sql, params_from_iter([Value::Text(value.to_string())]))
            .await
            .map_err(sql_error)?;
        Ok(rows.next().await.map_err(sql_error)?.is_some())
    }
}

#[async_trait]
impl LookupProvider for StoreLookup {
    async fn country_exists(&self, iso_code: &str) -> Result<bool> {
        Ok(self.geo.country_exists(iso_code))
    }

    async fn state_exists(
        &self,
        country_iso_code: &str,
        state_name_or_code: &str,
    ) -> Result<bool> {
        Ok(self.geo.state_exists(country_iso_code, state_name_or_code))
    }

    async fn business_name_exists(&self, name: &str) -> Result<bool> {
        self.exists(&self.business_name_sql, name).await
    }

    async fn contact_email_exists(&self, email: &str) -> Result<bool> {
        self.exists(&self.contact_email_sql, email).await
    }
}

async fn open_store(config: &StoreConfig) -> Result<Store> {
    let timeout = Duration::from_millis(config.timeout_ms);
    let url = config.database_url.trim();
    let builder = async {
        match &config.auth_token {
            Some(token) if config.is_remote() => {
                Builder::new_remote(url.to_string(), token.clone()).build().await
            }
            _ => {
                Builder::new_local(url.strip_prefix("file:").unwrap_or(url))
                    .build()
                    .await
            }
        }
    };

    let database = tokio::time::timeout(timeout, builder)
        .await
        .map_err(|_| {
            LookupError::unavailable(format!(
                "Timed out after {}ms while opening database",
                config.timeout_ms
            ))
        })?
        .map_err(|source| LookupError::Libsql {
            context: "open database".to_string(),
            source,
        })?;

    let connection = database.connect().map_err(|source| LookupError::Libsql {
        context: "connect database".to_string(),
        source,
    })?;
    connection
        .busy_timeout(timeout)
        .map_err(|source| LookupError::Libsql {
            context: "set busy timeout".to_string(),
            source,
        })?;

    Ok(Store {
        _database: database,
        connection,
        queries: Semaphore::new(config.max_concurrent_queries),
    })
}
