//! Dependency initialization and wiring for the restaurant API.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::StartupError;
use restaurant_api_repository::config::MEDIUM_DATE_TIME_FORMAT;
use restaurant_api_repository::mongo::{DEFAULT_DATABASE, DEFAULT_MONGO_URL};
use restaurant_api_repository::{
    setup_auth, Credentials, DocumentStore, MongoStore, MongoStoreConfig, Restaurant,
    RestaurantServiceConfig,
};

/// Default location of the secrets file.
const DEFAULT_SECRETS_PATH: &str = "./SecretsList.json";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for MongoDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every retry interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            other => {
                warn!(value = %other, "Invalid MONGO_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mongo_url: String,
    pub mongo_database: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub secrets_path: PathBuf,
    pub date_format: String,
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MONGO_URL`: MongoDB connection string (default: mongodb://localhost:27017)
    /// - `MONGO_DATABASE`: Database name (default: "dev")
    /// - `MONGO_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `MONGO_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `SECRETS_PATH`: Secrets file holding `JWT_Secret` (default: ./SecretsList.json)
    /// - `DATE_FORMAT`: chrono format of the menu item and event date stamp
    ///   (default: "%b %-d, %Y, %-I:%M:%S %p")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to the defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let retry_interval = lookup("MONGO_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Self {
            mongo_url: lookup("MONGO_URL").unwrap_or_else(|| DEFAULT_MONGO_URL.to_string()),
            mongo_database: lookup("MONGO_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            connection_mode: ConnectionMode::parse(lookup("MONGO_CONNECTION_MODE").as_deref()),
            retry_interval: Duration::from_secs(retry_interval),
            secrets_path: lookup("SECRETS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_PATH)),
            date_format: lookup("DATE_FORMAT")
                .unwrap_or_else(|| MEDIUM_DATE_TIME_FORMAT.to_string()),
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The restaurant API, shared with the HTTP layer.
    pub restaurant: Arc<Restaurant>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If initialization fails (connection failures
    ///   only in fail-fast mode)
    pub async fn new() -> Result<Self, StartupError> {
        Self::from_settings(Settings::from_env()).await
    }

    /// Initialize all dependencies from `settings`.
    pub async fn from_settings(settings: Settings) -> Result<Self, StartupError> {
        info!(
            mongo_url = %settings.mongo_url,
            mongo_database = %settings.mongo_database,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            secrets_path = %settings.secrets_path.display(),
            "Initializing dependencies"
        );

        let service_config = Self::service_config(&settings)?;

        let store = Self::connect_to_mongo(
            MongoStoreConfig::new(&settings.mongo_url, &settings.mongo_database),
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("MongoDB connection established");

        Ok(Self::assemble(Arc::new(store), service_config, &settings))
    }

    /// Wire dependencies around an already connected store.
    ///
    /// Used for local development and tests with `MemoryStore`.
    pub fn from_store(
        store: Arc<dyn DocumentStore>,
        settings: &Settings,
    ) -> Result<Self, StartupError> {
        let service_config = Self::service_config(settings)?;
        Ok(Self::assemble(store, service_config, settings))
    }

    fn service_config(settings: &Settings) -> Result<RestaurantServiceConfig, StartupError> {
        let config = RestaurantServiceConfig::with_date_format(&settings.date_format);
        config
            .validate()
            .map_err(|e| StartupError::config(format!("Invalid DATE_FORMAT: {}", e)))?;
        Ok(config)
    }

    fn assemble(
        store: Arc<dyn DocumentStore>,
        service_config: RestaurantServiceConfig,
        settings: &Settings,
    ) -> Self {
        // Auth setup never aborts start-up; protected routes reject every
        // token until a secret is configured.
        let mut credentials = Credentials::new();
        if !setup_auth(&mut credentials, &settings.secrets_path) {
            warn!("Authentication disabled");
        }

        let restaurant =
            Restaurant::with_config(store, service_config).with_credentials(credentials);

        Self {
            restaurant: Arc::new(restaurant),
        }
    }

    /// Connect to MongoDB with retry logic based on connection mode.
    async fn connect_to_mongo(
        config: MongoStoreConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<MongoStore, StartupError> {
        loop {
            match Self::try_connect_mongo(config.clone()).await {
                Ok(store) => return Ok(store),
                Err(e) => match mode {
                    ConnectionMode::FailFast => return Err(e),
                    ConnectionMode::Retry => {
                        warn!(
                            mongo_url = %config.url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to MongoDB, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to MongoDB and check it answers.
    async fn try_connect_mongo(config: MongoStoreConfig) -> Result<MongoStore, StartupError> {
        let store = MongoStore::new(config).await?;
        store.ping().await?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restaurant_api_repository::{MemoryStore, RestaurantApi};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_connection_mode_parse() {
        assert_eq!(ConnectionMode::parse(None), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse(Some("retry")), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse(Some("Fail-Fast")), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse(Some("fail_fast")), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse(Some("sometimes")), ConnectionMode::Retry);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_lookup(|_| None);

        assert_eq!(settings.mongo_url, "mongodb://localhost:27017");
        assert_eq!(settings.mongo_database, "dev");
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.secrets_path, PathBuf::from("./SecretsList.json"));
        assert_eq!(settings.date_format, MEDIUM_DATE_TIME_FORMAT);
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("MONGO_URL", "mongodb://db:27017"),
            ("MONGO_DATABASE", "prod"),
            ("MONGO_CONNECTION_MODE", "fail-fast"),
            ("MONGO_RETRY_INTERVAL_SECS", "3"),
            ("SECRETS_PATH", "/etc/restaurant/secrets.json"),
        ]));

        assert_eq!(settings.mongo_url, "mongodb://db:27017");
        assert_eq!(settings.mongo_database, "prod");
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.retry_interval, Duration::from_secs(3));
        assert_eq!(
            settings.secrets_path,
            PathBuf::from("/etc/restaurant/secrets.json")
        );
    }

    #[test]
    fn test_unparsable_retry_interval_uses_default() {
        let settings = Settings::from_lookup(lookup_from(&[("MONGO_RETRY_INTERVAL_SECS", "soon")]));
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_from_store_without_secrets_disables_auth() {
        let settings = Settings::from_lookup(lookup_from(&[(
            "SECRETS_PATH",
            "/nonexistent/SecretsList.json",
        )]));

        let deps = Dependencies::from_store(Arc::new(MemoryStore::new()), &settings).unwrap();
        assert!(deps.restaurant.credentials().is_empty());
    }

    #[test]
    fn test_invalid_date_format_is_config_error() {
        let settings = Settings::from_lookup(lookup_from(&[("DATE_FORMAT", "%Y-%m %")]));

        let result = Dependencies::from_store(Arc::new(MemoryStore::new()), &settings);
        assert!(matches!(result, Err(StartupError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_fail_fast_on_invalid_url() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("MONGO_URL", "not-a-mongo-url"),
            ("MONGO_CONNECTION_MODE", "fail-fast"),
        ]));

        let result = Dependencies::from_settings(settings).await;
        assert!(matches!(result, Err(StartupError::StoreError(_))));
    }
}
