use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// How long a resolved session is reused for the same cookie and path.
pub const CACHE_DURATION_MS: u64 = 5000;

/// Upper bound on a single session provider call.
pub const SESSION_TIMEOUT_MS: u64 = 3000;

pub const DEFAULT_COLLECTION_IMAGE: &str =
    "https://res.cloudinary.com/doy3slx9i/image/upload/v1735367389/Pengu/not-found_y7uha7.jpg";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub gate: GateConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub cache_duration_ms: u64,
    pub session_timeout_ms: u64,
    pub cache_capacity: usize,
    /// Base URL of the session provider (`GATE_SESSION_ORIGIN`). The server
    /// refuses to start without it.
    pub session_origin: Option<String>,
    /// Key the cache on this cookie's value instead of the whole cookie header.
    pub session_cookie: Option<String>,
    pub protected_prefixes: Vec<String>,
    pub public_prefixes: Vec<String>,
    pub admin_prefix: String,
    pub login_path: String,
    pub unauthorized_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub default_page_limit: i64,
    pub max_page_limit: i64,
    pub default_image: String,
}

impl GateConfig {
    pub fn cache_duration(&self) -> Duration {
        Duration::from_millis(self.cache_duration_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_millis(self.session_timeout_ms)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cache_duration_ms: CACHE_DURATION_MS,
            session_timeout_ms: SESSION_TIMEOUT_MS,
            cache_capacity: 10_000,
            session_origin: None,
            session_cookie: None,
            protected_prefixes: vec!["/admin".to_string(), "/protected".to_string()],
            public_prefixes: vec!["/login".to_string(), "/unauthorized".to_string(), "/api".to_string()],
            admin_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 10,
            max_page_limit: 100,
            default_image: DEFAULT_COLLECTION_IMAGE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env::var("CATALOG_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Gate overrides
        if let Ok(v) = env::var("GATE_CACHE_DURATION_MS") {
            self.gate.cache_duration_ms = v.parse().unwrap_or(self.gate.cache_duration_ms);
        }
        if let Ok(v) = env::var("GATE_SESSION_TIMEOUT_MS") {
            self.gate.session_timeout_ms = v.parse().unwrap_or(self.gate.session_timeout_ms);
        }
        if let Ok(v) = env::var("GATE_CACHE_CAPACITY") {
            self.gate.cache_capacity = v.parse().unwrap_or(self.gate.cache_capacity);
        }
        if let Ok(v) = env::var("GATE_SESSION_ORIGIN") {
            self.gate.session_origin = Some(v.trim_end_matches('/').to_string());
        }
        if let Ok(v) = env::var("GATE_SESSION_COOKIE") {
            self.gate.session_cookie = Some(v);
        }

        // Catalog overrides
        if let Ok(v) = env::var("CATALOG_MAX_PAGE_LIMIT") {
            self.catalog.max_page_limit = v.parse().unwrap_or(self.catalog.max_page_limit);
        }
        if let Ok(v) = env::var("CATALOG_DEFAULT_IMAGE") {
            self.catalog.default_image = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            gate: GateConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            gate: GateConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            gate: GateConfig {
                cache_capacity: 50_000,
                ..GateConfig::default()
            },
            catalog: CatalogConfig {
                max_page_limit: 50,
                ..CatalogConfig::default()
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
