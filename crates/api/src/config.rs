/// Which [`LaboratoryStore`](marie_core::store::LaboratoryStore) the server runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via `marie-db`.
    Postgres { database_url: String },
    /// Process-local store seeded with the sample laboratories.
    Memory,
}

impl StoreBackend {
    /// Short name reported by `/health`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background services get to drain on shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Laboratory storage backend.
    pub store: StoreBackend,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                          |
    /// |------------------------|--------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                        |
    /// | `PORT`                 | `3000`                                           |
    /// | `CORS_ORIGINS`         | `http://localhost:5173,http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `5`                                              |
    /// | `MARIE_STORE`          | `postgres` (`memory` for the seeded demo store)  |
    /// | `DATABASE_URL`         | required unless `MARIE_STORE=memory`             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let store = match std::env::var("MARIE_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            },
            Ok(other) => panic!("MARIE_STORE must be `postgres` or `memory`, got `{other}`"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
