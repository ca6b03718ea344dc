use std::path::PathBuf;

/// Server settings read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub frontend_url: Option<String>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }
        fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
            var(name).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        }
        Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 8080),
            frontend_url: var("FRONTEND_URL"),
            database_url: var("DATABASE_URL"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5),
            data_dir: var("IDEAS_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
        }
    }
}
