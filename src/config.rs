use std::{env, net::SocketAddr, time::Duration};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub max_connections: u32,
    pub cors_allow_origin: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://trips.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid DB_MAX_CONNECTIONS: {err}")))?,
            Err(_) => 10,
        };

        let cors_allow_origin = env::var("CORS_ALLOW_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let timeout_secs: u64 = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|err| {
                AppError::Config(format!("invalid REQUEST_TIMEOUT_SECS: {err}"))
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            database_url,
            listen_addr,
            max_connections,
            cors_allow_origin,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
