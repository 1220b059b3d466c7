//! Server configuration read from the environment.

use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Where the server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

impl ServerConfig {
    /// Reads `HOST` and `PORT` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid u16.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid u16.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
