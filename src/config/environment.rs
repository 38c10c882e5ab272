//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::services::MAX_BOOKING_LIST_LIMIT;

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub ping_message: String,
    pub log_level: tracing::Level,
    pub booking_list_limit: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5174,
            storage: StorageBackend::Memory,
            database_url: None,
            cors_origins: Vec::new(),
            ping_message: "ping".to_string(),
            log_level: tracing::Level::DEBUG,
            booking_list_limit: MAX_BOOKING_LIST_LIMIT,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración a partir de un mapa (tests)
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT must be a valid number, got '{}'", p))?,
            None => 5174,
        };

        let storage = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Postgres,
        };
        let database_url = var("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND=postgres");
        }

        let cors_origins = var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let default_level = if environment == "development" { "debug" } else { "info" };
        let log_level_raw = var("LOG_LEVEL").unwrap_or_else(|| default_level.to_string());
        let log_level = tracing::Level::from_str(&log_level_raw)
            .map_err(|_| anyhow!("LOG_LEVEL must be one of trace|debug|info|warn|error, got '{}'", log_level_raw))?;

        let booking_list_limit = match var("BOOKING_LIST_LIMIT") {
            Some(raw) => {
                let limit: i64 = raw
                    .parse()
                    .with_context(|| format!("BOOKING_LIST_LIMIT must be a valid number, got '{}'", raw))?;
                limit.clamp(1, MAX_BOOKING_LIST_LIMIT)
            }
            None => MAX_BOOKING_LIST_LIMIT,
        };

        Ok(Self {
            environment,
            host,
            port,
            storage,
            database_url,
            cors_origins,
            ping_message: var("PING_MESSAGE").unwrap_or_else(|| "ping".to_string()),
            log_level,
            booking_list_limit,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS abierto cuando no hay orígenes o se usa el comodín
    pub fn cors_is_permissive(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}
