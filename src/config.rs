//! Configuration management for PDF Share Server

use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Default request body cap for uploads: 25 MiB
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Base URL used to build retrieval links; defaults to `{endpoint}/{bucket}`
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Memory,
    Minio,
    R2,
    S3,
    B2,
}

impl StorageProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(StorageProvider::Memory),
            "minio" => Some(StorageProvider::Minio),
            "r2" => Some(StorageProvider::R2),
            "s3" => Some(StorageProvider::S3),
            "b2" => Some(StorageProvider::B2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// HTTP mail relay endpoint; log-only delivery when unset
    pub relay_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    /// Frontend origin that serves `/shared/{token}`
    pub public_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            },
            storage: StorageConfig {
                provider: StorageProvider::Memory,
                endpoint: "http://localhost:9000".to_string(),
                bucket: "pdfs".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                region: Some("us-east-1".to_string()),
                public_url: None,
            },
            database: DatabaseConfig {
                url: "sqlite:./pdfshare.db".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "development-secret".to_string(),
            },
            mail: MailConfig {
                relay_url: None,
                api_key: None,
                from: "no-reply@localhost".to_string(),
            },
            share: ShareConfig {
                public_base_url: "http://localhost:5173".to_string(),
            },
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_raw = var_or("STORAGE_PROVIDER", "minio");
        let provider = StorageProvider::parse(&provider_raw).ok_or(ConfigError::Invalid {
            name: "STORAGE_PROVIDER",
            value: provider_raw.clone(),
        })?;

        // S3 credentials are only needed when bytes leave the process
        let s3_var = |name: &'static str| -> Result<String, ConfigError> {
            if provider == StorageProvider::Memory {
                Ok(env::var(name).unwrap_or_default())
            } else {
                non_empty(name).ok_or(ConfigError::Missing(name))
            }
        };

        let port_raw = var_or("SERVER_PORT", "3000");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "SERVER_PORT",
            value: port_raw.clone(),
        })?;

        let upload_raw = var_or("UPLOAD_MAX_BYTES", &DEFAULT_UPLOAD_MAX_BYTES.to_string());
        let upload_max_bytes = upload_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "UPLOAD_MAX_BYTES",
            value: upload_raw.clone(),
        })?;

        Ok(Config {
            server: ServerConfig {
                host: var_or("SERVER_HOST", "0.0.0.0"),
                port,
                upload_max_bytes,
            },
            storage: StorageConfig {
                provider,
                endpoint: s3_var("S3_ENDPOINT")?,
                bucket: s3_var("S3_BUCKET")?,
                access_key: s3_var("S3_ACCESS_KEY")?,
                secret_key: s3_var("S3_SECRET_KEY")?,
                region: non_empty("S3_REGION"),
                public_url: non_empty("S3_PUBLIC_URL"),
            },
            database: DatabaseConfig {
                url: var_or("DATABASE_URL", "sqlite:./pdfshare.db"),
            },
            auth: AuthConfig {
                jwt_secret: non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            },
            mail: MailConfig {
                relay_url: non_empty("MAIL_RELAY_URL"),
                api_key: non_empty("MAIL_API_KEY"),
                from: var_or("MAIL_FROM", "no-reply@localhost"),
            },
            share: ShareConfig {
                public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:5173")
                    .trim_end_matches('/')
                    .to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_provider_parse() {
        assert_eq!(StorageProvider::parse("memory"), Some(StorageProvider::Memory));
        assert_eq!(StorageProvider::parse(" R2 "), Some(StorageProvider::R2));
        assert_eq!(StorageProvider::parse("ftp"), None);
    }

    #[test]
    fn test_default_uses_memory_store() {
        let config = Config::default();
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert!(config.mail.relay_url.is_none());
        assert_eq!(config.server.upload_max_bytes, DEFAULT_UPLOAD_MAX_BYTES);
    }
}
