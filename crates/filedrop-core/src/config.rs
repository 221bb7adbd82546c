//! Configuration module
//!
//! The whole process is configured from the environment exactly once at
//! startup; the resulting [`Config`] is immutable and injected by reference
//! into every component. There are no ambient globals.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::validation::SizeLimits;

const DEFAULT_PORT: u16 = 8443;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_SSL_DIR: &str = "ssl";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 86_400;

const SECONDS_PER_DAY: u64 = 86_400;

/// How a successful upload receipt is rendered to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptFormat {
    /// Response body is the public URL as a bare string.
    BareUrl,
    /// Response body is a Discord-style `{attachments: [{url, proxy_url}]}` object.
    AttachmentJson,
}

/// Application configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Main domain the service answers on; other hosts are redirected.
    pub domain: String,
    pub server_port: u16,
    /// Flat directory holding every stored file.
    pub upload_dir: PathBuf,
    /// Directory containing `key.pem`, `cert.pem` and optional `chain.pem`.
    pub ssl_dir: PathBuf,
    /// Allowed extensions with leading dot; empty means unrestricted.
    pub allowed_extensions: Vec<String>,
    pub size_limits: SizeLimits,
    /// Files older than this many days are deleted. `None` disables retention.
    pub retention_days: Option<u64>,
    pub sweep_interval: Duration,
    pub receipt_format: ReceiptFormat,
    /// Cache-Control max-age for served files, in seconds.
    pub cache_time_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let domain = env::var("DOMAIN")
            .map_err(|_| anyhow::anyhow!("DOMAIN must be set to the serving domain name"))?;

        let allowed_extensions: Vec<String> = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let size_limits = SizeLimits {
            image: parse_optional_u64("MAX_FILE_SIZE_IMAGE"),
            video: parse_optional_u64("MAX_FILE_SIZE_VIDEO"),
            audio: parse_optional_u64("MAX_FILE_SIZE_AUDIO"),
            default: parse_optional_u64("MAX_FILE_SIZE_DEFAULT"),
        };

        // 0 or unparseable means disabled, matching the unset case.
        let retention_days = parse_optional_u64("EXPIRATION_DAYS").filter(|&d| d > 0);

        let config = Config {
            domain,
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?,
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            ssl_dir: PathBuf::from(
                env::var("SSL_DIR").unwrap_or_else(|_| DEFAULT_SSL_DIR.to_string()),
            ),
            allowed_extensions,
            size_limits,
            retention_days,
            sweep_interval: Duration::from_secs(
                env::var("RETENTION_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            ),
            receipt_format: if env::var("DISCORD_SCHEMA")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false)
            {
                ReceiptFormat::AttachmentJson
            } else {
                ReceiptFormat::BareUrl
            },
            cache_time_secs: env::var("CACHE_TIME")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.domain.trim().is_empty() {
            return Err(anyhow::anyhow!("DOMAIN must not be empty"));
        }
        if self.domain == "test.com" {
            return Err(anyhow::anyhow!(
                "DOMAIN is still the placeholder 'test.com'; set it to your domain"
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(anyhow::anyhow!(
                "RETENTION_SWEEP_INTERVAL_SECS must be greater than zero"
            ));
        }
        Ok(())
    }

    /// Base URL stored files are served under.
    pub fn public_base_url(&self) -> String {
        format!("https://{}:{}", self.domain, self.server_port)
    }

    /// Retention window, when retention is enabled.
    pub fn retention_window(&self) -> Option<Duration> {
        self.retention_days
            .map(|days| Duration::from_secs(days * SECONDS_PER_DAY))
    }

    pub fn tls_key_path(&self) -> PathBuf {
        self.ssl_dir.join("key.pem")
    }

    pub fn tls_cert_path(&self) -> PathBuf {
        self.ssl_dir.join("cert.pem")
    }

    /// Optional CA chain appended to the certificate when present.
    pub fn tls_chain_path(&self) -> PathBuf {
        self.ssl_dir.join("chain.pem")
    }
}

fn parse_optional_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
