use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use iam_graph_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::editor_sessions::DEFAULT_IDLE_TTL;

/// Where assignments and entities are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IamBackendConfig {
    /// Process-local store, optionally seeded with demo data.
    Memory { seed_demo_data: bool },
    /// Remote IAM backend REST endpoints.
    Http {
        base_url: Url,
        timeout: Duration,
        max_attempts: u8,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub iam_backend: IamBackendConfig,
    pub editor_session_idle_ttl: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", lookup("API_PORT"), 3001_u16)?;
        let editor_session_idle_ttl = Duration::from_secs(parse_or(
            "EDITOR_SESSION_IDLE_SECS",
            lookup("EDITOR_SESSION_IDLE_SECS"),
            DEFAULT_IDLE_TTL.as_secs(),
        )?);

        let iam_backend = match lookup("IAM_BACKEND")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => IamBackendConfig::Memory {
                seed_demo_data: lookup("DEV_SEED")
                    .unwrap_or_else(|| "false".to_owned())
                    .eq_ignore_ascii_case("true"),
            },
            "http" => {
                let raw_url = lookup("IAM_BACKEND_URL")
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(
                            "IAM_BACKEND_URL is required when IAM_BACKEND is 'http'".to_owned(),
                        )
                    })?;
                let base_url = Url::parse(raw_url.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid IAM_BACKEND_URL: {error}"))
                })?;
                let timeout_ms = parse_or(
                    "IAM_BACKEND_TIMEOUT_MS",
                    lookup("IAM_BACKEND_TIMEOUT_MS"),
                    10_000_u64,
                )?;
                let max_attempts = parse_or(
                    "IAM_BACKEND_MAX_ATTEMPTS",
                    lookup("IAM_BACKEND_MAX_ATTEMPTS"),
                    1_u8,
                )?;
                if max_attempts == 0 {
                    return Err(AppError::Validation(
                        "IAM_BACKEND_MAX_ATTEMPTS must be at least 1".to_owned(),
                    ));
                }

                IamBackendConfig::Http {
                    base_url,
                    timeout: Duration::from_millis(timeout_ms),
                    max_attempts,
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "IAM_BACKEND must be either 'memory' or 'http', got '{other}'"
                )));
            }
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            iam_backend,
            editor_session_idle_ttl,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
    }
}
