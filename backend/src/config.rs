use shared::ClientConfig;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const CONTAINER_FRONTEND_DIR: &str = "/usr/src/app/frontend/dist";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("Invalid UPSCALER_UPSTREAM_URL: {0}")]
    InvalidUpstream(#[from] url::ParseError),
    #[error("Unsupported upstream scheme: {0}")]
    UnsupportedScheme(String),
}

/// Host settings read from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub bind_host: String,
    pub frontend_dir: String,
    /// Base URL the browser uses for the upscaling service; empty means same origin.
    pub api_host: String,
    pub upstream: Option<Url>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup("PORT")) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let bind_host = non_empty(lookup("BIND_HOST")).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let frontend_dir = non_empty(lookup("FRONTEND_DIR")).unwrap_or_else(|| {
            match lookup("CARGO_MANIFEST_DIR") {
                Some(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
                None => CONTAINER_FRONTEND_DIR.to_string(),
            }
        });

        let api_host = lookup("UPSCALER_API_HOST")
            .map(|host| host.trim().to_string())
            .unwrap_or_default();

        let upstream = match non_empty(lookup("UPSCALER_UPSTREAM_URL")) {
            Some(raw) => {
                let url = Url::parse(&raw)?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
                }
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            port,
            bind_host,
            frontend_dir,
            api_host,
            upstream,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.api_host.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
