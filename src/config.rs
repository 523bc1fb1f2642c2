//! Application configuration loaded from environment variables.

use std::env;

use secrecy::SecretString;

/// HTTP header carrying the original client address when behind a load balancer.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Default values for optional settings.
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const REGION: &str = "us-east-1";
}

/// Variables that must be present for the server to start, in reporting order.
const REQUIRED_VARS: [&str; 3] = ["ACCESS_KEY_ID", "SECRET_ACCESS_KEY", "S3_BUCKET_NAME"];

/// S3-compatible storage configuration.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Custom endpoint (MinIO, Huawei OBS, ...). `None` means AWS S3.
    pub endpoint: Option<String>,
    /// Bucket every request is served from
    pub bucket: String,
    /// Signing region
    pub region: String,
    /// Static access key ID
    pub access_key: String,
    /// Static secret access key
    pub secret_key: SecretString,
    /// Address the bucket as `endpoint/bucket` instead of `bucket.endpoint`
    pub force_path_style: bool,
    /// Talk plain HTTP to the custom endpoint
    pub disable_ssl: bool,
}

impl StorageSettings {
    /// Scheme used for the custom endpoint.
    pub fn scheme(&self) -> &'static str {
        if self.disable_ssl { "http" } else { "https" }
    }

    /// Custom endpoint with any `http://` or `https://` prefix removed.
    pub fn endpoint_host(&self) -> Option<&str> {
        self.endpoint.as_deref().map(|endpoint| {
            let endpoint = endpoint.strip_prefix("http://").unwrap_or(endpoint);
            endpoint.strip_prefix("https://").unwrap_or(endpoint)
        })
    }

    /// Endpoint URL handed to the S3 client.
    ///
    /// A configured scheme is kept as-is; a bare `host:port` gets the scheme
    /// implied by `S3_DISABLE_SSL`.
    pub fn endpoint_url(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?;
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            Some(endpoint.to_string())
        } else {
            Some(format!("{}://{}", self.scheme(), endpoint))
        }
    }

    /// Virtual-host style URL of an object, used in logs only.
    ///
    /// The URL assumes virtual-host addressing even when `force_path_style`
    /// is set; the actual fetch goes through the S3 client with bucket and key.
    pub fn object_url(&self, key: &str) -> String {
        match self.endpoint_host() {
            Some(host) => format!("{}://{}.{}/{}", self.scheme(), self.bucket, host, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of HTTP worker threads
    pub workers: usize,
    /// Storage backend configuration
    pub storage: StorageSettings,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `ACCESS_KEY_ID`: S3 access key ID - REQUIRED
    /// - `SECRET_ACCESS_KEY`: S3 secret access key - REQUIRED
    /// - `S3_BUCKET_NAME`: Bucket to serve from - REQUIRED
    /// - `S3_ENDPOINT`: Custom S3-compatible endpoint (default: AWS S3)
    /// - `REGION`: Region (falls back to `AWS_REGION`, then us-east-1)
    /// - `S3_FORCE_PATH_STYLE`: Path-style addressing (default: false)
    /// - `S3_DISABLE_SSL`: Plain HTTP to the endpoint (default: false)
    /// - `HOST`: Server host (default: 0.0.0.0)
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Worker threads (default: number of CPUs)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .into_iter()
            .filter(|name| var(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let port = match var("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue("PORT must be a valid port number"))?,
            None => defaults::PORT,
        };

        let workers = match var("WORKERS") {
            Some(value) => value
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or(ConfigError::InvalidValue("WORKERS must be a positive number"))?,
            None => num_cpus::get(),
        };

        let flag = |name: &str| var(name).is_some_and(|value| value == "true");

        let storage = StorageSettings {
            endpoint: var("S3_ENDPOINT"),
            bucket: var("S3_BUCKET_NAME").unwrap_or_default(),
            region: var("REGION")
                .or_else(|| var("AWS_REGION"))
                .unwrap_or_else(|| defaults::REGION.to_string()),
            access_key: var("ACCESS_KEY_ID").unwrap_or_default(),
            secret_key: SecretString::from(var("SECRET_ACCESS_KEY").unwrap_or_default()),
            force_path_style: flag("S3_FORCE_PATH_STYLE"),
            disable_ssl: flag("S3_DISABLE_SSL"),
        };

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            workers,
            storage,
        })
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<&'static str>),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),
}
