use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

/// Command line flags. They take precedence over files and `APP_*` variables.
#[derive(Parser, Debug)]
#[command(author, version, about = "Image and file asset server", long_about = None)]
pub struct Cli {
    /// Serve requests from a pool of worker event loops instead of a single one
    #[arg(long)]
    pub prefork: bool,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub prefork: bool,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_image_root")]
    pub image_root: PathBuf,

    #[serde(default = "default_file_root")]
    pub file_root: PathBuf,

    #[serde(default = "default_placeholder")]
    pub placeholder: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Include raw I/O error text in the `debug` field of 500 responses.
    #[serde(default = "default_true")]
    pub expose_error_details: bool,

    /// Build upload URLs with the request scheme instead of plain `http`.
    #[serde(default)]
    pub derive_url_scheme: bool,

    /// Apply the sub-path whitelist to delete requests as well.
    #[serde(default = "default_true")]
    pub strict_delete_paths: bool,

    #[serde(default = "default_idempotency_ttl")]
    pub idempotency_ttl_secs: u64,

    #[serde(default)]
    pub log_json: bool,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "QAsset".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_image_root() -> PathBuf {
    PathBuf::from("storage/images")
}
fn default_file_root() -> PathBuf {
    PathBuf::from("storage/files")
}
fn default_placeholder() -> PathBuf {
    PathBuf::from("resources/asset/broken.webp")
}
fn default_max_upload_bytes() -> usize {
    4 * 1024 * 1024
}
fn default_true() -> bool {
    true
}
fn default_idempotency_ttl() -> u64 {
    30 * 60
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            host: default_host(),
            port: default_port(),
            prefork: false,
            worker_count: default_worker_count(),
            image_root: default_image_root(),
            file_root: default_file_root(),
            placeholder: default_placeholder(),
            max_upload_bytes: default_max_upload_bytes(),
            expose_error_details: true,
            derive_url_scheme: false,
            strict_delete_paths: true,
            idempotency_ttl_secs: default_idempotency_ttl(),
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            )
            .set_override_option("port", cli.port.map(i64::from))?;

        if cli.prefork {
            builder = builder.set_override("prefork", true)?;
        }

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.image_root.as_os_str().is_empty() || self.file_root.as_os_str().is_empty() {
            errors.push("storage roots cannot be empty");
        }
        if self.image_root == self.file_root {
            errors.push("IMAGE_ROOT and FILE_ROOT must differ");
        }
        if self.max_upload_bytes == 0 {
            errors.push("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.worker_count == 0 {
            errors.push("WORKER_COUNT must be greater than zero");
        }
        if self.idempotency_ttl_secs == 0 {
            errors.push("IDEMPOTENCY_TTL_SECS must be greater than zero");
        }

        if self.is_production() && self.expose_error_details {
            tracing::warn!("expose_error_details is enabled in production; I/O errors will reach clients");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Worker event loops for the HTTP server: the full pool under prefork, one otherwise.
    pub fn workers(&self) -> usize {
        if self.prefork { self.worker_count } else { 1 }
    }
}
