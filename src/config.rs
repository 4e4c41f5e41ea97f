//! Layered configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `HEALTHSNAP_`-prefixed environment variables (nested keys separated by
//! `__`, e.g. `HEALTHSNAP_UPLOAD__ENDPOINT`).
//!
//! ```toml
//! [catalog]
//! lookback_days = 30
//! granularity = "day"
//!
//! [collector]
//! query_timeout_secs = 10
//!
//! [upload]
//! endpoint = "https://records.example.com/api"
//! timeout_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use healthsnap_types::CatalogSettings;
use serde::Deserialize;

const DEFAULTS: &str = r#"
[catalog]
lookback_days = 30
granularity = "day"

[collector]
query_timeout_secs = 10

[upload]
endpoint = "http://localhost:8080"
timeout_secs = 10
"#;

/// Everything the driver can be configured with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub collector: CollectorSettings,
    pub upload: UploadSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectorSettings {
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadSettings {
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Settings {
    /// Load settings, reading `path` if given.
    ///
    /// A missing file is an error; omit the path to run on defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.collector.query_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload.timeout_secs)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("HEALTHSNAP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            collector: CollectorSettings {
                query_timeout_secs: 10,
            },
            upload: UploadSettings {
                endpoint: "http://localhost:8080".to_string(),
                timeout_secs: 10,
            },
        }
    }
}
