//! Server configuration loading and validation.
//!
//! Configuration merges three layers, lowest precedence first: built-in
//! defaults, an optional `rostrum.toml` file, and `ROSTRUM_`-prefixed
//! environment variables. The handful of command line flags override all
//! three.

use crate::cli::Cli;
use crate::environment::Mode;
use crate::error::{Result, ServerError};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Config file searched in the working directory when `--config` is not
/// given.
pub const CONFIG_FILE: &str = "rostrum.toml";

/// Server bundle artifact name inside the artifacts directory.
pub const SERVER_BUNDLE: &str = "server-bundle.json";

/// Client manifest artifact name inside the artifacts directory.
pub const CLIENT_MANIFEST: &str = "client-manifest.json";

/// Complete server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind. Unset means loopback outside production and all
    /// interfaces in production.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: u16,
    /// Document title for rendered pages.
    pub title: String,
    /// Page template path.
    pub template: PathBuf,
    /// Directory the compilers write artifacts into.
    pub artifacts: PathBuf,
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
    /// Debounce window for template watching, in milliseconds.
    pub debounce_ms: u64,
    /// Command that runs the server compiler in watch mode.
    pub server_compiler: Option<Vec<String>>,
    /// Command that runs the client compiler in watch mode.
    pub client_compiler: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 8080,
            title: "rostrum".to_string(),
            template: PathBuf::from("templates/main.html"),
            artifacts: PathBuf::from("dist"),
            public_dir: PathBuf::from("public"),
            debounce_ms: 100,
            server_compiler: None,
            client_compiler: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration, merging defaults, the config file, environment
    /// variables and command line overrides.
    ///
    /// A missing default config file is fine; a missing file passed via
    /// `--config` is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if cli.config.is_some() && !file.is_file() {
            return Err(ServerError::FileNotFound(file));
        }

        let mut config: ServerConfig = Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed("ROSTRUM_"))
            .extract()?;

        if let Some(host) = cli.host {
            config.host = Some(host);
        }
        if let Some(port) = cli.port {
            config.port = port;
        }

        Ok(config)
    }

    /// Check the inputs the server cannot start without.
    pub fn validate(&self) -> Result<()> {
        if !self.template.is_file() {
            return Err(ServerError::InvalidConfig {
                field: "template".to_string(),
                value: self.template.display().to_string(),
                hint: "point `template` at the page template file".to_string(),
            });
        }
        if !self.artifacts.is_dir() {
            return Err(ServerError::InvalidConfig {
                field: "artifacts".to_string(),
                value: self.artifacts.display().to_string(),
                hint: "run the compilers once or point `artifacts` at their output directory"
                    .to_string(),
            });
        }
        if self.debounce_ms == 0 {
            return Err(ServerError::InvalidConfig {
                field: "debounce_ms".to_string(),
                value: "0".to_string(),
                hint: "use a small positive window, e.g. 100".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address to bind for the given mode.
    pub fn addr(&self, mode: Mode) -> SocketAddr {
        let host = self.host.unwrap_or_else(|| {
            if mode.is_production() {
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            } else {
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            }
        });
        SocketAddr::new(host, self.port)
    }

    /// Path of the server bundle artifact.
    pub fn bundle_path(&self) -> PathBuf {
        self.artifacts.join(SERVER_BUNDLE)
    }

    /// Path of the client manifest artifact.
    pub fn manifest_path(&self) -> PathBuf {
        self.artifacts.join(CLIENT_MANIFEST)
    }
}
