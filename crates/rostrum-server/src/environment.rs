//! Runtime environment detection.
//!
//! The server keys its behavior off a single `ENVIRONMENT` variable:
//! production disables hot reload and error detail in responses, and binds
//! to all interfaces by default. Staging and development share the
//! development behavior; staging exists so deployments can label
//! themselves without turning production hardening on.

use std::env;
use std::fmt;

/// Environment variable consulted for the runtime mode.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// The mode the server runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Local development, the default
    Development,
    /// Pre-production deployment
    Staging,
    /// Production deployment
    Production,
}

impl Mode {
    /// Read the mode from the environment.
    ///
    /// Anything other than `production` or `staging`, including an unset
    /// variable, is treated as development.
    pub fn detect() -> Self {
        match env_or_default(ENVIRONMENT_VAR, "development").as_str() {
            "production" => Mode::Production,
            "staging" => Mode::Staging,
            _ => Mode::Development,
        }
    }

    /// True only in production.
    pub fn is_production(self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Development => "development",
            Mode::Staging => "staging",
            Mode::Production => "production",
        };
        f.write_str(name)
    }
}

/// Read an environment variable, falling back to a default when it is
/// unset or not valid unicode.
pub fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
