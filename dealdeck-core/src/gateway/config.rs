//! Gateway configuration
//!
//! Populated from command-line flags; nothing is read from disk or the
//! environment.

use serde::{Deserialize, Serialize};

use crate::error::{DealsError, Result};

/// Public CheapShark API root
pub const DEFAULT_API_BASE: &str = "https://www.cheapshark.com/api/1.0";

/// Settings for [`super::CheapSharkGateway`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// API root, without a trailing endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout; `None` keeps the transport default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_user_agent() -> String {
    concat!("dealdeck/", env!("CARGO_PKG_VERSION")).to_string()
}

impl GatewayConfig {
    /// Override the API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set a request timeout
    pub fn with_timeout_seconds(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(DealsError::Config(format!(
                "API base URL must start with http:// or https:// (got '{}')",
                self.api_base
            )));
        }

        if self.timeout_seconds == Some(0) {
            return Err(DealsError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}
