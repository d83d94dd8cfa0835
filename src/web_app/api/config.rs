// web_app/api/config.rs - Where the catalog REST backend lives
//
// Native binaries read CATALOG_API_URL from the environment (after dotenv).
// The browser build has no environment, so the value is baked in at compile time.

/// Default backend address used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Environment variable holding the backend address
pub const API_URL_VAR: &str = "CATALOG_API_URL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        ApiConfig {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Read the backend address from the process environment
    pub fn from_env() -> Self {
        match std::env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => ApiConfig::new(url),
            _ => ApiConfig::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path such as `/products/`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new(option_env!("CATALOG_API_URL").unwrap_or(DEFAULT_API_URL))
    }
}
