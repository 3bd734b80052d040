use std::time::Duration;

/// Where and how the resolver talks to the structure database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Scheme and host of the database, without a trailing path.
    pub base_url: String,
    pub user_agent: String,
    /// Limit for each request, including redirects.
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://isomerdesign.com".to_string(),
            user_agent: concat!("psymol/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl ResolverConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Absolute URL of `path` on the configured host.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
