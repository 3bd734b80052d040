//! Resolve a substance name or database URL to a molfile.
//!
//! The identifier is first matched against known URL shapes; failing that, it
//! is looked up by exact name. The id found is used to fetch the substance
//! page, whose JSON-LD block carries the molfile.

mod config;
mod error;
mod http;
mod jsonld;
mod strategy;

use std::sync::Arc;

use tracing::{debug, trace};

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use http::{HttpResponse, HttpSource, ReqwestSource};
pub use jsonld::{parse_lenient, MolfilePage};
pub use strategy::{IdStrategy, NameSearch, RemoteStructureId, UrlPattern};

/// Turns identifiers into molfiles using one remote database.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Resolver {
    config: ResolverConfig,
    http: Arc<dyn HttpSource>,
    strategies: Vec<Box<dyn IdStrategy>>,
    page: MolfilePage,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("strategies", &names)
            .finish()
    }
}

impl Resolver {
    /// Resolver that talks HTTP through `reqwest`.
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        let http = ReqwestSource::new(&config)?;
        Self::with_source(config, Arc::new(http))
    }

    /// Resolver over any transport, with the default strategies: URL
    /// extraction, then name search.
    pub fn with_source(
        config: ResolverConfig,
        http: Arc<dyn HttpSource>,
    ) -> Result<Self, ResolveError> {
        let strategies: Vec<Box<dyn IdStrategy>> =
            vec![Box::new(UrlPattern::new()?), Box::new(NameSearch::new()?)];
        Ok(Self {
            config,
            http,
            strategies,
            page: MolfilePage::new()?,
        })
    }

    /// Replace the id strategies, tried in the given order.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn IdStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Molfile for `identifier`, or `None` if any step fails.
    pub async fn resolve(&self, identifier: &str) -> Option<String> {
        match self.try_resolve(identifier).await {
            Ok(molfile) => Some(molfile),
            Err(e) => {
                debug!(identifier, kind = %e.kind(), error = %e, "no molfile resolved");
                None
            }
        }
    }

    pub async fn try_resolve(&self, identifier: &str) -> Result<String, ResolveError> {
        let id = self.find_id(identifier).await?;
        self.fetch_molfile(&id).await
    }

    /// First id any strategy produces.
    ///
    /// A strategy that errors does not stop later ones; if none finds an id,
    /// the last error is returned.
    pub async fn find_id(&self, identifier: &str) -> Result<RemoteStructureId, ResolveError> {
        let mut last_error = None;
        for strategy in &self.strategies {
            match strategy.find_id(identifier, self.http.as_ref(), &self.config).await {
                Ok(Some(id)) => {
                    trace!(identifier, strategy = strategy.name(), %id, "id found");
                    return Ok(id);
                }
                Ok(None) => trace!(identifier, strategy = strategy.name(), "no id"),
                Err(e) => {
                    trace!(identifier, strategy = strategy.name(), error = %e, "strategy failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| ResolveError::NoMatch(identifier.to_string())))
    }

    /// Fetch the substance page for `id` and pull out its molfile.
    pub async fn fetch_molfile(&self, id: &RemoteStructureId) -> Result<String, ResolveError> {
        let url = self.config.endpoint(&format!("/pihkal/explore/{id}"));
        let response = self.http.get(&url, &[], &[]).await?;
        if response.status != 200 {
            return Err(ResolveError::Status {
                url,
                status: response.status,
            });
        }
        self.page.molfile(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
    }

    #[test]
    fn default_strategy_order() {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        assert!(format!("{resolver:?}").contains(r#"strategies: ["url", "search"]"#));
    }
}
