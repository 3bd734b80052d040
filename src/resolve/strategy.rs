//! Ways of turning an identifier into a database id.

use std::fmt;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tracing::trace;

use super::config::ResolverConfig;
use super::error::ResolveError;
use super::http::HttpSource;

/// Substance id understood by the structure database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteStructureId(pub String);

impl fmt::Display for RemoteStructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of the id lookup. `Ok(None)` passes to the next strategy.
#[async_trait]
pub trait IdStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn find_id(
        &self,
        identifier: &str,
        http: &dyn HttpSource,
        config: &ResolverConfig,
    ) -> Result<Option<RemoteStructureId>, ResolveError>;
}

/// Reads the id straight out of a database URL.
///
/// `...id=<digits>` anywhere after the host wins over the
/// `/pihkal/explore/<digits>` path.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    patterns: [Regex; 2],
}

impl UrlPattern {
    pub fn new() -> Result<Self, ResolveError> {
        Ok(Self {
            patterns: [
                Regex::new(r"isomerdesign\.com.*?id=(\d+)")?,
                Regex::new(r"isomerdesign\.com/pihkal/explore/(\d+)")?,
            ],
        })
    }

    pub fn extract(&self, identifier: &str) -> Option<RemoteStructureId> {
        self.patterns.iter().find_map(|pattern| {
            pattern
                .captures(identifier)
                .and_then(|c| c.get(1))
                .map(|m| RemoteStructureId(m.as_str().to_string()))
        })
    }
}

#[async_trait]
impl IdStrategy for UrlPattern {
    fn name(&self) -> &'static str {
        "url"
    }

    async fn find_id(
        &self,
        identifier: &str,
        _http: &dyn HttpSource,
        _config: &ResolverConfig,
    ) -> Result<Option<RemoteStructureId>, ResolveError> {
        Ok(self.extract(identifier))
    }
}

/// Asks the database's lookup endpoint and takes the first exact name match.
#[derive(Debug, Clone)]
pub struct NameSearch {
    markup: Regex,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    name: String,
    #[serde(default)]
    substance_id: Option<SubstanceId>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubstanceId {
    Number(serde_json::Number),
    Text(String),
}

impl From<SubstanceId> for RemoteStructureId {
    fn from(id: SubstanceId) -> Self {
        match id {
            SubstanceId::Number(n) => Self(n.to_string()),
            SubstanceId::Text(s) => Self(s),
        }
    }
}

pub(crate) const SEARCH_PATH: &str = "/pihkal/lookup/json";

impl NameSearch {
    pub fn new() -> Result<Self, ResolveError> {
        Ok(Self {
            markup: Regex::new(r"</?b>")?,
        })
    }

    /// Id of the first hit whose name, without bold markup, equals
    /// `identifier` ignoring case.
    pub fn pick(
        &self,
        identifier: &str,
        body: &str,
    ) -> Result<Option<RemoteStructureId>, ResolveError> {
        let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(ResolveError::SearchBody)?;
        let wanted = identifier.to_lowercase();
        Ok(hits
            .into_iter()
            .filter(|hit| self.markup.replace_all(&hit.name, "").to_lowercase() == wanted)
            .find_map(|hit| hit.substance_id)
            .map(RemoteStructureId::from))
    }
}

#[async_trait]
impl IdStrategy for NameSearch {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn find_id(
        &self,
        identifier: &str,
        http: &dyn HttpSource,
        config: &ResolverConfig,
    ) -> Result<Option<RemoteStructureId>, ResolveError> {
        let url = config.endpoint(SEARCH_PATH);
        let response = http
            .get_direct(&url, &[("q", identifier)], &[("X-Requested-With", "XMLHttpRequest")])
            .await?;
        if response.status != 200 {
            return Err(ResolveError::Status {
                url,
                status: response.status,
            });
        }
        let id = self.pick(identifier, &response.body)?;
        trace!(identifier, hit = ?id, "name search finished");
        Ok(id)
    }
}
