use async_trait::async_trait;

use super::config::ResolverConfig;
use super::error::ResolveError;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport used by the resolver.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// GET that follows redirects.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ResolveError>;

    /// GET that reports a redirect as its 3xx response.
    ///
    /// Sources that never redirect can keep the default.
    async fn get_direct(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ResolveError> {
        self.get(url, query, headers).await
    }
}

/// [`HttpSource`] over shared `reqwest` clients.
#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: reqwest::Client,
    direct: reqwest::Client,
}

impl ReqwestSource {
    pub fn new(config: &ResolverConfig) -> Result<Self, ResolveError> {
        let builder = || {
            reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(config.timeout)
        };
        let client = builder().build().map_err(client_error)?;
        let direct = builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(client_error)?;
        Ok(Self { client, direct })
    }
}

fn client_error(e: reqwest::Error) -> ResolveError {
    ResolveError::Client(Box::new(e))
}

async fn send(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
    headers: &[(&str, &str)],
) -> Result<HttpResponse, ResolveError> {
    let transport = |e: reqwest::Error| ResolveError::Transport {
        url: url.to_string(),
        source: Box::new(e),
    };
    let mut request = client.get(url).query(query);
    for &(name, value) in headers {
        request = request.header(name, value);
    }
    let response = request.send().await.map_err(transport)?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport)?;
    Ok(HttpResponse { status, body })
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ResolveError> {
        send(&self.client, url, query, headers).await
    }

    async fn get_direct(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ResolveError> {
        send(&self.direct, url, query, headers).await
    }
}
