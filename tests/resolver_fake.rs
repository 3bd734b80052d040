use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use psymol::resolve::{HttpResponse, HttpSource, IdStrategy, NameSearch};
use psymol::{FailureKind, ResolveError, Resolver, ResolverConfig};

const BASE: &str = "https://isomerdesign.com";

#[derive(Debug, Clone, PartialEq)]
struct Request {
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

/// Canned responses keyed by URL; anything else is unreachable.
#[derive(Default)]
struct FakeSource {
    responses: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<Request>>,
}

impl FakeSource {
    fn with(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            format!("{BASE}{path}"),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSource for FakeSource {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ResolveError> {
        let owned = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        self.requests.lock().unwrap().push(Request {
            url: url.to_string(),
            query: owned(query),
            headers: owned(headers),
        });
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ResolveError::Transport {
                url: url.to_string(),
                source: "connection refused".into(),
            })
    }
}

fn page(name: &str, value: &str) -> String {
    format!(
        "<html><head><title>x</title>\n<script type=\"application/ld+json\">\n{{\"@type\": \"ChemicalSubstance\", \"hasRepresentation\": {{\"@type\": \"PropertyValue\", \"name\": \"{name}\", \"value\": \"{value}\"}}}}\n</script></head></html>"
    )
}

const MOLFILE: &str = "\n     RDKit          2D\n\n  2  1  0  0  0  0  0  0  0  0999 V2000\n    0.0000    0.0000    0.0000 C   0  0\n    1.5000    0.0000    0.0000 O   0  0\n  1  2  1  0\nM  END";

fn resolver(source: FakeSource) -> (Resolver, Arc<FakeSource>) {
    let source = Arc::new(source);
    let resolver = Resolver::with_source(ResolverConfig::default(), source.clone()).unwrap();
    (resolver, source)
}

#[tokio::test]
async fn name_search_takes_first_exact_match() {
    let (resolver, source) = resolver(
        FakeSource::default()
            .with(
                "/pihkal/lookup/json",
                200,
                r#"[{"name":"<b>Foo</b>","substance_id":1},{"name":"Foobar","substance_id":2}]"#,
            )
            .with("/pihkal/explore/1", 200, &page("molfile", "one"))
            .with("/pihkal/explore/2", 200, &page("molfile", "two")),
    );
    assert_eq!(resolver.resolve("foo").await.as_deref(), Some("one"));

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, format!("{BASE}/pihkal/lookup/json"));
    assert_eq!(requests[0].query, vec![("q".to_string(), "foo".to_string())]);
    assert_eq!(
        requests[0].headers,
        vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())]
    );
    assert_eq!(requests[1].url, format!("{BASE}/pihkal/explore/1"));
}

#[tokio::test]
async fn url_id_skips_the_search() {
    let (resolver, source) = resolver(
        FakeSource::default()
            .with("/pihkal/explore/42", 200, &page("molfile", "forty-two"))
            .with("/pihkal/explore/99", 200, &page("molfile", "ninety-nine")),
    );
    let molfile = resolver
        .resolve("https://isomerdesign.com/pihkal/explore/42?x=1&id=99")
        .await;
    assert_eq!(molfile.as_deref(), Some("ninety-nine"));
    assert_eq!(source.requests().len(), 1);

    assert_eq!(
        resolver
            .resolve("https://isomerdesign.com/pihkal/explore/42")
            .await
            .as_deref(),
        Some("forty-two")
    );
}

#[tokio::test]
async fn raw_control_characters_in_json_ld() {
    let (resolver, _) = resolver(
        FakeSource::default().with("/pihkal/explore/7", 200, &page("molfile", MOLFILE)),
    );
    let molfile = resolver
        .resolve("https://isomerdesign.com/pihkal/explore/7")
        .await
        .unwrap();
    assert_eq!(molfile, MOLFILE);
    assert!(psymol::read_molfile(&molfile).is_ok());
}

#[tokio::test]
async fn other_representations_resolve_to_nothing() {
    let (resolver, _) = resolver(
        FakeSource::default().with("/pihkal/explore/7", 200, &page("inchi", "InChI=1S/CH4/h1H4")),
    );
    assert_eq!(resolver.resolve("https://isomerdesign.com/pihkal/explore/7").await, None);
    let err = resolver
        .try_resolve("https://isomerdesign.com/pihkal/explore/7")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoMolfile));
}

#[tokio::test]
async fn failed_requests_resolve_to_nothing() {
    let (resolver, _) = resolver(
        FakeSource::default()
            .with("/pihkal/lookup/json", 503, "busy")
            .with("/pihkal/explore/8", 404, "gone"),
    );
    let err = resolver.try_resolve("foo").await.unwrap_err();
    assert!(matches!(err, ResolveError::Status { status: 503, .. }));
    assert_eq!(err.kind(), FailureKind::NotFound);

    let err = resolver
        .try_resolve("https://isomerdesign.com/pihkal/explore/8")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Status { status: 404, .. }));

    // nothing canned for this id: the transport fails
    assert_eq!(resolver.resolve("https://isomerdesign.com/pihkal/explore/9").await, None);
}

#[tokio::test]
async fn unknown_names_and_bad_bodies() {
    let (resolver, _) = resolver(
        FakeSource::default().with(
            "/pihkal/lookup/json",
            200,
            r#"[{"name":"Foobar","substance_id":2}]"#,
        ),
    );
    assert!(matches!(
        resolver.try_resolve("foo").await.unwrap_err(),
        ResolveError::NoMatch(name) if name == "foo"
    ));

    let (resolver, _) = resolver_with_body("<html>not json</html>");
    let err = resolver.try_resolve("foo").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Unparsable);
}

fn resolver_with_body(body: &str) -> (Resolver, Arc<FakeSource>) {
    resolver(FakeSource::default().with("/pihkal/lookup/json", 200, body))
}

#[tokio::test]
async fn page_without_json_ld() {
    let (resolver, _) = resolver(
        FakeSource::default().with(
            "/pihkal/explore/3",
            200,
            "<html><body>nothing here</body></html>",
        ),
    );
    let err = resolver
        .try_resolve("https://isomerdesign.com/pihkal/explore/3")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::MissingJsonLd));
    assert_eq!(err.kind(), FailureKind::Unparsable);
}

#[tokio::test]
async fn custom_strategy_order() {
    let (resolver, source) = resolver(
        FakeSource::default()
            .with(
                "/pihkal/lookup/json",
                200,
                r#"[{"name":"https://isomerdesign.com/pihkal/explore/5","substance_id":6}]"#,
            )
            .with("/pihkal/explore/6", 200, &page("molfile", "six")),
    );
    let strategies: Vec<Box<dyn IdStrategy>> = vec![Box::new(NameSearch::new().unwrap())];
    let resolver = resolver.with_strategies(strategies);
    assert_eq!(
        resolver
            .resolve("https://isomerdesign.com/pihkal/explore/5")
            .await
            .as_deref(),
        Some("six")
    );
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn resolved_molfile_renders() {
    let (resolver, _) = resolver(
        FakeSource::default().with("/pihkal/explore/7", 200, &page("molfile", MOLFILE)),
    );
    let molfile = resolver
        .resolve("https://isomerdesign.com/pihkal/explore/7")
        .await
        .unwrap();
    let image = psymol::Renderer::default()
        .render_from_molfile(&molfile, psymol::BackgroundColor::WHITE)
        .unwrap();
    assert_eq!(image.width(), 624);
}
