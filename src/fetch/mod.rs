// src/fetch/mod.rs

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// The unparsed body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(String);

impl RawDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RawDocument {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawDocument {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Why a fetch did not yield a document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed as an absolute URL.
    #[error("invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No response was received, or the body could not be read.
    #[error("GET {url} failed")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived with a non-2xx status. `StatusCode` displays as
    /// `404 Not Found`.
    #[error("GET {url} returned {status}")]
    HttpStatus { url: Url, status: StatusCode },
}

impl FetchError {
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network { .. })
    }

    /// The HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The fetch capability handed to a page load.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawDocument, FetchError>>;
}

/// `Fetcher` backed by a shared `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client with an optional whole-request timeout. `None` leaves
    /// timing out to the transport.
    pub fn with_timeout(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RawDocument, FetchError>> {
        Box::pin(fetch_url(&self.client, url))
    }
}

/// Parse `url` and fetch it. See [`fetch_url`].
pub async fn fetch_data(client: &Client, url: &str) -> Result<RawDocument, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    fetch_url(client, &parsed).await
}

/// Single GET with no headers, body or query of our own. Only a 2xx
/// response yields a document; there is no retry.
#[instrument(level = "debug", skip_all, fields(url = %url))]
pub async fn fetch_url(client: &Client, url: &Url) -> Result<RawDocument, FetchError> {
    debug!("fetching");
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.clone(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.clone(),
            status,
        });
    }

    let text = resp.text().await.map_err(|source| FetchError::Network {
        url: url.clone(),
        source,
    })?;
    debug!(%status, bytes = text.len(), "fetched");
    Ok(RawDocument(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use tracing_subscriber::{fmt, EnvFilter};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    }

    /// A localhost URL nothing is listening on.
    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/recipes.csv", port)
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("name,price\napple,1\n"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/recipes.csv", server.uri());
        let doc = fetch_data(&Client::new(), &url).await.unwrap();
        assert_eq!(doc.as_str(), "name,price\napple,1\n");
    }

    #[tokio::test]
    async fn test_fetch_sends_no_encoding_or_extra_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a"))
            .mount(&server)
            .await;

        fetch_data(&Client::new(), &server.uri()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let headers = &requests[0].headers;
        assert!(headers.get("accept-encoding").is_none(), "{:?}", headers);
        assert!(headers.get("authorization").is_none());
        assert!(headers.get("cookie").is_none());
        assert!(requests[0].body.is_empty());
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_fetch_404_is_status_error_without_retry() {
        init_logging();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/recipes.csv", server.uri());
        let err = fetch_data(&Client::new(), &url).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_network());
        let msg = err.to_string();
        assert!(msg.contains("404"), "{}", msg);
        assert!(msg.contains("Not Found"), "{}", msg);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_not_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetch_data(&Client::new(), &server.uri()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        init_logging();
        let err = fetch_data(&Client::new(), &closed_port_url())
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert_eq!(err.status(), None);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_fetch_rejects_relative_url() {
        let err = fetch_data(&Client::new(), "recipes.csv").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_http_fetcher_through_trait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a,b"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_timeout(Some(Duration::from_secs(5))).unwrap();
        let url = Url::parse(&format!("{}/data.csv", server.uri())).unwrap();
        let doc = fetcher.fetch(&url).await.unwrap();
        assert_eq!(doc, RawDocument::from("a,b"));
    }
}
