use tracing::{event, Level};
use url::Url;
use warp::http::{header, HeaderMap, Method, StatusCode};
use warp::hyper::body::{Body, Bytes};

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Upstream answer; the body is streamed through as it arrives.
#[derive(Debug)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

/// Passes requests through to the GitHub REST API.
#[derive(Debug, Clone)]
pub struct ApiProxy {
    http: reqwest::Client,
    base: Url,
    body_limit: u64,
}

impl ApiProxy {
    pub const DEFAULT_BODY_LIMIT: u64 = 10 * 1024 * 1024;

    pub fn new(http: reqwest::Client, base: Url) -> Self {
        Self {
            http,
            base,
            body_limit: Self::DEFAULT_BODY_LIMIT,
        }
    }

    /// Largest request body, in bytes, accepted for forwarding.
    pub fn with_body_limit(self, body_limit: u64) -> Self {
        Self { body_limit, ..self }
    }

    pub fn body_limit(&self) -> u64 {
        self.body_limit
    }

    pub fn target(&self, tail: &str, query: Option<&str>) -> Url {
        let mut url = self.base.clone();
        let path = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            tail.trim_start_matches('/')
        );
        url.set_path(&path);
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }

    #[tracing::instrument(skip(self, headers, body))]
    pub async fn forward(
        &self,
        method: Method,
        tail: &str,
        query: Option<&str>,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<ProxiedResponse, reqwest::Error> {
        let url = self.target(tail, query);
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        event!(Level::DEBUG, %url, "Proxying request");
        let response = self
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);
        headers.remove(header::CONTENT_LENGTH);

        Ok(ProxiedResponse {
            status,
            headers,
            body: Body::wrap_stream(response.bytes_stream()),
        })
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}
