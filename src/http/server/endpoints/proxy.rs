use std::sync::Arc;

use tracing::{event, Level};
use warp::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::Tail;
use warp::reply::{Reply, Response};
use warp::Filter;

use crate::http::encoding;
use crate::http::proxy::ApiProxy;

const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

fn with_cors(mut response: Response, host: Option<String>) -> Response {
    let headers = response.headers_mut();
    if let Some(origin) = host.and_then(|h| HeaderValue::from_str(&h).ok()) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}

pub fn proxy_endpoint(
    proxy: Arc<ApiProxy>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let body_limit = proxy.body_limit();
    let with_proxy = warp::any().map(move || proxy.clone());

    let preflight = warp::options()
        .and(encoding::request_host())
        .map(|host| with_cors(StatusCode::OK.into_response(), host));

    let raw_query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    let forward = warp::method()
        .and(warp::path::tail())
        .and(raw_query)
        .and(warp::header::headers_cloned())
        .and(encoding::limited_body(body_limit))
        .and(encoding::request_host())
        .and(with_proxy)
        .and_then(
            |method: Method,
             tail: Tail,
             query: String,
             headers: HeaderMap,
             body: Bytes,
             host: Option<String>,
             proxy: Arc<ApiProxy>| async move {
                let query = Some(query.as_str()).filter(|q| !q.is_empty());
                let response = match proxy.forward(method, tail.as_str(), query, headers, body).await {
                    Ok(proxied) => {
                        let mut response = Response::new(proxied.body);
                        *response.status_mut() = proxied.status;
                        *response.headers_mut() = proxied.headers;
                        response
                    }
                    Err(e) => {
                        event!(Level::WARN, error = %e, "Proxied request failed");
                        warp::reply::with_status("Upstream request failed", StatusCode::BAD_GATEWAY)
                            .into_response()
                    }
                };
                Ok::<_, warp::Rejection>(with_cors(response, host))
            },
        );

    warp::path!("api" / "github" / ..).and(preflight.or(forward))
}
