pub mod error;
pub mod reply;

use warp::http::Method;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection};

use self::error::{BodyRejection, FlowRejection};
use crate::flow::FlowError;

/// Rejects requests made with any other method as a bad request.
pub fn only(method: Method) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::method()
        .and_then(move |actual: Method| {
            let expected = method.clone();
            async move {
                if actual == expected {
                    Ok(())
                } else {
                    Err(warp::reject::custom(FlowRejection(
                        FlowError::MethodNotAllowed(actual.to_string()),
                    )))
                }
            }
        })
        .untuple_one()
}

/// The full request body, refused before reading if it declares more than
/// `limit` bytes or is sent chunked without a length.
pub fn limited_body(limit: u64) -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::header::optional::<u64>("content-length")
        .and(warp::header::optional::<String>("transfer-encoding"))
        .and_then(move |length: Option<u64>, chunked: Option<String>| async move {
            match (length, chunked) {
                (Some(length), _) if length > limit => {
                    Err(warp::reject::custom(BodyRejection::TooLarge(limit)))
                }
                (None, Some(_)) => Err(warp::reject::custom(BodyRejection::LengthRequired)),
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::bytes())
}

/// Hostname from the `Host` header, without the port.
pub fn request_host() -> impl Filter<Extract = (Option<String>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("host").map(|host: Option<String>| host.map(|h| hostname(&h)))
}

fn hostname(host: &str) -> String {
    if host.starts_with('[') {
        match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host.to_string(),
        }
    } else {
        host.split(':').next().unwrap_or(host).to_string()
    }
}
