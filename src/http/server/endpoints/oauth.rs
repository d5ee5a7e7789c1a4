use std::sync::Arc;

use warp::http::Method;
use warp::Filter;

use crate::flow::{Bridge, CallbackRequest, LoginRequest};
use crate::http::encoding::{self, reply};

pub fn oauth_endpoint(
    bridge: Arc<Bridge>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_bridge = warp::any().map(move || bridge.clone());

    let login = warp::path!("login")
        .and(encoding::only(Method::GET))
        .and(with_bridge.clone())
        .and(warp::query::<LoginRequest>())
        .and_then(|bridge: Arc<Bridge>, req| async move { reply::reply(bridge.login(req)) });

    // Either a redirect back to the client or a direct error
    let callback = warp::path!("auth" / "callback")
        .and(with_bridge.clone())
        .and(warp::query::<CallbackRequest>())
        .and_then(|bridge: Arc<Bridge>, req| async move {
            reply::reply(bridge.callback(req).await)
        });

    login.or(callback)
}
