use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::flow::Bridge;
use crate::http::proxy::ApiProxy;

mod endpoints;

use endpoints::{oauth::oauth_endpoint, proxy::proxy_endpoint};

use super::encoding::error::handle_reject;

#[derive(Debug)]
pub struct Server {
    bridge: Arc<Bridge>,
    proxy: Arc<ApiProxy>,
}

impl Server {
    pub fn new(bridge: Arc<Bridge>, proxy: Arc<ApiProxy>) -> Self {
        Self {
            bridge: Arc::clone(&bridge),
            proxy: Arc::clone(&proxy),
        }
    }

    pub fn routes(
        &self,
    ) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
    {
        let oauth = oauth_endpoint(self.bridge.clone());
        let proxy = proxy_endpoint(self.proxy.clone());

        oauth
            .or(proxy)
            .recover(handle_reject)
            .with(warp::log("http-api"))
    }

    pub async fn serve(self, addr: SocketAddr) -> Result<(), warp::Error> {
        let (bound, server) = warp::serve(self.routes()).try_bind_ephemeral(addr)?;
        event!(Level::INFO, addr = %bound, "Listening");

        server.await;
        Ok(())
    }
}
