use std::sync::Arc;

use clap::Parser;
use tracing::{event, Level};

use kakehashi::flow::Bridge;
use kakehashi::http::proxy::ApiProxy;
use kakehashi::http::server::Server;
use kakehashi::provider::{self, GitHubProvider};
use kakehashi::registry::{ClientRegistry, EnvRegistry, FileRegistry};
use kakehashi::state::StateService;
use kakehashi::util::config::{init_tracing, ClientSource, Environment, Options, StartupError};

fn client_registry(options: &Options) -> Result<Arc<dyn ClientRegistry>, StartupError> {
    match options.client_source {
        ClientSource::File => {
            let path = options.config_file();
            let registry = FileRegistry::load(&path)?;
            event!(
                Level::INFO,
                path = %path.display(),
                clients = registry.entries().len(),
                "Loaded client configuration"
            );
            Ok(Arc::new(registry))
        }
        ClientSource::Env => {
            event!(Level::INFO, "Reading client configuration from the environment");
            Ok(Arc::new(EnvRegistry::new()))
        }
    }
}

async fn kakehashid(options: Options) -> Result<(), StartupError> {
    if options.secret.is_empty() {
        return Err(StartupError::EmptySecret);
    }
    if options.environment == Environment::Production {
        event!(Level::INFO, "Server is running on Production environment");
    }

    let registry = client_registry(&options)?;
    let http = provider::http_client(options.exchange_timeout())?;
    let github = Arc::new(GitHubProvider::new(http.clone(), options.endpoints()));
    let states = StateService::new(options.secret.clone(), options.state_ttl());
    let bridge = Arc::new(Bridge::new(registry, github, states));
    let proxy = ApiProxy::new(http, options.github_api_url.clone())
        .with_body_limit(options.proxy_body_limit);

    let _clean_up = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move { bridge.states().start_clean_up_worker().await })
    };

    let server = Server::new(bridge, Arc::new(proxy));
    server.serve(options.socket_addr()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let options = Options::parse();
    if let Err(e) = kakehashid(options).await {
        event!(Level::ERROR, error = %e, "kakehashid failed to start");
        std::process::exit(1);
    }
}
