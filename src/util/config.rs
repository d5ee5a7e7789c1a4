use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::provider::github::{self, GitHubEndpoints};
use crate::registry::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn default_config_file(&self) -> PathBuf {
        match self {
            Self::Development => PathBuf::from("./config.dev.json"),
            Self::Production => PathBuf::from("./config.prod.json"),
        }
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    /// Anything but `PROD` is development.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("prod") {
            Ok(Self::Production)
        } else {
            Ok(Self::Development)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSource {
    File,
    Env,
}

impl FromStr for ClientSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "env" => Ok(Self::Env),
            other => Err(format!("unknown client source `{}`, expected `file` or `env`", other)),
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "kakehashid",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    /// Secret the state tokens are encrypted with
    #[clap(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,
    #[clap(long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: IpAddr,
    #[clap(long, env = "PORT", default_value = "8080")]
    pub port: u16,
    /// `PROD` for production, anything else for development
    #[clap(long = "env", env = "ENV", default_value = "dev")]
    pub environment: Environment,
    /// Where client credentials come from: `file` or `env`
    #[clap(long, env = "CLIENT_SOURCE", default_value = "file")]
    pub client_source: ClientSource,
    /// Defaults to ./config.prod.json or ./config.dev.json depending on ENV
    #[clap(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,
    #[clap(long, env = "STATE_TTL_SECS", default_value = "600")]
    pub state_ttl_secs: u64,
    #[clap(long, env = "EXCHANGE_TIMEOUT_SECS", default_value = "10")]
    pub exchange_timeout_secs: u64,
    #[clap(long, env = "GITHUB_AUTHORIZE_URL", default_value = github::AUTHORIZE_URL)]
    pub github_authorize_url: Url,
    #[clap(long, env = "GITHUB_TOKEN_URL", default_value = github::TOKEN_URL)]
    pub github_token_url: Url,
    #[clap(long, env = "GITHUB_API_URL", default_value = github::API_URL)]
    pub github_api_url: Url,
    /// Largest request body the API proxy forwards, in bytes
    #[clap(long, env = "PROXY_BODY_LIMIT", default_value = "10485760")]
    pub proxy_body_limit: u64,
}

impl Options {
    pub fn config_file(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.environment.default_config_file())
    }

    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_secs)
    }

    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange_timeout_secs)
    }

    pub fn endpoints(&self) -> GitHubEndpoints {
        GitHubEndpoints {
            authorize_url: self.github_authorize_url.clone(),
            token_url: self.github_token_url.clone(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("SECRET must not be empty")]
    EmptySecret,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to bind server: {0}")]
    Bind(#[from] warp::Error),
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        let mut argv = vec!["kakehashid"];
        argv.extend_from_slice(args);
        Options::try_parse_from(argv).unwrap()
    }

    #[test]
    fn environment_selects_config_file() {
        let options = parse(&["--secret", "s", "--env", "PROD"]);
        assert_eq!(options.environment, Environment::Production);
        assert_eq!(options.config_file(), PathBuf::from("./config.prod.json"));

        let options = parse(&["--secret", "s", "--env", "staging"]);
        assert_eq!(options.environment, Environment::Development);
        assert_eq!(options.config_file(), PathBuf::from("./config.dev.json"));

        let options = parse(&["--secret", "s", "--config-file", "/etc/clients.json"]);
        assert_eq!(options.config_file(), PathBuf::from("/etc/clients.json"));
    }

    #[test]
    fn defaults_point_at_github() {
        let options = parse(&["--secret", "s"]);
        assert_eq!(options.client_source, ClientSource::File);
        assert_eq!(options.state_ttl(), Duration::from_secs(600));
        assert_eq!(options.exchange_timeout(), Duration::from_secs(10));
        assert_eq!(options.endpoints().token_url.as_str(), github::TOKEN_URL);
        assert_eq!(options.github_api_url.as_str(), "https://api.github.com/");
        assert_eq!(
            options.proxy_body_limit,
            crate::http::proxy::ApiProxy::DEFAULT_BODY_LIMIT
        );
    }

    #[test]
    fn client_source_is_validated() {
        assert_eq!("ENV".parse::<ClientSource>(), Ok(ClientSource::Env));
        assert!("database".parse::<ClientSource>().is_err());
    }
}
