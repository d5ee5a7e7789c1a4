use std::path::PathBuf;

use clap::Parser;

use crate::core::types::{ClientId, StateToken};
use crate::registry::{ConfigError, FileRegistry};
use crate::state::{StateError, StateService};

#[derive(Parser)]
#[clap(
    name = "kakehashi-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(long, env = "SECRET", hide_env_values = true)]
    secret: Option<String>,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    ListClients(ListClients),
    EncryptState(EncryptState),
    DecryptState(DecryptState),
}

/// Validate a client configuration file and list its clients
#[derive(Parser)]
struct ListClients {
    #[clap(short, long, env = "CONFIG_FILE")]
    file: PathBuf,
}

/// Issue a state token for a client, valid today
#[derive(Parser)]
struct EncryptState {
    #[clap(short, long)]
    client_id: String,
}

/// Show what a state token decrypts to today
#[derive(Parser)]
struct DecryptState {
    #[clap(short, long)]
    token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("state could not be verified: {0}")]
    State(#[from] StateError),
    #[error("SECRET is required for this command")]
    MissingSecret,
}

fn states(opts: &Options) -> Result<StateService, CliError> {
    let secret = opts.secret.clone().ok_or(CliError::MissingSecret)?;
    Ok(StateService::new(secret, StateService::DEFAULT_TTL))
}

fn list_clients(c: &ListClients) -> Result<(), CliError> {
    let registry = FileRegistry::load(&c.file)?;

    for client in registry.entries() {
        println!("{} -> {}", client.client_id, client.redirect_uri.0);
    }
    Ok(())
}

fn encrypt_state(c: &EncryptState, opts: &Options) -> Result<(), CliError> {
    let token = states(opts)?.issue(&ClientId(c.client_id.to_string()))?;
    println!("{}", token.0);
    Ok(())
}

fn decrypt_state(c: &DecryptState, opts: &Options) -> Result<(), CliError> {
    let claims = states(opts)?.inspect(&StateToken(c.token.to_string()))?;
    println!("{} (issued at {}, nonce {})", claims.client_id, claims.iat, claims.jti.0);
    Ok(())
}

pub fn run_cli_action(opts: Options) -> Result<(), CliError> {
    use SubCommand::*;

    match &opts.command {
        ListClients(c) => list_clients(c),
        EncryptState(c) => encrypt_state(c, &opts),
        DecryptState(c) => decrypt_state(c, &opts),
    }
}
