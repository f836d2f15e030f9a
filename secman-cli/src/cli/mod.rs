use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Command, CommandFactory, FromArgMatches, Parser, Subcommand};
use secman_api::client::ApiClient;
use secman_lib::track::ReleaseTrack;

use crate::config::{self, Overrides, Settings, ACCESS_TOKEN_ENV};
use crate::error::{self, Context};
use crate::formatting::OutputFormat;

mod iam;
mod list;
mod secrets;

/// a cli for managing the IAM policies of secrets.
///
/// policies are read from and written to the secret manager service. commands
/// under "beta" run against the beta release of the service api.
#[derive(Debug, Parser)]
#[command(name = "secman", version)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: TopCmds,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// yaml or json file to load default settings from
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// project that bare secret ids belong to
    #[arg(long, global = true, env = "SECMAN_PROJECT")]
    project: Option<String>,

    /// overrides the service endpoint
    ///
    /// the regional endpoints selected by --location are ignored when this is
    /// set. example: http://localhost:8080/
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// format of the policy written to stdout
    #[arg(long, global = true)]
    format: Option<OutputFormat>,
}

#[derive(Debug, Subcommand)]
enum TopCmds {
    /// manage secrets
    Secrets(secrets::SecretsArgs),

    /// commands for the beta release of the service
    Beta(BetaArgs),
}

#[derive(Debug, Args)]
struct BetaArgs {
    #[command(subcommand)]
    command: BetaCmds,
}

#[derive(Debug, Subcommand)]
enum BetaCmds {
    /// manage secrets
    Secrets(secrets::SecretsArgs),
}

/// values every command needs besides its own arguments
#[derive(Debug)]
pub struct Invocation {
    pub track: ReleaseTrack,
    pub project: Option<String>,
    pub format: OutputFormat,
}

/// command tree with the beta help text applied
pub fn command() -> Command {
    Cli::command().mut_subcommand("beta", |beta| {
        beta.mut_subcommand("secrets", secrets::beta_help)
    })
}

pub fn try_parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(itr)?;

    Cli::from_arg_matches(&matches)
        .map_err(|err| err.format(&mut command()))
}

pub fn start() -> error::Result {
    let args = match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };

    let file = match args.global.config {
        Some(path) => config::load(path)?,
        None => config::Root::default(),
    };

    let overrides = Overrides {
        project: args.global.project,
        endpoint: args.global.endpoint,
        access_token: std::env::var(ACCESS_TOKEN_ENV).ok().filter(|v| !v.is_empty()),
        format: args.global.format,
    };

    let settings = Settings::merge(file, overrides);

    let (track, secrets_args) = match args.command {
        TopCmds::Secrets(given) => (ReleaseTrack::Ga, given),
        TopCmds::Beta(BetaArgs { command: BetaCmds::Secrets(given) }) => (ReleaseTrack::Beta, given),
    };

    tracing::debug!(%track, "running command");

    let client = build_client(&settings)?;

    let inv = Invocation {
        track,
        project: settings.project,
        format: settings.format,
    };

    secrets::handle(&client, &inv, secrets_args)
}

fn build_client(settings: &Settings) -> error::Result<ApiClient> {
    let mut builder = ApiClient::builder();
    builder.user_agent(concat!("secman/", env!("CARGO_PKG_VERSION")));

    if let Some(endpoint) = &settings.endpoint {
        if !builder.endpoint(endpoint) {
            return Err(error::Error::from(format!(
                "cannot set endpoint to the value provided. {}",
                endpoint
            )));
        }
    }

    if let Some(token) = &settings.access_token {
        builder.access_token(token.clone());
    }

    if let Some(timeout) = settings.timeout {
        builder.timeout(timeout);
    }

    builder.build().context("failed to create api client")
}
