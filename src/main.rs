mod cli;
mod config;
mod error;
mod k8s;
mod model;
mod resolver;
mod rewrite;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{CliArgs, HELP_TEXT};
use config::KctlConfig;
use crossterm::style::Stylize;
use error::RewriteError;
use k8s::{KubectlLister, ResourceSource};
use model::Resource;
use rewrite::Rewriter;
use session::{SessionEnvBuilder, SttyProbe};
use std::path::Path;
use std::process::{Command, ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "KCTL_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    if let Err(error) = init_tracing() {
        eprintln!("{}", format!("{error:#}").red());
    }

    if args.args.is_empty() {
        println!("{HELP_TEXT}");
        return ExitCode::SUCCESS;
    }

    match run(&args.args).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", format!("{error:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() -> Result<()> {
    let level_filter =
        std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let filter = EnvFilter::try_new(&level_filter)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}

async fn run(raw: &[String]) -> Result<ExitCode> {
    let config = KctlConfig::discover()?;
    debug!(?config, "loaded config");

    let source = EchoingSource {
        inner: KubectlLister::new(&config.kubectl),
        enabled: config.echo,
    };
    let session = SessionEnvBuilder::from_env(SttyProbe, config.fallback_term.as_str());
    let rewriter = Rewriter::new(
        source,
        session,
        config.default_kind.as_str(),
        config.shell.as_str(),
    );

    let args = rewriter.rewrite(raw).await?;
    if config.echo {
        eprintln!("{}", format!("kubectl {}", args.join(" ")).blue());
    }

    hand_off(&config.kubectl, &args)
}

/// Prints `fetching <kind> => <count>` around each fetch.
struct EchoingSource<S> {
    inner: S,
    enabled: bool,
}

impl<S: ResourceSource> ResourceSource for EchoingSource<S> {
    async fn fetch(&self, kind: &str) -> Result<Vec<Resource>, RewriteError> {
        if !self.enabled {
            return self.inner.fetch(kind).await;
        }

        eprint!("{}", format!("fetching {kind} => ").blue());
        match self.inner.fetch(kind).await {
            Ok(resources) => {
                eprintln!("{}", resources.len().to_string().blue());
                Ok(resources)
            }
            Err(error) => {
                // keep the error message on its own line
                eprintln!();
                Err(error)
            }
        }
    }
}

#[cfg(unix)]
fn hand_off(kubectl: &Path, args: &[String]) -> Result<ExitCode> {
    use std::os::unix::process::CommandExt;

    let error = Command::new(kubectl).arg0("kubectl").args(args).exec();
    Err(error).with_context(|| format!("failed to exec {}", kubectl.display()))
}

#[cfg(not(unix))]
fn hand_off(kubectl: &Path, args: &[String]) -> Result<ExitCode> {
    let status = Command::new(kubectl)
        .args(args)
        .status()
        .with_context(|| format!("failed to run {}", kubectl.display()))?;
    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from))
}
