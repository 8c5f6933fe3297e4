pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod executor;
pub mod probe;
pub mod provision;
pub mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

use crate::cluster::Cluster;
use crate::executor::RemoteExecutor;
use crate::probe::RepoProber;
use crate::provision::SubscriptionCdnRegistrar;

pub use error::ReposetupError;

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(filter).finish(),
    )
    .context("failed to set global default tracing subscriber")
}

/// Runs the setup half of every provisioning procedure, then disarms the
/// base-repo guard so the pushed repo files stay in place for the
/// surrounding test run. `reposetup teardown` removes them later.
pub fn run_apply(
    opts: &cli::ApplyArgs,
    executor: Arc<dyn RemoteExecutor>,
    prober: Arc<dyn RepoProber>,
) -> Result<()> {
    let config = config::load_config(opts.file.as_path())
        .with_context(|| format!("failed to load manifest from {}", opts.file))?;
    let cluster = Cluster::snapshot(&config.nodes);

    let registrar = SubscriptionCdnRegistrar::new(Arc::clone(&executor));
    provision::setup_cdn_repo(&cluster, &config, &registrar)?;
    provision::setup_additional_repo(&cluster, &config, executor.as_ref())?;

    if let Some(guard) =
        provision::setup_base_repo(&cluster, &config, prober.as_ref(), executor.as_ref())?
    {
        guard.persist();
        info!("base repos provisioned; run `reposetup teardown` to remove them");
    }

    Ok(())
}

/// Best-effort removal of the pushed repo files from every rpm host.
pub fn run_teardown(opts: &cli::TeardownArgs, executor: Arc<dyn RemoteExecutor>) -> Result<()> {
    let config = config::load_config(opts.file.as_path())
        .with_context(|| format!("failed to load manifest from {}", opts.file))?;
    let cluster = Cluster::snapshot(&config.nodes);
    provision::teardown_repos(&cluster, executor.as_ref());
    Ok(())
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let config = config::load_config(opts.file.as_path())?;
    config.validate().context("manifest validation failed")?;
    info!("validation successful:\n{:#?}", config);
    Ok(())
}
