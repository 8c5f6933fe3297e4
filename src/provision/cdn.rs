//! CDN repo setup.
//!
//! When `set-cdn-repo` is present in the manifest, repo registration is
//! delegated to a [`CdnRegistrar`] with the sub-configuration forwarded
//! verbatim; otherwise the procedure is a no-op. Registrar errors
//! propagate unmodified.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cluster::Cluster;
use crate::config::{CdnConfig, Config};
use crate::executor::{RemoteCommand, RemoteExecutor, run_checked};

/// External registration routine invoked for `set-cdn-repo`.
pub trait CdnRegistrar: Send + Sync {
    /// Registers CDN package sources on the cluster.
    fn register(&self, cluster: &Cluster, config: &CdnConfig) -> Result<()>;
}

/// Registrar that enables CDN repo ids through the subscription manager
/// on every rpm host.
pub struct SubscriptionCdnRegistrar {
    executor: Arc<dyn RemoteExecutor>,
}

impl SubscriptionCdnRegistrar {
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self {
        Self { executor }
    }
}

impl CdnRegistrar for SubscriptionCdnRegistrar {
    fn register(&self, cluster: &Cluster, config: &CdnConfig) -> Result<()> {
        if let Some(rhbuild) = &config.rhbuild {
            info!("registering CDN repos for build {}", rhbuild);
        }
        for host in cluster.rpm_hosts() {
            for repo in &config.repos {
                let enable = format!("--enable={}", repo);
                let command =
                    RemoteCommand::new(["sudo", "subscription-manager", "repos", enable.as_str()]);
                run_checked(self.executor.as_ref(), host, &command)?;
            }
        }
        Ok(())
    }
}

/// Delegates to the registrar if `set-cdn-repo` is configured; no-op
/// otherwise.
pub fn setup_cdn_repo(
    cluster: &Cluster,
    config: &Config,
    registrar: &dyn CdnRegistrar,
) -> Result<()> {
    if let Some(cdn) = &config.set_cdn_repo {
        info!("setting up CDN repo");
        registrar.register(cluster, cdn)?;
    }
    Ok(())
}
