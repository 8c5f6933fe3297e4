//! Base repo setup and teardown.
//!
//! The base-repo lifecycle is a guarded scope: one decision at entry
//! (skip, defer to CDN, or provision), a concurrent per-host fan-out for
//! provisioning, and a best-effort cleanup on teardown that is guaranteed
//! to run even when the wrapped work fails.

use std::thread;

use anyhow::{Context, Result};
use camino::Utf8Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{BASE_REPO_PATH, INSTALLER_REPO_PATH, REPO_CLEANUP_GLOB};
use crate::cluster::{Cluster, RemoteHost};
use crate::config::Config;
use crate::executor::{RemoteCommand, RemoteExecutor, put_file_checked, run_checked};
use crate::probe::RepoProber;
use crate::render::render_repo_file;

/// Outcome of the base-repo decision, evaluated once at scope entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseRepoDecision {
    /// No `base_repo_url` configured; no remote action, no cleanup.
    Skip,
    /// `set-cdn-repo` takes precedence; no remote action, no cleanup.
    DeferToCdn,
    /// Full setup/teardown cycle runs.
    Provision,
}

/// Chooses the base-repo branch from the two independent flags.
///
/// An absent `base_repo_url` is an unconditional early exit, taking
/// precedence over the CDN flag.
pub fn base_repo_decision(config: &Config) -> BaseRepoDecision {
    if config.base_repo_url.is_none() {
        return BaseRepoDecision::Skip;
    }
    if config.set_cdn_repo.is_some() {
        return BaseRepoDecision::DeferToCdn;
    }
    BaseRepoDecision::Provision
}

/// Scoped cleanup handle for provisioned base repos.
///
/// Teardown runs at most once: explicitly via [`teardown`], implicitly on
/// drop, or never when [`persist`] disarms the guard (used by the CLI to
/// leave repos in place for the surrounding test run).
///
/// [`teardown`]: BaseRepoGuard::teardown
/// [`persist`]: BaseRepoGuard::persist
pub struct BaseRepoGuard<'a> {
    cluster: &'a Cluster,
    executor: &'a dyn RemoteExecutor,
    armed: bool,
}

impl std::fmt::Debug for BaseRepoGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRepoGuard")
            .field("cluster", &self.cluster)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

impl<'a> BaseRepoGuard<'a> {
    fn new(cluster: &'a Cluster, executor: &'a dyn RemoteExecutor) -> Self {
        Self {
            cluster,
            executor,
            armed: true,
        }
    }

    /// Removes the pushed repo files from every rpm host, best-effort.
    ///
    /// Command failures are logged and swallowed; calling this more than
    /// once is a no-op.
    pub fn teardown(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        teardown_repos(self.cluster, self.executor);
    }

    /// Disarms the guard, leaving the repo files on the hosts.
    pub fn persist(mut self) {
        self.armed = false;
    }
}

impl Drop for BaseRepoGuard<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Best-effort removal of `rh*.repo` from every rpm host, sequentially.
/// Failures never propagate.
pub fn teardown_repos(cluster: &Cluster, executor: &dyn RemoteExecutor) {
    info!("cleaning up repos");
    let command = RemoteCommand::new(["sudo", "rm", "-f", REPO_CLEANUP_GLOB]);
    for host in cluster.rpm_hosts() {
        match executor.run(host, &command) {
            Ok(result) if result.success() => {}
            Ok(result) => {
                warn!("repo cleanup on {} exited with {:?}", host.name, result.code());
            }
            Err(e) => {
                warn!("repo cleanup on {} failed: {:#}", host.name, e);
            }
        }
    }
}

/// Runs the base-repo decision and, in the Provision branch, the per-host
/// fan-out. Returns a cleanup guard for Provision, `None` otherwise.
pub fn setup_base_repo<'a>(
    cluster: &'a Cluster,
    config: &Config,
    prober: &dyn RepoProber,
    executor: &'a dyn RemoteExecutor,
) -> Result<Option<BaseRepoGuard<'a>>> {
    match base_repo_decision(config) {
        BaseRepoDecision::Skip => {
            debug!("no base repo defined, skipping");
            Ok(None)
        }
        BaseRepoDecision::DeferToCdn => {
            info!("CDN repo already set, skipping rh repo");
            Ok(None)
        }
        BaseRepoDecision::Provision => {
            setup_latest_repo(cluster, config, prober, executor)?;
            Ok(Some(BaseRepoGuard::new(cluster, executor)))
        }
    }
}

/// Guarded scope: runs base-repo setup, invokes `f`, and tears down on
/// every exit path including `f` failing. Teardown failures never
/// propagate.
pub fn with_base_repo<T>(
    cluster: &Cluster,
    config: &Config,
    prober: &dyn RepoProber,
    executor: &dyn RemoteExecutor,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let guard = setup_base_repo(cluster, config, prober, executor)?;
    let result = f();
    if let Some(mut guard) = guard {
        guard.teardown();
    }
    result
}

/// Per-host fan-out: provisions every rpm host concurrently, one thread
/// per host. The first failure aborts the whole group; there is no
/// partial-success aggregation.
fn setup_latest_repo(
    cluster: &Cluster,
    config: &Config,
    prober: &dyn RepoProber,
    executor: &dyn RemoteExecutor,
) -> Result<()> {
    let hosts = cluster.rpm_hosts();
    if hosts.is_empty() {
        debug!("no rpm hosts in cluster, nothing to provision");
        return Ok(());
    }

    info!("provisioning base repos on {} host(s)", hosts.len());
    thread::scope(|scope| {
        let handles: Vec<_> = hosts
            .iter()
            .map(|host| {
                let host = *host;
                (host, scope.spawn(move || provision_host(host, config, prober, executor)))
            })
            .collect();

        let mut first_err = None;
        for (host, handle) in handles {
            let outcome = match handle.join() {
                Ok(outcome) => outcome,
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    Err(anyhow::anyhow!("provisioning thread panicked: {}", msg))
                }
            };
            if let Err(e) = outcome
                && first_err.is_none()
            {
                first_err =
                    Some(e.context(format!("failed to provision repos on {}", host.name)));
            }
        }

        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    })
}

/// Provisions a single host: disable pre-existing same-domain repos, then
/// the base artifact, then the installer artifact, in that order.
fn provision_host(
    host: &RemoteHost,
    config: &Config,
    prober: &dyn RepoProber,
    executor: &dyn RemoteExecutor,
) -> Result<()> {
    let disable =
        RemoteCommand::new(["sudo", "subscription-manager", "repos", "--disable=*ceph*"]);
    run_checked(executor, host, &disable)?;

    let base_url = config.base_repo_url.as_deref().unwrap_or("");
    let installer_url = config.installer_repo_url.as_deref().unwrap_or("");

    // Historical gate: a prefix match, not full URL validation. A URL
    // without an http prefix silently disables that artifact.
    if base_url.starts_with("http") {
        provision_artifact(
            host,
            base_url,
            &config.base_repo_candidates(),
            Utf8Path::new(BASE_REPO_PATH),
            prober,
            executor,
        )?;
    } else {
        debug!("base_repo_url {:?} is not an http url, skipping base artifact", base_url);
    }

    if installer_url.starts_with("http") {
        provision_artifact(
            host,
            installer_url,
            &config.installer_repo_candidates(),
            Utf8Path::new(INSTALLER_REPO_PATH),
            prober,
            executor,
        )?;
    } else {
        debug!(
            "installer_repo_url {:?} is not an http url, skipping installer artifact",
            installer_url
        );
    }

    Ok(())
}

/// Provisions one repo artifact on one host: probe the candidates, render
/// the survivors to a local temp file, stage it on the host, then copy it
/// into the well-known path.
fn provision_artifact(
    host: &RemoteHost,
    base_url: &str,
    candidates: &[String],
    remote_path: &Utf8Path,
    prober: &dyn RepoProber,
    executor: &dyn RemoteExecutor,
) -> Result<()> {
    let repos = prober.probe(base_url, candidates)?;
    if repos.is_empty() {
        warn!("no compose under {} responded for {:?}", base_url, candidates);
    }

    let mut repo_file = NamedTempFile::new().context("failed to create temp repo file")?;
    render_repo_file(&repos, &mut repo_file).context("failed to render repo file")?;

    let local = Utf8Path::from_path(repo_file.path())
        .context("temp repo file path is not valid UTF-8")?;

    // Stage at the same path on the remote, then install with sudo since
    // /etc/yum.repos.d is not writable by the login user.
    put_file_checked(executor, host, local, local)?;
    let install = RemoteCommand::new(["sudo", "cp", local.as_str(), remote_path.as_str()]);
    run_checked(executor, host, &install)?;

    info!("installed {} on {}", remote_path, host.name);
    Ok(())
}
