//! Additional repo setup.
//!
//! Fetches a single externally supplied repo-definition file onto every
//! rpm host and refreshes the package metadata. Hosts are processed
//! sequentially; any remote command failure is fatal and aborts setup,
//! with no rollback.

use anyhow::Result;
use tracing::info;

use super::ADD_REPO_PATH;
use crate::cluster::Cluster;
use crate::config::Config;
use crate::executor::{RemoteCommand, RemoteExecutor, run_checked};

/// Fetches `set-add-repo` to its fixed path on every rpm host; no-op when
/// the key is absent. The URL is not validated locally; an unreachable
/// URL surfaces as the remote fetch command's non-zero exit.
pub fn setup_additional_repo(
    cluster: &Cluster,
    config: &Config,
    executor: &dyn RemoteExecutor,
) -> Result<()> {
    let Some(add_repo) = &config.set_add_repo else {
        return Ok(());
    };

    info!("setting up additional repo: {}", add_repo);
    for host in cluster.rpm_hosts() {
        let fetch = RemoteCommand::new(["sudo", "wget", "-O", ADD_REPO_PATH, add_repo.as_str()]);
        run_checked(executor, host, &fetch)?;

        let refresh = RemoteCommand::new(["sudo", "yum", "update", "metadata"]);
        run_checked(executor, host, &refresh)?;
    }
    Ok(())
}
