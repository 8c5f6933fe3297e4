//! Cluster inventory types.
//!
//! The manifest declares the set of remote test nodes to provision.
//! `Cluster` is an order-stable snapshot of that inventory taken once at
//! load time; every provisioning procedure iterates the snapshot rather
//! than any live view, so the host order seen by setup and teardown is
//! identical.

use serde::Deserialize;
use strum::{Display, EnumString};

/// Package-management flavor of a remote host.
///
/// Only `rpm` hosts participate in repository provisioning; all other
/// hosts are silently skipped by every procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PackageType {
    Rpm,
    Deb,
}

/// A single remote test node from the manifest inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteHost {
    /// Hostname or address the SSH transport connects to.
    pub name: String,

    /// Remote login user; when absent the transport uses its own default
    /// (typically the current user or ssh_config).
    #[serde(default)]
    pub user: Option<String>,

    /// Package-management flavor, used as the eligibility filter.
    pub package_type: PackageType,
}

impl RemoteHost {
    /// Returns the `user@host` (or bare `host`) form used by ssh/scp.
    pub fn ssh_target(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.name),
            None => self.name.clone(),
        }
    }

    /// Returns true if this host is eligible for rpm repo provisioning.
    pub fn is_rpm(&self) -> bool {
        self.package_type == PackageType::Rpm
    }
}

/// Order-stable snapshot of the manifest inventory.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    hosts: Vec<RemoteHost>,
}

impl Cluster {
    /// Takes a snapshot of the given inventory, preserving declared order.
    pub fn snapshot(hosts: &[RemoteHost]) -> Self {
        Self {
            hosts: hosts.to_vec(),
        }
    }

    /// Returns all hosts in declared order.
    pub fn hosts(&self) -> &[RemoteHost] {
        &self.hosts
    }

    /// Returns the eligible (rpm) hosts in declared order.
    pub fn rpm_hosts(&self) -> Vec<&RemoteHost> {
        self.hosts.iter().filter(|h| h.is_rpm()).collect()
    }

    /// Returns true if the inventory is empty.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
