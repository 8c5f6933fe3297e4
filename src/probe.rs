//! Repository availability probing.
//!
//! Given a base URL and an ordered list of candidate component names, the
//! prober checks which compose directories actually exist and returns the
//! confirmed subset. A repo stanza is only ever rendered for a candidate
//! that passed this live check.

use anyhow::Result;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::ReposetupError;

/// Builds the compose URL checked for a candidate component.
pub fn probe_url(base_url: &str, name: &str) -> String {
    format!("{}compose/{}/x86_64/os/", base_url, name)
}

/// Insertion-ordered mapping from component name to confirmed-reachable URL.
///
/// Keys are always a subset of the probed candidate list, in probe order,
/// which keeps rendered output deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AvailableRepos {
    entries: Vec<(String, String)>,
}

impl AvailableRepos {
    /// Appends a confirmed component.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.entries.push((name.into(), url.into()));
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, u)| (n.as_str(), u.as_str()))
    }

    /// Returns true if no candidate survived probing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of confirmed components.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the given component was confirmed.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }
}

impl FromIterator<(String, String)> for AvailableRepos {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Trait for repository availability probing.
///
/// Implementations must be `Send + Sync` so a single prober can be shared
/// across the per-host fan-out threads.
pub trait RepoProber: Send + Sync {
    /// Probes each candidate under `base_url` and returns the subset that
    /// responded with HTTP 200, in candidate order. May be empty.
    fn probe(&self, base_url: &str, candidates: &[String]) -> Result<AvailableRepos>;
}

/// Prober backed by a blocking HTTP client.
///
/// One synchronous GET per candidate with the client's default timeout;
/// no retries. A non-200 response excludes the candidate silently, a
/// transport error aborts the probe.
pub struct HttpProber {
    client: reqwest::blocking::Client,
}

impl HttpProber {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoProber for HttpProber {
    fn probe(&self, base_url: &str, candidates: &[String]) -> Result<AvailableRepos> {
        let mut available = AvailableRepos::default();
        for name in candidates {
            let url = probe_url(base_url, name);
            debug!("checking {}", url);
            let response =
                self.client
                    .get(&url)
                    .send()
                    .map_err(|e| ReposetupError::Probe {
                        url: url.clone(),
                        source: e,
                    })?;
            if response.status() == StatusCode::OK {
                info!("using {}", url);
                available.insert(name.clone(), url);
            } else {
                info!("skipping {} (status {})", url, response.status());
            }
        }
        Ok(available)
    }
}
