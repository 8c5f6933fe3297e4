//! Manifest loading and validation.
//!
//! The YAML manifest carries the node inventory plus the repository
//! configuration keys. Key naming is preserved verbatim from the consumed
//! configuration format, which mixes kebab-case (`set-cdn-repo`,
//! `set-add-repo`) and snake_case (`base_repo_url`, ...).

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use url::Url;

use crate::cluster::RemoteHost;
use crate::error::ReposetupError;

/// Default candidate components probed under `base_repo_url`.
pub const DEFAULT_BASE_REPOS: &[&str] = &["MON", "OSD", "Tools", "Calamari", "Installer"];

/// Default candidate components probed under `installer_repo_url`.
pub const DEFAULT_INSTALLER_REPOS: &[&str] = &["Agent", "Main", "Installer"];

/// Sub-configuration forwarded to the CDN registration routine.
#[derive(Debug, Clone, Deserialize)]
pub struct CdnConfig {
    /// Downstream build identifier (e.g. "2.0"), informational.
    #[serde(default)]
    pub rhbuild: Option<String>,

    /// CDN repository ids to enable via the subscription manager.
    #[serde(default)]
    pub repos: Vec<String>,
}

/// Top-level manifest.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Remote node inventory.
    #[serde(default)]
    pub nodes: Vec<RemoteHost>,

    /// When present, repo registration is delegated to the CDN registrar
    /// and base-repo provisioning is skipped.
    #[serde(default, rename = "set-cdn-repo")]
    pub set_cdn_repo: Option<CdnConfig>,

    /// Single repo-definition URL fetched onto every rpm host.
    #[serde(default, rename = "set-add-repo")]
    pub set_add_repo: Option<String>,

    /// Base URL providing the primary composes; absence skips base-repo
    /// provisioning entirely.
    #[serde(default)]
    pub base_repo_url: Option<String>,

    /// Base URL providing the installer composes.
    #[serde(default)]
    pub installer_repo_url: Option<String>,

    /// Overrides the default base candidate component list.
    #[serde(default)]
    pub base_rh_repos: Option<Vec<String>>,

    /// Overrides the default installer candidate component list.
    #[serde(default)]
    pub installer_repos: Option<Vec<String>>,
}

impl Config {
    /// Candidate component names for the base artifact.
    pub fn base_repo_candidates(&self) -> Vec<String> {
        match &self.base_rh_repos {
            Some(repos) => repos.clone(),
            None => DEFAULT_BASE_REPOS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Candidate component names for the installer artifact.
    pub fn installer_repo_candidates(&self) -> Vec<String> {
        match &self.installer_repos {
            Some(repos) => repos.clone(),
            None => DEFAULT_INSTALLER_REPOS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Validates the manifest for early diagnostics.
    ///
    /// URL fields that are present must parse as URLs. This check serves
    /// the `validate` subcommand only; `apply` gates artifact provisioning
    /// on the historical http-prefix match instead, so a manifest that
    /// fails validation here may still apply (with the offending artifact
    /// silently disabled).
    pub fn validate(&self) -> Result<(), ReposetupError> {
        if self.nodes.is_empty() {
            tracing::warn!("manifest declares no nodes; every procedure will be a no-op");
        }

        let urls = [
            ("set-add-repo", &self.set_add_repo),
            ("base_repo_url", &self.base_repo_url),
            ("installer_repo_url", &self.installer_repo_url),
        ];
        for (key, value) in urls {
            if let Some(value) = value
                && let Err(e) = Url::parse(value)
            {
                return Err(ReposetupError::Validation(format!(
                    "{} is not a valid URL: {}: {}",
                    key, value, e
                )));
            }
        }

        Ok(())
    }
}

/// Loads a manifest from the given path.
pub fn load_config(path: &Utf8Path) -> Result<Config> {
    let file = File::open(path).with_context(|| format!("failed to open manifest: {}", path))?;
    let reader = BufReader::new(file);
    let config: Config = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse yaml: {}", path))?;
    Ok(config)
}
