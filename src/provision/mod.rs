//! Provisioning procedures.
//!
//! Three independent procedures, each a guarded setup step around the
//! remainder of a test run:
//!
//! 1. **CDN repo setup** — delegates registration to an external routine
//! 2. **Additional repo setup** — fetches one externally supplied repo file
//! 3. **Base repo setup** — probes composes, renders and pushes repo files,
//!    and removes them again on teardown
//!
//! Every procedure acts only on rpm hosts; all others are silently skipped.

pub mod additional;
pub mod base;
pub mod cdn;

pub use additional::setup_additional_repo;
pub use base::{
    BaseRepoDecision, BaseRepoGuard, base_repo_decision, setup_base_repo, teardown_repos,
    with_base_repo,
};
pub use cdn::{CdnRegistrar, SubscriptionCdnRegistrar, setup_cdn_repo};

/// Remote path the additional repo file is fetched to.
pub const ADD_REPO_PATH: &str = "/etc/yum.repos.d/add.repo";

/// Remote path of the rendered base repo file.
pub const BASE_REPO_PATH: &str = "/etc/yum.repos.d/rh_ceph.repo";

/// Remote path of the rendered installer repo file.
pub const INSTALLER_REPO_PATH: &str = "/etc/yum.repos.d/rh_inst.repo";

/// Glob removed on teardown; expands on the remote shell.
pub const REPO_CLEANUP_GLOB: &str = "/etc/yum.repos.d/rh*.repo";
