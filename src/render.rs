//! Repo-definition file rendering.
//!
//! Emits standard INI repo stanzas consumed by yum. Output order follows
//! the insertion order of the available-repo map, so rendering is
//! deterministic for a given probe result. Names and URLs are written
//! verbatim; no INI escaping is performed.

use std::io::{self, Write};

use crate::probe::AvailableRepos;

/// Renders one five-line stanza per confirmed repo, each followed by a
/// blank line:
///
/// ```text
/// [ceph-<name>]
/// name=ceph-<name>
/// baseurl=<url>
/// gpgcheck=0
/// enabled=1
/// ```
pub fn render_repo_file<W: Write>(repos: &AvailableRepos, out: &mut W) -> io::Result<()> {
    for (name, url) in repos.iter() {
        writeln!(out, "[ceph-{}]", name)?;
        writeln!(out, "name=ceph-{}", name)?;
        writeln!(out, "baseurl={}", url)?;
        writeln!(out, "gpgcheck=0")?;
        writeln!(out, "enabled=1")?;
        writeln!(out)?;
    }
    out.flush()
}
