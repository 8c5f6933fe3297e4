use std::fs;
use std::io::Write;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::sync::Mutex;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

use reposetup::cluster::{PackageType, RemoteHost};
use reposetup::config::Config;
use reposetup::executor::{ExecutionResult, RemoteCommand, RemoteExecutor};
use reposetup::probe::{AvailableRepos, RepoProber, probe_url};

/// One remote command recorded by the mock transport.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub host: String,
    pub args: Vec<String>,
}

#[allow(dead_code)]
impl RecordedCall {
    pub fn display(&self) -> String {
        self.args.join(" ")
    }
}

/// One file upload recorded by the mock transport, with the local file
/// contents captured at upload time (the temp file is gone afterwards).
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub host: String,
    pub local: Utf8PathBuf,
    pub remote: Utf8PathBuf,
    pub contents: String,
}

/// Mock transport recording every call; commands whose display form
/// contains `fail_when` report exit code 1, everything else exit code 0.
#[derive(Default)]
pub struct MockExecutor {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub fail_when: Option<String>,
}

#[allow(dead_code)]
impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(pattern: impl Into<String>) -> Self {
        Self {
            fail_when: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    /// Recorded calls whose display form contains the given substring.
    pub fn calls_matching(&self, pattern: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.display().contains(pattern))
            .collect()
    }

    fn status_for(&self, display: &str) -> ExitStatus {
        match &self.fail_when {
            Some(pattern) if display.contains(pattern) => ExitStatus::from_raw(1 << 8),
            _ => ExitStatus::from_raw(0),
        }
    }
}

impl RemoteExecutor for MockExecutor {
    fn run(&self, host: &RemoteHost, command: &RemoteCommand) -> Result<ExecutionResult> {
        let display = command.display();
        self.calls.lock().unwrap().push(RecordedCall {
            host: host.name.clone(),
            args: command.args.clone(),
        });
        Ok(ExecutionResult {
            status: Some(self.status_for(&display)),
        })
    }

    fn put_file(
        &self,
        host: &RemoteHost,
        local: &Utf8Path,
        remote: &Utf8Path,
    ) -> Result<ExecutionResult> {
        let contents = fs::read_to_string(local)
            .with_context(|| format!("mock put_file failed to read {}", local))?;
        self.uploads.lock().unwrap().push(RecordedUpload {
            host: host.name.clone(),
            local: local.to_owned(),
            remote: remote.to_owned(),
            contents,
        });
        Ok(ExecutionResult {
            status: Some(self.status_for("put_file")),
        })
    }
}

/// Stub prober: candidates listed in `available` respond 200, everything
/// else does not. Records each probed base URL.
#[derive(Default)]
pub struct StubProber {
    pub available: Vec<String>,
    pub probed: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubProber {
    pub fn accepting<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: names.into_iter().map(Into::into).collect(),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

impl RepoProber for StubProber {
    fn probe(&self, base_url: &str, candidates: &[String]) -> Result<AvailableRepos> {
        self.probed.lock().unwrap().push(base_url.to_string());
        let mut repos = AvailableRepos::default();
        for name in candidates {
            if self.available.iter().any(|a| a == name) {
                repos.insert(name.clone(), probe_url(base_url, name));
            }
        }
        Ok(repos)
    }
}

/// Parses a manifest from inline YAML via a temp file, exercising the
/// real load path.
#[allow(dead_code)]
pub fn load_config_from_yaml(yaml: &str) -> Result<Config> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    file.flush()?;
    let path = Utf8Path::from_path(file.path()).context("temp path is not valid UTF-8")?;
    reposetup::config::load_config(path)
}

/// Test helper to build a RemoteHost without a login user.
#[allow(dead_code)]
pub fn host(name: impl Into<String>, package_type: PackageType) -> RemoteHost {
    RemoteHost {
        name: name.into(),
        user: None,
        package_type,
    }
}
