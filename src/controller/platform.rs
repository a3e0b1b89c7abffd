//! Host platform boundary
//!
//! The host answers leadership queries, consumes the pod spec and displays
//! the unit status. The reconciler only talks to it through [`Platform`].

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use super::pod_spec::PodSpec;
use super::status::UnitStatus;
use crate::error::{Error, Result};

pub trait Platform {
    fn is_leader(&self) -> bool;
    fn app_name(&self) -> &str;
    fn set_status(&mut self, status: UnitStatus);
    fn apply_pod_spec(&mut self, spec: &PodSpec) -> Result<()>;
}

/// Where a published pod spec is written
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecSink {
    Stdout,
    File(PathBuf),
}

/// Platform for hook-style invocation: leadership comes from the caller,
/// the spec is written as YAML and statuses are logged.
#[derive(Debug)]
pub struct FilePlatform {
    app_name: String,
    is_leader: bool,
    sink: SpecSink,
    statuses: Vec<UnitStatus>,
}

impl FilePlatform {
    pub fn new(app_name: impl Into<String>, is_leader: bool, sink: SpecSink) -> Self {
        Self {
            app_name: app_name.into(),
            is_leader,
            sink,
            statuses: Vec::new(),
        }
    }

    /// Every status set during this invocation, oldest first
    pub fn statuses(&self) -> &[UnitStatus] {
        &self.statuses
    }

    pub fn status(&self) -> Option<&UnitStatus> {
        self.statuses.last()
    }
}

impl Platform for FilePlatform {
    fn is_leader(&self) -> bool {
        self.is_leader
    }

    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn set_status(&mut self, status: UnitStatus) {
        info!(status = status.name(), "Unit status: {}", status);
        self.statuses.push(status);
    }

    fn apply_pod_spec(&mut self, spec: &PodSpec) -> Result<()> {
        let rendered = serde_yaml::to_string(spec)?;
        match &self.sink {
            SpecSink::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(rendered.as_bytes())
                    .and_then(|_| out.flush())
                    .map_err(|e| Error::PublishError(e.to_string()))?;
            }
            SpecSink::File(path) => {
                std::fs::write(path, rendered).map_err(|e| {
                    Error::PublishError(format!("cannot write {}: {}", path.display(), e))
                })?;
            }
        }
        info!("Pod spec applied for {}", self.app_name);
        Ok(())
    }
}
