use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::error::RewriteError;
use crate::model::Resource;

/// Something that can list every resource of a kind across all namespaces.
pub trait ResourceSource {
    async fn fetch(&self, kind: &str) -> Result<Vec<Resource>, RewriteError>;
}

/// Lists resources by shelling out to kubectl and reading its plain table output.
#[derive(Debug, Clone)]
pub struct KubectlLister {
    binary: PathBuf,
}

impl KubectlLister {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl ResourceSource for KubectlLister {
    async fn fetch(&self, kind: &str) -> Result<Vec<Resource>, RewriteError> {
        debug!(kind, binary = %self.binary.display(), "listing resources");
        let output = TokioCommand::new(&self.binary)
            .args(["get", kind, "--no-headers", "--all-namespaces"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|error| RewriteError::Fetch {
                kind: kind.to_string(),
                reason: error.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                format!("kubectl exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(RewriteError::Fetch {
                kind: kind.to_string(),
                reason,
            });
        }

        Ok(parse_resource_table(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Reads `NAMESPACE NAME ...` rows; extra columns are ignored.
pub fn parse_resource_table(raw: &str) -> Vec<Resource> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some(namespace), Some(name)) => Some(Resource::new(namespace, name)),
                _ => {
                    warn!(line, "skipping malformed kubectl row");
                    None
                }
            }
        })
        .collect()
}
