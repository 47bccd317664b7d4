use thiserror::Error;

use crate::model::{Resource, join_resources};

/// Failures that abort an argument rewrite before kubectl is invoked.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("failed to get resource {kind}: {reason}")]
    Fetch { kind: String, reason: String },

    #[error("no resources found in namespaces matching {pattern}")]
    NoNamespaceMatch { pattern: String },

    #[error("failed to find {kind} matching {pattern}")]
    NoMatch { kind: String, pattern: String },

    #[error("ambiguous query for {kind} matches: {}", join_resources(.matches))]
    Ambiguous {
        kind: String,
        matches: Vec<Resource>,
    },

    #[error("invalid pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Terminal size query failures. Never fatal to a rewrite.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run terminal size query: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal size query exited with {0}")]
    Status(std::process::ExitStatus),

    #[error("failed to parse terminal size {0:?}")]
    Parse(String),
}
