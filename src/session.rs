use std::process::Stdio;

use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::ProbeError;
use crate::model::TerminalSize;

pub trait TerminalProbe {
    async fn size(&self) -> Result<TerminalSize, ProbeError>;
}

/// Asks `stty size` about the terminal attached to our stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SttyProbe;

impl TerminalProbe for SttyProbe {
    async fn size(&self) -> Result<TerminalSize, ProbeError> {
        let output = TokioCommand::new("stty")
            .arg("size")
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(ProbeError::Status(output.status));
        }
        parse_stty_size(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses `"<rows> <columns>"`.
pub fn parse_stty_size(raw: &str) -> Result<TerminalSize, ProbeError> {
    let mut fields = raw.split_whitespace();
    let (Some(rows), Some(columns)) = (fields.next(), fields.next()) else {
        return Err(ProbeError::Parse(raw.to_string()));
    };
    let rows = rows
        .parse::<u16>()
        .map_err(|_| ProbeError::Parse(raw.to_string()))?;
    let columns = columns
        .parse::<u16>()
        .map_err(|_| ProbeError::Parse(raw.to_string()))?;
    Ok(TerminalSize { rows, columns })
}

/// Builds the `-- env TERM=.. COLUMNS=.. LINES=..` arguments for an interactive shell.
#[derive(Debug, Clone)]
pub struct SessionEnvBuilder<P> {
    probe: P,
    term: Option<String>,
    fallback_term: String,
}

impl<P: TerminalProbe> SessionEnvBuilder<P> {
    pub fn new(probe: P, term: Option<String>, fallback_term: impl Into<String>) -> Self {
        Self {
            probe,
            term,
            fallback_term: fallback_term.into(),
        }
    }

    pub fn from_env(probe: P, fallback_term: impl Into<String>) -> Self {
        Self::new(probe, std::env::var("TERM").ok(), fallback_term)
    }

    pub async fn build(&self) -> Vec<String> {
        let term = self
            .term
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.fallback_term);

        let mut args = vec![
            "--".to_string(),
            "env".to_string(),
            format!("TERM={term}"),
        ];

        match self.probe.size().await {
            Ok(size) => {
                args.push(format!("COLUMNS={}", size.columns));
                args.push(format!("LINES={}", size.rows));
            }
            Err(error) => debug!(%error, "terminal size unavailable"),
        }

        args
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{SessionEnvBuilder, TerminalProbe, parse_stty_size};
    use crate::error::ProbeError;
    use crate::model::TerminalSize;

    pub(crate) struct FixedProbe(pub Option<TerminalSize>);

    impl TerminalProbe for FixedProbe {
        async fn size(&self) -> Result<TerminalSize, ProbeError> {
            self.0.ok_or_else(|| ProbeError::Parse(String::new()))
        }
    }

    #[test]
    fn parses_rows_then_columns() {
        let size = parse_stty_size("40 120\n").expect("valid size");
        assert_eq!(
            size,
            TerminalSize {
                rows: 40,
                columns: 120
            }
        );
    }

    #[test]
    fn rejects_incomplete_or_garbled_size() {
        assert!(matches!(parse_stty_size(""), Err(ProbeError::Parse(_))));
        assert!(matches!(parse_stty_size("40"), Err(ProbeError::Parse(_))));
        assert!(matches!(
            parse_stty_size("forty 120"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn includes_size_when_probe_succeeds() {
        let builder = SessionEnvBuilder::new(
            FixedProbe(Some(TerminalSize {
                rows: 40,
                columns: 120,
            })),
            Some("xterm-256color".to_string()),
            "xterm",
        );
        assert_eq!(
            builder.build().await,
            vec!["--", "env", "TERM=xterm-256color", "COLUMNS=120", "LINES=40"]
        );
    }

    #[tokio::test]
    async fn omits_size_when_probe_fails() {
        let builder = SessionEnvBuilder::new(FixedProbe(None), Some("screen".to_string()), "xterm");
        assert_eq!(builder.build().await, vec!["--", "env", "TERM=screen"]);
    }

    #[tokio::test]
    async fn falls_back_when_term_unset_or_empty() {
        let unset = SessionEnvBuilder::new(FixedProbe(None), None, "xterm");
        let empty = SessionEnvBuilder::new(FixedProbe(None), Some(String::new()), "xterm");
        assert_eq!(unset.build().await, vec!["--", "env", "TERM=xterm"]);
        assert_eq!(empty.build().await, vec!["--", "env", "TERM=xterm"]);
    }
}
