use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KctlConfig {
    /// kubectl binary, looked up on `PATH` unless it is a path.
    pub kubectl: PathBuf,
    pub default_kind: String,
    pub shell: String,
    pub fallback_term: String,
    /// Echo fetch progress and the final kubectl command line to stderr.
    pub echo: bool,
}

impl Default for KctlConfig {
    fn default() -> Self {
        Self {
            kubectl: PathBuf::from("kubectl"),
            default_kind: "pods".to_string(),
            shell: "/bin/bash".to_string(),
            fallback_term: "xterm".to_string(),
            echo: true,
        }
    }
}

impl KctlConfig {
    pub fn discover() -> Result<Self> {
        match discover_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("KCTL_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [PathBuf::from(".kctl.yaml"), PathBuf::from("kctl.yaml")];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/kctl/config.yaml"),
            PathBuf::from(&home).join(".config/kctl/config.yml"),
            PathBuf::from(&home).join(".kctl.yaml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::KctlConfig;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_match_builtin_behaviour() {
        let config = KctlConfig::default();
        assert_eq!(config.kubectl, PathBuf::from("kubectl"));
        assert_eq!(config.default_kind, "pods");
        assert_eq!(config.shell, "/bin/bash");
        assert_eq!(config.fallback_term, "xterm");
        assert!(config.echo);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("shell: /bin/sh\necho: false\n");
        let config = KctlConfig::load(file.path()).expect("valid config");
        assert_eq!(config.shell, "/bin/sh");
        assert!(!config.echo);
        assert_eq!(config.default_kind, "pods");
    }

    #[test]
    fn empty_file_is_default() {
        let file = write_config("   \n");
        let config = KctlConfig::load(file.path()).expect("empty config");
        assert_eq!(config, KctlConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("shel: /bin/sh\n");
        let error = KctlConfig::load(file.path()).expect_err("typo in key");
        assert!(format!("{error:#}").contains("failed to parse config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let error = KctlConfig::load(std::path::Path::new("/nonexistent/kctl.yaml"))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("failed to read config"));
    }
}
