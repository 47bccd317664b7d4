use tracing::{debug, trace};

use crate::error::RewriteError;
use crate::k8s::ResourceSource;
use crate::model::{PatternToken, Resource};
use crate::resolver::resolve;
use crate::session::{SessionEnvBuilder, TerminalProbe};

pub const SESSION_MARKER: &str = "ssh";
pub const ALL_NAMESPACES_MARKER: &str = ":";
const KIND_VERBS: [&str; 4] = ["get", "describe", "delete", "edit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    SessionStart,
    AllNamespaces,
    KindVerb { verb: &'a str, kind: &'a str },
    Pattern(PatternToken<'a>),
    Passthrough(&'a str),
}

/// Classifies one raw argument. `next` is the argument after it, if any, and
/// `pattern_seen` is true once an earlier argument was taken as a pattern.
pub fn classify<'a>(token: &'a str, next: Option<&'a str>, pattern_seen: bool) -> Token<'a> {
    if token == SESSION_MARKER {
        return Token::SessionStart;
    }
    if token == ALL_NAMESPACES_MARKER {
        return Token::AllNamespaces;
    }
    if let Some(kind) = next
        && is_kind_verb(token)
    {
        return Token::KindVerb { verb: token, kind };
    }
    if !pattern_seen && let Some(pattern) = PatternToken::parse(token) {
        return Token::Pattern(pattern);
    }
    Token::Passthrough(token)
}

fn is_kind_verb(token: &str) -> bool {
    KIND_VERBS
        .iter()
        .any(|verb| verb.eq_ignore_ascii_case(token))
}

/// Turns kctl arguments into kubectl arguments.
pub struct Rewriter<S, P> {
    source: S,
    session: SessionEnvBuilder<P>,
    default_kind: String,
    shell: String,
}

impl<S: ResourceSource, P: TerminalProbe> Rewriter<S, P> {
    pub fn new(
        source: S,
        session: SessionEnvBuilder<P>,
        default_kind: impl Into<String>,
        shell: impl Into<String>,
    ) -> Self {
        Self {
            source,
            session,
            default_kind: default_kind.into(),
            shell: shell.into(),
        }
    }

    pub async fn rewrite(&self, raw: &[String]) -> Result<Vec<String>, RewriteError> {
        let mut kind = self.default_kind.as_str();
        // One slot, filled on first use and never refetched, even for another kind.
        let mut cache: Option<Vec<Resource>> = None;
        let mut pattern_seen = false;
        let mut args = Vec::with_capacity(raw.len());
        let mut tail = Vec::new();

        for (index, token) in raw.iter().enumerate() {
            let next = raw.get(index + 1).map(String::as_str);
            let classified = classify(token, next, pattern_seen);
            trace!(?classified, "classified argument");

            match classified {
                Token::SessionStart => {
                    args.extend(["exec".to_string(), "-it".to_string()]);
                    tail = self.session.build().await;
                    tail.push(self.shell.clone());
                }
                Token::AllNamespaces => args.push("--all-namespaces".to_string()),
                Token::KindVerb { verb, kind: next_kind } => {
                    args.push(verb.to_string());
                    kind = next_kind;
                }
                Token::Pattern(pattern) => {
                    pattern_seen = true;
                    if cache.is_none() {
                        cache = Some(self.source.fetch(kind).await?);
                    }
                    let resources = cache.as_deref().unwrap_or_default();
                    let found = resolve(resources, kind, pattern.namespace, pattern.name)?;
                    debug!(%found, kind, "resolved pattern");

                    if !pattern.name.is_empty() {
                        args.push(found.name.clone());
                    }
                    if !pattern.is_empty() {
                        args.push("--namespace".to_string());
                        args.push(found.namespace);
                    }
                }
                Token::Passthrough(token) => args.push(token.to_string()),
            }
        }

        args.extend(tail);
        Ok(args)
    }
}
