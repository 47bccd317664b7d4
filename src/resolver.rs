use regex::Regex;
use tracing::debug;

use crate::error::RewriteError;
use crate::model::Resource;

/// Narrows `resources` down to a single entry.
///
/// The namespace pattern runs first and only has to keep at least one entry. The name
/// pattern must then leave exactly one. Patterns are unanchored regular expressions;
/// an empty pattern skips its stage.
pub fn resolve(
    resources: &[Resource],
    kind: &str,
    namespace_pattern: &str,
    name_pattern: &str,
) -> Result<Resource, RewriteError> {
    let mut candidates = resources.iter().collect::<Vec<_>>();

    if !namespace_pattern.is_empty() {
        let matcher = compile(namespace_pattern)?;
        candidates.retain(|resource| matcher.is_match(&resource.namespace));
        debug!(
            pattern = namespace_pattern,
            kept = candidates.len(),
            "filtered by namespace"
        );
        if candidates.is_empty() {
            return Err(RewriteError::NoNamespaceMatch {
                pattern: namespace_pattern.to_string(),
            });
        }
    }

    if !name_pattern.is_empty() {
        let matcher = compile(name_pattern)?;
        candidates.retain(|resource| matcher.is_match(&resource.name));
        debug!(
            pattern = name_pattern,
            kept = candidates.len(),
            "filtered by name"
        );
        if candidates.len() > 1 {
            return Err(RewriteError::Ambiguous {
                kind: kind.to_string(),
                matches: candidates.into_iter().cloned().collect(),
            });
        }
    }

    candidates
        .first()
        .map(|resource| (*resource).clone())
        .ok_or_else(|| RewriteError::NoMatch {
            kind: kind.to_string(),
            pattern: name_pattern.to_string(),
        })
}

fn compile(pattern: &str) -> Result<Regex, RewriteError> {
    Regex::new(pattern).map_err(|source| RewriteError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
