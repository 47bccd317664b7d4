use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub namespace: String,
    pub name: String,
}

impl Resource {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// A `namespace-pattern:name-pattern` argument, split on its first colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternToken<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
}

impl<'a> PatternToken<'a> {
    pub fn parse(token: &'a str) -> Option<Self> {
        let (namespace, name) = token.split_once(':')?;
        Some(Self { namespace, name })
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty() && self.name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub columns: u16,
}

pub fn join_resources(resources: &[Resource]) -> String {
    let joined = resources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{joined}]")
}
