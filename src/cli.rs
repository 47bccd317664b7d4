use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kctl",
    about = "kubectl with namespace:name pattern lookup and ssh sessions.",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Arguments forwarded to kubectl after rewriting
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub const HELP_TEXT: &str = r#"
kctl is a tool to help make Kubernetes (kubectl) easier to use.

Usage:
  kctl [args]

kctl with no arguments will show this help message. Using --help will show
kubectl help. Generally kctl is aliased as "k" and the rest of the documentation
will reflect this. k proxies all arguments through to kubectl with a few
exceptions where it augments the arguments passed in to provide an easier
user interface.

There are 2 augmentations that k has over regular kubectl:
1. pattern matching
   When trying to find a service/pod, you can use a colon to denote a "search".
   On the left hand side of the colon is a namespace pattern and on the right
   is a resource pattern. The pattern syntax is described here:
   https://github.com/google/re2/wiki/Syntax

   Only the first argument containing a colon is treated as a search.

   Examples:
   k get pods :             # Get pods in --all-namespaces
   k get pods default:      # Get pods in a namespace matching "default"
   k describe pod f:^api$   # Describe the pod matching the patterns
   k exec 'f:^api.*' ps afx # Run ps afx on the pod matched by "f:^api.*"
   k get services 'def.*:'  # Get services in a namespace matching "def.*"

2. ssh command
   The ssh command starts a bash session inside a pod and carries over your
   terminal settings so that width/height and terminal type are set correctly
   for the new session.

   Example: k ssh default:podname

Environment:
   KCTL_CONFIG   path to a YAML config (kubectl, default_kind, shell,
                 fallback_term, echo)
   KCTL_LOG      log filter, for example debug or kctl=trace
"#;

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn captures_arguments_verbatim() {
        let cli = CliArgs::try_parse_from(["kctl", "get", "pods", "-o", "wide", ":"])
            .expect("arguments parse");
        assert_eq!(cli.args, vec!["get", "pods", "-o", "wide", ":"]);
    }

    #[test]
    fn no_arguments_is_empty() {
        let cli = CliArgs::try_parse_from(["kctl"]).expect("arguments parse");
        assert!(cli.args.is_empty());
    }

    #[test]
    fn help_flag_is_forwarded() {
        let cli = CliArgs::try_parse_from(["kctl", "get", "--help"]).expect("arguments parse");
        assert_eq!(cli.args, vec!["get", "--help"]);
    }
}
