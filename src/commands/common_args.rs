// commands/common_args.rs

//! # Common Command Arguments
//!
//! Argument constructors shared by the `upgrade` and `manifests` commands,
//! and the conversion of their matches into [`DiffOptions`].

use clap::{value_parser, Arg, ArgAction, ArgMatches};

use crate::app::{
    DEFAULT_CONTEXT_STR, DEFAULT_ENV_FILE, DEFAULT_NAMESPACE, HELM_NAMESPACE_ENV, SECRET_KIND,
};
use crate::diff::{DiffOptions, OutputFormat};

/// Namespace to assume for documents that do not set one
pub fn namespace() -> Arg {
    Arg::new("namespace")
        .long("namespace")
        .help("Namespace to assume the release to be installed into")
        .env(HELM_NAMESPACE_ENV)
        .default_value(DEFAULT_NAMESPACE)
}

/// Kinds whose diff bodies are withheld
pub fn suppress() -> Arg {
    Arg::new("suppress")
        .long("suppress")
        .value_name("KIND")
        .help("Suppress the diff output of the given kind (can specify multiple)")
        .action(ArgAction::Append)
}

/// Shortcut for `--suppress Secret`
pub fn suppress_secrets() -> Arg {
    Arg::new("suppress-secrets")
        .short('q')
        .long("suppress-secrets")
        .help("Suppress secrets in the output")
        .action(ArgAction::SetTrue)
}

/// Lines of context around each change
pub fn context() -> Arg {
    Arg::new("context")
        .short('C')
        .long("context")
        .value_name("NUM")
        .help("Output NUM lines of context around changes (-1 shows everything)")
        .value_parser(value_parser!(i64))
        .allow_negative_numbers(true)
        .default_value(DEFAULT_CONTEXT_STR)
}

/// Report format
pub fn output() -> Arg {
    Arg::new("output")
        .long("output")
        .help("Output format: diff, simple or json")
        .value_parser(value_parser!(OutputFormat))
        .default_value("diff")
}

/// Exit with code 2 when changes are found
pub fn detailed_exitcode() -> Arg {
    Arg::new("detailed-exitcode")
        .long("detailed-exitcode")
        .help("Return a non-zero exit code when there are changes")
        .action(ArgAction::SetTrue)
}

/// Environment file handed to helm
pub fn env_file() -> Arg {
    Arg::new("env-file")
        .long("env-file")
        .help("Environment variables file passed to helm")
        .default_value(DEFAULT_ENV_FILE)
}

/// Extra environment variables for helm
pub fn env_var() -> Arg {
    Arg::new("env")
        .short('e')
        .long("env")
        .help("Set additional environment variables for helm (format: KEY=VALUE)")
        .action(ArgAction::Append)
}

/// Env file path and `KEY=VALUE` overrides from the matches.
pub fn env_args_from_matches(matches: &ArgMatches) -> (String, Vec<String>) {
    let env_file = matches
        .get_one::<String>("env-file")
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string());
    let overrides = matches
        .get_many::<String>("env")
        .map(|vars| vars.cloned().collect())
        .unwrap_or_default();
    (env_file, overrides)
}

/// Arguments controlling the comparison and its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffArgs {
    pub namespace: String,
    /// Includes `Secret` when `--suppress-secrets` is set.
    pub suppressed_kinds: Vec<String>,
    pub context: i64,
    pub output: OutputFormat,
    pub detailed_exitcode: bool,
}

impl DiffArgs {
    /// Differ configuration for these arguments.
    pub fn options(&self, color: bool) -> DiffOptions {
        self.suppressed_kinds
            .iter()
            .fold(DiffOptions::new(), |options, kind| options.suppress(kind.clone()))
            .with_context(self.context)
            .with_output(self.output)
            .with_color(color)
    }
}

/// Create DiffArgs from ArgMatches
pub fn diff_args_from_matches(matches: &ArgMatches) -> DiffArgs {
    let mut suppressed_kinds: Vec<String> = matches
        .get_many::<String>("suppress")
        .map(|kinds| kinds.cloned().collect())
        .unwrap_or_default();
    if matches.get_flag("suppress-secrets") && !suppressed_kinds.iter().any(|k| k == SECRET_KIND) {
        suppressed_kinds.push(SECRET_KIND.to_string());
    }

    DiffArgs {
        namespace: matches
            .get_one::<String>("namespace")
            .cloned()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        suppressed_kinds,
        context: matches.get_one::<i64>("context").copied().unwrap_or(-1),
        output: matches
            .get_one::<OutputFormat>("output")
            .copied()
            .unwrap_or_default(),
        detailed_exitcode: matches.get_flag("detailed-exitcode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    fn test_command() -> Command {
        Command::new("test")
            .arg(namespace())
            .arg(suppress())
            .arg(suppress_secrets())
            .arg(context())
            .arg(output())
            .arg(detailed_exitcode())
    }

    #[test]
    fn test_defaults() {
        let matches = test_command().try_get_matches_from(["test"]).unwrap();
        let args = diff_args_from_matches(&matches);

        assert_eq!(args.context, -1);
        assert_eq!(args.output, OutputFormat::Diff);
        assert!(args.suppressed_kinds.is_empty());
        assert!(!args.detailed_exitcode);
        assert_eq!(args.options(false).context, None);
    }

    #[test]
    fn test_suppression_flags_combine() {
        let matches = test_command()
            .try_get_matches_from([
                "test",
                "--suppress",
                "ConfigMap",
                "-q",
                "-C",
                "3",
                "--output",
                "simple",
                "--detailed-exitcode",
            ])
            .unwrap();
        let args = diff_args_from_matches(&matches);
        let options = args.options(false);

        assert_eq!(args.suppressed_kinds, vec!["ConfigMap", "Secret"]);
        assert!(options.is_suppressed("Secret"));
        assert!(options.is_suppressed("ConfigMap"));
        assert_eq!(options.context, Some(3));
        assert_eq!(options.output, OutputFormat::Simple);
        assert!(args.detailed_exitcode);
    }

    #[test]
    fn test_env_args() {
        let command = Command::new("test").arg(env_file()).arg(env_var());

        let matches = command.clone().try_get_matches_from(["test"]).unwrap();
        let (file, overrides) = env_args_from_matches(&matches);
        assert_eq!(file, ".env");
        assert!(overrides.is_empty());

        let matches = command
            .try_get_matches_from([
                "test",
                "--env-file",
                "ci.env",
                "-e",
                "KUBECONFIG=/tmp/kube",
                "--env",
                "HELM_DEBUG=1",
            ])
            .unwrap();
        let (file, overrides) = env_args_from_matches(&matches);
        assert_eq!(file, "ci.env");
        assert_eq!(overrides, vec!["KUBECONFIG=/tmp/kube", "HELM_DEBUG=1"]);
    }

    #[test]
    fn test_negative_context_is_accepted() {
        let matches = test_command()
            .try_get_matches_from(["test", "--context", "-1"])
            .unwrap();
        assert_eq!(diff_args_from_matches(&matches).context, -1);
    }
}
