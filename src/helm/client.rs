// helm/client.rs

//! # Helm Client
//!
//! [`ReleaseSource`] is the seam between the diff and the deployment system:
//! it hands back rendered releases and nothing else. [`HelmCli`] implements
//! it by running the helm binary, which keeps chart fetching, values merging
//! and cluster access entirely on helm's side.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command as ProcessCommand, Output};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::release::RenderedRelease;
use crate::core::values::ValueOptions;
use crate::error::AppError;
use crate::globals::{helm_binary, kube_context};
use crate::utils::display::spinner;

/// Helm's message for an unknown release: `release: not found`, or
/// `release: "name" not found` on older versions.
static RELEASE_NOT_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\brelease: (?:"[^"]*" )?not found"#).expect("valid release-not-found regex")
});

/// What to render for the "after" side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub release: String,
    pub chart: String,
    pub namespace: String,
    pub values: ValueOptions,
}

/// Produces rendered manifests for the two sides of a diff.
pub trait ReleaseSource {
    /// The deployed release, or `None` if helm does not know it.
    fn current_release(
        &self,
        release: &str,
        namespace: &str,
    ) -> Result<Option<RenderedRelease>, AppError>;

    /// Dry-run upgrade of an existing release.
    fn upgrade_dry_run(&self, request: &UpgradeRequest) -> Result<RenderedRelease, AppError>;

    /// Dry-run install, used when the release does not exist yet.
    fn install_dry_run(&self, request: &UpgradeRequest) -> Result<RenderedRelease, AppError>;
}

/// [`ReleaseSource`] backed by the helm command line.
#[derive(Debug, Clone)]
pub struct HelmCli {
    binary: PathBuf,
    kube_context: Option<String>,
    env_vars: BTreeMap<String, String>,
}

impl HelmCli {
    pub fn new(
        binary: PathBuf,
        kube_context: Option<String>,
        env_vars: BTreeMap<String, String>,
    ) -> Self {
        Self {
            binary,
            kube_context,
            env_vars,
        }
    }

    /// Builds a client from the global helm settings.
    ///
    /// # Errors
    /// - `AppError::HelmNotFound` if the helm binary was never resolved.
    pub fn from_globals(env_vars: BTreeMap<String, String>) -> Result<Self, AppError> {
        let binary = helm_binary().ok_or(AppError::HelmNotFound)?;
        Ok(Self::new(
            binary.to_path_buf(),
            kube_context().map(str::to_string),
            env_vars,
        ))
    }

    /// `args` plus the flags every invocation carries.
    fn invocation_args(&self, args: &[String]) -> Vec<String> {
        let mut full = args.to_vec();
        if let Some(context) = &self.kube_context {
            full.push("--kube-context".to_string());
            full.push(context.clone());
        }
        full
    }

    fn run(&self, args: &[String], message: &str) -> Result<Output, AppError> {
        let args = self.invocation_args(args);
        let mut command = ProcessCommand::new(&self.binary);
        command.args(&args).envs(&self.env_vars);

        debug!("Running: {} {}", self.binary.display(), args.join(" "));
        let progress = spinner(message);
        let output = command.output();
        progress.finish_and_clear();

        Ok(output?)
    }

    fn run_checked(&self, args: &[String], message: &str) -> Result<String, AppError> {
        let output = self.run(args, message)?;
        if !output.status.success() {
            return Err(AppError::CommandFailed(failure_message(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn dry_run(&self, verb: &str, request: &UpgradeRequest) -> Result<RenderedRelease, AppError> {
        let args = dry_run_args(verb, request);
        let stdout = self.run_checked(
            &args,
            &format!("Rendering {} of {}...", verb, request.release),
        )?;
        Ok(RenderedRelease::from_json(&stdout)?)
    }
}

impl ReleaseSource for HelmCli {
    fn current_release(
        &self,
        release: &str,
        namespace: &str,
    ) -> Result<Option<RenderedRelease>, AppError> {
        let manifest_args = get_args("manifest", release, namespace);
        let output = self.run(&manifest_args, &format!("Fetching release {}...", release))?;
        if !output.status.success() {
            let message = failure_message(&output);
            if is_not_found(&message) {
                debug!("Release {} not found: {}", release, message);
                return Ok(None);
            }
            return Err(AppError::CommandFailed(message));
        }
        let manifest = String::from_utf8_lossy(&output.stdout).into_owned();

        let hooks = self.run_checked(
            &get_args("hooks", release, namespace),
            &format!("Fetching hooks of {}...", release),
        )?;

        Ok(Some(RenderedRelease::from_text(
            release, namespace, manifest, &hooks,
        )))
    }

    fn upgrade_dry_run(&self, request: &UpgradeRequest) -> Result<RenderedRelease, AppError> {
        self.dry_run("upgrade", request)
    }

    fn install_dry_run(&self, request: &UpgradeRequest) -> Result<RenderedRelease, AppError> {
        self.dry_run("install", request)
    }
}

fn get_args(what: &str, release: &str, namespace: &str) -> Vec<String> {
    vec![
        "get".to_string(),
        what.to_string(),
        release.to_string(),
        "--namespace".to_string(),
        namespace.to_string(),
    ]
}

/// Arguments for `helm upgrade|install --dry-run` printing the release as JSON.
fn dry_run_args(verb: &str, request: &UpgradeRequest) -> Vec<String> {
    let mut args = vec![
        verb.to_string(),
        request.release.clone(),
        request.chart.clone(),
        "--namespace".to_string(),
        request.namespace.clone(),
        "--dry-run".to_string(),
        "--output".to_string(),
        "json".to_string(),
    ];
    args.extend(request.values.helm_args(verb == "upgrade"));
    args
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("helm exited with {}", output.status)
    } else {
        stderr
    }
}

fn is_not_found(message: &str) -> bool {
    RELEASE_NOT_FOUND.is_match(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_args() {
        assert_eq!(
            get_args("hooks", "web", "prod"),
            vec!["get", "hooks", "web", "--namespace", "prod"]
        );
    }

    fn request() -> UpgradeRequest {
        UpgradeRequest {
            release: "web".to_string(),
            chart: "./web".to_string(),
            namespace: "prod".to_string(),
            values: ValueOptions {
                value_files: vec!["values.yaml".to_string()],
                reuse_values: true,
                reset_values: true,
                ..ValueOptions::default()
            },
        }
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found("Error: release: not found"));
        assert!(is_not_found("Error: release: \"web\" not found"));
        assert!(!is_not_found("Error: Kubernetes cluster unreachable"));
        assert!(!is_not_found(
            "Error: Kubernetes cluster unreachable: Get \"https://ABC.eks.amazonaws.com/version\": \
             getting credentials: exec: executable aws not found"
        ));
        assert!(!is_not_found("Error: chart \"web\" version \"9.9.9\" not found"));
    }

    #[test]
    fn test_upgrade_dry_run_args() {
        assert_eq!(
            dry_run_args("upgrade", &request()),
            vec![
                "upgrade",
                "web",
                "./web",
                "--namespace",
                "prod",
                "--dry-run",
                "--output",
                "json",
                "--values",
                "values.yaml",
                "--reuse-values",
                "--reset-values",
            ]
        );
    }

    #[test]
    fn test_install_dry_run_omits_upgrade_only_flags() {
        let args = dry_run_args("install", &request());
        assert_eq!(args[0], "install");
        assert!(args.contains(&"--values".to_string()));
        assert!(!args.contains(&"--reuse-values".to_string()));
        assert!(!args.contains(&"--reset-values".to_string()));
    }

    #[test]
    fn test_kube_context_is_appended() {
        let base = get_args("manifest", "web", "prod");

        let client = HelmCli::new(
            PathBuf::from("helm"),
            Some("staging".to_string()),
            BTreeMap::new(),
        );
        let args = client.invocation_args(&base);
        assert_eq!(&args[..base.len()], base.as_slice());
        assert_eq!(&args[base.len()..], ["--kube-context", "staging"]);

        let client = HelmCli::new(PathBuf::from("helm"), None, BTreeMap::new());
        assert_eq!(client.invocation_args(&base), base);
    }

    #[test]
    fn test_missing_binary_surfaces_io_error() {
        let client = HelmCli::new(
            PathBuf::from("/nonexistent/helm-for-tests"),
            None,
            BTreeMap::new(),
        );
        let result = client.current_release("web", "default");
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
