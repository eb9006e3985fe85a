//! Deployment configuration.

use std::path::PathBuf;

/// Environment variable holding the Google Cloud project identifier.
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
/// Environment variable overriding the `gcloud` executable.
pub const GCLOUD_ENV: &str = "ADK_DEPLOY_GCLOUD";
/// Environment variable overriding the `adk` executable.
pub const ADK_ENV: &str = "ADK_DEPLOY_ADK";

/// Cloud Run region.
pub const DEFAULT_REGION: &str = "us-central1";
/// Agent source directory.
pub const DEFAULT_SOURCE: &str = "./Agent1";
/// Cloud Run service name.
pub const DEFAULT_SERVICE_NAME: &str = "agent1service";
/// ADK application name.
pub const DEFAULT_APP_NAME: &str = "agent1app";
/// Provider CLI executable.
pub const DEFAULT_GCLOUD: &str = "gcloud";
/// Deploy CLI executable.
pub const DEFAULT_ADK: &str = "adk";

/// Everything the pipeline needs to know, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Google Cloud project identifier; validated when the pipeline starts
    pub project_id: Option<String>,
    /// Cloud Run region
    pub region: String,
    /// Agent source directory passed to `adk deploy`
    pub source: PathBuf,
    /// Cloud Run service name
    pub service_name: String,
    /// ADK application name
    pub app_name: String,
    /// Provider CLI executable
    pub gcloud: String,
    /// Deploy CLI executable
    pub adk: String,
    /// Skip the IAM binding step
    pub skip_iam: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            region: DEFAULT_REGION.to_string(),
            source: PathBuf::from(DEFAULT_SOURCE),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            gcloud: DEFAULT_GCLOUD.to_string(),
            adk: DEFAULT_ADK.to_string(),
            skip_iam: false,
        }
    }
}

impl DeployConfig {
    /// Set the project identifier.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// The project identifier, if set to something non-blank.
    pub fn project(&self) -> Option<&str> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Source path as passed on the command line.
    pub fn source_arg(&self) -> String {
        self.source.to_string_lossy().into_owned()
    }
}
