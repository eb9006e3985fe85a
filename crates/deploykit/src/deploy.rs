//! The `adk deploy cloud_run` command.

use crate::config::DeployConfig;
use crate::runner::Invocation;

/// Artifact service used by the deployed agent.
pub const ARTIFACT_SERVICE_URI: &str = "memory://";

/// Build the streamed deploy command for `project_id`.
pub fn deploy_invocation(config: &DeployConfig, project_id: &str) -> Invocation {
    Invocation::new(&config.adk, "Deployment failed.")
        .args(["deploy", "cloud_run"])
        .args([
            format!("--project={project_id}"),
            format!("--region={}", config.region),
            format!("--service_name={}", config.service_name),
            format!("--app_name={}", config.app_name),
            format!("--artifact_service_uri={ARTIFACT_SERVICE_URI}"),
            "--with_ui".to_string(),
            config.source_arg(),
        ])
        .streamed()
}
