//! IAM role bindings for the default compute service account.
//!
//! Cloud Run source deploys build with Cloud Build running as
//! `<project-number>-compute@developer.gserviceaccount.com`. Without these
//! roles the build fails with `PERMISSION_DENIED`.

use crate::report::{Reporter, Stage};
use crate::runner::{CommandRunner, Invocation};

/// Suffix appended to the project number to form the compute service account.
pub const COMPUTE_SERVICE_ACCOUNT_SUFFIX: &str = "-compute@developer.gserviceaccount.com";

/// Roles granted before deploying, in the order they are bound.
pub const DEPLOY_ROLES: [&str; 3] = [
    "roles/cloudbuild.builds.builder",
    "roles/iam.serviceAccountUser",
    "roles/storage.admin",
];

/// Default compute service account for a project number.
pub fn compute_service_account(project_number: &str) -> String {
    format!("{project_number}{COMPUTE_SERVICE_ACCOUNT_SUFFIX}")
}

/// Build the policy binding command for one role.
pub fn binding_invocation(
    gcloud: &str,
    project_id: &str,
    service_account: &str,
    role: &str,
) -> Invocation {
    Invocation::new(gcloud, format!("Failed to assign role {role}")).args([
        "projects".to_string(),
        "add-iam-policy-binding".to_string(),
        project_id.to_string(),
        format!("--member=serviceAccount:{service_account}"),
        format!("--role={role}"),
        "--quiet".to_string(),
    ])
}

/// Which roles were bound and which were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantReport {
    /// Service account the roles were bound to
    pub service_account: String,
    /// Roles bound successfully
    pub granted: Vec<String>,
    /// Roles whose binding command failed
    pub failed: Vec<String>,
}

impl GrantReport {
    /// Whether every role was bound.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Bind every role in [`DEPLOY_ROLES`] to the project's compute service account.
///
/// Each binding is attempted regardless of earlier failures and nothing is
/// rolled back. The returned report is informational only.
pub fn grant_deploy_roles(
    runner: &dyn CommandRunner,
    reporter: &dyn Reporter,
    gcloud: &str,
    project_id: &str,
    project_number: &str,
) -> GrantReport {
    let service_account = compute_service_account(project_number);
    reporter.stage(
        Stage::Permissions,
        &format!("Setting up IAM permissions for {service_account}..."),
    );

    let mut report = GrantReport {
        service_account,
        ..GrantReport::default()
    };

    for role in DEPLOY_ROLES {
        let inv = binding_invocation(gcloud, project_id, &report.service_account, role);
        match runner.run(&inv, reporter) {
            Some(_) => report.granted.push(role.to_string()),
            None => report.failed.push(role.to_string()),
        }
    }

    reporter.success("IAM permissions updated.");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Event, RecordingReporter};
    use crate::runner::MockRunner;

    #[test]
    fn test_compute_service_account() {
        assert_eq!(
            compute_service_account("123456"),
            "123456-compute@developer.gserviceaccount.com"
        );
    }

    #[test]
    fn test_binding_invocation() {
        let inv = binding_invocation(
            "gcloud",
            "demo-proj",
            "999-compute@developer.gserviceaccount.com",
            "roles/storage.admin",
        );
        assert_eq!(
            inv.to_string(),
            "gcloud projects add-iam-policy-binding demo-proj \
             --member=serviceAccount:999-compute@developer.gserviceaccount.com \
             --role=roles/storage.admin --quiet"
        );
        assert_eq!(inv.label, "Failed to assign role roles/storage.admin");
        assert!(inv.captures());
    }

    #[test]
    fn test_grants_all_three_roles_in_order() {
        let mock = MockRunner::new();
        let reporter = RecordingReporter::new();

        let report = grant_deploy_roles(&mock, &reporter, "gcloud", "demo-proj", "999");

        let roles: Vec<String> = mock
            .calls()
            .iter()
            .map(|c| c.args[4].clone())
            .collect();
        assert_eq!(
            roles,
            vec![
                "--role=roles/cloudbuild.builds.builder",
                "--role=roles/iam.serviceAccountUser",
                "--role=roles/storage.admin",
            ]
        );
        assert!(report.is_complete());
        assert_eq!(report.granted.len(), 3);
        assert_eq!(
            report.service_account,
            "999-compute@developer.gserviceaccount.com"
        );
    }

    #[test]
    fn test_failure_does_not_stop_later_roles() {
        let mock = MockRunner::new();
        mock.fail("--role=roles/cloudbuild.builds.builder", "PERMISSION_DENIED");
        let reporter = RecordingReporter::new();

        let report = grant_deploy_roles(&mock, &reporter, "gcloud", "demo-proj", "999");

        assert_eq!(mock.calls().len(), 3);
        assert_eq!(report.failed, vec!["roles/cloudbuild.builds.builder"]);
        assert_eq!(
            report.granted,
            vec!["roles/iam.serviceAccountUser", "roles/storage.admin"]
        );
        assert_eq!(
            reporter.errors(),
            vec!["Failed to assign role roles/cloudbuild.builds.builder".to_string()]
        );
        // completion is reported even with a failed binding
        assert_eq!(
            reporter.events().last(),
            Some(&Event::Success("IAM permissions updated.".to_string()))
        );
    }

    #[test]
    fn test_all_failures_still_attempt_every_role() {
        let mock = MockRunner::new();
        mock.fail("add-iam-policy-binding", "boom");
        let reporter = RecordingReporter::new();

        let report = grant_deploy_roles(&mock, &reporter, "gcloud", "demo-proj", "1");

        assert_eq!(mock.calls().len(), 3);
        assert_eq!(report.failed.len(), 3);
        assert!(!report.is_complete());
    }
}
