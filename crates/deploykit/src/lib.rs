//! # deploykit
//!
//! Deploy an ADK agent to Cloud Run with `gcloud` and `adk`.
//!
//! The pipeline is linear and each step gates the next:
//! 1. Resolve the project number (`gcloud projects describe`)
//! 2. Grant the default compute service account the roles Cloud Build needs
//!    (`gcloud projects add-iam-policy-binding`, once per role)
//! 3. Run `adk deploy cloud_run`, streaming its output
//!
//! Failures are reported through a [`Reporter`] and turned into an early
//! return. A failed role binding is reported but never stops the pipeline.
//!
//! ## Example
//!
//! ```no_run
//! use deploykit::{DeployConfig, Deployer, NoReporter};
//!
//! let config = DeployConfig::default().with_project("my-project");
//! let deployer = Deployer::new(config);
//!
//! let outcome = deployer.deploy(&NoReporter);
//! assert!(outcome.is_success());
//! ```
//!
//! ## Testing
//!
//! [`MockRunner`] answers commands from scripted rules and records every
//! invocation; [`RecordingReporter`] keeps every status line.
//!
//! ```
//! use deploykit::{DeployConfig, Deployer, MockRunner, RecordingReporter};
//!
//! let mock = MockRunner::new();
//! mock.succeed_with("projects describe", r#"{"projectNumber": "999"}"#);
//!
//! let config = DeployConfig::default().with_project("demo-proj");
//! let deployer = Deployer::with_runner(Box::new(mock.clone()), config);
//! let outcome = deployer.deploy(&RecordingReporter::new());
//!
//! assert!(outcome.is_success());
//! assert_eq!(mock.calls().len(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod deploy;
pub mod error;
pub mod iam;
pub mod project;
pub mod report;
pub mod runner;

pub use config::DeployConfig;
pub use error::{Error, Result};
pub use iam::GrantReport;
pub use report::{Event, NoReporter, RecordingReporter, Reporter, Stage};
pub use runner::{
    CommandRunner, Invocation, MockResponse, MockRunner, Outcome, OutputMode,
    system::SystemRunner,
};

/// How a deployment run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// No project identifier was configured; nothing was run
    MissingProject,
    /// The project number could not be resolved
    ProjectLookupFailed,
    /// The deploy command failed
    DeployFailed {
        /// Role binding results, if the IAM step ran
        grants: Option<GrantReport>,
    },
    /// The deploy command succeeded
    Deployed {
        /// Role binding results, if the IAM step ran
        grants: Option<GrantReport>,
    },
}

impl DeployOutcome {
    /// Whether the deploy command ran and succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Deployed { .. })
    }

    /// Role binding results, if the IAM step ran.
    pub fn grants(&self) -> Option<&GrantReport> {
        match self {
            Self::DeployFailed { grants } | Self::Deployed { grants } => grants.as_ref(),
            _ => None,
        }
    }
}

/// Runs the resolve, grant, deploy pipeline.
pub struct Deployer {
    runner: Box<dyn CommandRunner>,
    config: DeployConfig,
}

impl Deployer {
    /// Create a deployer that runs real commands.
    pub fn new(config: DeployConfig) -> Self {
        Self::with_runner(Box::new(SystemRunner::new()), config)
    }

    /// Create a deployer with a custom runner (useful for testing).
    pub fn with_runner(runner: Box<dyn CommandRunner>, config: DeployConfig) -> Self {
        Self { runner, config }
    }

    /// Resolve the project number for the configured project.
    pub fn resolve_project_number(&self, reporter: &dyn Reporter) -> Result<Option<String>> {
        let project_id = self.config.project().ok_or(Error::MissingProject)?;
        Ok(project::resolve_project_number(
            self.runner.as_ref(),
            reporter,
            &self.config.gcloud,
            project_id,
        ))
    }

    /// Run the full pipeline.
    pub fn deploy(&self, reporter: &dyn Reporter) -> DeployOutcome {
        let Some(project_id) = self.config.project() else {
            reporter.error(&format!(
                "Error: {} not found in .env file.",
                config::PROJECT_ENV
            ));
            return DeployOutcome::MissingProject;
        };
        let runner = self.runner.as_ref();
        let gcloud = self.config.gcloud.as_str();

        let Some(project_number) =
            project::resolve_project_number(runner, reporter, gcloud, project_id)
        else {
            return DeployOutcome::ProjectLookupFailed;
        };

        let grants = if self.config.skip_iam {
            log::info!("skipping IAM role bindings");
            None
        } else {
            let report =
                iam::grant_deploy_roles(runner, reporter, gcloud, project_id, &project_number);
            if !report.is_complete() {
                log::info!(
                    "{} of {} role bindings failed: {}",
                    report.failed.len(),
                    iam::DEPLOY_ROLES.len(),
                    report.failed.join(", ")
                );
            }
            Some(report)
        };

        reporter.stage(
            Stage::Deploy,
            &format!(
                "Deploying agent '{}' to {project_id}...",
                self.config.app_name
            ),
        );

        let inv = deploy::deploy_invocation(&self.config, project_id);
        match runner.run(&inv, reporter) {
            Some(_) => {
                reporter.finished("Deployment completed successfully!");
                DeployOutcome::Deployed { grants }
            }
            None => DeployOutcome::DeployFailed { grants },
        }
    }

    /// Every command the pipeline would run, given the project number.
    ///
    /// Nothing is executed. The describe command is included even though its
    /// output is what produces `project_number`.
    pub fn plan(&self, project_number: &str) -> Result<Vec<Invocation>> {
        let project_id = self.config.project().ok_or(Error::MissingProject)?;
        let gcloud = self.config.gcloud.as_str();

        let mut plan = vec![project::describe_invocation(gcloud, project_id)];
        if !self.config.skip_iam {
            let service_account = iam::compute_service_account(project_number);
            plan.extend(iam::DEPLOY_ROLES.iter().map(|role| {
                iam::binding_invocation(gcloud, project_id, &service_account, role)
            }));
        }
        plan.push(deploy::deploy_invocation(&self.config, project_id));
        Ok(plan)
    }
}
