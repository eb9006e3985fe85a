use anyhow::{Context as _, Result};
use deploykit::{DeployOutcome, Deployer, Invocation};
use std::process::ExitCode;

use crate::Context;
use crate::cli::DeployArgs;
use crate::ui;

/// Placeholder shown in dry-run output where the resolved project number goes.
const PROJECT_NUMBER_PLACEHOLDER: &str = "${PROJECT_NUMBER}";

pub fn run(ctx: &Context, args: DeployArgs) -> Result<ExitCode> {
    let dry_run = args.dry_run;
    let json = args.json;
    let deployer = Deployer::new(args.into_config());

    if dry_run {
        return print_plan(&deployer, json);
    }

    let reporter = ui::TermReporter::new(ctx.quiet);
    let outcome = deployer.deploy(&reporter);
    log_outcome(ctx, &outcome);

    Ok(exit_code(&outcome))
}

fn print_plan(deployer: &Deployer, json: bool) -> Result<ExitCode> {
    let plan = match deployer.plan(PROJECT_NUMBER_PLACEHOLDER) {
        Ok(plan) => plan,
        Err(e) => {
            ui::error(&e.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", plan_json(&plan)?);
        return Ok(ExitCode::SUCCESS);
    }

    ui::header("Deployment Plan");
    for (i, inv) in plan.iter().enumerate() {
        println!("  {}. {}", i + 1, inv);
        if !inv.captures() {
            ui::dim("   (output streamed)");
        }
    }
    println!();
    ui::info("Dry run: nothing was executed.");
    Ok(ExitCode::SUCCESS)
}

fn plan_json(plan: &[Invocation]) -> Result<String> {
    serde_json::to_string_pretty(plan).context("Failed to serialize plan")
}

fn log_outcome(ctx: &Context, outcome: &DeployOutcome) {
    if let Some(grants) = outcome.grants() {
        log::info!(
            "granted {} role(s) to {}",
            grants.granted.len(),
            grants.service_account
        );
        if !grants.is_complete() && !ctx.quiet {
            ui::warn(&format!(
                "Not all roles were granted ({}); Cloud Build may fail with PERMISSION_DENIED",
                grants.failed.join(", ")
            ));
        }
    }
    log::debug!("deploy outcome: {outcome:?}");
}

/// Any pipeline step that stopped the deploy fails the process.
pub fn exit_code(outcome: &DeployOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploykit::{DeployConfig, GrantReport};
    use serde_json::Value;

    fn is_success(code: ExitCode) -> bool {
        format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
    }

    #[test]
    fn test_exit_code_follows_outcome() {
        assert!(is_success(exit_code(&DeployOutcome::Deployed { grants: None })));
        assert!(!is_success(exit_code(&DeployOutcome::MissingProject)));
        assert!(!is_success(exit_code(&DeployOutcome::ProjectLookupFailed)));
        assert!(!is_success(exit_code(&DeployOutcome::DeployFailed {
            grants: Some(GrantReport::default())
        })));
    }

    #[test]
    fn test_plan_json_lists_every_command() {
        let deployer = Deployer::new(DeployConfig::default().with_project("demo-proj"));
        let plan = deployer.plan(PROJECT_NUMBER_PLACEHOLDER).unwrap();

        let json: Value = serde_json::from_str(&plan_json(&plan).unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 5);

        let describe = &entries[0];
        assert_eq!(describe["program"], "gcloud");
        assert_eq!(describe["args"][0], "projects");
        assert_eq!(describe["label"], "Failed to fetch project details.");
        assert_eq!(describe["mode"], "capture");

        let member = "--member=serviceAccount:${PROJECT_NUMBER}-compute@developer.gserviceaccount.com";
        assert_eq!(entries[1]["args"][3], member);

        let deploy = &entries[4];
        assert_eq!(deploy["program"], "adk");
        assert_eq!(deploy["label"], "Deployment failed.");
        assert_eq!(deploy["mode"], "stream");
    }

    #[test]
    fn test_plan_without_project_fails() {
        let deployer = Deployer::new(DeployConfig::default());
        assert!(!is_success(print_plan(&deployer, true).unwrap()));
        assert!(!is_success(print_plan(&deployer, false).unwrap()));
    }
}
