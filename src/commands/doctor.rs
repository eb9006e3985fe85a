use anyhow::Result;
use colored::Colorize;
use deploykit::runner::system::command_exists;
use deploykit::{DeployConfig, Deployer, NoReporter};
use std::process::ExitCode;

use crate::Context;
use crate::cli::TargetArgs;
use crate::ui;

struct Issue {
    category: &'static str,
    summary: String,
    fix: Option<String>,
}

pub fn run(ctx: &Context, args: TargetArgs) -> Result<ExitCode> {
    let config = args.into_config();
    ui::header("Deploy Readiness Check");

    let mut issues: Vec<Issue> = Vec::new();

    check_commands(&config, &mut issues);
    check_target(&config, &mut issues);
    check_project(ctx, &config, &mut issues);

    println!();
    if issues.is_empty() {
        ui::success("Ready to deploy!");
        Ok(ExitCode::SUCCESS)
    } else {
        print_issue_summary(&issues);
        Ok(ExitCode::FAILURE)
    }
}

fn print_issue_summary(issues: &[Issue]) {
    let count = issues.len();
    let label = if count == 1 { "Issue" } else { "Issues" };
    ui::header(&format!("{count} {label} Found"));

    for (i, issue) in issues.iter().enumerate() {
        println!(
            "  {}  {} {}",
            format!("{}.", i + 1).bold(),
            issue.summary,
            format!("[{}]", issue.category).dimmed()
        );
        if let Some(fix) = &issue.fix {
            println!("      {} {}", "Fix:".cyan(), fix);
        }
    }
}

fn check_commands(config: &DeployConfig, issues: &mut Vec<Issue>) {
    ui::section("Required Commands");

    let commands = [
        (
            config.gcloud.as_str(),
            "Google Cloud CLI",
            "Install from https://cloud.google.com/sdk/docs/install",
        ),
        (
            config.adk.as_str(),
            "Agent Development Kit CLI",
            "pip install google-adk",
        ),
    ];

    for (cmd, desc, install_hint) in commands {
        if command_exists(cmd) {
            println!("  {} {} - {}", "✓".green(), cmd, desc.dimmed());
        } else {
            println!("  {} {} - {} {}", "✗".red(), cmd, desc, "(missing)".red());
            issues.push(Issue {
                category: "Required Commands",
                summary: format!("{cmd} is not installed"),
                fix: Some(install_hint.to_string()),
            });
        }
    }
}

fn check_target(config: &DeployConfig, issues: &mut Vec<Issue>) {
    ui::section("Deploy Target");

    ui::kv("Region", &config.region);
    ui::kv("Service", &config.service_name);
    ui::kv("App", &config.app_name);
    ui::kv("Source", &config.source_arg());

    if !config.source.is_dir() {
        issues.push(Issue {
            category: "Deploy Target",
            summary: format!("agent source {} is not a directory", config.source.display()),
            fix: Some("Pass --source <DIR> pointing at the agent package".to_string()),
        });
    }
}

fn check_project(ctx: &Context, config: &DeployConfig, issues: &mut Vec<Issue>) {
    ui::section("Project");

    let Some(project_id) = config.project() else {
        ui::error("GOOGLE_CLOUD_PROJECT is not set");
        issues.push(Issue {
            category: "Project",
            summary: "no project configured".to_string(),
            fix: Some("Add GOOGLE_CLOUD_PROJECT=<id> to .env or pass --project".to_string()),
        });
        return;
    };
    ui::kv("Project", project_id);

    if !command_exists(&config.gcloud) {
        ui::dim("skipping project lookup, gcloud unavailable");
        return;
    }

    let deployer = Deployer::new(config.clone());
    let reporter = if ctx.verbose > 0 {
        Box::new(ui::TermReporter::new(ctx.quiet)) as Box<dyn deploykit::Reporter>
    } else {
        Box::new(NoReporter)
    };

    match deployer.resolve_project_number(reporter.as_ref()) {
        Ok(Some(number)) => {
            ui::kv("Project number", &number);
            ui::kv(
                "Service account",
                &deploykit::iam::compute_service_account(&number),
            );
        }
        Ok(None) | Err(_) => issues.push(Issue {
            category: "Project",
            summary: format!("could not resolve project number for {project_id}"),
            fix: Some("Run `gcloud auth login` and check the project ID".to_string()),
        }),
    }
}
