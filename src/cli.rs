use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use deploykit::DeployConfig;
use deploykit::config::{
    ADK_ENV, DEFAULT_ADK, DEFAULT_APP_NAME, DEFAULT_GCLOUD, DEFAULT_REGION, DEFAULT_SERVICE_NAME,
    DEFAULT_SOURCE, GCLOUD_ENV, PROJECT_ENV,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "adk-deploy")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Deploy an ADK agent to Cloud Run", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub deploy: DeployArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve the project, grant IAM roles and run `adk deploy cloud_run` (default)
    Deploy(DeployArgs),

    /// Check that gcloud, adk and the project are ready for a deploy
    Doctor(TargetArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Deploy target
// ============================================================================

/// Where and what to deploy.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Google Cloud project ID
    #[arg(short, long, env = PROJECT_ENV)]
    pub project: Option<String>,

    /// Cloud Run region
    #[arg(short, long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Agent source directory
    #[arg(short, long, default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Cloud Run service name
    #[arg(long, default_value = DEFAULT_SERVICE_NAME)]
    pub service_name: String,

    /// ADK application name
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// gcloud executable
    #[arg(long, env = GCLOUD_ENV, default_value = DEFAULT_GCLOUD)]
    pub gcloud: String,

    /// adk executable
    #[arg(long, env = ADK_ENV, default_value = DEFAULT_ADK)]
    pub adk: String,
}

impl TargetArgs {
    /// Build the deploy configuration, expanding `~` in the source path.
    ///
    /// Blank values (an empty env var, say) fall back to the defaults; a blank
    /// project stays blank and is rejected when the pipeline starts.
    pub fn into_config(self) -> DeployConfig {
        let source = shellexpand::tilde(&self.source.to_string_lossy()).into_owned();
        DeployConfig {
            project_id: self.project,
            region: self.region,
            source: PathBuf::from(source),
            service_name: self.service_name,
            app_name: self.app_name,
            gcloud: or_default(self.gcloud, DEFAULT_GCLOUD),
            adk: or_default(self.adk, DEFAULT_ADK),
            skip_iam: false,
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Don't grant IAM roles to the compute service account
    #[arg(long)]
    pub skip_iam: bool,

    /// Print the commands that would run without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// With --dry-run, print the commands as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl DeployArgs {
    pub fn into_config(self) -> DeployConfig {
        DeployConfig {
            skip_iam: self.skip_iam,
            ..self.target.into_config()
        }
    }
}
