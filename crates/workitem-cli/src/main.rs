//! create-workitem - Create an Azure DevOps work item from a CI pipeline.

mod commands;
mod inputs;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Inputs follow the runner convention `INPUT_<NAME>`; each can also be
/// given as a flag.
#[derive(Parser)]
#[command(name = "create-workitem")]
#[command(author, version, about = "Create a work item with attachments")]
struct Cli {
    /// Personal access token
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Organization URL (e.g., https://dev.azure.com/my-org)
    #[arg(long, env = "INPUT_ORGANIZATION_URL")]
    organization_url: Option<String>,

    /// Project name
    #[arg(long, env = "INPUT_PROJECT")]
    project: Option<String>,

    /// Work item type (e.g., Bug, Task)
    #[arg(long, env = "INPUT_WORKITEM_TYPE")]
    workitem_type: Option<String>,

    /// Field assignments, one `name=value` per line (can be specified multiple times)
    #[arg(long = "field-mapping", env = "INPUT_FIELD_MAPPINGS")]
    field_mappings: Vec<String>,

    /// File patterns to attach, one per line (can be specified multiple times)
    #[arg(long = "attach-file", env = "INPUT_ATTACH_FILES")]
    attach_files: Vec<String>,

    /// Area path for attachment uploads
    #[arg(long, env = "INPUT_AREA_PATH")]
    area_path: Option<String>,

    /// Attachment upload type
    #[arg(long, env = "INPUT_UPLOAD_TYPE")]
    upload_type: Option<String>,

    /// Validate the work item without saving it
    #[arg(long, env = "INPUT_VALIDATE_ONLY")]
    validate_only: Option<String>,

    /// Bypass work item type rules
    #[arg(long, env = "INPUT_BYPASS_RULES")]
    bypass_rules: Option<String>,

    /// Do not send notifications for the change
    #[arg(long, env = "INPUT_SUPPRESS_NOTIFICATIONS")]
    suppress_notifications: Option<String>,

    /// Expand parameter (None, Relations, Fields, Links, All)
    #[arg(long, env = "INPUT_EXPAND")]
    expand: Option<String>,
}

impl From<Cli> for inputs::RawInputs {
    fn from(cli: Cli) -> Self {
        Self {
            token: cli.token,
            organization_url: cli.organization_url,
            project: cli.project,
            workitem_type: cli.workitem_type,
            field_mappings: cli.field_mappings,
            attach_files: cli.attach_files,
            area_path: cli.area_path,
            upload_type: cli.upload_type,
            validate_only: cli.validate_only,
            bypass_rules: cli.bypass_rules,
            suppress_notifications: cli.suppress_notifications,
            expand: cli.expand,
        }
    }
}

fn init_tracing() {
    // RUST_LOG wins; otherwise follow the runner's debug switch.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
        EnvFilter::new(if runner_debug { "debug" } else { "info" })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            output::set_failed(err.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };
    let outputs = output::Outputs::from_env();

    let result = inputs::ActionInputs::try_from(inputs::RawInputs::from(cli))
        .and_then(|inputs| commands::create(&inputs, &outputs));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            output::set_failed(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
