//! Workflow commands and step outputs for the CI runner.

use console::style;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Environment variable naming the step output file.
const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

/// Escape a workflow command value.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn command(name: &str, value: &str) {
    println!("::{name}::{}", escape_data(value));
}

/// Begin a collapsible log group.
pub fn start_group(name: &str) {
    command("group", name);
}

/// End the current log group.
pub fn end_group() {
    println!("::endgroup::");
}

/// Keep `secret` out of the runner logs.
pub fn add_mask(secret: &str) {
    if !secret.is_empty() {
        command("add-mask", secret);
    }
}

/// Mark the step as failed with `message`.
pub fn set_failed(message: &str) {
    command("error", message);
}

/// Announce the created work item.
pub fn print_created(url: &str) {
    info!(url = %url, "Workitem was created");
    println!(
        "Workitem was created: {}",
        style(url).bold().force_styling(true)
    );
}

/// Destination of step outputs.
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    file: Option<PathBuf>,
}

impl Outputs {
    /// Outputs written to the file named by `GITHUB_OUTPUT`, if set.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var_os(OUTPUT_FILE_ENV)
            .filter(|path| !path.is_empty())
            .map_or_else(Self::default, Self::to_file)
    }

    /// Outputs appended to `path`.
    #[must_use]
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    /// Set a named step output.
    ///
    /// Without an output file the value is printed on its own line.
    ///
    /// # Errors
    /// Returns error if the output file cannot be written.
    pub fn set(&self, name: &str, value: &str) -> io::Result<()> {
        self.set_or_print(name, value, &mut io::stdout().lock())
    }

    fn set_or_print(&self, name: &str, value: &str, stdout: &mut impl Write) -> io::Result<()> {
        let Some(path) = &self.file else {
            return writeln!(stdout, "{value}");
        };

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(file_command_entry(name, value)?.as_bytes())
    }
}

/// `name<<delimiter` block for the output file.
fn file_command_entry(name: &str, value: &str) -> io::Result<String> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());

    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unexpected input: output '{name}' contains the delimiter"),
        ));
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}
