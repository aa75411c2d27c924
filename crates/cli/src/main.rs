//! runcmd - run a command, stream its output, report its exit status

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

use cmdrun_core::{CommandService, RunnerConfig};
use cmdrun_infra_system::SubprocessRunner;

use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "runcmd")]
#[command(about = "Run a command and report its exit status", long_about = None)]
#[command(version)]
struct Cli {
    /// Forward the command's stdout and stderr line by line
    #[arg(short, long)]
    debug: bool,

    /// Print the last line the command wrote to stdout
    #[arg(short, long)]
    capture: bool,

    /// Do not colorize stream labels
    #[arg(long)]
    no_color: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log format
    #[arg(long, value_enum, env = "CMDRUN_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Command to run followed by its arguments
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl Cli {
    /// Environment configuration with command-line flags applied on top
    fn runner_config(&self) -> Result<RunnerConfig> {
        let config = RunnerConfig::from_env().context("Invalid CMDRUN_* environment")?;
        Ok(self.apply_flags(config))
    }

    /// Flags only ever switch settings on (`--debug`) or off (`--no-color`);
    /// an absent flag keeps the configured value
    fn apply_flags(&self, mut config: RunnerConfig) -> RunnerConfig {
        if self.debug {
            config = config.with_debug(true);
        }
        if self.no_color {
            config = config.with_color(false);
        }
        config
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct Outcome {
    command: String,
    status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_line: Option<String>,
}

/// Process exit code for a status (the OS keeps the low 8 bits)
fn exit_code(status: i32) -> ExitCode {
    ExitCode::from((status & 0xff) as u8)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.runner_config()?;
    logging::init(cli.log_format, config.debug)?;

    debug!(config = ?config, "runcmd v{} starting", cmdrun_core::VERSION);

    let service = CommandService::new(Arc::new(SubprocessRunner::with_console(config)));
    let (program, args) = cli
        .command
        .split_first()
        .context("No command given")?;

    let outcome = if cli.capture {
        let (line, status) = service.run_cmd_output(program, args).await;
        Outcome {
            command: program.clone(),
            status,
            last_line: Some(line),
        }
    } else {
        Outcome {
            command: program.clone(),
            status: service.run_cmd(program, args).await,
            last_line: None,
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else if let Some(line) = &outcome.last_line {
        println!("{}", line);
    }

    Ok(exit_code(outcome.status))
}
