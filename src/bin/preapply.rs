// CLI entrypoint for PreApply

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the PreApply CLI
#[derive(Debug, Clone, Copy)]
enum ExitCode {
    Success = 0,
    RuntimeError = 1,
    PolicyBlock = 2,
    ApprovalRequired = 3,
}

impl ExitCode {
    fn from_code(code: i32) -> Self {
        match code {
            0 => ExitCode::Success,
            2 => ExitCode::PolicyBlock,
            3 => ExitCode::ApprovalRequired,
            _ => ExitCode::RuntimeError,
        }
    }

    fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

#[derive(Parser)]
#[command(name = "preapply")]
#[command(about = "Deterministic pre-apply risk analysis for Terraform plans", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file (overrides PREAPPLY_CONFIG)
    #[arg(long, global = true, env = "PREAPPLY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a Terraform plan and emit the risk assessment
    ///
    /// Examples:
    ///   preapply analyze tfplan.json
    ///   preapply analyze tfplan.json --json
    ///   preapply analyze tfplan.json --output report.json --quiet
    Analyze(preapply::cli::analyze::AnalyzeCommand),

    /// Explain per-resource analysis detail
    ///
    /// Examples:
    ///   preapply explain tfplan.json
    ///   preapply explain tfplan.json aws_db_instance.prod
    ///   preapply explain tfplan.json --list-resources
    Explain(preapply::cli::explain::ExplainCommand),

    /// Print a one-screen summary of a plan
    Summary(preapply::cli::summary::SummaryCommand),

    /// Evaluate a plan against a policy document
    ///
    /// Examples:
    ///   preapply policy check tfplan.json --policy-file policy.yaml
    ///   preapply policy check tfplan.json --policy-file policy.yaml --enforcement-mode manual
    Policy {
        #[command(subcommand)]
        command: preapply::cli::policy::PolicyCommand,
    },
}

fn main() {
    init_tracing();
    preapply::cli::utils::init_colors();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Success.exit(),
                _ => ExitCode::RuntimeError.exit(),
            }
        }
    };

    match run(cli) {
        Ok(code) => ExitCode::from_code(code).exit(),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::RuntimeError.exit()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = preapply::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze(cmd) => cmd.run(config),
        Commands::Explain(cmd) => cmd.run(config),
        Commands::Summary(cmd) => cmd.run(config),
        Commands::Policy { command } => match command {
            preapply::cli::policy::PolicyCommand::Check(cmd) => cmd.run(config),
        },
    }
}

/// Structured logging to stderr; stdout stays reserved for reports and JSON
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
