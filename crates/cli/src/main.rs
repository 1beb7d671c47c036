//! s3-doctor - S3-compatible object store connectivity diagnostics.

mod check;
mod verify;

use clap::{Parser, Subcommand};
use s3_doctor_common::{EnvConfig, StepReporter, StepStatus};

#[derive(Parser)]
#[command(
    name = "s3-doctor",
    about = "Validate connectivity to an S3-compatible object store under varying TLS configurations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect with the TLS fallback chain, then run the diagnostic steps
    Check,
    /// Exercise every trust mode explicitly, then list and clean up
    Verify,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            let mut reporter = StepReporter::stdout();
            reporter.step("ENV CHECK", StepStatus::Error, &err);
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Command::Check => check::run(&config).await,
        Command::Verify => verify::run(&config).await,
    };

    if let Err(err) = result {
        log::error!("connection could not be established: {err}");
        std::process::exit(1);
    }
}
