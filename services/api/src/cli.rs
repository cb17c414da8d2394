use crate::commands::{run_symptoms, run_triage, run_units, SymptomsArgs, TriageArgs, UnitsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use guia_saude::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Guia Saúde",
    about = "Symptom triage and health unit directory for the Quixadá public network",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a set of symptoms and print the recommended care tier
    Triage(TriageArgs),
    /// List health units, optionally filtered by type and text
    Units(UnitsArgs),
    /// List the symptom catalog, optionally filtered by name
    Symptoms(SymptomsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Triage(args) => run_triage(args).await,
        Command::Units(args) => run_units(args).await,
        Command::Symptoms(args) => run_symptoms(args).await,
    }
}
