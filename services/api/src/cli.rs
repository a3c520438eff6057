use crate::report::{run_questions, run_report, QuestionsArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_assessment::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Math Assessment Lead Intake",
    about = "Serve the child math assessment API or render reports from the command line",
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
    /// Print the questions and answer options for one age group
    Questions(QuestionsArgs),
    /// Render an assessment report from a saved set of answers
    Report(ReportArgs),
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
        Command::Questions(args) => run_questions(args),
        Command::Report(args) => run_report(args),
    }
}
