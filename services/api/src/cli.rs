use crate::report::{run_analyze, run_resolve, AnalyzeArgs, ResolveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use wikicred::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "wikicred",
    about = "Score the reliability of encyclopedia articles from the command line or over HTTP",
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
    /// Resolve, collect, and score one article
    Analyze(AnalyzeArgs),
    /// Show how a title resolves and which candidates it suggests
    Resolve(ResolveArgs),
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
        Command::Analyze(args) => run_analyze(args).await,
        Command::Resolve(args) => run_resolve(args).await,
    }
}
