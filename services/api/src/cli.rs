use crate::demo::{run_catalogue, run_demo, run_evaluer, CatalogueArgs, DemoArgs, EvaluerArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mutafriches::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mutafriches",
    about = "Score the reconversion potential of brownfield sites from the command line",
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
    /// Evaluate a site described in a JSON request file
    Evaluer(EvaluerArgs),
    /// Print the weights and impacts applied to one usage
    Catalogue(CatalogueArgs),
    /// Evaluate a built-in sample friche and print the ranking
    Demo(DemoArgs),
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
        Command::Evaluer(args) => run_evaluer(args),
        Command::Catalogue(args) => run_catalogue(args),
        Command::Demo(args) => run_demo(args),
    }
}
