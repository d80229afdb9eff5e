use crate::demo::{run_demo, run_open, DemoArgs, OpenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pension_setup::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Pension Account Opening",
    about = "Run the pension account opening service or exercise it from the command line",
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
    /// Open a single account against in-memory collaborators
    Open(OpenArgs),
    /// Run a scripted set of applicants covering opened and declined outcomes
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
        Command::Open(args) => run_open(args),
        Command::Demo(args) => run_demo(args),
    }
}
