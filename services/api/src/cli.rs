use crate::demo::{run_demo, run_plan_preview, DemoArgs, PlanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use medreview_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "MedReview Assignment Engine",
    about = "Plan and commit reviewer assignments for the medical AI product directory",
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
    /// Preview an assignment plan against the sample catalog
    Plan(PlanArgs),
    /// Run an end-to-end plan-and-commit demo on the sample catalog
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
        Command::Plan(args) => run_plan_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}
