use crate::demo::{
    run_assess, run_demo, run_profile_list, run_profile_show, run_synthetic, AssessArgs, DemoArgs,
    SyntheticArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use empathia::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EMPATHIA",
    about = "Match refugee profiles against assessed cases and recommend a resettlement country",
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
    /// Match a profile against the case dataset and print the aggregated assessment
    Assess(AssessArgs),
    /// Score a profile with the arithmetic legacy scorer
    Synthetic(SyntheticArgs),
    /// Browse the bundled refugee profiles
    Profiles {
        #[command(subcommand)]
        command: ProfilesCommand,
    },
    /// Read queries from stdin; only the most recent one is rendered after the delay
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ProfilesCommand {
    /// List every bundled profile
    List,
    /// Show the agent assessments recorded for one profile
    Show {
        /// Refugee code, e.g. REF-0003
        refugee_code: String,
    },
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
        Command::Assess(args) => run_assess(args),
        Command::Synthetic(args) => run_synthetic(args),
        Command::Profiles {
            command: ProfilesCommand::List,
        } => run_profile_list(),
        Command::Profiles {
            command: ProfilesCommand::Show { refugee_code },
        } => run_profile_show(&refugee_code),
        Command::Demo(args) => run_demo(args).await,
    }
}
