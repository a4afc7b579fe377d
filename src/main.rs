use anyhow::Result;
use clap::Parser;
use copilot_ask::{
    api::CopilotClient,
    commands,
    config::{Config, DEFAULT_TIMEOUT_SECS},
    runtime::RealRuntime,
};
use std::process::ExitCode;
use std::time::Duration;

/// copilot-ask - ask the AI copilot service a question
///
/// The service address is taken from --api-base, then the COPILOT_API_BASE
/// environment variable, and defaults to http://localhost:3001.
///
/// Examples:
///   copilot-ask ask "How do I reverse a string in Rust?"
///   copilot-ask health
#[derive(Parser, Debug)]
#[command(author, version = env!("COPILOT_ASK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service base URL (overrides COPILOT_API_BASE)
    #[arg(long = "api-base", value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(
        long = "timeout",
        env = "COPILOT_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    pub timeout: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ask a question and print the answer
    Ask(AskArgs),

    /// Check that the service is reachable
    Health,
}

#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question to send
    #[arg(value_name = "QUESTION")]
    pub question: String,
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(
        &RealRuntime,
        cli.api_base,
        Duration::from_secs(cli.timeout),
    );
    let client = CopilotClient::from_config(&config)?;

    match cli.command {
        Commands::Ask(args) => commands::ask(&client, &args.question).await,
        Commands::Health => commands::health(&client).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", commands::format_failure(&e));
            ExitCode::FAILURE
        }
    }
}
