use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::cli::commands::{Request, prompt_credentials};
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Path to the .env file holding API_KEY, ADMIN and PASSWORD
    #[arg(short, long, global = true)]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show usage instructions
    Guide,
    /// Convert an amount from one currency to another
    Convert {
        /// Source currency code, e.g. USD
        from: String,
        /// Target currency code, e.g. EUR
        to: String,
        amount: String,
    },
    /// Show the exchange rate to TO, or all rates when TO is omitted
    Rate { from: String, to: Option<String> },
    /// Check the remaining API quota (admin only)
    Quota {
        #[arg(long)]
        admin: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Start an interactive session
    Shell,
}

impl TryFrom<Commands> for xrate::AppCommand {
    type Error = anyhow::Error;

    fn try_from(cmd: Commands) -> Result<xrate::AppCommand> {
        let request = match cmd {
            Commands::Convert { from, to, amount } => Request::Convert { from, to, amount },
            Commands::Rate { from, to } => Request::Rate { from, to },
            Commands::Quota { admin, password } => {
                let (admin, password) = prompt_credentials(admin, password)?;
                Request::Quota { admin, password }
            }
            Commands::Shell => return Ok(xrate::AppCommand::Shell),
            Commands::Setup | Commands::Guide => {
                unreachable!("Setup and guide commands should be handled separately")
            }
        };
        Ok(xrate::AppCommand::Run(request))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(Commands::Guide) => {
            xrate::cli::guide::print_guide();
            Ok(())
        }
        Some(cmd) => match xrate::AppCommand::try_from(cmd) {
            Ok(command) => {
                xrate::run_command(
                    command,
                    cli.config_path.as_deref(),
                    cli.env_file.as_deref(),
                )
                .await
            }
            Err(e) => Err(e),
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
