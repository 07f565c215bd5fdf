use anyhow::Result;
use ccx::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for ccx::AppCommand {
    fn from(cmd: Commands) -> ccx::AppCommand {
        match cmd {
            Commands::Currencies => ccx::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                reverse,
            } => ccx::AppCommand::Convert {
                amount,
                from,
                to,
                reverse,
            },
            Commands::Interactive => ccx::AppCommand::Interactive,
            Commands::ClearCache => ccx::AppCommand::ClearCache,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the supported currencies
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: f64,
        /// Source currency code
        #[arg(long)]
        from: Option<String>,
        /// Target currency code
        #[arg(long)]
        to: Option<String>,
        /// Treat the amount as the target side and compute the source amount
        #[arg(short, long)]
        reverse: bool,
    },
    /// Edit amounts and currencies line by line
    Interactive,
    /// Remove the cached currency list
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ccx::cli::setup::setup(),
        Some(cmd) => ccx::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
