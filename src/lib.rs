pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Currencies,
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
        reverse: bool,
    },
    Interactive,
    ClearCache,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let store = store::KeyValueStore::open(&data_path);
    let app = cli::AppContext::new(config, &store)?;

    match command {
        AppCommand::Currencies => cli::currencies::run(&app).await,
        AppCommand::Convert {
            amount,
            from,
            to,
            reverse,
        } => cli::convert::run(&app, amount, from.as_deref(), to.as_deref(), reverse).await,
        AppCommand::Interactive => cli::interactive::run(&app).await,
        AppCommand::ClearCache => cli::clear_cache::run(&app).await,
    }
}
