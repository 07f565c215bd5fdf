use super::view::TerminalView;
use super::{AppContext, ui};
use crate::core::sync::format_amount;
use crate::core::{Converter, ConverterView, Outcome, Side, UiEvents};
use anyhow::{Result, anyhow};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error};

const HELP: &str = "\
Commands:
  from <amount>           edit the amount to convert from
  to <amount>             edit the amount to convert to
  from-currency <code>    change the source currency
  to-currency <code>      change the target currency
  show                    print the converter
  help                    print this help and the currency codes
  quit                    leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Amount(Side, f64),
    Currency(Side, String),
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let keyword = parts
            .next()
            .ok_or_else(|| anyhow!("Empty command"))?
            .to_lowercase();
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(anyhow!("Too many arguments: {}", s.trim()));
        }

        let amount = |side: Side| -> Result<Command> {
            let value = argument.ok_or_else(|| anyhow!("Missing amount for '{keyword}'"))?;
            value
                .parse::<f64>()
                .map(|amount| Command::Amount(side, amount))
                .map_err(|_| anyhow!("Invalid amount: {value}"))
        };
        let currency = |side: Side| -> Result<Command> {
            argument
                .map(|code| Command::Currency(side, code.to_uppercase()))
                .ok_or_else(|| anyhow!("Missing currency code for '{keyword}'"))
        };

        match keyword.as_str() {
            "from" => amount(Side::From),
            "to" => amount(Side::To),
            "from-currency" => currency(Side::From),
            "to-currency" => currency(Side::To),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(anyhow!("Unknown command: {other}")),
        }
    }
}

pub async fn run(app: &AppContext) -> Result<()> {
    let catalog = app.load_catalog().await?;
    let view = Arc::new(TerminalView::new());
    let converter = app.converter(catalog, view.clone(), app.initial_state());

    if let Err(e) = converter.start().await {
        error!(error = %e, "Initial conversion failed");
    }
    println!("{}", view.render(&converter.state().await));
    println!("{}", ui::style_text("Type 'help' for commands.", ui::StyleType::Subtle));

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&converter, &view, stdin).await
}

fn help_text(view: &TerminalView) -> String {
    let codes = view.currency_options();
    if codes.is_empty() {
        return HELP.to_string();
    }
    format!("{HELP}\n\nCurrencies: {}", codes.join(", "))
}

/// Feeds each input line to the converter until `quit` or end of input.
/// Failed conversions are logged and leave the display as it was.
pub async fn run_session<R>(converter: &Converter, view: &TerminalView, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        debug!(?command, "Handling command");

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", help_text(view));
                continue;
            }
            Command::Show => {
                println!("{}", view.render(&converter.state().await));
                continue;
            }
            Command::Amount(side, amount) => {
                view.set_amount(side, &format_amount(amount));
                converter.on_amount_changed(side, amount).await
            }
            Command::Currency(side, code) => converter.on_currency_changed(side, &code).await,
        };

        match result {
            Ok(Outcome::Applied { .. }) => println!("{}", view.render(&converter.state().await)),
            Ok(Outcome::Superseded) => debug!("Result superseded by a newer request"),
            Err(e) => error!(error = %e, "Conversion failed"),
        }
    }
    Ok(())
}
