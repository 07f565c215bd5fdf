use super::AppContext;
use super::view::TerminalView;
use crate::core::{ConversionState, Side};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Converts a single amount and prints the result.
///
/// With `reverse` the amount is entered on the "to" side and the "from"
/// amount is computed.
pub async fn run(
    app: &AppContext,
    amount: f64,
    from: Option<&str>,
    to: Option<&str>,
    reverse: bool,
) -> Result<()> {
    let view = Arc::new(TerminalView::new());
    let converter = convert(app, Arc::clone(&view), amount, from, to, reverse).await?;

    let state = converter.state().await;
    println!("{}", view.render(&state));
    Ok(())
}

pub(crate) async fn convert(
    app: &AppContext,
    view: Arc<TerminalView>,
    amount: f64,
    from: Option<&str>,
    to: Option<&str>,
    reverse: bool,
) -> Result<crate::core::Converter> {
    let catalog = app.load_catalog().await?;

    let defaults = &app.config.defaults;
    let from = from.unwrap_or(defaults.from.as_str()).to_uppercase();
    let to = to.unwrap_or(defaults.to.as_str()).to_uppercase();
    let side = if reverse { Side::To } else { Side::From };
    debug!("Converting {} on the {} side of {}_{}", amount, side, from, to);

    let initial = ConversionState::new(&from, &to, 0.0).editing(side, amount);
    let converter = app.converter(catalog, view, initial);
    converter
        .start()
        .await
        .with_context(|| format!("Failed to convert between {from} and {to}"))?;
    Ok(converter)
}
