use super::{AppContext, ui};
use anyhow::Result;

/// Removes the cached currency list; the next command fetches it again.
pub async fn run(app: &AppContext) -> Result<()> {
    app.loader.clear_cache().await;
    println!(
        "{}",
        ui::style_text("Cleared the cached currency list.", ui::StyleType::Highlight)
    );
    Ok(())
}
