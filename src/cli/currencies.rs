use super::{AppContext, ui};
use crate::core::{Catalog, FlagResolver};
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(app: &AppContext) -> Result<()> {
    let catalog = app.load_catalog().await?;
    println!("{}", display_catalog(&catalog, &app.flags));
    Ok(())
}

pub fn display_catalog(catalog: &Catalog, flags: &FlagResolver) -> String {
    if catalog.is_empty() {
        return ui::style_text("No currencies available.", ui::StyleType::Error);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Flag"),
    ]);
    for currency in catalog.iter() {
        table.add_row(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.display_name),
            ui::optional_cell(currency.symbol.as_deref()),
            Cell::new(flags.flag_url(&currency.code)),
        ]);
    }

    format!(
        "{}\n\n{}\n{}",
        ui::style_text("Currencies", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currencies", catalog.len()),
            ui::StyleType::Subtle
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;
    use std::collections::HashMap;

    #[test]
    fn test_display_catalog_lists_sorted_codes() {
        let catalog: Catalog = [
            Currency::new("USD", "US Dollar"),
            Currency::new("EUR", "Euro"),
        ]
        .into_iter()
        .collect();
        let flags = FlagResolver::new("https://flags.example", HashMap::new());

        let output = console::strip_ansi_codes(&display_catalog(&catalog, &flags)).to_string();

        let eur = output.find("Euro").unwrap();
        let usd = output.find("US Dollar").unwrap();
        assert!(eur < usd);
        assert!(output.contains("2 currencies"));
    }

    #[test]
    fn test_display_empty_catalog() {
        let flags = FlagResolver::new("https://flags.example", HashMap::new());
        let output = display_catalog(&Catalog::default(), &flags);
        assert!(output.contains("No currencies available."));
    }
}
