use super::ui;
use crate::core::{ConversionState, ConverterView, Side};
use comfy_table::Cell;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default, Clone)]
struct Screen {
    options: Vec<String>,
    from_amount: Option<String>,
    to_amount: Option<String>,
    rate: Option<(String, String, String)>,
    from_flag: Option<String>,
    to_flag: Option<String>,
}

/// Terminal rendition of the converter widget. The converter writes into
/// it and the CLI prints it with [`TerminalView::render`].
#[derive(Debug, Default)]
pub struct TerminalView {
    screen: Mutex<Screen>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    fn screen(&self) -> Screen {
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut Screen)) {
        apply(&mut self.screen.lock().unwrap_or_else(PoisonError::into_inner));
    }

    /// Codes offered by both selectors, sorted.
    pub fn currency_options(&self) -> Vec<String> {
        self.screen().options
    }

    pub fn amount(&self, side: Side) -> Option<String> {
        let screen = self.screen();
        match side {
            Side::From => screen.from_amount,
            Side::To => screen.to_amount,
        }
    }

    /// One line such as `1 US Dollar = 0.90 Euro`, once a rate has been shown.
    pub fn rate_line(&self) -> Option<String> {
        self.screen()
            .rate
            .map(|(from_name, to_name, rate)| format!("1 {from_name} = {rate} {to_name}"))
    }

    pub fn render(&self, state: &ConversionState) -> String {
        let screen = self.screen();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell(""),
            ui::header_cell("Currency"),
            ui::header_cell("Amount"),
            ui::header_cell("Flag"),
        ]);

        let marker = |side: Side| {
            if state.last_edited == side {
                ui::style_text(&format!("{side} *"), ui::StyleType::Highlight)
            } else {
                side.to_string()
            }
        };
        table.add_row(vec![
            Cell::new(marker(Side::From)),
            Cell::new(&state.from_code),
            ui::amount_cell(screen.from_amount.as_deref().unwrap_or("")),
            ui::optional_cell(screen.from_flag.as_deref()),
        ]);
        table.add_row(vec![
            Cell::new(marker(Side::To)),
            Cell::new(&state.to_code),
            ui::amount_cell(screen.to_amount.as_deref().unwrap_or("")),
            ui::optional_cell(screen.to_flag.as_deref()),
        ]);

        let mut output = table.to_string();
        if let Some(line) = self.rate_line() {
            output.push('\n');
            output.push_str(&ui::style_text(&line, ui::StyleType::Subtle));
        }
        output
    }
}

impl ConverterView for TerminalView {
    fn set_currency_options(&self, codes: &[String]) {
        self.update(|screen| screen.options = codes.to_vec());
    }

    fn set_amount(&self, side: Side, amount: &str) {
        self.update(|screen| match side {
            Side::From => screen.from_amount = Some(amount.to_string()),
            Side::To => screen.to_amount = Some(amount.to_string()),
        });
    }

    fn set_exchange_rate(&self, from_name: &str, to_name: &str, rate: &str) {
        self.update(|screen| {
            screen.rate = Some((from_name.to_string(), to_name.to_string(), rate.to_string()))
        });
    }

    fn set_flag(&self, side: Side, url: &str) {
        self.update(|screen| match side {
            Side::From => screen.from_flag = Some(url.to_string()),
            Side::To => screen.to_flag = Some(url.to_string()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shows_amounts_and_rate() {
        let view = TerminalView::new();
        view.set_amount(Side::From, "100.00");
        view.set_amount(Side::To, "90.00");
        view.set_exchange_rate("US Dollar", "Euro", "0.90");
        view.set_flag(Side::From, "https://flags.example/US/flat/24.png");

        let state = ConversionState::new("USD", "EUR", 100.0);
        let output = console::strip_ansi_codes(&view.render(&state)).to_string();

        assert!(output.contains("USD"));
        assert!(output.contains("100.00"));
        assert!(output.contains("90.00"));
        assert!(output.contains("https://flags.example/US/flat/24.png"));
        assert!(output.contains("1 US Dollar = 0.90 Euro"));
    }

    #[test]
    fn test_rate_line_absent_until_set() {
        let view = TerminalView::new();
        assert!(view.rate_line().is_none());

        view.set_currency_options(&["EUR".to_string(), "USD".to_string()]);
        assert_eq!(view.currency_options(), vec!["EUR", "USD"]);
    }
}
