//! Keeps the two amounts of the converter in step.
//!
//! The side the user edited last drives every recomputation: editing the
//! "from" amount converts from→to, editing the "to" amount converts to→from,
//! and switching either currency re-runs whichever direction is active.
//! Responses are sequenced so that a slow, older rate request can never
//! overwrite the result of a newer one.

use crate::core::currency::{Catalog, CurrencyRateProvider};
use crate::core::error::FetchError;
use crate::core::flags::FlagResolver;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    From,
    To,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::From => write!(f, "from"),
            Side::To => write!(f, "to"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionState {
    pub from_code: String,
    pub to_code: String,
    pub from_amount: f64,
    pub to_amount: f64,
    pub last_edited: Side,
    /// Rate used by the most recently applied conversion, in its direction.
    pub last_rate: Option<f64>,
}

impl ConversionState {
    pub fn new(from_code: &str, to_code: &str, from_amount: f64) -> Self {
        Self {
            from_code: from_code.to_string(),
            to_code: to_code.to_string(),
            from_amount,
            to_amount: 0.0,
            last_edited: Side::From,
            last_rate: None,
        }
    }

    /// Marks `side` as last edited with `amount`, so the first conversion
    /// runs in that direction.
    pub fn editing(mut self, side: Side, amount: f64) -> Self {
        match side {
            Side::From => self.from_amount = amount,
            Side::To => self.to_amount = amount,
        }
        self.last_edited = side;
        self
    }
}

/// The display surface the converter writes to.
pub trait ConverterView: Send + Sync {
    fn set_currency_options(&self, codes: &[String]);
    fn set_amount(&self, side: Side, amount: &str);
    fn set_exchange_rate(&self, from_name: &str, to_name: &str, rate: &str);
    fn set_flag(&self, side: Side, url: &str);
}

/// Input events coming from the user.
#[async_trait]
pub trait UiEvents: Send + Sync {
    async fn on_amount_changed(&self, side: Side, amount: f64) -> Result<Outcome, FetchError>;
    async fn on_currency_changed(&self, side: Side, code: &str) -> Result<Outcome, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The response was the newest one and has been displayed.
    Applied { rate: f64 },
    /// A later event was issued while this one waited for its rate.
    Superseded,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

struct Request {
    ticket: u64,
    direction: Side,
    from_code: String,
    to_code: String,
    amount: f64,
}

impl Request {
    fn pair(&self) -> (&str, &str) {
        match self.direction {
            Side::From => (&self.from_code, &self.to_code),
            Side::To => (&self.to_code, &self.from_code),
        }
    }
}

pub struct Converter {
    rates: Arc<dyn CurrencyRateProvider>,
    catalog: Catalog,
    flags: FlagResolver,
    view: Arc<dyn ConverterView>,
    state: Mutex<ConversionState>,
    latest_ticket: AtomicU64,
    reverse_updates_rate: bool,
}

impl Converter {
    pub fn new(
        rates: Arc<dyn CurrencyRateProvider>,
        catalog: Catalog,
        flags: FlagResolver,
        view: Arc<dyn ConverterView>,
        initial: ConversionState,
    ) -> Self {
        Self {
            rates,
            catalog,
            flags,
            view,
            state: Mutex::new(initial),
            latest_ticket: AtomicU64::new(0),
            reverse_updates_rate: false,
        }
    }

    /// Refresh the displayed rate and names on to→from conversions too.
    /// Off by default, where only from→to conversions touch the rate line.
    pub fn with_reverse_rate_display(mut self, enabled: bool) -> Self {
        self.reverse_updates_rate = enabled;
        self
    }

    pub async fn state(&self) -> ConversionState {
        self.state.lock().await.clone()
    }

    /// Fills the selectors and flags, shows the driving amount and runs the
    /// initial conversion. A fresh state converts from→to.
    pub async fn start(&self) -> Result<Outcome, FetchError> {
        self.view.set_currency_options(&self.catalog.codes());
        let request = {
            let state = self.state.lock().await;
            self.view.set_flag(Side::From, &self.flags.flag_url(&state.from_code));
            self.view.set_flag(Side::To, &self.flags.flag_url(&state.to_code));
            let amount = match state.last_edited {
                Side::From => state.from_amount,
                Side::To => state.to_amount,
            };
            self.view.set_amount(state.last_edited, &format_amount(amount));
            self.issue(&state)
        };
        self.convert(request).await
    }

    fn issue(&self, state: &ConversionState) -> Request {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let amount = match state.last_edited {
            Side::From => state.from_amount,
            Side::To => state.to_amount,
        };
        Request {
            ticket,
            direction: state.last_edited,
            from_code: state.from_code.clone(),
            to_code: state.to_code.clone(),
            amount,
        }
    }

    #[instrument(
        name = "Convert",
        skip(self, request),
        fields(ticket = request.ticket, direction = %request.direction)
    )]
    async fn convert(&self, request: Request) -> Result<Outcome, FetchError> {
        let (source, target) = request.pair();
        let result = self.rates.get_rate(source, target).await;

        let mut state = self.state.lock().await;
        if request.ticket != self.latest_ticket.load(Ordering::SeqCst) {
            debug!("Discarding stale rate response for {}_{}", source, target);
            return Ok(Outcome::Superseded);
        }
        let rate = result?;

        let converted = round2(request.amount * rate);
        state.last_rate = Some(rate);
        match request.direction {
            Side::From => {
                state.to_amount = converted;
                self.view.set_amount(Side::To, &format_amount(converted));
                self.show_rate(&request.from_code, &request.to_code, rate);
            }
            Side::To => {
                state.from_amount = converted;
                self.view.set_amount(Side::From, &format_amount(converted));
                if self.reverse_updates_rate {
                    self.show_rate(&request.from_code, &request.to_code, 1.0 / rate);
                }
            }
        }
        debug!(rate, converted, "Applied conversion");
        Ok(Outcome::Applied { rate })
    }

    fn show_rate(&self, from_code: &str, to_code: &str, rate: f64) {
        self.view.set_exchange_rate(
            self.catalog.display_name(from_code),
            self.catalog.display_name(to_code),
            &format_amount(rate),
        );
    }
}

#[async_trait]
impl UiEvents for Converter {
    async fn on_amount_changed(&self, side: Side, amount: f64) -> Result<Outcome, FetchError> {
        let request = {
            let mut state = self.state.lock().await;
            match side {
                Side::From => state.from_amount = amount,
                Side::To => state.to_amount = amount,
            }
            state.last_edited = side;
            self.issue(&state)
        };
        self.convert(request).await
    }

    async fn on_currency_changed(&self, side: Side, code: &str) -> Result<Outcome, FetchError> {
        let request = {
            let mut state = self.state.lock().await;
            match side {
                Side::From => state.from_code = code.to_string(),
                Side::To => state.to_code = code.to_string(),
            }
            self.view.set_flag(side, &self.flags.flag_url(code));
            self.issue(&state)
        };
        self.convert(request).await
    }
}
