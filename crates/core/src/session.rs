//! Headless calculator session.
//!
//! Holds what the plugin control holds: the single selected-area slot, whether
//! the draw and calculate actions are enabled, and the text shown in the
//! result area. Map drawing tools and DOM wiring stay outside; they call
//! [`CalculatorSession::begin_selection`] and
//! [`CalculatorSession::complete_selection`] and render [`Status`].
//!
//! A calculation runs in two halves so hosts with an asynchronous data
//! source can suspend between them:
//!
//! 1. [`start_calculation`](CalculatorSession::start_calculation) checks the
//!    selection and switches the status to `Calculating...`
//! 2. [`finish_calculation`](CalculatorSession::finish_calculation) takes the
//!    fetch outcome and computes the index
//!
//! [`calculate`](CalculatorSession::calculate) does both with the session's
//! own synchronous [`WeatherDataSource`].

use crate::config::CalculatorConfig;
use crate::core_types::{SelectionBounds, WeatherFactors};
use crate::error::{Result, TpiError};
use crate::index::{calculate_index, IndexResult};
use crate::provider::{MockWeatherSource, WeatherDataSource};
use std::fmt;
use tracing::{debug, info, warn};

/// Factors and index computed for one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub bounds: SelectionBounds,
    pub factors: WeatherFactors,
    pub result: IndexResult,
}

/// Content of the result area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Status {
    /// Nothing to show
    #[default]
    Idle,
    /// Calculate was requested without a selection
    NoSelection,
    /// Waiting for factor data
    Calculating,
    /// The data source failed
    Failed,
    /// Last calculation succeeded
    Ready(Calculation),
}

impl Status {
    pub const NO_SELECTION_TEXT: &'static str = "Please select an area first.";
    pub const CALCULATING_TEXT: &'static str = "Calculating...";
    pub const FAILED_TEXT: &'static str = "Error calculating TPI. Please try again.";

    /// Text for the result area, optionally followed by the raw factors.
    pub fn render(&self, show_factors: bool) -> String {
        match self {
            Status::Idle => String::new(),
            Status::NoSelection => Self::NO_SELECTION_TEXT.to_string(),
            Status::Calculating => Self::CALCULATING_TEXT.to_string(),
            Status::Failed => Self::FAILED_TEXT.to_string(),
            Status::Ready(calc) => {
                let mut text = format!(
                    "TPI Result\nTotal TPI: {}\nInterpretation: {}",
                    calc.result.value,
                    calc.result.interpretation()
                );
                if show_factors {
                    text.push('\n');
                    text.push_str(&calc.factors.to_string());
                }
                text
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// State behind the plugin's "Draw Box" and "Calculate TPI" actions.
#[derive(Debug)]
pub struct CalculatorSession<S> {
    source: S,
    selection: Option<SelectionBounds>,
    drawing: bool,
    status: Status,
    show_factors: bool,
}

impl CalculatorSession<MockWeatherSource> {
    /// Session backed by the config's mock source.
    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::with_config(config.mock_source(), config)
    }
}

impl<S: WeatherDataSource> CalculatorSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            selection: None,
            drawing: false,
            status: Status::Idle,
            show_factors: false,
        }
    }

    pub fn with_config(source: S, config: &CalculatorConfig) -> Self {
        Self {
            show_factors: config.show_factors,
            ..Self::new(source)
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn selection(&self) -> Option<&SelectionBounds> {
        self.selection.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Rendered result area text.
    pub fn status_text(&self) -> String {
        self.status.render(self.show_factors)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// "Draw Box" is disabled while a rectangle is being drawn.
    pub fn can_draw(&self) -> bool {
        !self.drawing
    }

    /// "Calculate TPI" needs a finished selection.
    pub fn can_calculate(&self) -> bool {
        !self.drawing && self.selection.is_some()
    }

    /// Drawing tool enabled. The previous rectangle and result are discarded.
    pub fn begin_selection(&mut self) {
        debug!("selection started");
        self.drawing = true;
        self.selection = None;
        self.status = Status::Idle;
    }

    /// Rectangle finished; overwrites any earlier selection.
    pub fn complete_selection(&mut self, bounds: SelectionBounds) {
        debug!(%bounds, "selection completed");
        self.drawing = false;
        self.selection = Some(bounds);
    }

    /// First half of a calculation: returns the bounds to fetch factors for.
    pub fn start_calculation(&mut self) -> Result<SelectionBounds> {
        let Some(bounds) = self.selection else {
            debug!("calculate requested without a selection");
            self.status = Status::NoSelection;
            return Err(TpiError::NoSelection);
        };
        self.status = Status::Calculating;
        Ok(bounds)
    }

    /// Second half of a calculation: computes the index from fetched factors.
    ///
    /// Only accepted while the session is `Calculating` for exactly
    /// `bounds`; otherwise returns [`TpiError::NoSelection`] and leaves the
    /// status untouched. Any fetch failure is reported as
    /// [`TpiError::DataUnavailable`] and leaves the session showing the error
    /// text; it is not retried.
    pub fn finish_calculation(
        &mut self,
        bounds: SelectionBounds,
        fetched: Result<WeatherFactors>,
    ) -> Result<Calculation> {
        if self.status != Status::Calculating || self.selection != Some(bounds) {
            debug!(%bounds, "calculation finished without a matching start");
            return Err(TpiError::NoSelection);
        }

        let factors = match fetched {
            Ok(factors) => factors,
            Err(err) => {
                warn!(%bounds, error = %err, "weather data fetch failed");
                self.status = Status::Failed;
                if matches!(err, TpiError::DataUnavailable(_)) {
                    return Err(err);
                }
                return Err(TpiError::DataUnavailable(err.to_string()));
            }
        };

        let result = calculate_index(&factors);
        info!(
            %bounds,
            value = result.value,
            interpretation = result.interpretation(),
            "TPI calculated"
        );

        let calculation = Calculation {
            bounds,
            factors,
            result,
        };
        self.status = Status::Ready(calculation);
        Ok(calculation)
    }

    /// Fetch factors for the current selection and compute the index.
    pub fn calculate(&mut self) -> Result<Calculation> {
        let bounds = self.start_calculation()?;
        let fetched = self.source.fetch_factors(&bounds);
        self.finish_calculation(bounds, fetched)
    }
}
