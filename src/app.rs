// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use log::debug;

use crate::error::DataAccessError;
use crate::models::CurrencyMap;

pub const LOADING_MESSAGE: &str = "Loading currency list, one moment.";
pub const READY_MESSAGE: &str = "Currencies loaded, ready to convert!";
pub const CONVERTING_MESSAGE: &str = "Fetching the latest rates...";
pub const MISSING_AMOUNT: &str = "You must enter a USD amount to convert!";
pub const INVALID_AMOUNT: &str = "USD amount can only be numbers (and decimal point...)";
pub const MISSING_COUNTRY: &str = "You have to select a currency!";

/// Parse the amount typed by the user. It must be a number greater than zero.
pub fn validate_usd(input: &str) -> Result<f64, &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Err(MISSING_AMOUNT);
    }

    match input.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(INVALID_AMOUNT),
    }
}

pub fn error_message(err: &DataAccessError) -> String {
    format!("Error loading currency data, {}", err)
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchPurpose {
    /// Fill the country list.
    Populate,
    /// Convert with freshly fetched rates.
    Convert { country: String, usd_amount: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub purpose: FetchPurpose,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub purpose: FetchPurpose,
    pub result: Result<CurrencyMap, DataAccessError>,
}

impl FetchOutcome {
    pub fn new(request: FetchRequest, result: Result<CurrencyMap, DataAccessError>) -> Self {
        Self {
            generation: request.generation,
            purpose: request.purpose,
            result,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Countries,
    Amount,
}

/// State of the conversion form. Only the UI loop mutates it; background
/// fetches report back through [`App::apply`].
#[derive(Debug)]
pub struct App {
    countries: Vec<String>,
    selected: Option<usize>,
    amount: String,
    result_lines: Vec<String>,
    notice: Option<&'static str>,
    countries_enabled: bool,
    convert_enabled: bool,
    focus: Focus,
    issued_generation: u64,
    applied_generation: u64,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> App {
        App {
            countries: Vec::new(),
            selected: None,
            amount: String::new(),
            result_lines: Vec::new(),
            notice: None,
            countries_enabled: false,
            convert_enabled: false,
            focus: Focus::Countries,
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    fn issue(&mut self, purpose: FetchPurpose) -> FetchRequest {
        self.issued_generation += 1;
        FetchRequest {
            generation: self.issued_generation,
            purpose,
        }
    }

    /// Show the loading text and ask for the country list.
    pub fn start_loading(&mut self) -> FetchRequest {
        self.set_text(LOADING_MESSAGE);
        self.issue(FetchPurpose::Populate)
    }

    /// Validate the form. When it is complete, lock the convert action and ask
    /// for fresh rates; otherwise raise a notice.
    pub fn request_conversion(&mut self) -> Option<FetchRequest> {
        if !self.convert_enabled {
            return None;
        }

        let country = match self.selected_country() {
            Some(country) => country.to_string(),
            None => {
                self.notice = Some(MISSING_COUNTRY);
                return None;
            }
        };

        let usd_amount = match validate_usd(&self.amount) {
            Ok(amount) => amount,
            Err(message) => {
                self.notice = Some(message);
                self.amount.clear();
                return None;
            }
        };

        self.convert_enabled = false;
        self.set_text(CONVERTING_MESSAGE);
        Some(self.issue(FetchPurpose::Convert { country, usd_amount }))
    }

    /// Apply a finished fetch. Outcomes older than one already applied are
    /// dropped so the newest data always wins.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation < self.applied_generation {
            debug!(
                "Discarding stale fetch {} (already showing {})",
                outcome.generation, self.applied_generation
            );
            return;
        }
        self.applied_generation = outcome.generation;

        let map = match outcome.result {
            Ok(map) => map,
            Err(e) => {
                self.set_text(&error_message(&e));
                if self.countries_enabled {
                    self.convert_enabled = true;
                }
                return;
            }
        };

        match outcome.purpose {
            FetchPurpose::Populate => self.show_countries(&map),
            FetchPurpose::Convert {
                country,
                usd_amount,
            } => self.show_conversion(&map, &country, usd_amount),
        }
        self.convert_enabled = true;
    }

    fn show_countries(&mut self, map: &CurrencyMap) {
        let previous = self.selected_country().map(str::to_string);
        self.countries = map.countries().map(str::to_string).collect();
        self.selected = previous.and_then(|name| self.countries.iter().position(|c| *c == name));
        self.countries_enabled = true;

        if self.countries.is_empty() {
            self.set_text("No currencies were published for the last quarter.");
        } else {
            self.set_text(READY_MESSAGE);
        }
    }

    fn show_conversion(&mut self, map: &CurrencyMap, country: &str, usd_amount: f64) {
        self.result_lines = match map.get(country) {
            Some(currencies) => currencies.iter().map(|c| c.convert(usd_amount)).collect(),
            None => vec![format!("No rates were published for {} last quarter.", country)],
        };
    }

    fn set_text(&mut self, message: &str) {
        self.result_lines = vec![message.to_string()];
    }

    pub fn next(&mut self) {
        if !self.countries_enabled || self.countries.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.countries.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn previous(&mut self) {
        if !self.countries_enabled || self.countries.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.countries.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Countries => Focus::Amount,
            Focus::Amount => Focus::Countries,
        };
    }

    pub fn push_char(&mut self, c: char) {
        self.amount.push(c);
    }

    pub fn pop_char(&mut self) {
        self.amount.pop();
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_country(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.countries.get(i))
            .map(String::as_str)
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn result_lines(&self) -> &[String] {
        &self.result_lines
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn countries_enabled(&self) -> bool {
        self.countries_enabled
    }

    pub fn convert_enabled(&self) -> bool {
        self.convert_enabled
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}
