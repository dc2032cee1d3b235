// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::HashMap;
use std::fmt;

/// A currency a country uses, with its published rate in units per USD.
#[derive(Debug, Clone, PartialEq)]
pub struct Currency {
    country: String,
    currency: String,
    rate: f64,
}

impl Currency {
    /// Returns `None` when `rate` is NaN or infinite.
    pub fn new(country: impl Into<String>, currency: impl Into<String>, rate: f64) -> Option<Self> {
        if !rate.is_finite() {
            return None;
        }

        Some(Self {
            country: country.into(),
            currency: currency.into(),
            rate,
        })
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn converted_amount(&self, usd_amount: f64) -> f64 {
        usd_amount * self.rate
    }

    /// Convert a USD amount, e.g. `"$100.00 USD = 94.00 Euro"`.
    pub fn convert(&self, usd_amount: f64) -> String {
        format!(
            "${} USD = {} {}",
            format_amount(usd_amount),
            format_amount(self.converted_amount(usd_amount)),
            self.currency
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}: {}", self.country, self.currency, self.rate)
    }
}

/// Format with two decimals and comma thousands separators: `1234.5` becomes
/// `"1,234.50"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Currencies grouped by country, in the order countries first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyMap {
    entries: Vec<(String, Vec<Currency>)>,
    index: HashMap<String, usize>,
}

impl CurrencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `currency` to its country's list, creating the entry if needed.
    pub fn insert(&mut self, currency: Currency) {
        match self.index.get(currency.country()) {
            Some(&i) => self.entries[i].1.push(currency),
            None => {
                let country = currency.country().to_string();
                self.index.insert(country.clone(), self.entries.len());
                self.entries.push((country, vec![currency]));
            }
        }
    }

    pub fn get(&self, country: &str) -> Option<&[Currency]> {
        self.index
            .get(country)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(country, _)| country.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Currency])> {
        self.entries
            .iter()
            .map(|(country, currencies)| (country.as_str(), currencies.as_slice()))
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of currencies across all countries.
    pub fn currency_count(&self) -> usize {
        self.entries.iter().map(|(_, currencies)| currencies.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn currency(country: &str, name: &str, rate: f64) -> Currency {
        Currency::new(country, name, rate).unwrap()
    }

    #[test]
    fn test_convert_formats_two_decimals() {
        let euro = currency("Germany", "Euro", 0.94);
        assert_eq!(euro.convert(100.0), "$100.00 USD = 94.00 Euro");
        assert_eq!(euro.convert(0.5), "$0.50 USD = 0.47 Euro");
    }

    #[test]
    fn test_convert_uses_thousands_separators() {
        let euro = currency("Germany", "Euro", 0.94);
        assert_eq!(euro.convert(1234.5), "$1,234.50 USD = 1,160.43 Euro");

        let rupiah = currency("Indonesia", "Rupiah", 15_237.0);
        assert_eq!(rupiah.convert(1_000.0), "$1,000.00 USD = 15,237,000.00 Rupiah");
    }

    #[test]
    fn test_converted_amount_is_not_rounded() {
        let dinar = currency("Kuwait", "Dinar", 0.307);
        assert_relative_eq!(dinar.converted_amount(3.33), 1.02231, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_rates() {
        assert!(Currency::new("Nowhere", "Nothing", f64::NAN).is_none());
        assert!(Currency::new("Nowhere", "Nothing", f64::INFINITY).is_none());
        assert!(Currency::new("Somewhere", "Something", 0.0).is_some());
    }

    #[test]
    fn test_display() {
        let euro = currency("Germany", "Euro", 0.94);
        assert_eq!(euro.to_string(), "Germany, Euro: 0.94");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(123456.789), "123,456.79");
        assert_eq!(format_amount(-1234.5), "-1,234.50");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_map_groups_by_country_in_insertion_order() {
        let mut map = CurrencyMap::new();
        map.insert(currency("Zimbabwe", "Dollar", 361.9));
        map.insert(currency("Cuba", "Peso", 24.0));
        map.insert(currency("Zimbabwe", "Rtgs", 5_000.0));

        assert_eq!(map.len(), 2);
        assert_eq!(map.currency_count(), 3);
        assert_eq!(map.countries().collect::<Vec<_>>(), vec!["Zimbabwe", "Cuba"]);

        let zimbabwe = map.get("Zimbabwe").unwrap();
        assert_eq!(zimbabwe.len(), 2);
        assert_eq!(zimbabwe[0].currency(), "Dollar");
        assert_eq!(zimbabwe[1].currency(), "Rtgs");
        assert!(map.get("France").is_none());
    }
}
