// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::api::{RatesSource, RawResponse};
use crate::error::{DataAccessError, DataAccessKind};
use crate::models::{Currency, CurrencyMap};
use crate::quarter::last_quarter_end;

#[derive(Debug, Deserialize)]
struct TreasuryResponse {
    data: Vec<Value>,
}

/// One row of the rates-of-exchange feed.
#[derive(Debug, Deserialize)]
struct TreasuryRecord {
    record_date: String,
    country: String,
    currency: String,
    exchange_rate: RateValue,
}

/// The API serves rates as strings, but plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Number(f64),
    Text(String),
}

impl RateValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RateValue::Number(n) => Some(*n),
            RateValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn malformed_row(index: usize, cause: impl std::fmt::Display) -> DataAccessError {
    DataAccessError::new(
        DataAccessKind::MalformedRow,
        format!("row {}: {}", index, cause),
    )
}

fn parse_record(index: usize, row: Value) -> Result<(NaiveDate, Currency), DataAccessError> {
    let record: TreasuryRecord =
        serde_json::from_value(row).map_err(|e| malformed_row(index, e))?;

    let record_date = NaiveDate::parse_from_str(&record.record_date, "%Y-%m-%d")
        .map_err(|e| malformed_row(index, format!("record_date {:?}: {}", record.record_date, e)))?;

    let rate = record
        .exchange_rate
        .as_f64()
        .ok_or_else(|| malformed_row(index, format!("exchange_rate {:?}", record.exchange_rate)))?;

    let currency = Currency::new(record.country, record.currency, rate)
        .ok_or_else(|| malformed_row(index, format!("exchange_rate {} is not finite", rate)))?;

    Ok((record_date, currency))
}

/// Turn a rates-of-exchange response into the currencies published for the
/// quarter ending on `quarter_end`, grouped by country.
///
/// Rows dated on any other day are skipped. A response without matching rows
/// gives an empty map, not an error.
pub fn parse_treasury_response(
    response: &RawResponse,
    quarter_end: NaiveDate,
) -> Result<CurrencyMap, DataAccessError> {
    info!("Attempting to parse response from Treasury API");

    if !response.status.is_success() {
        return Err(DataAccessError::new(
            DataAccessKind::Status,
            format!("Failed HTTP response: {}", response.status),
        ));
    }

    let payload: TreasuryResponse = serde_json::from_str(&response.body)
        .map_err(|e| DataAccessError::new(DataAccessKind::Decode, e))?;

    let mut currency_map = CurrencyMap::new();
    for (index, row) in payload.data.into_iter().enumerate() {
        let (record_date, currency) = parse_record(index, row)?;
        if record_date == quarter_end {
            currency_map.insert(currency);
        }
    }

    info!(
        "Parsed {} currencies from {} countries",
        currency_map.currency_count(),
        currency_map.len()
    );
    Ok(currency_map)
}

/// Fetch the latest rates and keep those published for the last completed
/// quarter before `today`.
pub async fn get_currency_data(
    source: &dyn RatesSource,
    today: NaiveDate,
) -> Result<CurrencyMap, DataAccessError> {
    let quarter_end = last_quarter_end(today);

    let result = source
        .fetch_rates()
        .await
        .and_then(|response| parse_treasury_response(&response, quarter_end));

    if let Err(e) = &result {
        warn!("Currency data unavailable ({})", e.kind());
    }
    result
}
