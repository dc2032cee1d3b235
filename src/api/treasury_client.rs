// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DataAccessError, DataAccessKind};

pub const BASE_URL: &str = "https://api.fiscaldata.treasury.gov/services/api/fiscal_service";
pub const ENDPOINT: &str = "/v1/accounting/od/rates_of_exchange";
pub const PAGE_NUMBER: u32 = 1;
/// Large enough to hold every country and currency for one quarter.
pub const PAGE_SIZE: u32 = 200;

/// Status and body of a rates-of-exchange response, not yet validated.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatesSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RawResponse, DataAccessError>;
}

#[derive(Clone)]
pub struct TreasuryClient {
    client: Client,
    base_url: String,
}

impl TreasuryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ENDPOINT)
    }
}

fn query_params() -> [(&'static str, String); 4] {
    [
        ("sort", "-record_date".to_string()),
        ("format", "json".to_string()),
        ("page[number]", PAGE_NUMBER.to_string()),
        ("page[size]", PAGE_SIZE.to_string()),
    ]
}

fn classify_transport_error(err: reqwest::Error) -> DataAccessError {
    let kind = if err.is_timeout() {
        DataAccessKind::Timeout
    } else if err.is_connect() {
        DataAccessKind::Connection
    } else {
        DataAccessKind::Request
    };
    DataAccessError::new(kind, err)
}

#[async_trait]
impl RatesSource for TreasuryClient {
    async fn fetch_rates(&self) -> Result<RawResponse, DataAccessError> {
        info!("Fetching currency data from the Treasury API");

        let response = self
            .client
            .get(self.url())
            .query(&query_params())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if status.is_success() {
            info!("Fetched {} bytes of currency data", body.len());
        } else {
            error!("Treasury API answered with status {}", status);
        }

        Ok(RawResponse { status, body })
    }
}
