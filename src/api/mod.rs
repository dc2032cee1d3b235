pub mod treasury_client;

pub use treasury_client::{RatesSource, RawResponse, TreasuryClient};

#[cfg(test)]
pub use treasury_client::MockRatesSource;
