// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod api;
mod app;
mod config;
mod currencies;
mod error;
mod logging;
mod models;
mod quarter;
mod tui;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::api::TreasuryClient;
use crate::models::CurrencyMap;

/// Convert USD into local currencies using the Treasury's quarterly rates of exchange
#[derive(Parser)]
#[command(name = "treasury-fx", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD) used to pick the last completed quarter
    #[arg(short, long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the countries with rates for the last quarter
    Countries,
    /// Convert a USD amount into every currency of a country
    Convert {
        /// Country name as published by the Treasury, e.g. "Euro Zone"
        #[arg(long)]
        country: String,

        /// Amount in USD
        #[arg(short, long)]
        amount: String,
    },
    /// Write the default configuration to a file
    InitConfig {
        #[arg(default_value = config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = config::resolve_config(cli.config.as_deref())?;

    match cli.command {
        None => {
            logging::init_file(&config.log_file, "info")?;
            let client = TreasuryClient::from_config(&config);
            tui::start_tui(Arc::new(client), cli.date).await?;
        }
        Some(Commands::Countries) => {
            logging::init_stderr("warn")?;
            let client = TreasuryClient::from_config(&config);
            let currency_map = fetch_with_spinner(&client, reference_date(cli.date)).await?;
            for (country, currencies) in currency_map.iter() {
                for currency in currencies {
                    println!("{:<40} {:<20} {}", country, currency.currency(), currency.rate());
                }
            }
            println!(
                "\n{} currencies from {} countries",
                currency_map.currency_count(),
                currency_map.len()
            );
        }
        Some(Commands::Convert { country, amount }) => {
            logging::init_stderr("warn")?;
            let usd_amount = match app::validate_usd(&amount) {
                Ok(usd_amount) => usd_amount,
                Err(message) => bail!(message),
            };

            let client = TreasuryClient::from_config(&config);
            let today = reference_date(cli.date);
            let currency_map = fetch_with_spinner(&client, today).await?;
            let Some(currencies) = currency_map.get(&country) else {
                bail!(
                    "No rates were published for {} in the quarter ending {}",
                    country,
                    quarter::last_quarter_end(today)
                );
            };
            for currency in currencies {
                println!("{}", currency.convert(usd_amount));
            }
        }
        Some(Commands::InitConfig { path }) => {
            logging::init_stderr("warn")?;
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            config::save_config(&config, &path)?;
            println!("✅ Configuration written to {}", path.display());
        }
    }

    Ok(())
}

fn reference_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

async fn fetch_with_spinner(client: &TreasuryClient, today: NaiveDate) -> Result<CurrencyMap> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message("Fetching rates of exchange from the Treasury API...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = currencies::get_currency_data(client, today).await;
    spinner.finish_and_clear();
    Ok(result?)
}
