mod config;
mod errors;
mod expiry;
mod feeds;
mod models;
mod report;

use crate::config::{AppConfig, OutputFormat};
use crate::errors::EngineResult;
use crate::feeds::quote::{QuoteSource, StaticQuoteSource, YahooQuoteSource};
use crate::models::black_scholes::BlackScholes;
use crate::models::{OptionKind, PricingInput, PricingModel};
use crate::report::PricingReport;
use chrono::NaiveDateTime;

#[tokio::main]
async fn main() {
    // Logs on stderr, results on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let now = chrono::Local::now().naive_local();

    let cfg = match AppConfig::from_env(now.date()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cfg.spot_override {
        Some(price) => run(&cfg, &StaticQuoteSource::new(price), now).await,
        None => {
            let source = YahooQuoteSource::new(&cfg.quote_base_url, cfg.quote_timeout);
            run(&cfg, &source, now).await
        }
    };

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, ticker = %cfg.ticker, "pricing failed");
            std::process::exit(1);
        }
    };

    match cfg.output {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("report serialization failed: {e}");
                std::process::exit(1);
            }
        },
    }
}

/// Resolve the spot price once, then price each configured side of the contract.
async fn run<Q: QuoteSource>(
    cfg: &AppConfig,
    source: &Q,
    now: NaiveDateTime,
) -> EngineResult<PricingReport> {
    tracing::info!(ticker = %cfg.ticker, source = source.name(), "fetching quote");
    let quote = source.latest_close(&cfg.ticker).await?;
    tracing::info!(
        ticker = %quote.symbol,
        price = quote.price,
        session = ?quote.session,
        "quote received"
    );

    let ttl_years = expiry::years_to_expiry(cfg.expiry, now);

    let model = BlackScholes::new();
    let mut call = None;
    let mut put = None;
    for &kind in &cfg.kinds {
        let input = PricingInput::new(
            quote.price,
            cfg.strike,
            ttl_years,
            cfg.risk_free_rate,
            cfg.volatility,
            kind,
        )?;
        let price = model.price(&input);
        tracing::debug!(%kind, price, "priced");
        match kind {
            OptionKind::Call => call = Some(price),
            OptionKind::Put => put = Some(price),
        }
    }

    Ok(PricingReport {
        symbol: quote.symbol,
        session: quote.session,
        spot: quote.price,
        strike: cfg.strike,
        ttl_years,
        rate: cfg.risk_free_rate,
        sigma: cfg.volatility,
        model: model.name(),
        call,
        put,
    })
}
