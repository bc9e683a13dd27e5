use crate::errors::{EngineError, EngineResult};
use crate::expiry;
use crate::models::OptionKind;
use chrono::NaiveDate;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(EngineError::Config(format!("OUTPUT_FORMAT: unknown format {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ticker: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    pub risk_free_rate: f64,
    pub volatility: f64,
    /// Contract sides to price, in output order.
    pub kinds: Vec<OptionKind>,
    /// Fixed spot price; skips the quote provider when set.
    pub spot_override: Option<f64>,
    pub quote_base_url: String,
    pub quote_timeout: Duration,
    pub output: OutputFormat,
}

impl AppConfig {
    /// `today` anchors the default expiry.
    pub fn from_env(today: NaiveDate) -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), today)
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup<F>(lookup: F, today: NaiveDate) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let strike = parse_f64("STRIKE_PRICE", &var_or("STRIKE_PRICE", "150"))?;
        let risk_free_rate = parse_f64("RISK_FREE_RATE", &var_or("RISK_FREE_RATE", "0.05"))?;
        let volatility = parse_f64("VOLATILITY", &var_or("VOLATILITY", "0.25"))?;

        let expiry = match lookup("EXPIRY_DATE") {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|e| EngineError::Config(format!("EXPIRY_DATE: {e}")))?,
            None => expiry::default_expiry(today),
        };

        let kinds = var_or("OPTION_KINDS", "call,put")
            .split(',')
            .filter(|k| !k.trim().is_empty())
            .map(str::parse::<OptionKind>)
            .collect::<EngineResult<Vec<_>>>()?;
        if kinds.is_empty() {
            return Err(EngineError::Config("OPTION_KINDS: empty".into()));
        }

        let spot_override = lookup("SPOT_PRICE")
            .map(|raw| parse_f64("SPOT_PRICE", &raw))
            .transpose()?;

        let timeout_secs = var_or("QUOTE_TIMEOUT_SECS", "10")
            .trim()
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("QUOTE_TIMEOUT_SECS: {e}")))?;

        let ticker = var_or("TICKER", "WMT").trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(EngineError::Config("TICKER: empty".into()));
        }

        Ok(Self {
            ticker,
            strike,
            expiry,
            risk_free_rate,
            volatility,
            kinds,
            spot_override,
            quote_base_url: var_or("QUOTE_BASE_URL", "https://query1.finance.yahoo.com"),
            quote_timeout: Duration::from_secs(timeout_secs),
            output: var_or("OUTPUT_FORMAT", "text").parse()?,
        })
    }
}

fn parse_f64(key: &str, raw: &str) -> EngineResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn load(vars: &[(&str, &str)]) -> EngineResult<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned(), today())
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.ticker, "WMT");
        assert_eq!(cfg.strike, 150.0);
        assert_eq!(cfg.risk_free_rate, 0.05);
        assert_eq!(cfg.volatility, 0.25);
        assert_eq!(cfg.kinds, [OptionKind::Call, OptionKind::Put]);
        assert_eq!(cfg.expiry, NaiveDate::from_ymd_opt(2027, 10, 18).unwrap());
        assert_eq!(cfg.spot_override, None);
        assert_eq!(cfg.quote_timeout, Duration::from_secs(10));
        assert_eq!(cfg.output, OutputFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let cfg = load(&[
            ("TICKER", "aapl"),
            ("STRIKE_PRICE", "200.5"),
            ("EXPIRY_DATE", "2027-03-19"),
            ("RISK_FREE_RATE", "0.04"),
            ("VOLATILITY", "0.3"),
            ("SPOT_PRICE", "190.25"),
            ("OPTION_KINDS", "Put"),
            ("OUTPUT_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(cfg.ticker, "AAPL");
        assert_eq!(cfg.strike, 200.5);
        assert_eq!(cfg.expiry, NaiveDate::from_ymd_opt(2027, 3, 19).unwrap());
        assert_eq!(cfg.risk_free_rate, 0.04);
        assert_eq!(cfg.volatility, 0.3);
        assert_eq!(cfg.spot_override, Some(190.25));
        assert_eq!(cfg.kinds, [OptionKind::Put]);
        assert_eq!(cfg.output, OutputFormat::Json);
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        for vars in [
            [("STRIKE_PRICE", "abc")],
            [("EXPIRY_DATE", "31/12/2024")],
            [("QUOTE_TIMEOUT_SECS", "-1")],
            [("OUTPUT_FORMAT", "xml")],
            [("TICKER", "  ")],
            [("OPTION_KINDS", " , ")],
        ] {
            let err = load(&vars).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{vars:?} gave {err}");
        }
    }

    #[test]
    fn test_unknown_option_kind() {
        let err = load(&[("OPTION_KINDS", "call,straddle")]).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedOptionKind(ref k) if k == "straddle"));
    }
}
