pub mod black_scholes;

use crate::errors::{EngineError, EngineResult};
use std::str::FromStr;

/// Pricing models implement this trait.
/// price() must be a pure function: deterministic output from inputs only.
pub trait PricingModel {
    fn name(&self) -> &'static str;

    /// Price of one option on one unit of the underlying, in the same
    /// currency as spot and strike. Never negative.
    fn price(&self, input: &PricingInput) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            _ => Err(EngineError::UnsupportedOptionKind(s.to_string())),
        }
    }
}

/// Validated Black-Scholes inputs with the shared terms precomputed.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub sigma: f64,
    pub kind: OptionKind,
    // Precomputed
    pub ln_s_k: f64,
    pub sigma_sqrt_t: f64,
    pub discount: f64,
}

impl PricingInput {
    /// Fails with `InvalidParameter` unless spot, strike, ttl and sigma are
    /// finite and strictly positive and the rate is finite.
    pub fn new(
        spot: f64,
        strike: f64,
        ttl_years: f64,
        rate: f64,
        sigma: f64,
        kind: OptionKind,
    ) -> EngineResult<Self> {
        positive("spot", spot)?;
        positive("strike", strike)?;
        positive("ttl_years", ttl_years)?;
        positive("sigma", sigma)?;
        if !rate.is_finite() {
            return Err(EngineError::InvalidParameter { name: "rate", value: rate });
        }

        Ok(Self {
            spot,
            strike,
            ttl_years,
            rate,
            sigma,
            kind,
            ln_s_k: (spot / strike).ln(),
            sigma_sqrt_t: sigma * ttl_years.sqrt(),
            discount: (-rate * ttl_years).exp(),
        })
    }

    /// Same market inputs, other side of the contract.
    #[inline]
    pub fn with_kind(self, kind: OptionKind) -> Self {
        Self { kind, ..self }
    }
}

fn positive(name: &'static str, value: f64) -> EngineResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("call".parse::<OptionKind>().unwrap(), OptionKind::Call);
        assert_eq!(" PUT ".parse::<OptionKind>().unwrap(), OptionKind::Put);
        assert_eq!(OptionKind::Put.to_string(), "put");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "straddle".parse::<OptionKind>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedOptionKind(ref k) if k == "straddle"));
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let cases = [
            (0.0, 100.0, 1.0, 0.05, 0.2, "spot"),
            (100.0, 0.0, 1.0, 0.05, 0.2, "strike"),
            (100.0, -5.0, 1.0, 0.05, 0.2, "strike"),
            (100.0, 100.0, 0.0, 0.05, 0.2, "ttl_years"),
            (100.0, 100.0, 1.0, 0.05, 0.0, "sigma"),
            (100.0, 100.0, 1.0, f64::NAN, 0.2, "rate"),
            (f64::INFINITY, 100.0, 1.0, 0.05, 0.2, "spot"),
        ];
        for (s, k, t, r, sigma, expected) in cases {
            let err = PricingInput::new(s, k, t, r, sigma, OptionKind::Call).unwrap_err();
            match err {
                EngineError::InvalidParameter { name, .. } => assert_eq!(name, expected),
                other => panic!("expected InvalidParameter({expected}), got {other}"),
            }
        }
    }

    #[test]
    fn test_negative_rate_allowed() {
        let input = PricingInput::new(100.0, 100.0, 1.0, -0.01, 0.2, OptionKind::Put).unwrap();
        assert!(input.discount > 1.0);
        assert_eq!(input.with_kind(OptionKind::Call).kind, OptionKind::Call);
    }
}
