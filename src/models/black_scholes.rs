use crate::models::{OptionKind, PricingInput, PricingModel};
use statrs::distribution::{ContinuousCDF, Normal};

/// Black-Scholes pricing for European calls and puts.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// call = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// put  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// All computation uses the precomputed terms on PricingInput. No allocations.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl BlackScholes {
    pub fn new() -> Self {
        Self { normal: Normal::standard() }
    }
}

impl PricingModel for BlackScholes {
    #[inline]
    fn name(&self) -> &'static str {
        "Black-Scholes"
    }

    #[inline]
    fn price(&self, input: &PricingInput) -> f64 {
        let d1 = (input.ln_s_k + (input.rate + 0.5 * input.sigma * input.sigma) * input.ttl_years)
            / input.sigma_sqrt_t;
        let d2 = d1 - input.sigma_sqrt_t;
        let pv_strike = input.strike * input.discount;

        let price = match input.kind {
            OptionKind::Call => input.spot * self.normal.cdf(d1) - pv_strike * self.normal.cdf(d2),
            OptionKind::Put => pv_strike * self.normal.cdf(-d2) - input.spot * self.normal.cdf(-d1),
        };

        // Rounding can push a worthless option a hair below zero
        price.max(0.0)
    }
}
