use crate::errors::EngineResult;

/// Everything printed for one run. Rounding happens only in Display.
/// A side that was not requested stays None and is left out of the output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PricingReport {
    pub symbol: String,
    pub session: Option<chrono::NaiveDate>,
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub sigma: f64,
    pub model: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<f64>,
}

impl PricingReport {
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for PricingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} Current Stock Price: {:.2}", self.symbol, self.spot)?;
        writeln!(f, "Strike Price: {}", self.strike)?;
        writeln!(f, "Time to Expiration (years): {:.2}", self.ttl_years)?;
        writeln!(f, "Risk-Free Interest Rate: {}", self.rate)?;
        write!(f, "Volatility: {:.2}", self.sigma)?;
        if let Some(call) = self.call {
            write!(f, "\nCall Option Price: {call:.2}")?;
        }
        if let Some(put) = self.put {
            write!(f, "\nPut Option Price: {put:.2}")?;
        }
        Ok(())
    }
}
