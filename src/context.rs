use crate::{Result, VectorError};
use anyhow::Context;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Environment variable read by [`DecimalContext::from_env`].
pub const PRECISION_ENV_VAR: &str = "DECIMAL_VECTOR_PRECISION";

/// Largest number of significant digits the 96-bit decimal mantissa always holds.
pub const MAX_PRECISION: u32 = 28;

pub const DEFAULT_PRECISION: u32 = MAX_PRECISION;

/// Largest scale a decimal may carry.
pub const MAX_SCALE: u32 = 28;

static GLOBAL_CONTEXT: OnceLock<DecimalContext> = OnceLock::new();

/// Precision settings shared by every coordinate of a vector.
///
/// Values are rounded to `precision` significant digits with banker's
/// rounding (half-even) after each arithmetic step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimalContext {
    precision: u32,
}

impl DecimalContext {
    pub fn new(precision: u32) -> Result<Self> {
        if precision == 0 || precision > MAX_PRECISION {
            return Err(VectorError::InvalidConfig(format!(
                "precision must be between 1 and {}, got {}",
                MAX_PRECISION, precision
            )));
        }
        Ok(Self { precision })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Reads the precision from `DECIMAL_VECTOR_PRECISION`, falling back to
    /// the default when the variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_var(PRECISION_ENV_VAR)
    }

    fn from_var(name: &str) -> Result<Self> {
        match std::env::var(name) {
            Ok(raw) => {
                let precision = raw.trim().parse::<u32>().map_err(|_| {
                    VectorError::InvalidConfig(format!("{} is not a valid precision: {:?}", name, raw))
                })?;
                Self::new(precision)
            }
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(VectorError::InvalidConfig(format!("{}: {}", name, e))),
        }
    }

    /// Parses `{"precision": N}`. A missing field keeps the default.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: DecimalContext =
            serde_json::from_str(json).context("Failed to parse decimal context JSON")?;
        Self::new(parsed.precision)
    }

    /// Fixes the process-wide context. Only the first call succeeds, and only
    /// if no vector has been built from the global context yet.
    pub fn install(context: DecimalContext) -> Result<()> {
        GLOBAL_CONTEXT.set(context).map_err(|_| {
            VectorError::InvalidConfig("decimal context is already installed".to_string())
        })?;
        info!(precision = context.precision, "installed decimal context");
        Ok(())
    }

    /// The process-wide context, initialised from the environment on first use.
    pub fn global() -> DecimalContext {
        *GLOBAL_CONTEXT.get_or_init(|| match Self::from_env() {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "ignoring environment precision, using default");
                Self::default()
            }
        })
    }

    /// Rounds `value` to this context's significant digits.
    ///
    /// Values that already fit are returned unpadded; the result never
    /// carries trailing zeros or more than `MAX_SCALE` fractional digits.
    pub fn round(&self, value: Decimal) -> Decimal {
        let value = value.normalize();
        let rounded = if significant_digits(value) > self.precision {
            value
                .round_sf_with_strategy(self.precision, RoundingStrategy::MidpointNearestEven)
                .map(|r| r.normalize())
                .unwrap_or(value)
        } else {
            value
        };

        if rounded.scale() > MAX_SCALE {
            rounded
                .round_dp_with_strategy(MAX_SCALE, RoundingStrategy::MidpointNearestEven)
                .normalize()
        } else {
            rounded
        }
    }

    /// The coarser of two contexts; results of binary operations use it.
    pub fn coarser(self, other: DecimalContext) -> DecimalContext {
        if other.precision < self.precision {
            other
        } else {
            self
        }
    }
}

fn significant_digits(value: Decimal) -> u32 {
    let mut mantissa = value.normalize().mantissa().unsigned_abs();
    let mut digits = 0;
    while mantissa > 0 {
        mantissa /= 10;
        digits += 1;
    }
    digits
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_precision() {
        assert_eq!(DecimalContext::default().precision(), 28);
    }

    #[test]
    fn test_precision_bounds() {
        assert!(DecimalContext::new(1).is_ok());
        assert!(DecimalContext::new(28).is_ok());
        assert!(matches!(
            DecimalContext::new(0),
            Err(VectorError::InvalidConfig(_))
        ));
        assert!(matches!(
            DecimalContext::new(29),
            Err(VectorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_round_half_even() {
        let context = DecimalContext::new(3).unwrap();
        let d = |s: &str| Decimal::from_str(s).unwrap();

        assert_eq!(context.round(d("1.2345")), d("1.23"));
        assert_eq!(context.round(d("1.225")), d("1.22"));
        assert_eq!(context.round(d("1.235")), d("1.24"));
        assert_eq!(context.round(d("0")), d("0"));
    }

    #[test]
    fn test_round_keeps_short_values_unpadded() {
        let context = DecimalContext::default();
        let d = |s: &str| Decimal::from_str(s).unwrap();

        for raw in ["0.001", "0.03", "0.0000001", "0.0123456789123", "1.5", "-0.04"] {
            let rounded = context.round(d(raw));
            assert_eq!(rounded, d(raw));
            assert!(rounded.scale() <= MAX_SCALE, "{} rounded to scale {}", raw, rounded.scale());
        }
        assert_eq!(context.round(d("0.001")).scale(), 3);
        assert_eq!(context.round(d("1.5")).mantissa(), 15);
    }

    #[test]
    fn test_round_long_fraction() {
        let context = DecimalContext::new(5).unwrap();
        let rounded = context.round(Decimal::from_str("0.000000123456789").unwrap());
        assert_eq!(rounded, Decimal::from_str("0.00000012346").unwrap());
        assert!(rounded.scale() <= MAX_SCALE);
    }

    #[test]
    fn test_from_json() {
        let context = DecimalContext::from_json(r#"{"precision": 12}"#).unwrap();
        assert_eq!(context.precision(), 12);

        let context = DecimalContext::from_json("{}").unwrap();
        assert_eq!(context, DecimalContext::default());

        assert!(matches!(
            DecimalContext::from_json(r#"{"precision": 40}"#),
            Err(VectorError::InvalidConfig(_))
        ));
        assert!(matches!(
            DecimalContext::from_json("not json"),
            Err(VectorError::Other(_))
        ));
    }

    #[test]
    fn test_from_var() {
        let name = "DECIMAL_VECTOR_PRECISION_CONTEXT_TEST";

        std::env::remove_var(name);
        assert_eq!(DecimalContext::from_var(name).unwrap(), DecimalContext::default());

        std::env::set_var(name, "15");
        assert_eq!(DecimalContext::from_var(name).unwrap().precision(), 15);

        std::env::set_var(name, "fifteen");
        assert!(matches!(
            DecimalContext::from_var(name),
            Err(VectorError::InvalidConfig(_))
        ));

        std::env::remove_var(name);
    }

    #[test]
    fn test_coarser() {
        let fine = DecimalContext::new(20).unwrap();
        let coarse = DecimalContext::new(5).unwrap();
        assert_eq!(fine.coarser(coarse), coarse);
        assert_eq!(coarse.coarser(fine), coarse);
    }
}
