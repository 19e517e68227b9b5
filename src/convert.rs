use crate::{Result, VectorError};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Conversion into the decimal type used for coordinates and scalars.
///
/// Integers convert exactly. Floats convert through their shortest decimal
/// form, so `8.218_f64` becomes `8.218`. Strings accept plain and scientific
/// notation.
pub trait ToDecimal {
    fn to_decimal(&self) -> Result<Decimal>;
}

pub fn to_decimal<T: ToDecimal>(value: T) -> Result<Decimal> {
    value.to_decimal()
}

impl ToDecimal for Decimal {
    fn to_decimal(&self) -> Result<Decimal> {
        Ok(*self)
    }
}

impl<T: ToDecimal + ?Sized> ToDecimal for &T {
    fn to_decimal(&self) -> Result<Decimal> {
        (**self).to_decimal()
    }
}

macro_rules! impl_to_decimal_for_int {
    ($($t:ty),*) => {
        $(
            impl ToDecimal for $t {
                fn to_decimal(&self) -> Result<Decimal> {
                    Ok(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_to_decimal_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl ToDecimal for f64 {
    fn to_decimal(&self) -> Result<Decimal> {
        // Display prints the shortest round-trip form, which keeps 8.218 exact.
        Decimal::from_str(&self.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(*self))
            .ok_or_else(|| {
                VectorError::InvalidArgument(format!("cannot convert {} to a decimal", self))
            })
    }
}

impl ToDecimal for f32 {
    fn to_decimal(&self) -> Result<Decimal> {
        Decimal::from_str(&self.to_string())
            .ok()
            .or_else(|| Decimal::from_f32(*self))
            .ok_or_else(|| {
                VectorError::InvalidArgument(format!("cannot convert {} to a decimal", self))
            })
    }
}

impl ToDecimal for str {
    fn to_decimal(&self) -> Result<Decimal> {
        let trimmed = self.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| {
                VectorError::InvalidArgument(format!("cannot convert {:?} to a decimal", self))
            })
    }
}

impl ToDecimal for String {
    fn to_decimal(&self) -> Result<Decimal> {
        self.as_str().to_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_integers_convert_exactly() {
        assert_eq!(to_decimal(42).unwrap(), d("42"));
        assert_eq!(to_decimal(-7i64).unwrap(), d("-7"));
        assert_eq!(to_decimal(3usize).unwrap(), d("3"));
    }

    #[test]
    fn test_strings() {
        assert_eq!(to_decimal("8.218").unwrap(), d("8.218"));
        assert_eq!(to_decimal(" -0.5 ").unwrap(), d("-0.5"));
        assert_eq!(to_decimal("1.5e-3").unwrap(), d("0.0015"));
        assert_eq!(to_decimal(String::from("7")).unwrap(), d("7"));
    }

    #[test]
    fn test_floats_round_to_short_form() {
        assert_eq!(to_decimal(0.5f64).unwrap(), d("0.5"));
        assert_eq!(to_decimal(-2.25f32).unwrap(), d("-2.25"));
        assert_eq!(to_decimal(7.41f64).unwrap(), d("7.41"));
        assert_eq!(to_decimal(8.218f32).unwrap(), d("8.218"));
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert!(matches!(to_decimal("abc"), Err(VectorError::InvalidArgument(_))));
        assert!(matches!(to_decimal(""), Err(VectorError::InvalidArgument(_))));
        assert!(matches!(to_decimal(f64::NAN), Err(VectorError::InvalidArgument(_))));
        assert!(matches!(
            to_decimal(f64::INFINITY),
            Err(VectorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_references_forward() {
        let value = 3.5f64;
        assert_eq!(to_decimal(&value).unwrap(), d("3.5"));
        assert_eq!(to_decimal(&&"2").unwrap(), d("2"));
    }
}
