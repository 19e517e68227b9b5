use crate::context::DecimalContext;
use crate::convert::ToDecimal;
use crate::{Result, VectorError};
use ndarray::{Array1, Ix1};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use tracing::debug;

/// An immutable, non-empty sequence of decimal coordinates.
///
/// Every coordinate is rounded to the vector's [`DecimalContext`]. All
/// operations return new vectors; binary operations require equal dimensions.
#[derive(Debug, Clone)]
pub struct Vector {
    coordinates: Array1<Decimal>,
    context: DecimalContext,
}

impl Vector {
    /// Builds a vector under the process-wide context.
    ///
    /// Accepts anything convertible to a decimal: integers, floats, strings
    /// or decimals.
    pub fn new<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: ToDecimal,
    {
        Self::with_context(values, DecimalContext::global())
    }

    pub fn with_context<I>(values: I, context: DecimalContext) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: ToDecimal,
    {
        let coordinates = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value.to_decimal() {
                Ok(d) => Ok(context.round(d)),
                Err(VectorError::InvalidArgument(msg)) => {
                    debug!(position = i, "rejected coordinate");
                    Err(VectorError::InvalidArgument(format!("coordinate {}: {}", i, msg)))
                }
                Err(e) => Err(e),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rounded(coordinates, context)
    }

    pub fn from_decimals(coordinates: Vec<Decimal>) -> Result<Self> {
        Self::with_context(coordinates, DecimalContext::global())
    }

    fn from_rounded(coordinates: Vec<Decimal>, context: DecimalContext) -> Result<Self> {
        if coordinates.is_empty() {
            debug!("rejected empty coordinate list");
            return Err(VectorError::InvalidArgument(
                "The coordinates must be nonempty".to_string(),
            ));
        }
        Ok(Self {
            coordinates: Array1::from_vec(coordinates),
            context,
        })
    }

    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinates(&self) -> &Array1<Decimal> {
        &self.coordinates
    }

    pub fn context(&self) -> DecimalContext {
        self.context
    }

    pub fn get(&self, axis: usize) -> Option<&Decimal> {
        self.coordinates.get(axis)
    }

    /// A fresh pass over the coordinates in axis order.
    pub fn iter(&self) -> ndarray::iter::Iter<'_, Decimal, Ix1> {
        self.coordinates.iter()
    }

    /// Lossy bridge to binary floating point.
    pub fn to_f64_array(&self) -> Array1<f64> {
        self.coordinates.mapv(|c| c.to_f64().unwrap_or(f64::NAN))
    }

    pub fn plus(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "plus", |a, b| a.checked_add(b))
    }

    pub fn minus(&self, other: &Vector) -> Result<Vector> {
        self.zip_with(other, "minus", |a, b| a.checked_sub(b))
    }

    pub fn times_scalar<T: ToDecimal>(&self, factor: T) -> Result<Vector> {
        let factor = factor.to_decimal()?;
        let coordinates = self
            .coordinates
            .iter()
            .map(|c| {
                c.checked_mul(factor)
                    .map(|product| self.context.round(product))
                    .ok_or(VectorError::Overflow {
                        operation: "times_scalar",
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rounded(coordinates, self.context)
    }

    /// Euclidean norm, computed with a decimal square root.
    pub fn magnitude(&self) -> Result<Decimal> {
        match self.scaled_norm()? {
            Some((largest, _, root)) => {
                let magnitude = largest.checked_mul(root).ok_or(VectorError::Overflow {
                    operation: "magnitude",
                })?;
                Ok(self.context.round(magnitude))
            }
            None => Ok(Decimal::ZERO),
        }
    }

    /// Scales the vector to unit length.
    ///
    /// The zero vector has no direction and is rejected before any division.
    pub fn normalize(&self) -> Result<Vector> {
        let Some((_, ratios, root)) = self.scaled_norm()? else {
            debug!(dimension = self.dimension(), "normalize called on the zero vector");
            return Err(VectorError::DegenerateVector(
                "cannot normalize the zero vector".to_string(),
            ));
        };

        let coordinates = ratios
            .into_iter()
            .map(|ratio| {
                ratio
                    .checked_div(root)
                    .map(|unit| self.context.round(unit))
                    .ok_or(VectorError::Overflow {
                        operation: "normalize",
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rounded(coordinates, self.context)
    }

    /// Splits the norm as `largest * root`, where `root` is the norm of the
    /// coordinates divided by the largest absolute coordinate. Squaring the
    /// ratios keeps tiny vectors from vanishing and large ones from
    /// overflowing. `None` for the zero vector.
    fn scaled_norm(&self) -> Result<Option<(Decimal, Vec<Decimal>, Decimal)>> {
        let overflow = || VectorError::Overflow {
            operation: "magnitude",
        };
        let largest = self
            .coordinates
            .iter()
            .map(|c| c.abs())
            .max()
            .unwrap_or(Decimal::ZERO);
        if largest.is_zero() {
            return Ok(None);
        }

        let ratios = self
            .coordinates
            .iter()
            .map(|c| {
                c.checked_div(largest)
                    .map(|ratio| self.context.round(ratio))
                    .ok_or_else(overflow)
            })
            .collect::<Result<Vec<_>>>()?;

        // Every ratio lies in [-1, 1], so the sum stays below the dimension.
        let sum_of_squares = ratios.iter().fold(Decimal::ZERO, |acc, r| {
            self.context.round(acc + self.context.round(r * r))
        });
        let root = sum_of_squares.sqrt().ok_or_else(overflow)?;

        Ok(Some((largest, ratios, self.context.round(root))))
    }

    pub fn dot_product(&self, other: &Vector) -> Result<Decimal> {
        self.check_dimension(other)?;
        let context = self.context.coarser(other.context);

        self.coordinates
            .iter()
            .zip(other.coordinates.iter())
            .try_fold(Decimal::ZERO, |acc, (a, b)| {
                a.checked_mul(*b)
                    .and_then(|product| acc.checked_add(context.round(product)))
                    .map(|sum| context.round(sum))
            })
            .ok_or(VectorError::Overflow {
                operation: "dot_product",
            })
    }

    pub(crate) fn check_dimension(&self, other: &Vector) -> Result<()> {
        if self.dimension() != other.dimension() {
            debug!(
                left = self.dimension(),
                right = other.dimension(),
                "dimension mismatch"
            );
            return Err(VectorError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        }
        Ok(())
    }

    fn zip_with<F>(&self, other: &Vector, operation: &'static str, f: F) -> Result<Vector>
    where
        F: Fn(Decimal, Decimal) -> Option<Decimal>,
    {
        self.check_dimension(other)?;
        let context = self.context.coarser(other.context);

        let coordinates = self
            .coordinates
            .iter()
            .zip(other.coordinates.iter())
            .map(|(a, b)| {
                f(*a, *b)
                    .map(|value| context.round(value))
                    .ok_or(VectorError::Overflow { operation })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_rounded(coordinates, context)
    }
}

// Equality and hashing look at coordinate values only; 1.0 and 1.00 compare equal.
impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates
    }
}

impl Eq for Vector {}

impl Hash for Vector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.coordinates.iter() {
            c.hash(state);
        }
    }
}

impl Index<usize> for Vector {
    type Output = Decimal;

    fn index(&self, axis: usize) -> &Decimal {
        &self.coordinates[axis]
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a Decimal;
    type IntoIter = ndarray::iter::Iter<'a, Decimal, Ix1>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector: (")?;
        for (i, c) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c.normalize())?;
        }
        write!(f, ")")
    }
}

impl TryFrom<Vec<Decimal>> for Vector {
    type Error = VectorError;

    fn try_from(coordinates: Vec<Decimal>) -> Result<Self> {
        Self::from_decimals(coordinates)
    }
}

impl TryFrom<&[f64]> for Vector {
    type Error = VectorError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::new(values)
    }
}

impl TryFrom<&Array1<f64>> for Vector {
    type Error = VectorError;

    fn try_from(values: &Array1<f64>) -> Result<Self> {
        Self::new(values.iter())
    }
}
