use crate::vector::Vector;
use crate::{Result, VectorError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::f64::consts::PI;
use tracing::debug;

/// Decimal places kept before comparing a dot product or taking its arccos.
pub const ANGLE_ROUNDING_PLACES: u32 = 3;

/// Default tolerance for [`Vector::is_near_zero`], 1e-10.
pub const DEFAULT_ZERO_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 10);

fn round_half_even(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(ANGLE_ROUNDING_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Rounds the cosine of an angle and pulls it back into arccos' domain.
fn clamp_cosine(dot: Decimal) -> Decimal {
    let rounded = round_half_even(dot);
    let clamped = rounded.clamp(Decimal::NEGATIVE_ONE, Decimal::ONE);
    if clamped != rounded {
        debug!(%rounded, %clamped, "clamped cosine into [-1, 1]");
    }
    clamped
}

impl Vector {
    /// Angle between two non-zero vectors, in radians.
    ///
    /// The cosine is the dot product of the unit vectors, rounded to three
    /// places and clamped to `[-1, 1]` before `acos`.
    pub fn angle_radians(&self, other: &Vector) -> Result<f64> {
        self.check_dimension(other)?;
        let dot = self.normalize()?.dot_product(&other.normalize()?)?;
        let cosine = clamp_cosine(dot)
            .to_f64()
            .ok_or(VectorError::Overflow { operation: "angle" })?;
        Ok(cosine.acos())
    }

    pub fn angle_degrees(&self, other: &Vector) -> Result<f64> {
        Ok(self.angle_radians(other)?.to_degrees())
    }

    /// True when every coordinate is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.iter().all(|c| c.is_zero())
    }

    /// True when every coordinate is strictly within `tolerance` of zero.
    pub fn is_near_zero(&self, tolerance: Decimal) -> bool {
        self.iter().all(|c| c.abs() < tolerance)
    }

    /// Zero vectors are orthogonal to everything.
    pub fn is_orthogonal(&self, other: &Vector) -> Result<bool> {
        Ok(round_half_even(self.dot_product(other)?).is_zero())
    }

    /// Zero vectors are parallel to everything. Otherwise the angle must be
    /// exactly 0 or π; the three-place rounding of the cosine makes (anti)parallel
    /// inputs land on `acos(1.0)` or `acos(-1.0)` exactly.
    pub fn is_parallel(&self, other: &Vector) -> Result<bool> {
        self.check_dimension(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(true);
        }
        let angle = self.angle_radians(other)?;
        Ok(angle == 0.0 || angle == PI)
    }
}
