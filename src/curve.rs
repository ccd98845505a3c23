// EC Point on the Stark Curve
//
// Short Weierstrass curve y² = x³ + αx + β (mod P) with α = 1.
// Affine coordinates; (0, 0) stands in for the point at infinity, which is
// safe because β != 0 puts no curve point at x = 0, y = 0.

use serde::{Deserialize, Serialize};

use crate::constants::{STARK_ALPHA, STARK_BETA};
use crate::felt::Felt252;

/// A point on the Stark elliptic curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ECPoint {
    pub x: Felt252,
    pub y: Felt252,
}

impl ECPoint {
    /// Point at infinity (identity element)
    pub const INFINITY: Self = ECPoint {
        x: Felt252::ZERO,
        y: Felt252::ZERO,
    };

    /// Create a new point
    pub fn new(x: Felt252, y: Felt252) -> Self {
        ECPoint { x, y }
    }

    /// Check if this is the point at infinity
    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// Check if point is on the curve, i.e. y² - x·(x² + α) = β.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return true;
        }

        let alpha = Felt252::from_u64(STARK_ALPHA);
        let lhs = self.y.mul_mod(&self.y);
        let rhs = self
            .x
            .mul_mod(&self.x)
            .add_mod(&alpha)
            .mul_mod(&self.x)
            .add_mod(&STARK_BETA);

        lhs == rhs
    }

    /// Third intersection of the line of slope `slope` through `self` and
    /// `other` with the curve, reflected over the x-axis. Both the chord
    /// (addition) and tangent (doubling) cases reduce to this.
    fn compose_along(&self, other: &Self, slope: &Felt252) -> Self {
        let x_out = slope.mul_mod(slope).sub_mod(&self.x).sub_mod(&other.x);
        let y_out = slope.mul_mod(&self.x.sub_mod(&x_out)).sub_mod(&self.y);
        ECPoint { x: x_out, y: y_out }
    }

    /// Point addition: self + other
    pub fn add(&self, other: &Self) -> Self {
        match (self.is_infinity(), other.is_infinity()) {
            (true, _) => return *other,
            (_, true) => return *self,
            _ => {}
        }

        if self.x == other.x {
            // Vertical chord: a coincident point doubles, inverses cancel
            return if self.y == other.y && !self.y.is_zero() {
                self.double()
            } else {
                Self::INFINITY
            };
        }

        let rise = other.y.sub_mod(&self.y);
        let run = other.x.sub_mod(&self.x);
        match run.inv_mod() {
            Some(run_inv) => self.compose_along(other, &rise.mul_mod(&run_inv)),
            None => Self::INFINITY,
        }
    }

    /// Point doubling: 2 * self
    pub fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::INFINITY;
        }

        // Implicit differentiation of the curve equation gives the tangent
        // slope (3x² + α) / 2y
        let x_sq = self.x.mul_mod(&self.x);
        let tangent_num = x_sq
            .add_mod(&x_sq)
            .add_mod(&x_sq)
            .add_mod(&Felt252::from_u64(STARK_ALPHA));
        let tangent_den = self.y.add_mod(&self.y);

        match tangent_den.inv_mod() {
            Some(den_inv) => self.compose_along(self, &tangent_num.mul_mod(&den_inv)),
            None => Self::INFINITY,
        }
    }

    /// Scalar multiplication: k * self (double-and-add over the low 252 bits)
    pub fn scalar_mul(&self, k: &Felt252) -> Self {
        if k.is_zero() || self.is_infinity() {
            return Self::INFINITY;
        }

        let mut result = Self::INFINITY;
        let mut base = *self;

        for i in 0..252 {
            if k.bit(i) {
                result = result.add(&base);
            }
            base = base.double();
        }

        result
    }
}

impl Default for ECPoint {
    fn default() -> Self {
        Self::INFINITY
    }
}
