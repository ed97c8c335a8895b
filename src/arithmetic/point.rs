//! Jacobian-coordinate group operations.
//!
//! A point (X, Y, Z) stands for the affine point (X/Z², Y/Z³); Z = 0 is
//! the point at infinity. The curve has a general `a` coefficient
//! (a = p − 3 is not exploited), so doubling uses the generic
//! short-Weierstrass formulas.

use num_bigint::BigUint;
use subtle::{Choice, ConditionallySelectable};

use super::field::{FieldElement, INFINITY_Z_LIMBS, MODULUS};
use crate::curve;

/// Point on the SM2 curve in Jacobian coordinates, Montgomery form.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct JacobianPoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
}

impl ConditionallySelectable for JacobianPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl JacobianPoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::zero(),
        y: FieldElement::zero(),
        z: FieldElement::zero(),
    };

    /// Lifts an affine point (Montgomery form) to Jacobian coordinates.
    pub fn from_affine(x: &FieldElement, y: &FieldElement) -> Self {
        Self {
            x: *x,
            y: *y,
            z: FieldElement::one(),
        }
    }

    /// Returns the doubled point.
    ///
    /// λ = 3x² + a·z⁴, X₃ = λ² − 8xy², Y₃ = λ(4xy² − X₃) − 8y⁴,
    /// Z₃ = 2yz.
    pub fn double(&self) -> Self {
        let a = &curve::curve_params().a_monty;

        let xx = self.x.square();
        let zz = self.z.square();
        let yy = self.y.square();
        let z4a = zz.square().mul(a);
        let s = self.x.mul(&yy);

        let mut lambda = xx.add(&xx);
        lambda = lambda.add(&xx);
        lambda = lambda.add(&z4a);

        let mut y4 = yy.add(&yy);
        let lambda2 = lambda.square();
        y4 = y4.square();
        y4 = y4.add(&y4); // 8y⁴

        let mut s4 = s.add(&s);
        s4 = s4.add(&s4); // 4xy²

        let mut x3 = lambda2.sub(&s4);
        x3 = x3.sub(&s4);

        let t = s4.sub(&x3);
        let y3 = t.mul(&lambda).sub(&y4);

        let mut z3 = self.y.mul(&self.z);
        z3 = z3.add(&z3);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Full Jacobian addition.
    ///
    /// Either operand with an infinity-encoded Z (all zeros, or the
    /// doubled-modulus alias) passes the other through unchanged. Equal
    /// operands produce the point at infinity (dx = dy = 0); callers in
    /// the scalar-multiplication loops never hit that case for scalars
    /// below the group order, and the affine entry points dispatch
    /// doubling themselves.
    pub fn add(&self, other: &Self) -> Self {
        if z_is_infinity(&self.z) {
            return *other;
        }
        if z_is_infinity(&other.z) {
            return *self;
        }

        let z12 = self.z.square();
        let z22 = other.z.square();
        let z13 = z12.mul(&self.z);
        let z23 = z22.mul(&other.z);
        let tx1 = self.x.mul(&z22);
        let tx2 = other.x.mul(&z12);
        let ty1 = self.y.mul(&z23);
        let ty2 = other.y.mul(&z13);

        let dx = tx2.sub(&tx1);
        let dy = ty2.sub(&ty1);
        let dy2 = dy.square();
        let dx2 = dx.square();
        let dx3 = dx2.mul(&dx);
        let tm = tx1.mul(&dx2);

        let mut x3 = dy2.sub(&dx3);
        x3 = x3.sub(&tm);
        x3 = x3.sub(&tm);

        let tm = tm.sub(&x3);
        let y3 = dy.mul(&tm).sub(&ty1.mul(&dx3));
        let z3 = self.z.mul(&other.z).mul(&dx);

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Mixed addition of an affine point (implicit Z₂ = 1).
    pub fn add_mixed(&self, x2: &FieldElement, y2: &FieldElement) -> Self {
        let z1z1 = self.z.square();
        let z1z1z1 = z1z1.mul(&self.z);
        let tx2 = x2.mul(&z1z1);
        let ty2 = y2.mul(&z1z1z1);

        let dx = tx2.sub(&self.x);
        let dy = ty2.sub(&self.y);
        let z3 = self.z.mul(&dx);

        let dx2 = dx.square();
        let dy2 = dy.square();
        let dx3 = dx.mul(&dx2);
        let v = self.x.mul(&dx2);

        let mut x3 = dy2.sub(&dx3);
        x3 = x3.sub(&v);
        x3 = x3.sub(&v);

        let t = v.sub(&x3);
        let y3 = t.mul(&dy).sub(&self.y.mul(&dx3));

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Converts to canonical affine coordinates.
    ///
    /// The inverse of Z is delegated to the big-integer layer via
    /// Fermat's little theorem; z = 0 maps to itself, so the point at
    /// infinity comes back as (0, 0).
    pub fn to_affine(&self) -> (BigUint, BigUint) {
        let exponent = &*MODULUS - BigUint::from(2u32);
        let z_inv = FieldElement::from_uint(&self.z.to_uint().modpow(&exponent, &MODULUS));

        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);
        (self.x.mul(&z_inv2).to_uint(), self.y.mul(&z_inv3).to_uint())
    }
}

/// Both encodings of an infinite Z-coordinate, checked limbwise.
fn z_is_infinity(z: &FieldElement) -> bool {
    z.0 == [0u32; 9] || z.0 == INFINITY_Z_LIMBS
}
