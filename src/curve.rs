//! Curve-level entry points.
//!
//! Callers deal exclusively in canonical big integers here; all
//! Montgomery-form bookkeeping stays behind this facade. The curve
//! descriptor is built once from hex literals and shared read-only.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::arithmetic::field::{biguint_from_hex, FieldElement, MODULUS};
use crate::arithmetic::mul;
use crate::arithmetic::point::JacobianPoint;

/// Order of the SM2 elliptic curve group serialized as hexadecimal.
const ORDER_HEX: &str = "fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123";

/// Coefficient b of the curve equation serialized as hexadecimal.
const B_HEX: &str = "28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93";

const GX_HEX: &str = "32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7";
const GY_HEX: &str = "bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0";

/// SM2 curve domain parameters, `y² = x³ + ax + b` over GF(p).
///
/// Read-only after the one-time initialization; safe to share across
/// threads without synchronization.
pub struct CurveParams {
    /// Human-readable curve name.
    pub name: &'static str,
    /// Field prime.
    pub p: BigUint,
    /// Group order.
    pub n: BigUint,
    /// Coefficient a = p − 3.
    pub a: BigUint,
    /// Coefficient b.
    pub b: BigUint,
    /// Base point x-coordinate.
    pub gx: BigUint,
    /// Base point y-coordinate.
    pub gy: BigUint,
    /// Field size in bits.
    pub bit_size: u32,
    pub(crate) a_monty: FieldElement,
    pub(crate) b_monty: FieldElement,
}

static CURVE: LazyLock<CurveParams> = LazyLock::new(|| {
    let p = MODULUS.clone();
    let a = &p - BigUint::from(3u32);
    let b = biguint_from_hex(B_HEX);
    CurveParams {
        name: "SM2-P-256",
        a_monty: FieldElement::from_uint(&a),
        b_monty: FieldElement::from_uint(&b),
        p,
        n: biguint_from_hex(ORDER_HEX),
        a,
        b,
        gx: biguint_from_hex(GX_HEX),
        gy: biguint_from_hex(GY_HEX),
        bit_size: 256,
    }
});

/// Returns the shared curve descriptor, initializing it on first use.
pub fn curve_params() -> &'static CurveParams {
    &CURVE
}

/// Whether the affine point (x, y) satisfies the curve equation.
pub fn is_on_curve(x: &BigUint, y: &BigUint) -> bool {
    let params = curve_params();
    let xf = FieldElement::from_uint(x);
    let yf = FieldElement::from_uint(y);

    let y2 = yf.square();
    let x3 = xf.square().mul(&xf);
    let ax = params.a_monty.mul(&xf);
    let rhs = x3.add(&ax).add(&params.b_monty);

    y2.to_uint() == rhs.to_uint()
}

/// Computes `k * G` for the base point G.
///
/// `k` is interpreted as a big-endian integer and reduced modulo the
/// group order if out of range; `k ≡ 0 (mod n)` yields (0, 0).
pub fn scalar_base_mult(k: &[u8]) -> (BigUint, BigUint) {
    let scalar = normalize_scalar(k);
    mul::scalar_base_mult(&scalar).to_affine()
}

/// Computes `k * (x, y)`, with the same scalar handling as
/// [`scalar_base_mult`].
pub fn scalar_mult(x: &BigUint, y: &BigUint, k: &[u8]) -> (BigUint, BigUint) {
    let scalar = normalize_scalar(k);
    let xf = FieldElement::from_uint(x);
    let yf = FieldElement::from_uint(y);
    mul::scalar_mult(&xf, &yf, &scalar).to_affine()
}

/// Generic affine short-Weierstrass addition.
///
/// (0, 0) stands for the point at infinity on both sides. Equal x with
/// opposite y returns the identity; equal points dispatch to doubling.
pub fn affine_add(x1: &BigUint, y1: &BigUint, x2: &BigUint, y2: &BigUint) -> (BigUint, BigUint) {
    if x1.is_zero() && y1.is_zero() {
        return (x2.clone(), y2.clone());
    }
    if x2.is_zero() && y2.is_zero() {
        return (x1.clone(), y1.clone());
    }
    if x1 == x2 {
        if ((y1 + y2) % &curve_params().p).is_zero() {
            return (BigUint::zero(), BigUint::zero());
        }
        return affine_double(x1, y1);
    }

    let p1 = JacobianPoint::from_affine(&FieldElement::from_uint(x1), &FieldElement::from_uint(y1));
    p1.add_mixed(&FieldElement::from_uint(x2), &FieldElement::from_uint(y2))
        .to_affine()
}

/// Doubles the affine point (x, y); (0, 0) doubles to itself.
pub fn affine_double(x: &BigUint, y: &BigUint) -> (BigUint, BigUint) {
    if x.is_zero() && y.is_zero() {
        return (BigUint::zero(), BigUint::zero());
    }
    JacobianPoint::from_affine(&FieldElement::from_uint(x), &FieldElement::from_uint(y))
        .double()
        .to_affine()
}

/// Reduces a big-endian scalar modulo n when out of range, then reverses
/// it into the 32 little-endian bytes the multipliers consume.
fn normalize_scalar(k: &[u8]) -> [u8; 32] {
    let params = curve_params();
    let mut value = BigUint::from_bytes_be(k);
    if value >= params.n {
        value %= &params.n;
    }

    let le = value.to_bytes_le();
    let mut scalar = [0u8; 32];
    scalar[..le.len()].copy_from_slice(&le);
    scalar
}
