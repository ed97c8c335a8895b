//! Pure Rust implementation of the core arithmetic of the SM2 elliptic
//! curve (GB/T 32918), the Chinese national standard prime-order curve
//! over a 256-bit prime field.
//!
//! Field elements use a redundant 9-limb radix with alternating 29/28-bit
//! widths in Montgomery form (R = 2^257), which keeps the reduction
//! modulo p = 2^256 − 2^224 − 2^96 + 2^64 − 1 a matter of shifts and
//! structured additions. Scalar multiplication runs a fixed iteration
//! schedule with constant-time table selection and conditional copies.
//!
//! The crate exposes only the curve facade: the domain parameters, the
//! on-curve predicate, fixed-base and variable-base scalar
//! multiplication, and generic affine addition/doubling. Signature and
//! encryption schemes, hashing, key management and encoding belong to
//! consumers of this crate.
//!
//! Curve parameters can be found in [draft-shen-sm2-ecdsa Appendix D]:
//! Recommended Parameters.
//!
//! [draft-shen-sm2-ecdsa Appendix D]: https://datatracker.ietf.org/doc/html/draft-shen-sm2-ecdsa-02#appendix-D

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod arithmetic;
mod curve;

pub use num_bigint;

pub use curve::{
    affine_add, affine_double, curve_params, is_on_curve, scalar_base_mult, scalar_mult,
    CurveParams,
};
