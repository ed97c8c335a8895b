//! Curve-level tests: concrete vectors, consistency between the two
//! scalar multipliers, and group-law properties.

use hex_literal::hex;
use num_bigint::BigUint;
use proptest::prelude::*;
use sm2p256::{
    affine_add, affine_double, curve_params, is_on_curve, scalar_base_mult, scalar_mult,
};

fn uint(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("valid hex")
}

fn generator() -> (BigUint, BigUint) {
    let params = curve_params();
    (params.gx.clone(), params.gy.clone())
}

#[test]
fn curve_parameters_match_the_standard() {
    let params = curve_params();
    assert_eq!(
        params.p,
        uint("fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff")
    );
    assert_eq!(
        params.n,
        uint("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123")
    );
    assert_eq!(
        params.b,
        uint("28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93")
    );
    assert_eq!(
        params.gx,
        uint("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7")
    );
    assert_eq!(
        params.gy,
        uint("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0")
    );
}

#[test]
fn generator_is_on_curve() {
    let (gx, gy) = generator();
    assert!(is_on_curve(&gx, &gy));
}

#[test]
fn perturbed_generator_is_rejected() {
    let (gx, gy) = generator();
    let one = BigUint::from(1u32);
    assert!(!is_on_curve(&(&gx + &one), &gy));
    assert!(!is_on_curve(&gx, &(&gy ^ &one)));
}

#[test]
fn multiplying_base_by_one_yields_the_generator() {
    // Equivalently: the public key for the private scalar 1 is G itself.
    assert_eq!(scalar_base_mult(&[1]), generator());
}

#[test]
fn doubling_agrees_with_generic_addition() {
    let (gx, gy) = generator();
    let doubled = affine_double(&gx, &gy);
    assert_eq!(affine_add(&gx, &gy, &gx, &gy), doubled);
    assert_eq!(scalar_base_mult(&[2]), doubled);
    assert!(is_on_curve(&doubled.0, &doubled.1));
}

#[test]
fn triple_via_addition_chain() {
    let (gx, gy) = generator();
    let (x2, y2) = affine_add(&gx, &gy, &gx, &gy);
    let expected = affine_add(&gx, &gy, &x2, &y2);
    assert_eq!(scalar_mult(&gx, &gy, &[3]), expected);
    assert_eq!(scalar_base_mult(&[3]), expected);
}

#[test]
fn fixed_and_variable_base_agree_on_small_scalars() {
    let (gx, gy) = generator();
    for k in 1u8..=32 {
        assert_eq!(scalar_mult(&gx, &gy, &[k]), scalar_base_mult(&[k]), "k={k}");
    }
}

#[test]
fn fixed_and_variable_base_agree_on_wide_scalars() {
    let (gx, gy) = generator();
    let scalars: [[u8; 32]; 4] = [
        hex!("00000000000000000000000000000000000000000000000000000000deadbeef"),
        hex!("7fffffff800000017fffffff800000017fffffff800000017fffffff80000001"),
        hex!("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54122"),
        hex!("128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"),
    ];
    for scalar in &scalars {
        assert_eq!(scalar_mult(&gx, &gy, scalar), scalar_base_mult(scalar));
    }
}

#[test]
fn variable_base_works_on_arbitrary_points() {
    let params = curve_params();
    let (qx, qy) = scalar_base_mult(&[7]);
    for k in 1u8..=16 {
        let expected = scalar_base_mult(&((BigUint::from(7u32) * k) % &params.n).to_bytes_be());
        assert_eq!(scalar_mult(&qx, &qy, &[k]), expected, "k={k}");
    }
}

#[test]
fn order_minus_one_negates_the_generator() {
    let params = curve_params();
    let k = (&params.n - BigUint::from(1u32)).to_bytes_be();
    let (x, y) = scalar_base_mult(&k);
    assert_eq!(x, params.gx);
    assert_eq!(y, &params.p - &params.gy);
}

#[test]
fn oversized_scalars_are_reduced() {
    let params = curve_params();
    let k = (&params.n + BigUint::from(5u32)).to_bytes_be();
    assert_eq!(scalar_base_mult(&k), scalar_base_mult(&[5]));
}

#[test]
fn adding_opposite_points_gives_the_identity() {
    let params = curve_params();
    let (gx, gy) = generator();
    let neg_gy = &params.p - &gy;
    let (x, y) = affine_add(&gx, &gy, &gx, &neg_gy);
    assert_eq!(x, BigUint::from(0u32));
    assert_eq!(y, BigUint::from(0u32));
}

#[test]
fn identity_is_neutral_for_generic_addition() {
    let (gx, gy) = generator();
    let zero = BigUint::from(0u32);
    assert_eq!(affine_add(&zero, &zero, &gx, &gy), (gx.clone(), gy.clone()));
    assert_eq!(affine_add(&gx, &gy, &zero, &zero), (gx, gy));
}

prop_compose! {
    fn scalar()(bytes in any::<[u8; 32]>()) -> BigUint {
        let n = &curve_params().n;
        let k = BigUint::from_bytes_be(&bytes) % n;
        if k == BigUint::from(0u32) { BigUint::from(1u32) } else { k }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn multiples_of_the_generator_stay_on_curve(k in scalar()) {
        let (x, y) = scalar_base_mult(&k.to_bytes_be());
        prop_assert!(is_on_curve(&x, &y));
    }

    #[test]
    fn fixed_and_variable_base_agree(k in scalar()) {
        let (gx, gy) = generator();
        let k = k.to_bytes_be();
        prop_assert_eq!(scalar_mult(&gx, &gy, &k), scalar_base_mult(&k));
    }

    #[test]
    fn base_multiplication_is_additive(k1 in scalar(), k2 in scalar()) {
        let n = &curve_params().n;
        let sum = (&k1 + &k2) % n;
        prop_assume!(sum != BigUint::from(0u32));

        let (x1, y1) = scalar_base_mult(&k1.to_bytes_be());
        let (x2, y2) = scalar_base_mult(&k2.to_bytes_be());
        prop_assert_eq!(
            affine_add(&x1, &y1, &x2, &y2),
            scalar_base_mult(&sum.to_bytes_be())
        );
    }
}
