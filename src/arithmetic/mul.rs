//! Scalar multiplication.
//!
//! Both multipliers consume the scalar as 32 little-endian bytes, already
//! reduced below the group order, and run a fixed number of iterations
//! regardless of the scalar value. Table reads are masked scans that
//! touch every entry, and the accumulator is patched in and out of the
//! point-at-infinity state with conditional copies rather than branches.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::field::FieldElement;
use super::point::JacobianPoint;
use super::table::BASE_TABLE;

/// Flat offset of the second comb group within [`BASE_TABLE`].
const COMB_GROUP_OFFSET: usize = 270;

/// Returns the `bit`-th bit of the little-endian scalar.
fn scalar_bit(scalar: &[u8; 32], bit: usize) -> u32 {
    u32::from((scalar[bit >> 3] >> (bit & 7)) & 1)
}

/// Constant-time read of entry `index` from one comb group: every entry
/// is loaded and masked against an index comparison.
fn select_affine(group: &[u32], index: u32) -> (FieldElement, FieldElement) {
    let mut x = FieldElement::zero();
    let mut y = FieldElement::zero();
    for entry in 0..16u32 {
        let hit = entry.ct_eq(&index);
        let offset = entry as usize * 18;
        let candidate_x = FieldElement(core::array::from_fn(|i| group[offset + i]));
        let candidate_y = FieldElement(core::array::from_fn(|i| group[offset + 9 + i]));
        x.conditional_assign(&candidate_x, hit);
        y.conditional_assign(&candidate_y, hit);
    }
    (x, y)
}

/// Constant-time read of entry `index` from a 16-entry Jacobian table.
fn select_jacobian(table: &[JacobianPoint; 16], index: u32) -> JacobianPoint {
    let mut selected = JacobianPoint::IDENTITY;
    for (entry, candidate) in table.iter().enumerate() {
        selected.conditional_assign(candidate, (entry as u32).ct_eq(&index));
    }
    selected
}

/// Computes `scalar * G` using the precomputed comb table.
///
/// Each of the 32 iterations doubles once and folds in two 4-bit comb
/// indices, one per group, drawn from scalar bit positions 64 bits apart
/// (the second group shifted by 32). Mixed addition is wrong whenever
/// the accumulator or the table point is the identity, so both cases are
/// repaired with masked copies: while the accumulator is still infinite
/// the selected point is copied in wholesale, and a zero index leaves
/// the accumulator untouched.
pub(crate) fn scalar_base_mult(scalar: &[u8; 32]) -> JacobianPoint {
    let mut acc = JacobianPoint::IDENTITY;
    let mut acc_is_infinity = Choice::from(1u8);

    for i in 0..32 {
        if i != 0 {
            acc = acc.double();
        }

        for (j, group_offset) in [(0, 0), (32, COMB_GROUP_OFFSET)] {
            let index = scalar_bit(scalar, 31 - i + j)
                | scalar_bit(scalar, 95 - i + j) << 1
                | scalar_bit(scalar, 159 - i + j) << 2
                | scalar_bit(scalar, 223 - i + j) << 3;

            let (px, py) = select_affine(&BASE_TABLE[group_offset..], index);
            let sum = acc.add_mixed(&px, &py);

            acc.conditional_assign(&JacobianPoint::from_affine(&px, &py), acc_is_infinity);

            let entry_is_nonzero = !index.ct_eq(&0);
            acc.conditional_assign(&sum, entry_is_nonzero & !acc_is_infinity);
            acc_is_infinity &= !entry_is_nonzero;
        }
    }

    acc
}

/// Computes `scalar * (x, y)` with a 4-bit window.
///
/// A 16-entry table of small multiples is built up front (entry 0 stays
/// at the identity and is filtered by the mask discipline, exactly like
/// a zero comb index above); each of the 64 iterations performs four
/// doublings and one full addition of the selected entry.
pub(crate) fn scalar_mult(x: &FieldElement, y: &FieldElement, scalar: &[u8; 32]) -> JacobianPoint {
    let mut precomp = [JacobianPoint::IDENTITY; 16];
    precomp[1] = JacobianPoint::from_affine(x, y);
    for i in (2..16).step_by(2) {
        precomp[i] = precomp[i / 2].double();
        precomp[i + 1] = precomp[i].add_mixed(x, y);
    }

    let mut acc = JacobianPoint::IDENTITY;
    let mut acc_is_infinity = Choice::from(1u8);

    for i in 0..64 {
        if i != 0 {
            acc = acc.double();
            acc = acc.double();
            acc = acc.double();
            acc = acc.double();
        }

        let byte = u32::from(scalar[31 - i / 2]);
        let index = if i & 1 == 1 { byte & 15 } else { byte >> 4 };

        let selected = select_jacobian(&precomp, index);
        let sum = acc.add(&selected);

        acc.conditional_assign(&selected, acc_is_infinity);

        let entry_is_nonzero = !index.ct_eq(&0);
        acc.conditional_assign(&sum, entry_is_nonzero & !acc_is_infinity);
        acc_is_infinity &= !entry_is_nonzero;
    }

    acc
}
