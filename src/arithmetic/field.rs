//! Field arithmetic modulo p = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff
//!
//! Elements are held in a redundant radix with nine limbs of alternating
//! 29/28-bit widths, so that two adjacent limbs pack into a single 57-bit
//! lane during reduction and a couple of additions can be absorbed between
//! carry passes. Every element that circulates here is in Montgomery form
//! `x·R mod p` with `R = 2^257`.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use subtle::{Choice, ConditionallySelectable};

/// Constant representing the modulus serialized as hex.
pub(crate) const MODULUS_HEX: &str =
    "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff";

/// `R⁻¹ mod p` for `R = 2^257`, applied when leaving Montgomery form.
const R_INVERSE_HEX: &str = "7ffffffd80000002fffffffe000000017ffffffe800000037ffffffc80000002";

pub(crate) static MODULUS: LazyLock<BigUint> = LazyLock::new(|| biguint_from_hex(MODULUS_HEX));

pub(crate) static R_INVERSE: LazyLock<BigUint> = LazyLock::new(|| biguint_from_hex(R_INVERSE_HEX));

/// Parses a hex literal into a [`BigUint`]. Only used on embedded constants.
pub(crate) fn biguint_from_hex(hex: &str) -> BigUint {
    BigUint::parse_bytes(hex.as_bytes(), 16).expect("invalid hex constant")
}

/// Bit width of each limb, least significant first.
pub(crate) const LIMB_WIDTHS: [u32; 9] = [29, 28, 29, 28, 29, 28, 29, 28, 29];

const BOTTOM_28_BITS: u32 = 0x0fff_ffff;
const BOTTOM_29_BITS: u32 = 0x1fff_ffff;
const BOTTOM_57_BITS: u64 = 0x01ff_ffff_ffff_ffff;
const TWO_POW_57: u64 = 0x0200_0000_0000_0000;

const LIMB_MASKS: [u32; 9] = [
    BOTTOM_29_BITS,
    BOTTOM_28_BITS,
    BOTTOM_29_BITS,
    BOTTOM_28_BITS,
    BOTTOM_29_BITS,
    BOTTOM_28_BITS,
    BOTTOM_29_BITS,
    BOTTOM_28_BITS,
    BOTTOM_29_BITS,
];

/// `i·R mod p` for `i = 0..=8`, in limb form.
///
/// Row 1 is "one" in Montgomery form. Rows 0..=7 double as the carry
/// folding table: a carry of `c` out of the top limb is worth `c·R`, so
/// adding row `c` back in cancels it while implicitly subtracting `2c·p`.
/// Only limbs 0, 2, 3 and 7 are nonzero in rows 0..=7 (row 8 also
/// carries into limb 8).
const R_MULTIPLES: [[u32; 9]; 9] = [
    [0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    [0x2, 0x0, 0x1fffff00, 0x7ff, 0x0, 0x0, 0x0, 0x2000000, 0x0],
    [0x4, 0x0, 0x1ffffe00, 0xfff, 0x0, 0x0, 0x0, 0x4000000, 0x0],
    [0x6, 0x0, 0x1ffffd00, 0x17ff, 0x0, 0x0, 0x0, 0x6000000, 0x0],
    [0x8, 0x0, 0x1ffffc00, 0x1fff, 0x0, 0x0, 0x0, 0x8000000, 0x0],
    [0xa, 0x0, 0x1ffffb00, 0x27ff, 0x0, 0x0, 0x0, 0xa000000, 0x0],
    [0xc, 0x0, 0x1ffffa00, 0x2fff, 0x0, 0x0, 0x0, 0xc000000, 0x0],
    [0xe, 0x0, 0x1ffff900, 0x37ff, 0x0, 0x0, 0x0, 0xe000000, 0x0],
    [0x10, 0x0, 0x1ffff800, 0x3fff, 0x0, 0x0, 0x0, 0x0, 0x1],
];

/// A multiple of p, limbwise large enough that subtracting any in-range
/// element from it cannot underflow.
const SUB_BIAS: [u32; 9] = [
    0x7ffffff8, 0x3ffffffc, 0x800003fc, 0x3fffdffc, 0x7ffffffc, 0x3ffffffc, 0x7ffffffc, 0x37fffffc,
    0x7ffffffc,
];

/// The doubled modulus in limb form, the alternate encoding of a zero
/// Z-coordinate that the subtraction pipeline produces in practice.
/// Point addition must treat this value as the identity's Z alongside
/// the all-zero encoding.
pub(crate) const INFINITY_Z_LIMBS: [u32; 9] = [
    0x1ffffffe, 0xfffffff, 0x200000ff, 0xffff7ff, 0x1fffffff, 0xfffffff, 0x1fffffff, 0xdffffff,
    0x1fffffff,
];

/// Element of the SM2 base field in Montgomery form.
///
/// Limbs may exceed their nominal width by a couple of bits between
/// reductions; every operation here consumes and produces limbs within
/// that slack.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FieldElement(pub(crate) [u32; 9]);

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u32; 9];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(limbs)
    }
}

impl FieldElement {
    /// Additive identity (also the Z-coordinate of the point at infinity).
    pub const fn zero() -> Self {
        Self([0; 9])
    }

    /// Multiplicative identity, i.e. `R mod p`.
    pub const fn one() -> Self {
        Self(R_MULTIPLES[1])
    }

    /// Returns `self + rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        let mut limbs = [0u32; 9];
        let mut carry = 0u32;
        for i in 0..9 {
            let t = self.0[i] + rhs.0[i] + carry;
            carry = t >> LIMB_WIDTHS[i];
            limbs[i] = t & LIMB_MASKS[i];
        }
        reduce_carry(limbs, carry)
    }

    /// Returns `self - rhs`.
    ///
    /// The bias keeps every limb non-negative, so the limbwise
    /// subtraction never underflows for in-slack inputs.
    pub fn sub(&self, rhs: &Self) -> Self {
        let mut limbs = [0u32; 9];
        let mut carry = 0u32;
        for i in 0..9 {
            let t = self.0[i]
                .wrapping_sub(rhs.0[i])
                .wrapping_add(SUB_BIAS[i])
                .wrapping_add(carry);
            carry = t >> LIMB_WIDTHS[i];
            limbs[i] = t & LIMB_MASKS[i];
        }
        reduce_carry(limbs, carry)
    }

    /// Returns `self * rhs` (Montgomery product: `a·b·R⁻¹ mod p`).
    pub fn mul(&self, rhs: &Self) -> Self {
        reduce_degree(&self.mul_wide(rhs))
    }

    /// Returns `self²`, exploiting the symmetry of the cross products.
    pub fn square(&self) -> Self {
        reduce_degree(&self.square_wide())
    }

    /// Schoolbook product into 17 wide limbs.
    ///
    /// Cross products pairing two odd-indexed limbs land one bit above
    /// the even alignment, hence the doubling of exactly those terms.
    fn mul_wide(&self, rhs: &Self) -> [u64; 17] {
        let a: [u64; 9] = core::array::from_fn(|i| u64::from(self.0[i]));
        let b: [u64; 9] = core::array::from_fn(|i| u64::from(rhs.0[i]));
        let mut w = [0u64; 17];

        w[0] = a[0] * b[0];

        w[1] = a[0] * b[1] + a[1] * b[0];

        w[2] = a[0] * b[2] + a[1] * (b[1] << 1) + a[2] * b[0];

        w[3] = a[0] * b[3] + a[1] * b[2] + a[2] * b[1] + a[3] * b[0];

        w[4] = ((a[1] * b[3] + a[3] * b[1]) << 1) + a[0] * b[4] + a[2] * b[2] + a[4] * b[0];

        w[5] = a[0] * b[5] + a[1] * b[4] + a[2] * b[3] + a[3] * b[2] + a[4] * b[1] + a[5] * b[0];

        w[6] = ((a[1] * b[5] + a[3] * b[3] + a[5] * b[1]) << 1)
            + a[0] * b[6]
            + a[2] * b[4]
            + a[4] * b[2]
            + a[6] * b[0];

        w[7] = a[0] * b[7]
            + a[1] * b[6]
            + a[2] * b[5]
            + a[3] * b[4]
            + a[4] * b[3]
            + a[5] * b[2]
            + a[6] * b[1]
            + a[7] * b[0];

        w[8] = ((a[1] * b[7] + a[3] * b[5] + a[5] * b[3] + a[7] * b[1]) << 1)
            + a[0] * b[8]
            + a[2] * b[6]
            + a[4] * b[4]
            + a[6] * b[2]
            + a[8] * b[0];

        w[9] = a[1] * b[8]
            + a[2] * b[7]
            + a[3] * b[6]
            + a[4] * b[5]
            + a[5] * b[4]
            + a[6] * b[3]
            + a[7] * b[2]
            + a[8] * b[1];

        w[10] = ((a[3] * b[7] + a[5] * b[5] + a[7] * b[3]) << 1)
            + a[2] * b[8]
            + a[4] * b[6]
            + a[6] * b[4]
            + a[8] * b[2];

        w[11] = a[3] * b[8] + a[4] * b[7] + a[5] * b[6] + a[6] * b[5] + a[7] * b[4] + a[8] * b[3];

        w[12] = ((a[5] * b[7] + a[7] * b[5]) << 1) + a[4] * b[8] + a[6] * b[6] + a[8] * b[4];

        w[13] = a[5] * b[8] + a[6] * b[7] + a[7] * b[6] + a[8] * b[5];

        w[14] = a[6] * b[8] + ((a[7] * b[7]) << 1) + a[8] * b[6];

        w[15] = a[7] * b[8] + a[8] * b[7];

        w[16] = a[8] * b[8];

        w
    }

    fn square_wide(&self) -> [u64; 17] {
        let a: [u64; 9] = core::array::from_fn(|i| u64::from(self.0[i]));
        let mut w = [0u64; 17];

        w[0] = a[0] * a[0];

        w[1] = (a[0] * a[1]) << 1;

        w[2] = (a[0] * a[2] + a[1] * a[1]) << 1;

        w[3] = (a[0] * a[3] + a[1] * a[2]) << 1;

        w[4] = ((a[0] * a[4] + ((a[1] * a[3]) << 1)) << 1) + a[2] * a[2];

        w[5] = (a[0] * a[5] + a[1] * a[4] + a[2] * a[3]) << 1;

        w[6] = (a[0] * a[6] + ((a[1] * a[5]) << 1) + a[2] * a[4] + a[3] * a[3]) << 1;

        w[7] = (a[0] * a[7] + a[1] * a[6] + a[2] * a[5] + a[3] * a[4]) << 1;

        w[8] = ((a[0] * a[8] + ((a[1] * a[7]) << 1) + a[2] * a[6] + ((a[3] * a[5]) << 1)) << 1)
            + a[4] * a[4];

        w[9] = (a[1] * a[8] + a[2] * a[7] + a[3] * a[6] + a[4] * a[5]) << 1;

        w[10] = (a[2] * a[8] + ((a[3] * a[7]) << 1) + a[4] * a[6] + a[5] * a[5]) << 1;

        w[11] = (a[3] * a[8] + a[4] * a[7] + a[5] * a[6]) << 1;

        w[12] = ((a[4] * a[8] + ((a[5] * a[7]) << 1)) << 1) + a[6] * a[6];

        w[13] = (a[5] * a[8] + a[6] * a[7]) << 1;

        w[14] = (a[6] * a[8] + a[7] * a[7]) << 1;

        w[15] = (a[7] * a[8]) << 1;

        w[16] = a[8] * a[8];

        w
    }

    /// Converts a canonical integer into Montgomery limb form,
    /// i.e. packs `x·2^257 mod p`.
    pub fn from_uint(x: &BigUint) -> Self {
        let shifted = (x << 257u32) % &*MODULUS;
        Self::pack(&shifted)
    }

    /// Converts back to a canonical integer in `[0, p)` by unpacking the
    /// limbs and multiplying by the stored `R⁻¹ mod p`.
    pub fn to_uint(&self) -> BigUint {
        (self.unpack() * &*R_INVERSE) % &*MODULUS
    }

    /// Packs a plain (non-Montgomery) value below `2^257` into limbs by
    /// repeatedly taking the bottom 29/28 bits.
    fn pack(x: &BigUint) -> Self {
        let mut v = x.clone();
        let mut limbs = [0u32; 9];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = (&v & BigUint::from(LIMB_MASKS[i]))
                .to_u32()
                .unwrap_or_default();
            v >>= LIMB_WIDTHS[i];
        }
        Self(limbs)
    }

    /// Reassembles the plain integer value of the limbs, top limb first.
    fn unpack(&self) -> BigUint {
        let mut r = BigUint::from(self.0[8]);
        for i in (0..8).rev() {
            r <<= LIMB_WIDTHS[i];
            r += self.0[i];
        }
        r
    }
}

/// Folds a carry of `c ∈ [0, 7]` out of the top limb back into the
/// element by adding `c·R mod p`. Touches only limbs 0, 2, 3 and 7, which
/// is where those multiples have support; the slack this leaves is
/// absorbed by the next carry pass.
fn reduce_carry(mut limbs: [u32; 9], carry: u32) -> FieldElement {
    let row = &R_MULTIPLES[carry as usize];
    limbs[0] += row[0];
    limbs[2] += row[2];
    limbs[3] += row[3];
    limbs[7] += row[7];
    FieldElement(limbs)
}

/// Montgomery reduction of a 17-limb product: computes `w·R⁻¹ mod p`
/// packed back into 9 limbs.
///
/// The wide limbs are first repacked into ten 57-bit lanes (two narrow
/// limbs per lane, the odd one pre-shifted by 29). Four full rounds then
/// cancel the bottom 57 bits of lanes 0..=3 by adding the matching
/// multiple of p, shifted into lanes j+1..j+5; a fifth round clears only
/// the low 29 bits of lane 4. p = 2^256 − 2^224 − 2^96 + 2^64 − 1, so the
/// multiple decomposes into shifts of 7, 39, 53 and 28 bits across the
/// lanes, with 2^57-sized pre-fills absorbing the subtractions and a
/// decrement of lane j+5 supplying the −1 term. Lane arithmetic is
/// wrapping: transient borrows cancel against the pre-fills, except for
/// the one tracked by the all-ones fix-up on lane 9.
fn reduce_degree(w: &[u64; 17]) -> FieldElement {
    let mut t = pack_lanes(w);

    for j in 0..5 {
        let x = if j < 4 {
            t[j + 1] = t[j + 1].wrapping_add(t[j] >> 57);
            t[j] & BOTTOM_57_BITS
        } else {
            // Lane 4 straddles R = 2^257: only its low 29 bits are below
            // the cut, the upper 28 stay in place.
            let x = t[4] & u64::from(BOTTOM_29_BITS);
            t[4] = (t[4] >> 29) << 29;
            x
        };

        if x > 0 {
            t[j + 1] = t[j + 1].wrapping_add((x << 7) & BOTTOM_57_BITS);
            t[j + 2] = t[j + 2].wrapping_add(x >> 50);

            t[j + 1] = t[j + 1].wrapping_add(TWO_POW_57);
            t[j + 2] = t[j + 2].wrapping_add(BOTTOM_57_BITS);

            t[j + 1] = t[j + 1].wrapping_sub((x << 39) & BOTTOM_57_BITS);
            t[j + 2] = t[j + 2].wrapping_sub(x >> 18);

            t[j + 3] = t[j + 3].wrapping_add(BOTTOM_57_BITS);
            t[j + 4] = t[j + 4].wrapping_add(BOTTOM_57_BITS);

            t[j + 3] = t[j + 3].wrapping_sub((x << 53) & BOTTOM_57_BITS);
            t[j + 4] = t[j + 4].wrapping_sub((x >> 4) & BOTTOM_57_BITS);

            t[j + 5] = t[j + 5].wrapping_sub(1);
            t[j + 4] = t[j + 4].wrapping_add((x << 28) & BOTTOM_57_BITS);
            t[j + 5] = t[j + 5].wrapping_add((x >> 29) & u64::from(BOTTOM_29_BITS));
        }
    }

    // A borrow can leave lane 9 at all-ones; cancel the matching
    // overshoot in lane 8.
    if t[9].wrapping_add(1) == 0 {
        t[9] = 0;
        t[8] = t[8].wrapping_sub(TWO_POW_57);
    }

    let (limbs, carry) = unpack_lanes(&t);
    reduce_carry(limbs, carry)
}

/// Repacks 17 narrow product limbs into ten 57-bit lanes, two narrow
/// limbs per lane with the odd one shifted up by 29.
fn pack_lanes(w: &[u64; 17]) -> [u64; 10] {
    let mut t = [0u64; 10];

    t[0] = w[0] + ((w[1] << 29) & BOTTOM_57_BITS);
    let mut carry = t[0] >> 57;
    t[0] &= BOTTOM_57_BITS;

    for i in 1..8 {
        let v = carry + (w[2 * i - 1] >> 28) + w[2 * i] + ((w[2 * i + 1] << 29) & BOTTOM_57_BITS);
        carry = v >> 57;
        t[i] = v & BOTTOM_57_BITS;
    }

    t[8] = carry + (w[15] >> 28) + w[16];
    t[9] = 0;
    t
}

/// Extracts the reduced element from lanes 4..=9 (the part above
/// R = 2^257), alternating 29/28-bit fields with the one-bit offset left
/// by the packing. Returns the limbs plus the overflow carry out of the
/// top limb.
fn unpack_lanes(t: &[u64; 10]) -> ([u32; 9], u32) {
    let mut a = [0u32; 9];
    let mut carry = 0u32;

    for k in 0..4 {
        let lo = t[4 + k];
        let hi = t[5 + k];

        let v = (lo >> 29) as u32 + carry + (((hi << 28) as u32) & BOTTOM_29_BITS);
        carry = v >> 29;
        a[2 * k] = v & BOTTOM_29_BITS;

        let v = (((hi >> 1) as u32) & BOTTOM_28_BITS) + carry;
        carry = v >> 28;
        a[2 * k + 1] = v & BOTTOM_28_BITS;
    }

    let v = (t[8] >> 29) as u32 + carry + (((t[9] << 28) as u32) & BOTTOM_29_BITS);
    carry = v >> 29;
    a[8] = v & BOTTOM_29_BITS;

    (a, carry)
}
