//! Arithmetic in prime fields.
//!
//! Field elements are plain `BigUint` values in the `0..p` range; the
//! modulus is passed explicitly to every function, so that the same
//! code serves the curve base fields (P-256, P-224) and the small test
//! fields used with the weaving engine. Inputs are assumed to be already
//! reduced unless stated otherwise, and `p` is assumed to be an odd prime.
//!
//! THESE FUNCTIONS ARE NOT CONSTANT-TIME. `BigUint` arithmetic has a
//! running time that depends on the operand values.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::error::FieldError;

// Number of draws after which `random_element()` gives up; with an
// honest RNG each draw is rejected with probability lower than 1/2.
const SAMPLE_TRIES: usize = 128;

/// Returns `(a + b) mod p`.
#[inline]
pub fn add_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// Returns `(a - b) mod p`.
#[inline]
pub fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    let b = b % p;
    ((a % p) + (p - b)) % p
}

/// Returns `(a * b) mod p`.
#[inline]
pub fn mul_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Returns `-a mod p` (zero is mapped to zero).
#[inline]
pub fn neg_mod(a: &BigUint, p: &BigUint) -> BigUint {
    let a = a % p;
    if a.is_zero() {
        a
    } else {
        p - a
    }
}

/// Computes the inverse of `a` modulo `p`.
///
/// The inverse is obtained with Fermat's little theorem, `a^(p-2)`,
/// which requires `p` to be prime. An error is returned if `a` is a
/// multiple of `p`.
pub fn invert(a: &BigUint, p: &BigUint) -> Result<BigUint, FieldError> {
    let a = a % p;
    if a.is_zero() {
        return Err(FieldError::NotInvertible);
    }
    let e = p - 2u32;
    Ok(a.modpow(&e, p))
}

/// Inverts all provided values, at the cost of a single inversion
/// (Montgomery's trick). If any value is zero, then `NotInvertible`
/// is returned and no inverse is computed.
pub fn batch_invert(values: &[BigUint], p: &BigUint)
    -> Result<Vec<BigUint>, FieldError>
{
    let n = values.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // prefix[i] = values[0] * ... * values[i]
    let mut prefix = Vec::with_capacity(n);
    let mut acc = BigUint::one();
    for v in values.iter() {
        let v = v % p;
        if v.is_zero() {
            return Err(FieldError::NotInvertible);
        }
        acc = mul_mod(&acc, &v, p);
        prefix.push(acc.clone());
    }

    let mut inv = invert(&acc, p)?;
    let mut out = vec![BigUint::zero(); n];
    for i in (1..n).rev() {
        out[i] = mul_mod(&inv, &prefix[i - 1], p);
        inv = mul_mod(&inv, &values[i], p);
    }
    out[0] = inv;
    Ok(out)
}

/// Computes the Legendre symbol of `a` modulo `p`:
///
///  - `0` if `a` is zero modulo `p`;
///  - `1` if `a` is a non-zero quadratic residue;
///  - `-1` otherwise.
pub fn legendre_symbol(a: &BigUint, p: &BigUint) -> i32 {
    let a = a % p;
    if a.is_zero() {
        return 0;
    }
    let e = (p - 1u32) >> 1;
    let r = a.modpow(&e, p);
    if r.is_one() {
        1
    } else {
        -1
    }
}

/// Returns `true` if `a` is a non-zero quadratic residue modulo `p`.
#[inline]
pub fn is_quadratic_residue(a: &BigUint, p: &BigUint) -> bool {
    legendre_symbol(a, p) == 1
}

/// Computes a square root of `a` modulo `p`.
///
/// `None` is returned if `a` is not a quadratic residue. Zero is its
/// own (unique) square root. Otherwise, exactly one of the two roots is
/// returned; which one is a deterministic function of `a` and `p`, and
/// callers that need a specific root must normalize it themselves. When
/// `p = 3 mod 4` the returned root is always itself a quadratic residue.
pub fn modular_sqrt(a: &BigUint, p: &BigUint) -> Option<BigUint> {
    let a = a % p;
    if a.is_zero() {
        return Some(a);
    }
    if legendre_symbol(&a, p) != 1 {
        return None;
    }

    // p = 3 mod 4: a^((p+1)/4) is a square root.
    if (p % 4u32) == BigUint::from(3u32) {
        let e = (p + 1u32) >> 2;
        return Some(a.modpow(&e, p));
    }

    // General case: Tonelli-Shanks.
    // Write p - 1 = s*2^e with s odd.
    let pm1 = p - 1u32;
    let e = pm1.trailing_zeros().unwrap_or(0);
    let s = &pm1 >> (e as usize);

    // Any non-residue will do; the smallest one is found quickly.
    let mut n = BigUint::from(2u32);
    while legendre_symbol(&n, p) != -1 {
        n += 1u32;
    }

    let mut x = a.modpow(&((&s + 1u32) >> 1), p);
    let mut b = a.modpow(&s, p);
    let mut g = n.modpow(&s, p);
    let mut r = e;
    loop {
        // Find the smallest m such that b^(2^m) = 1.
        let mut t = b.clone();
        let mut m = 0u64;
        while !t.is_one() {
            if m + 1 >= r {
                return None;
            }
            t = mul_mod(&t, &t, p);
            m += 1;
        }
        if m == 0 {
            return Some(x);
        }

        // gs = g^(2^(r-m-1))
        let mut gs = g;
        for _ in 0..(r - m - 1) {
            gs = mul_mod(&gs, &gs, p);
        }
        g = mul_mod(&gs, &gs, p);
        x = mul_mod(&x, &gs, p);
        b = mul_mod(&b, &g, p);
        r = m;
    }
}

/// Returns the length (in bytes) of the unsigned big-endian encoding of
/// elements of the field of modulus `p`.
#[inline]
pub fn byte_len(p: &BigUint) -> usize {
    ((p.bits() + 7) >> 3) as usize
}

/// Encodes `a` over exactly `len` bytes (unsigned big-endian). Values
/// that do not fit are refused.
pub fn to_bytes_be(a: &BigUint, len: usize) -> Result<Vec<u8>, FieldError> {
    let mut out = Vec::with_capacity(len);
    extend_be(&mut out, a, len)?;
    Ok(out)
}

/// Encodes the field element `a` over `byte_len(p)` bytes. Values not
/// lower than `p` are refused.
pub fn encode_element(a: &BigUint, p: &BigUint) -> Result<Vec<u8>, FieldError> {
    if a >= p {
        return Err(FieldError::OutOfRange);
    }
    to_bytes_be(a, byte_len(p))
}

/// Appends `a` to `buf` over exactly `len` bytes (unsigned big-endian).
/// On error, `buf` is unchanged.
pub fn extend_be(buf: &mut Vec<u8>, a: &BigUint, len: usize) -> Result<(), FieldError> {
    let n = byte_len(a);
    if n > len {
        return Err(FieldError::Overflow { len });
    }
    buf.resize(buf.len() + (len - n), 0);
    if n > 0 {
        buf.extend_from_slice(&a.to_bytes_be());
    }
    Ok(())
}

/// Decodes an unsigned big-endian integer. No range check is applied.
#[inline]
pub fn from_bytes_be(buf: &[u8]) -> BigUint {
    BigUint::from_bytes_be(buf)
}

/// Samples a uniformly random element of `[0, p)`.
///
/// Candidates are drawn with the bit length of `p` and rejected when out
/// of range. An RNG that keeps producing out-of-range values (e.g. stuck
/// at all-ones) is reported as an error rather than looped on forever,
/// and so is an empty range (`p = 0`).
pub fn random_element<T: CryptoRng + RngCore>(rng: &mut T, p: &BigUint)
    -> Result<BigUint, rand_core::Error>
{
    if p.is_zero() {
        return Err(rand_core::Error::new("cannot sample from an empty range"));
    }
    let bits = p.bits() as usize;
    let len = (bits + 7) >> 3;
    let excess = (len << 3) - bits;
    let mut buf = vec![0u8; len];
    for _ in 0..SAMPLE_TRIES {
        rng.try_fill_bytes(&mut buf)?;
        buf[0] &= 0xFFu8 >> excess;
        let x = BigUint::from_bytes_be(&buf);
        if &x < p {
            return Ok(x);
        }
    }
    Err(rand_core::Error::new("random source never produced an in-range field element"))
}

// ========================================================================
