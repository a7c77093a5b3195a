//! Weaving: polynomial interpolation over a prime field.
//!
//! Given `n` distinct indices `x_0..x_{n-1}` and `n` secrets
//! `y_0..y_{n-1}`, weaving computes the coefficients of the unique
//! polynomial `W` of degree lower than `n` such that `W(x_i) = y_i` for
//! all `i`. The coefficient vector has the size of `n` field elements,
//! whatever the secrets; evaluating it at `x_i` recovers `y_i`, and
//! evaluating it anywhere else yields an unrelated value.
//!
//! The work is split in two steps:
//!
//!  - `precompute()` builds, from the indices only, the matrix whose
//!    column `i` holds the coefficients of the Lagrange basis polynomial
//!    `L_i` (with `L_i(x_i) = 1` and `L_i(x_j) = 0` for `j != i`). This
//!    costs `O(n^2)` multiplications and a single inversion.
//!  - `weave()` multiplies that matrix by a secret vector. The same
//!    basis is reused for any number of secret vectors.
//!
//! Coefficients are ordered by increasing degree. A basis can be
//! exported and imported (`WeaveBasis::to_bytes()`, `from_bytes()`) so
//! that a fixed index set is only processed once.

use std::collections::HashMap;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use crate::error::WeaveError;
use crate::field;

/// A precomputed interpolation basis for a fixed set of indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaveBasis {
    p: BigUint,
    xs: Vec<BigUint>,
    // matrix[k][i] = coefficient of x^k in L_i
    matrix: Vec<Vec<BigUint>>,
}

impl WeaveBasis {

    /// Field modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Indices (reduced modulo `p`), in the order they were provided.
    pub fn indices(&self) -> &[BigUint] {
        &self.xs
    }

    /// Matrix rows; row `k` holds the coefficient of `x^k` for each
    /// Lagrange basis polynomial.
    pub fn matrix(&self) -> &[Vec<BigUint>] {
        &self.matrix
    }

    /// Number of indices.
    pub fn dim(&self) -> usize {
        self.xs.len()
    }

    /// Weaves the secrets `ys` (one per index, in index order).
    pub fn weave(&self, ys: &[BigUint]) -> Result<WeaveCoefficients, WeaveError> {
        weave(ys, self, &self.p)
    }

    /// Encodes the basis:
    /// `n` (u32, big-endian), `L` (u16, big-endian), then `p`, the `n`
    /// indices and the `n^2` matrix entries (row by row), each over `L`
    /// bytes (unsigned big-endian).
    ///
    /// Bases whose dimension or modulus length exceed the header fields
    /// are refused.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WeaveError> {
        let n = self.xs.len();
        let len = field::byte_len(&self.p);
        let n32 = u32::try_from(n)
            .map_err(|_| WeaveError::Malformed("dimension too large"))?;
        let len16 = u16::try_from(len)
            .map_err(|_| WeaveError::Malformed("modulus too large"))?;
        let mut buf = Vec::with_capacity(6 + (1 + n + n * n) * len);
        buf.extend_from_slice(&n32.to_be_bytes());
        buf.extend_from_slice(&len16.to_be_bytes());
        field::extend_be(&mut buf, &self.p, len)?;
        for v in self.xs.iter().chain(self.matrix.iter().flatten()) {
            field::extend_be(&mut buf, v, len)?;
        }
        Ok(buf)
    }

    /// Decodes a basis encoded with `to_bytes()`.
    ///
    /// The structure is verified (exact length, canonical modulus
    /// length, all values in range, distinct indices); the matrix
    /// entries themselves are trusted.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WeaveError> {
        if buf.len() < 6 {
            return Err(WeaveError::Malformed("truncated header"));
        }
        let n = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        let len = u16::from_be_bytes([buf[4], buf[5]]) as usize;
        if n == 0 {
            return Err(WeaveError::Malformed("empty index set"));
        }
        if len == 0 {
            return Err(WeaveError::Malformed("zero element length"));
        }
        let expected = n.checked_mul(n)
            .and_then(|nn| nn.checked_add(n))
            .and_then(|c| c.checked_add(1))
            .and_then(|c| c.checked_mul(len))
            .and_then(|c| c.checked_add(6))
            .ok_or(WeaveError::Malformed("dimension too large"))?;
        if buf.len() < expected {
            return Err(WeaveError::Malformed("truncated"));
        }
        if buf.len() > expected {
            return Err(WeaveError::Malformed("trailing data"));
        }

        let mut elements = buf[6..].chunks_exact(len).map(field::from_bytes_be);
        let mut next = || elements.next().ok_or(WeaveError::Malformed("truncated"));
        let p = next()?;
        if p < BigUint::from(2u32) || field::byte_len(&p) != len {
            return Err(WeaveError::Malformed("invalid modulus"));
        }
        let mut xs = Vec::with_capacity(n);
        for _ in 0..n {
            xs.push(next()?);
        }
        let mut matrix = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = Vec::with_capacity(n);
            for _ in 0..n {
                row.push(next()?);
            }
            matrix.push(row);
        }

        if xs.iter().chain(matrix.iter().flatten()).any(|v| v >= &p) {
            return Err(WeaveError::Malformed("element out of range"));
        }
        if find_duplicate(&xs).is_some() {
            return Err(WeaveError::Malformed("duplicate index"));
        }
        Ok(Self { p, xs, matrix })
    }
}

/// A woven coefficient vector (lowest degree first).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaveCoefficients {
    p: BigUint,
    coeffs: Vec<BigUint>,
}

impl WeaveCoefficients {

    /// Wraps a coefficient vector; values are reduced modulo `p`, which
    /// must be at least 2.
    pub fn new(coeffs: Vec<BigUint>, p: BigUint) -> Result<Self, WeaveError> {
        if p < BigUint::from(2u32) {
            return Err(WeaveError::InvalidModulus);
        }
        let coeffs = coeffs.into_iter().map(|c| c % &p).collect();
        Ok(Self { p, coeffs })
    }

    /// Field modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[BigUint] {
        &self.coeffs
    }

    /// Evaluates the woven polynomial at `x`.
    pub fn eval(&self, x: &BigUint) -> BigUint {
        eval_weave(&self.coeffs, x, &self.p)
    }

    /// Encodes the coefficients, each over the length of the modulus
    /// (unsigned big-endian); this is the format `from_bytes()` expects.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WeaveError> {
        let len = field::byte_len(&self.p);
        let mut buf = Vec::with_capacity(self.coeffs.len() * len);
        for c in self.coeffs.iter() {
            field::extend_be(&mut buf, c, len)?;
        }
        Ok(buf)
    }

    /// Decodes coefficients encoded over the length of `p`. The input
    /// must be non-empty, a multiple of that length, and hold only
    /// values lower than `p`.
    pub fn from_bytes(buf: &[u8], p: &BigUint) -> Result<Self, WeaveError> {
        let len = field::byte_len(p);
        if len == 0 {
            return Err(WeaveError::InvalidModulus);
        }
        if buf.is_empty() {
            return Err(WeaveError::Malformed("empty coefficient vector"));
        }
        if buf.len() % len != 0 {
            return Err(WeaveError::Malformed("length is not a multiple of the element size"));
        }
        let coeffs: Vec<BigUint> = buf.chunks_exact(len)
            .map(field::from_bytes_be)
            .collect();
        if coeffs.iter().any(|c| c >= p) {
            return Err(WeaveError::Malformed("element out of range"));
        }
        Ok(Self { p: p.clone(), coeffs })
    }
}

// Returns the positions of the first repeated value, if any.
fn find_duplicate(xs: &[BigUint]) -> Option<(usize, usize)> {
    let mut seen: HashMap<&BigUint, usize> = HashMap::with_capacity(xs.len());
    for (i, x) in xs.iter().enumerate() {
        if let Some(&first) = seen.get(x) {
            return Some((first, i));
        }
        seen.insert(x, i);
    }
    None
}

/// Builds the interpolation basis for the indices `xs` modulo `p`.
///
/// Indices are reduced modulo `p`; they must be pairwise distinct after
/// reduction. With a single index, the basis is the constant
/// polynomial 1.
#[instrument(level = "debug", skip_all, fields(n = xs.len(), bits = p.bits()))]
pub fn precompute(xs: &[BigUint], p: &BigUint) -> Result<WeaveBasis, WeaveError> {
    if p < &BigUint::from(2u32) {
        return Err(WeaveError::InvalidModulus);
    }
    let n = xs.len();
    if n == 0 {
        return Err(WeaveError::EmptyIndexSet);
    }
    let xs: Vec<BigUint> = xs.iter().map(|x| x % p).collect();
    if let Some((first, second)) = find_duplicate(&xs) {
        return Err(WeaveError::DuplicateIndex { first, second });
    }

    // Product of all (x - x_i), highest degree first (monic).
    let mut poly = Vec::with_capacity(n + 1);
    poly.push(BigUint::one());
    for x in xs.iter() {
        poly.push(BigUint::zero());
        for k in (1..poly.len()).rev() {
            let t = field::mul_mod(x, &poly[k - 1], p);
            poly[k] = field::sub_mod(&poly[k], &t, p);
        }
    }

    // Denominators prod_{j != i} (x_i - x_j).
    let mut dens = Vec::with_capacity(n);
    for (i, xi) in xs.iter().enumerate() {
        let mut d = BigUint::one();
        for (j, xj) in xs.iter().enumerate() {
            if j != i {
                d = field::mul_mod(&d, &field::sub_mod(xi, xj, p), p);
            }
        }
        dens.push(d);
    }
    let inv_dens = field::batch_invert(&dens, p)
        .map_err(|_| WeaveError::InvalidModulus)?;

    let mut matrix = vec![vec![BigUint::zero(); n]; n];
    let mut q = vec![BigUint::zero(); n];
    for (i, xi) in xs.iter().enumerate() {
        // Synthetic division by (x - x_i).
        q[0] = poly[0].clone();
        for k in 1..n {
            q[k] = field::add_mod(&poly[k], &field::mul_mod(xi, &q[k - 1], p), p);
        }
        for k in 0..n {
            matrix[k][i] = field::mul_mod(&q[n - 1 - k], &inv_dens[i], p);
        }
    }

    debug!(n, "weave basis computed");
    Ok(WeaveBasis { p: p.clone(), xs, matrix })
}

/// Weaves the secrets `ys` with a precomputed basis: returns the
/// coefficients of the polynomial that takes value `ys[i]` at the
/// `i`-th index of the basis. Secrets are reduced modulo `p`.
pub fn weave(ys: &[BigUint], basis: &WeaveBasis, p: &BigUint)
    -> Result<WeaveCoefficients, WeaveError>
{
    if p != &basis.p {
        return Err(WeaveError::ModulusMismatch);
    }
    let n = basis.dim();
    if ys.len() != n {
        return Err(WeaveError::ShapeMismatch { expected: n, found: ys.len() });
    }
    let ys: Vec<BigUint> = ys.iter().map(|y| y % p).collect();
    let coeffs = basis.matrix.iter().map(|row| {
        row.iter().zip(ys.iter()).fold(BigUint::zero(), |acc, (m, y)| {
            field::add_mod(&acc, &field::mul_mod(m, y, p), p)
        })
    }).collect();
    Ok(WeaveCoefficients { p: p.clone(), coeffs })
}

/// Evaluates the polynomial with coefficients `coeffs` (lowest degree
/// first) at `x`, modulo `p` (Horner's rule). An empty list is the zero
/// polynomial.
pub fn eval_weave(coeffs: &[BigUint], x: &BigUint, p: &BigUint) -> BigUint {
    let x = x % p;
    coeffs.iter().rev().fold(BigUint::zero(), |acc, c| {
        (acc * &x + c) % p
    })
}

/// Derives an index from a secret (e.g. a password): SHA-256 of the
/// secret, interpreted as an unsigned big-endian integer, modulo `p`.
pub fn hash_to_index(secret: &[u8], p: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(secret)) % p
}

// ========================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::drng::Drng;
    use quickcheck_macros::quickcheck;
    use rand_core::RngCore;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn bigs(xs: &[u64]) -> Vec<BigUint> {
        xs.iter().map(|&x| big(x)).collect()
    }

    fn hexnum(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    fn p256() -> BigUint {
        hexnum("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff")
    }

    #[test]
    fn small_vectors() {
        let p = big(13);
        let basis = precompute(&bigs(&[0, 1]), &p).unwrap();
        assert_eq!(basis.matrix(), &[bigs(&[1, 0]), bigs(&[12, 1])][..]);
        let w = weave(&bigs(&[4, 8]), &basis, &p).unwrap();
        assert_eq!(w.coefficients(), &bigs(&[4, 4])[..]);
        assert_eq!(eval_weave(w.coefficients(), &big(0), &p), big(4));
        assert_eq!(eval_weave(w.coefficients(), &big(1), &p), big(8));

        let xs = bigs(&[0, 1, 7, 12]);
        let basis = precompute(&xs, &p).unwrap();
        assert_eq!(basis.matrix(), &[
            bigs(&[1, 0, 0, 0]),
            bigs(&[11, 6, 7, 2]),
            bigs(&[12, 7, 0, 7]),
            bigs(&[2, 1, 6, 4]),
        ][..]);
        let ys = bigs(&[0, 4, 9, 11]);
        let w = basis.weave(&ys).unwrap();
        assert_eq!(w.coefficients(), &bigs(&[0, 5, 1, 11])[..]);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(&w.eval(x), y);
        }
    }

    #[test]
    fn p256_vectors() {
        let p = p256();
        let xs = [
            "b978ded97cd42d43de79f385bbb5a30f6fde475bef67f42f2545adc1b8de48ae",
            "b38725b87bb746384b1b1fb7999c5a4527cb34655b5fc7064ce2e48ba4c580d5",
            "ac475b1db500eb3d257ddb79b749294b4748f80a718059630ebca92974fe20dc",
        ];
        let matrix = [
            [
                "36af9b2504a2cef45b428a73450417dd5ba4e3b0b58d8c780179cdfc47ba9a5f",
                "fdeabbfcfcf4790c5a8760d1d9bcbbf1953d91d11361f1cc0d3911146492e838",
                "cb65a8dbfe68b8014a3614bae13f2c310f1d8a80371081bbf14d20ef53b27d68",
            ],
            [
                "ce28e0b1b7e0fb871a1718f1b2470620378a71c3866e1cb05f1101019646d50f",
                "58e141785963f7e44bc6aaa1aed02f108260d6a8729a97987c2f6e60badc8f8d",
                "d8f5ddd3eebb0c969a223c6c9ee8cacf4614b79606f74bb724bf909daedc9b62",
            ],
            [
                "9cac2bc76af618be4b50c55411974c2026b85331ced8ef82cd4f8e5d341f5407",
                "7f1b9d6ef0861e6d222281e3b1a6d164f782a03bdba2987567964cf553c1be33",
                "e43836c7a483c8d6928cb8c83cc1e27ae1c50c9455847807cb1a24ad781eedc4",
            ],
        ];
        let ys = [
            "1eec2cac75144e8ee1ea7e265cc2037d05fba6d8dcd0eae2282f9cfe7f4ff34e",
            "2794a1cb1c776c726fd8fde0da43d008bc57aac937168c9554343586a1051a72",
            "f93c890af49b337e28e5d12daaf54f9a27392eaeca5bfd57d4350360137317b7",
        ];
        let woven = [
            "e222adae266aa3160866ae3b651f7cd2f0a889784ae15ec54618cd18a7d101b4",
            "6bf2dfef3535033a07a42c805fc6af78a91a4d329c6ceae41ec2737e4a6a0dca",
            "bae617cc1945320c9275536eaa014fe49e9a15b322b3cf5ba00618c76befd667",
        ];

        let xs: Vec<BigUint> = xs.iter().map(|s| hexnum(s)).collect();
        let ys: Vec<BigUint> = ys.iter().map(|s| hexnum(s)).collect();
        let basis = precompute(&xs, &p).unwrap();
        for k in 0..3 {
            for i in 0..3 {
                assert_eq!(basis.matrix()[k][i], hexnum(matrix[k][i]));
            }
        }
        let w = weave(&ys, &basis, &p).unwrap();
        for k in 0..3 {
            assert_eq!(w.coefficients()[k], hexnum(woven[k]));
        }
        for i in 0..3 {
            assert_eq!(eval_weave(w.coefficients(), &xs[i], &p), ys[i]);
        }
    }

    #[test]
    fn single_index() {
        let p = big(97);
        let basis = precompute(&bigs(&[42]), &p).unwrap();
        assert_eq!(basis.matrix(), &[bigs(&[1])][..]);
        let w = basis.weave(&bigs(&[17])).unwrap();
        assert_eq!(w.coefficients(), &bigs(&[17])[..]);
        assert_eq!(w.eval(&big(42)), big(17));
        assert_eq!(w.eval(&big(3)), big(17));
    }

    #[test]
    fn errors() {
        let p = big(13);
        assert_eq!(precompute(&[], &p), Err(WeaveError::EmptyIndexSet));
        assert_eq!(precompute(&bigs(&[1]), &big(1)), Err(WeaveError::InvalidModulus));
        assert_eq!(precompute(&bigs(&[1]), &big(0)), Err(WeaveError::InvalidModulus));
        assert_eq!(precompute(&bigs(&[3, 5, 3]), &p),
            Err(WeaveError::DuplicateIndex { first: 0, second: 2 }));
        // Duplicates are detected after reduction.
        assert_eq!(precompute(&bigs(&[2, 15]), &p),
            Err(WeaveError::DuplicateIndex { first: 0, second: 1 }));

        let basis = precompute(&bigs(&[0, 1]), &p).unwrap();
        assert_eq!(weave(&bigs(&[1, 2, 3]), &basis, &p),
            Err(WeaveError::ShapeMismatch { expected: 2, found: 3 }));
        assert_eq!(weave(&bigs(&[1, 2]), &basis, &big(17)),
            Err(WeaveError::ModulusMismatch));
    }

    #[test]
    fn eval_edge_cases() {
        let p = big(13);
        assert_eq!(eval_weave(&[], &big(5), &p), big(0));
        assert_eq!(eval_weave(&bigs(&[7]), &big(5), &p), big(7));
        // 1 + 2x + 3x^2 at x = 2: 17 = 4 mod 13; x is reduced first.
        assert_eq!(eval_weave(&bigs(&[1, 2, 3]), &big(2), &p), big(4));
        assert_eq!(eval_weave(&bigs(&[1, 2, 3]), &big(15), &p), big(4));
    }

    #[test]
    fn sweep() {
        // Deterministic random cases over small and large primes.
        let primes = [big(13), big(59), big(97), p256()];
        let mut rng = Drng::from_seed(b"weave sweep");
        for t in 0..100 {
            let p = &primes[t % primes.len()];
            let max_n = if p.bits() < 8 { 12 } else { 8 };
            let n = 1 + (rng.next_u32() as usize) % max_n;
            let mut xs: Vec<BigUint> = Vec::with_capacity(n);
            while xs.len() < n {
                let x = field::random_element(&mut rng, p).unwrap();
                if !xs.contains(&x) {
                    xs.push(x);
                }
            }
            let ys: Vec<BigUint> = (0..n)
                .map(|_| field::random_element(&mut rng, p).unwrap())
                .collect();
            let basis = precompute(&xs, p).unwrap();
            assert_eq!(precompute(&xs, p).unwrap(), basis);
            let w = weave(&ys, &basis, p).unwrap();
            assert_eq!(w.coefficients().len(), n);
            for i in 0..n {
                assert_eq!(eval_weave(w.coefficients(), &xs[i], p), ys[i]);
            }
        }
    }

    #[quickcheck]
    fn prop_weave_round_trip(xs: Vec<u64>, ys: Vec<u64>, pick: u8) -> bool {
        let p = big([13, 59, 97][(pick % 3) as usize]);
        let mut idx: Vec<BigUint> = Vec::new();
        for x in xs.iter() {
            let x = big(*x) % &p;
            if !idx.contains(&x) {
                idx.push(x);
            }
        }
        if idx.is_empty() {
            return true;
        }
        let vals: Vec<BigUint> = (0..idx.len())
            .map(|i| big(ys.get(i).copied().unwrap_or(i as u64)) % &p)
            .collect();
        let basis = match precompute(&idx, &p) {
            Ok(basis) => basis,
            Err(_) => return false,
        };
        let w = match weave(&vals, &basis, &p) {
            Ok(w) => w,
            Err(_) => return false,
        };
        idx.iter().zip(vals.iter()).all(|(x, y)| &w.eval(x) == y)
    }

    #[test]
    fn basis_bytes() {
        let p = big(13);
        let basis = precompute(&bigs(&[0, 1, 7, 12]), &p).unwrap();
        let buf = basis.to_bytes().unwrap();
        assert_eq!(buf.len(), 6 + 1 + 4 + 16);
        assert_eq!(buf[..7], [0u8, 0, 0, 4, 0, 1, 13]);
        assert_eq!(WeaveBasis::from_bytes(&buf), Ok(basis.clone()));

        let big_basis = precompute(&[big(3), p256() - 1u32], &p256()).unwrap();
        let buf2 = big_basis.to_bytes().unwrap();
        assert_eq!(buf2.len(), 6 + 7 * 32);
        assert_eq!(WeaveBasis::from_bytes(&buf2), Ok(big_basis));

        let malformed = |b: &[u8]| matches!(WeaveBasis::from_bytes(b),
            Err(WeaveError::Malformed(_)));
        assert!(malformed(&buf[..5]));
        assert!(malformed(&buf[..buf.len() - 1]));
        let mut long = buf.clone();
        long.push(0);
        assert!(malformed(&long));
        let mut zero_n = buf.clone();
        zero_n[3] = 0;
        assert!(malformed(&zero_n));
        // Index 13 is out of range.
        let mut out = buf.clone();
        out[7] = 13;
        assert!(malformed(&out));
        // Index 1 repeated.
        let mut dup = buf.clone();
        dup[7] = 1;
        assert!(malformed(&dup));
        // Modulus 1.
        let mut pm = buf.clone();
        pm[6] = 1;
        assert!(malformed(&pm));
        // Huge dimension.
        let mut huge = buf.clone();
        huge[..4].copy_from_slice(&[0xFF; 4]);
        assert!(malformed(&huge));
    }

    #[test]
    fn coefficient_bytes() {
        let p = big(13);
        let w = WeaveCoefficients::new(bigs(&[0, 5, 1, 11]), p.clone()).unwrap();
        let buf = w.to_bytes().unwrap();
        assert_eq!(buf, [0u8, 5, 1, 11]);
        assert_eq!(WeaveCoefficients::from_bytes(&buf, &p), Ok(w.clone()));
        assert_eq!(WeaveCoefficients::from_bytes(&[], &p),
            Err(WeaveError::Malformed("empty coefficient vector")));
        assert!(WeaveCoefficients::from_bytes(&[0, 13], &p).is_err());

        let q = p256();
        let wide = WeaveCoefficients::new(bigs(&[1, 2]), q.clone()).unwrap();
        let buf = wide.to_bytes().unwrap();
        assert_eq!(buf.len(), 64);
        assert_eq!(WeaveCoefficients::from_bytes(&buf, &q), Ok(wide));
        assert!(WeaveCoefficients::from_bytes(&buf[..63], &q).is_err());

        // Values are reduced on construction.
        let r = WeaveCoefficients::new(bigs(&[14, 26]), p).unwrap();
        assert_eq!(r.coefficients(), &bigs(&[1, 0])[..]);
        assert_eq!(WeaveCoefficients::new(bigs(&[1]), big(0)), Err(WeaveError::InvalidModulus));
        assert_eq!(WeaveCoefficients::new(bigs(&[1]), big(1)), Err(WeaveError::InvalidModulus));
    }

    #[test]
    fn full_width_coefficients_survive_encoding() {
        // Two coefficients, one of them full-width: the encoding length
        // comes from the modulus, never from the caller.
        let q = p256();
        let c0 = hexnum("e2220f6e2a5a22fec8a3b1b1eb6b2ab26e6cf2a1f1bd9f4ed4b82ec6ac8e01b4");
        let w = WeaveCoefficients::new(vec![c0.clone(), big(7)], q.clone()).unwrap();
        let buf = w.to_bytes().unwrap();
        assert_eq!(buf.len(), 64);
        let back = WeaveCoefficients::from_bytes(&buf, &q).unwrap();
        assert_eq!(back.coefficients(), &[c0, big(7)][..]);
        assert_eq!(back, w);

        // Same through a small field, where elements take one byte.
        let basis = precompute(&bigs(&[2, 3, 5]), &big(251)).unwrap();
        let w = basis.weave(&bigs(&[250, 0, 17])).unwrap();
        let buf = w.to_bytes().unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(WeaveCoefficients::from_bytes(&buf, &big(251)), Ok(w));
    }

    #[test]
    fn index_hashing() {
        let p = p256();
        let x = hash_to_index(b"password1", &p);
        assert_eq!(x, hexnum("0b14d501a594442a01c6859541bcb3e8164d183d32937b851835442f69d5c94e"));
        assert_eq!(hash_to_index(b"password1", &big(13)), big(0));
        assert!(hash_to_index(b"", &p) < p);
        assert_ne!(hash_to_index(b"password2", &p), x);
    }
}
