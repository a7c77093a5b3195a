//! Elligator Squared encoding of curve points.
//!
//! A curve point `P` is represented by a pair of field elements `(u, v)`
//! such that `P = f(u) + f(v)`, where `f` is a deterministic map from
//! field elements to curve points (the simplified SWU map). Encoding
//! draws `u` at random, computes `Q = P - f(u)`, and then inverts `f` on
//! `Q` to obtain `v`; the resulting pair is indistinguishable from two
//! uniformly random field elements, which is what allows a real point
//! to hide among random decoys. Decoding always succeeds, and any pair
//! of field elements decodes to some point.
//!
//! The map uses a constant `c`: `t = c*u^2`, then
//! `X0(u) = -(b/a)*(1 + 1/(t^2 + t))` and `X1(u) = t*X0(u)`. Exactly one
//! of `g(X0)` and `g(X1)` is a square (with `g(x) = x^3 + a*x + b`). For
//! fields with `p = 3 mod 4`, `c = -1`; otherwise `c` is the curve's
//! fixed non-residue `z`.
//!
//! `f(u)` returns the point-at-infinity for the reserved values
//! `u = 0`, `1` and `-1`, and `encode()` never outputs any of them.
//!
//! Group operations come from a curve library, through
//! `PointArithmetic`; the library's domain constants must match the
//! parameters the codec is built with.
//!
//! The code is NOT constant-time: the number of sampling attempts, and
//! the branches taken in each attempt, depend on the point being
//! encoded.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace, warn};

use crate::curve::{CurveParams, CurvePoint, DomainConstants, PointArithmetic};
use crate::error::{CurveError, EncodeError, FieldError};
use crate::field;

/// Default bound on the number of sampling attempts in `encode()`. An
/// attempt succeeds with probability close to 1/4, so that this bound is
/// only reached with a defective RNG or defective parameters.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// An encoded curve point: two field elements whose images through the
/// map add up to the point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedPoint {
    /// First field element (random).
    pub u: BigUint,
    /// Second field element (derived from `u` and the point).
    pub v: BigUint,
}

impl EncodedPoint {

    pub fn new(u: BigUint, v: BigUint) -> Self {
        Self { u, v }
    }

    /// Encodes into twice the length of the modulus `p`: `u` then `v`,
    /// each unsigned big-endian. Both values must be lower than `p`.
    pub fn to_bytes(&self, p: &BigUint) -> Result<Vec<u8>, FieldError> {
        let mut buf = field::encode_element(&self.u, p)?;
        buf.extend_from_slice(&field::encode_element(&self.v, p)?);
        Ok(buf)
    }

    /// Decodes from bytes. The input length must be exactly twice the
    /// length of the modulus `p`, and both values must be lower than `p`.
    /// Reserved values are NOT rejected: every pair decodes to a point.
    pub fn from_bytes(buf: &[u8], p: &BigUint) -> Option<Self> {
        let len = field::byte_len(p);
        if buf.len() != 2 * len {
            return None;
        }
        let u = field::from_bytes_be(&buf[..len]);
        let v = field::from_bytes_be(&buf[len..]);
        if &u >= p || &v >= p {
            return None;
        }
        Some(Self { u, v })
    }
}

/// Elligator Squared codec for one curve.
#[derive(Clone, Debug)]
pub struct ElligatorSquared<'a, G: PointArithmetic> {
    params: &'a CurveParams,
    group: G,
    zeta: BigUint,
    minus_b_over_a: BigUint,
    a_over_b: BigUint,
    minus_inv_zeta: BigUint,
    half: BigUint,
    minus_one: BigUint,
}

impl<'a, G: PointArithmetic + DomainConstants> ElligatorSquared<'a, G> {

    /// Binds curve parameters and a point-arithmetic implementation.
    ///
    /// The library's domain constants must match `params`
    /// (`CurveError::ConfigurationMismatch` otherwise). The curve must
    /// have non-zero `a` and `b`, and the map constant must be a
    /// non-residue.
    pub fn new(params: &'a CurveParams, group: G) -> Result<Self, CurveError> {
        params.check_against(&group)?;
        let unsuitable = |reason| CurveError::UnsuitableForMap {
            curve: params.id().name(),
            reason,
        };
        let p = params.p();
        let inv_a = field::invert(params.a(), p)
            .map_err(|_| unsuitable("coefficient a is zero"))?;
        let inv_b = field::invert(params.b(), p)
            .map_err(|_| unsuitable("coefficient b is zero"))?;
        let zeta = params.map_constant();
        if field::legendre_symbol(&zeta, p) != -1 {
            return Err(unsuitable("map constant is a quadratic residue"));
        }
        let minus_inv_zeta = field::neg_mod(&field::invert(&zeta, p)
            .map_err(|_| unsuitable("map constant is zero"))?, p);
        let half = field::invert(&BigUint::from(2u32), p)
            .map_err(|_| unsuitable("field has characteristic 2"))?;
        Ok(Self {
            params,
            group,
            minus_b_over_a: field::neg_mod(&field::mul_mod(params.b(), &inv_a, p), p),
            a_over_b: field::mul_mod(params.a(), &inv_b, p),
            zeta,
            minus_inv_zeta,
            half,
            minus_one: p - 1u32,
        })
    }

    /// Curve parameters.
    pub fn params(&self) -> &'a CurveParams {
        self.params
    }

    /// Point-arithmetic implementation.
    pub fn group(&self) -> &G {
        &self.group
    }

    /// Returns `true` for `0`, `1` and `p - 1`.
    #[inline]
    pub fn is_reserved(&self, x: &BigUint) -> bool {
        x.is_zero() || x.is_one() || x == &self.minus_one
    }

    // g(x) = x^3 + a*x + b
    fn curve_rhs(&self, x: &BigUint) -> BigUint {
        let p = self.params.p();
        let x2 = field::mul_mod(x, x, p);
        let x3 = field::mul_mod(&x2, x, p);
        let ax = field::mul_mod(self.params.a(), x, p);
        field::add_mod(&field::add_mod(&x3, &ax, p), self.params.b(), p)
    }

    /// The map `f` from field elements to curve points. The input is
    /// reduced modulo `p` first.
    ///
    /// Reserved inputs, and inputs for which `t^2 + t = 0`, map to the
    /// point-at-infinity. Otherwise, the result is `(X0, sqrt(g(X0)))` if
    /// `g(X0)` is a square, or `(X1, -sqrt(g(X1)))`.
    pub fn map_to_curve(&self, u: &BigUint) -> CurvePoint {
        let p = self.params.p();
        let u = u % p;
        if self.is_reserved(&u) {
            return CurvePoint::Identity;
        }
        let t = field::mul_mod(&self.zeta, &field::mul_mod(&u, &u, p), p);
        let d = field::add_mod(&field::mul_mod(&t, &t, p), &t, p);
        let dinv = match field::invert(&d, p) {
            Ok(dinv) => dinv,
            Err(_) => return CurvePoint::Identity,
        };
        let x0 = field::mul_mod(&self.minus_b_over_a,
            &field::add_mod(&BigUint::one(), &dinv, p), p);
        if let Some(y0) = field::modular_sqrt(&self.curve_rhs(&x0), p) {
            return CurvePoint::from_affine(x0, y0);
        }
        let x1 = field::mul_mod(&t, &x0, p);
        match field::modular_sqrt(&self.curve_rhs(&x1), p) {
            Some(y1) => CurvePoint::from_affine(x1, field::neg_mod(&y1, p)),
            None => panic!("{}: no map candidate is on the curve",
                self.params.id()),
        }
    }

    /// Computes a preimage `v` of the point `Q` through the map, using
    /// branch `j` (0 to 3); the four branches select among the (up to)
    /// four preimages. Returns `None` if that branch has no preimage, or
    /// if `Q` is the point-at-infinity.
    ///
    /// The returned value is only a candidate: callers should check that
    /// `map_to_curve(v)` is `Q`, as `encode_with()` does.
    pub fn calc_v(&self, q: &CurvePoint, j: u8) -> Option<BigUint> {
        if j > 3 {
            return None;
        }
        let (x, y) = q.coordinates()?;
        let p = self.params.p();
        let omega = field::add_mod(&field::mul_mod(&self.a_over_b, x, p),
            &BigUint::one(), p);
        let four_omega = field::mul_mod(&BigUint::from(4u32), &omega, p);
        let disc = field::sub_mod(&field::mul_mod(&omega, &omega, p), &four_omega, p);
        let root = field::modular_sqrt(&disc, p)?;
        let signed = if j < 2 { root } else { field::neg_mod(&root, p) };

        // Q is an X0-branch output iff its y is the root chosen by the map.
        let y2 = field::mul_mod(y, y, p);
        let scale = if field::modular_sqrt(&y2, p).as_ref() == Some(y) {
            field::invert(&field::add_mod(&omega, &omega, p), p).ok()?
        } else {
            self.half.clone()
        };

        let w = field::mul_mod(&field::mul_mod(
            &field::add_mod(&omega, &signed, p), &scale, p), &self.minus_inv_zeta, p);
        let v = field::modular_sqrt(&w, p)?;
        if (j & 1) == 1 {
            Some(field::neg_mod(&v, p))
        } else {
            Some(v)
        }
    }

    /// One encoding attempt with a given `u` and branch `j`.
    ///
    /// Returns `None` when `u` is reserved or out of range, when
    /// `P - f(u)` is the point-at-infinity, when branch `j` yields no
    /// preimage, or when the preimage is reserved.
    pub fn encode_with(&self, point: &CurvePoint, u: &BigUint, j: u8)
        -> Option<EncodedPoint>
    {
        if u >= self.params.p() || self.is_reserved(u) {
            return None;
        }
        let fu = self.map_to_curve(u);
        let q = self.group.sub(point, &fu);
        if self.group.is_identity(&q) {
            return None;
        }
        let v = self.calc_v(&q, j)?;
        if self.is_reserved(&v) || self.map_to_curve(&v) != q {
            return None;
        }
        Some(EncodedPoint::new(u.clone(), v))
    }

    /// Encodes a point, using randomness from `rng`.
    ///
    /// Each attempt draws a uniform `u` and a branch `j` (one byte, modulo
    /// 4); attempts with a reserved `u` are failed attempts. After
    /// `max_attempts` failures, `EncodeError::Exhausted` is returned.
    /// Failures of the random source are reported as `EncodeError::Rng`,
    /// and points the library rejects as `EncodeError::NotOnCurve`.
    pub fn encode<T: CryptoRng + RngCore>(&self, point: &CurvePoint,
        rng: &mut T, max_attempts: usize) -> Result<EncodedPoint, EncodeError>
    {
        let curve = self.params.id().name();
        if !self.group.is_on_curve(point) {
            return Err(EncodeError::NotOnCurve);
        }
        let p = self.params.p();
        for attempt in 1..=max_attempts {
            let u = field::random_element(rng, p)?;
            let mut jb = [0u8; 1];
            rng.try_fill_bytes(&mut jb)?;
            let j = jb[0] & 3;
            if let Some(e) = self.encode_with(point, &u, j) {
                debug!(curve, attempts = attempt, "point encoded");
                return Ok(e);
            }
            trace!(curve, attempt, j, "encoding attempt rejected");
        }
        warn!(curve, attempts = max_attempts, "no point encoding found");
        Err(EncodeError::Exhausted { attempts: max_attempts })
    }

    /// Decodes a point: returns `f(u) + f(v)`. This never fails.
    pub fn decode(&self, e: &EncodedPoint) -> CurvePoint {
        self.group.add(&self.map_to_curve(&e.u), &self.map_to_curve(&e.v))
    }
}

/// Encodes `point` on the curve described by `params`.
///
/// This is a shorthand for `ElligatorSquared::new()` followed by
/// `encode()`.
pub fn encode_point<G, T>(point: &CurvePoint, params: &CurveParams, group: &G,
    rng: &mut T, max_attempts: usize) -> crate::Result<EncodedPoint>
    where G: PointArithmetic + DomainConstants, T: CryptoRng + RngCore
{
    let codec = ElligatorSquared::new(params, group)?;
    Ok(codec.encode(point, rng, max_attempts)?)
}

/// Decodes an encoded point on the curve described by `params`.
pub fn decode_point<G: PointArithmetic + DomainConstants>(e: &EncodedPoint, params: &CurveParams,
    group: &G) -> Result<CurvePoint, CurveError>
{
    Ok(ElligatorSquared::new(params, group)?.decode(e))
}

// ========================================================================
