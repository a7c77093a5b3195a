//! Curve parameters, curve points, and the point-arithmetic capability.
//!
//! A curve is a short Weierstraß curve `y^2 = x^3 + a*x + b` over the
//! prime field of modulus `p`, with prime order. Two named curves are
//! registered (each behind its own Cargo feature, both enabled by
//! default):
//!
//!  - NIST P-256 ("secp256r1", "prime256v1");
//!  - NIST P-224 ("secp224r1"), a weaker curve kept for compatibility
//!    and testing.
//!
//! Each parameter set also carries `z`, a fixed quadratic non-residue of
//! the base field (the SSWU constant of IEEE 802.11-2020, 12.4.4.2.3).
//!
//! Parameter sets are built once per process, on first lookup, and are
//! then immutable. The first lookup compares the registered constants
//! with those of the curve library that provides the group (see
//! `group`); a mismatch is reported as
//! `CurveError::ConfigurationMismatch` on that lookup and on every later
//! one, and callers are expected to treat it as fatal.
//!
//! Group operations are not implemented by the encoding code itself:
//! they are obtained through the `PointArithmetic` trait, so that any
//! curve library may be plugged in.

use core::fmt;
use core::str::FromStr;
use std::sync::OnceLock;

use num_bigint::BigUint;
use tracing::{debug, error};

use crate::error::CurveError;
use crate::field;
use crate::group::{CurveGroup, NamedGroup};

/// A curve point: either the point-at-infinity or a pair of affine
/// coordinates.
///
/// The type itself does not enforce the curve equation; points obtained
/// from a `PointArithmetic` implementation or from
/// `CurveGroup::from_affine()` are on the curve.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CurvePoint {
    /// The point-at-infinity (neutral element of the group).
    Identity,
    /// A finite point.
    Affine {
        /// Affine x coordinate.
        x: BigUint,
        /// Affine y coordinate.
        y: BigUint,
    },
}

impl CurvePoint {

    /// Creates a finite point from its affine coordinates (no check).
    pub fn from_affine(x: BigUint, y: BigUint) -> Self {
        CurvePoint::Affine { x, y }
    }

    /// Returns `true` for the point-at-infinity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, CurvePoint::Identity)
    }

    /// Gets the affine coordinates; `None` for the point-at-infinity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            CurvePoint::Identity => None,
            CurvePoint::Affine { x, y } => Some((x, y)),
        }
    }
}

/// Group operations on the points of one curve.
///
/// This is the only capability the point codec needs from a curve
/// library. Implementations must be complete: any combination of
/// inputs, including the point-at-infinity and `P + P` or `P - P`,
/// yields the correct group element.
pub trait PointArithmetic {

    /// Returns `P + Q`.
    fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint;

    /// Returns `P - Q`.
    fn sub(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint;

    /// Returns `true` if `P` is the neutral element.
    fn is_identity(&self, p: &CurvePoint) -> bool {
        p.is_identity()
    }

    /// Returns `true` if `P` is a valid point of the group. Results of
    /// `add()` and `sub()` are unspecified for invalid inputs.
    fn is_on_curve(&self, _p: &CurvePoint) -> bool {
        true
    }
}

impl<G: PointArithmetic + ?Sized> PointArithmetic for &G {

    fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        (**self).add(p, q)
    }

    fn sub(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        (**self).sub(p, q)
    }

    fn is_identity(&self, p: &CurvePoint) -> bool {
        (**self).is_identity(p)
    }

    fn is_on_curve(&self, p: &CurvePoint) -> bool {
        (**self).is_on_curve(p)
    }
}

/// Domain constants exposed by a curve library, used for the startup
/// cross-check of the registered parameters.
pub trait DomainConstants {

    /// Base field modulus `p`.
    fn field_modulus(&self) -> &BigUint;

    /// Curve coefficient `a`, if the library makes it available.
    fn coefficient_a(&self) -> Option<&BigUint> {
        None
    }

    /// Curve coefficient `b`.
    fn coefficient_b(&self) -> &BigUint;

    /// Group order.
    fn group_order(&self) -> &BigUint;
}

impl<C: DomainConstants + ?Sized> DomainConstants for &C {

    fn field_modulus(&self) -> &BigUint {
        (**self).field_modulus()
    }

    fn coefficient_a(&self) -> Option<&BigUint> {
        (**self).coefficient_a()
    }

    fn coefficient_b(&self) -> &BigUint {
        (**self).coefficient_b()
    }

    fn group_order(&self) -> &BigUint {
        (**self).group_order()
    }
}

/// Identifier of a registered curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveId {
    /// NIST P-256.
    P256,
    /// NIST P-224.
    P224,
}

impl CurveId {

    /// Canonical (SEC 2) name of the curve.
    pub fn name(self) -> &'static str {
        match self {
            CurveId::P256 => "secp256r1",
            CurveId::P224 => "secp224r1",
        }
    }

    /// Looks up a curve by name. Matching is case-insensitive; accepted
    /// aliases are "secp256r1", "P-256", "prime256v1", "secp224r1" and
    /// "P-224". Curves whose feature is disabled are unknown.
    pub fn from_name(name: &str) -> Result<Self, CurveError> {
        let id = match name.to_ascii_lowercase().as_str() {
            "secp256r1" | "p-256" | "p256" | "prime256v1" => CurveId::P256,
            "secp224r1" | "p-224" | "p224" => CurveId::P224,
            _ => return Err(CurveError::UnknownCurve(name.to_string())),
        };
        if !id.is_enabled() {
            return Err(CurveError::UnknownCurve(name.to_string()));
        }
        Ok(id)
    }

    fn is_enabled(self) -> bool {
        match self {
            CurveId::P256 => cfg!(feature = "p256"),
            CurveId::P224 => cfg!(feature = "p224"),
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveId {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveId::from_name(s)
    }
}

// Registered constants (SEC 2), unsigned big-endian.

#[cfg(feature = "p256")]
const P256_P: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];
#[cfg(feature = "p256")]
const P256_A: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC,
];
#[cfg(feature = "p256")]
const P256_B: [u8; 32] = [
    0x5A, 0xC6, 0x35, 0xD8, 0xAA, 0x3A, 0x93, 0xE7,
    0xB3, 0xEB, 0xBD, 0x55, 0x76, 0x98, 0x86, 0xBC,
    0x65, 0x1D, 0x06, 0xB0, 0xCC, 0x53, 0xB0, 0xF6,
    0x3B, 0xCE, 0x3C, 0x3E, 0x27, 0xD2, 0x60, 0x4B,
];
#[cfg(feature = "p256")]
const P256_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84,
    0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63, 0x25, 0x51,
];
#[cfg(feature = "p256")]
const P256_Z: i32 = -10;

#[cfg(feature = "p224")]
const P224_P: [u8; 28] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x01,
];
#[cfg(feature = "p224")]
const P224_A: [u8; 28] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE,
];
#[cfg(feature = "p224")]
const P224_B: [u8; 28] = [
    0xB4, 0x05, 0x0A, 0x85, 0x0C, 0x04, 0xB3, 0xAB,
    0xF5, 0x41, 0x32, 0x56, 0x50, 0x44, 0xB0, 0xB7,
    0xD7, 0xBF, 0xD8, 0xBA, 0x27, 0x0B, 0x39, 0x43,
    0x23, 0x55, 0xFF, 0xB4,
];
#[cfg(feature = "p224")]
const P224_N: [u8; 28] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x16, 0xA2,
    0xE0, 0xB8, 0xF0, 0x3E, 0x13, 0xDD, 0x29, 0x45,
    0x5C, 0x5C, 0x2A, 0x3D,
];
#[cfg(feature = "p224")]
const P224_Z: i32 = 31;

static P256_PARAMS: OnceLock<Result<CurveParams, CurveError>> = OnceLock::new();
static P224_PARAMS: OnceLock<Result<CurveParams, CurveError>> = OnceLock::new();

/// Parameters of a prime-order short Weierstraß curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveParams {
    id: CurveId,
    p: BigUint,
    a: BigUint,
    b: BigUint,
    order: BigUint,
    z: BigUint,
}

impl CurveParams {

    /// Builds a parameter set from its parts. `z` is a signed integer
    /// (e.g. -10), reduced modulo `p`.
    ///
    /// Only the shape is validated: `p` must be odd and at least 5, `a`
    /// and `b` must be lower than `p`, and the order must be at least 2.
    /// Primality is not tested; use `check_against()` to compare the set
    /// with a curve library. Registered curves are normally obtained with
    /// `get()` or `by_name()` instead.
    pub fn from_parts(id: CurveId, p: BigUint, a: BigUint, b: BigUint,
        order: BigUint, z: i32) -> Result<Self, CurveError>
    {
        let invalid = |parameter| CurveError::InvalidParameter {
            curve: id.name(),
            parameter,
        };
        if p < BigUint::from(5u32) || !p.bit(0) {
            return Err(invalid("p"));
        }
        if a >= p {
            return Err(invalid("a"));
        }
        if b >= p {
            return Err(invalid("b"));
        }
        if order < BigUint::from(2u32) {
            return Err(invalid("order"));
        }
        let zm = BigUint::from(z.unsigned_abs()) % &p;
        let z = if z < 0 { field::neg_mod(&zm, &p) } else { zm };
        Ok(Self { id, p, a, b, order, z })
    }

    /// Gets the process-wide parameters of a registered curve.
    ///
    /// The first call for a given curve builds and self-checks the
    /// parameters; the outcome (including a failure) is cached.
    pub fn get(id: CurveId) -> Result<&'static CurveParams, CurveError> {
        let cell = match id {
            CurveId::P256 => &P256_PARAMS,
            CurveId::P224 => &P224_PARAMS,
        };
        Self::cached(cell, || Self::load(id))
    }

    // The first outcome stored in `cell` is returned forever, failures
    // included.
    fn cached<F>(cell: &'static OnceLock<Result<CurveParams, CurveError>>, init: F)
        -> Result<&'static CurveParams, CurveError>
        where F: FnOnce() -> Result<CurveParams, CurveError>
    {
        cell.get_or_init(init).as_ref().map_err(Clone::clone)
    }

    /// Gets the process-wide parameters of a registered curve, by name.
    pub fn by_name(name: &str) -> Result<&'static CurveParams, CurveError> {
        Self::get(CurveId::from_name(name)?)
    }

    fn builtin(id: CurveId) -> Result<Self, CurveError> {
        match id {
            #[cfg(feature = "p256")]
            CurveId::P256 => Self::from_parts(id,
                BigUint::from_bytes_be(&P256_P),
                BigUint::from_bytes_be(&P256_A),
                BigUint::from_bytes_be(&P256_B),
                BigUint::from_bytes_be(&P256_N),
                P256_Z),
            #[cfg(feature = "p224")]
            CurveId::P224 => Self::from_parts(id,
                BigUint::from_bytes_be(&P224_P),
                BigUint::from_bytes_be(&P224_A),
                BigUint::from_bytes_be(&P224_B),
                BigUint::from_bytes_be(&P224_N),
                P224_Z),
            #[allow(unreachable_patterns)]
            _ => Err(CurveError::UnknownCurve(id.name().to_string())),
        }
    }

    fn load(id: CurveId) -> Result<Self, CurveError> {
        let params = Self::builtin(id)?;
        let group = NamedGroup::new(id)?;
        params.verify(&group)
    }

    // Full startup check of a parameter set against a library group.
    fn verify<G: CurveGroup>(self, group: &G) -> Result<Self, CurveError> {
        let checked = self.check_against(group)
            .and_then(|_| group.self_check())
            .and_then(|_| self.check_z());
        match checked {
            Ok(()) => {
                debug!(curve = self.id.name(), bits = self.p.bits(), "curve parameters loaded");
                Ok(self)
            }
            Err(err) => {
                error!(curve = self.id.name(), %err, "curve parameter self-check failed");
                Err(err)
            }
        }
    }

    /// Compares `p`, `a` (when the library provides it), `b` and the
    /// group order with the constants of a curve library.
    pub fn check_against<C: DomainConstants>(&self, lib: &C) -> Result<(), CurveError> {
        let mismatch = |parameter| CurveError::ConfigurationMismatch {
            curve: self.id.name(),
            parameter,
        };
        if &self.p != lib.field_modulus() {
            return Err(mismatch("p"));
        }
        if lib.coefficient_a().map_or(false, |a| a != &self.a) {
            return Err(mismatch("a"));
        }
        if &self.b != lib.coefficient_b() {
            return Err(mismatch("b"));
        }
        if &self.order != lib.group_order() {
            return Err(mismatch("order"));
        }
        Ok(())
    }

    fn check_z(&self) -> Result<(), CurveError> {
        if field::legendre_symbol(&self.z, &self.p) != -1 {
            return Err(CurveError::ConfigurationMismatch {
                curve: self.id.name(),
                parameter: "z",
            });
        }
        Ok(())
    }

    /// Curve identifier.
    #[inline]
    pub fn id(&self) -> CurveId {
        self.id
    }

    /// Base field modulus.
    #[inline]
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Curve coefficient `a`.
    #[inline]
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Curve coefficient `b`.
    #[inline]
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Group order.
    #[inline]
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Fixed non-residue `z`, reduced modulo `p`.
    #[inline]
    pub fn z(&self) -> &BigUint {
        &self.z
    }

    /// Length of an encoded base field element, in bytes.
    #[inline]
    pub fn field_len(&self) -> usize {
        field::byte_len(&self.p)
    }

    /// Constant used by the point encoding map.
    ///
    /// When `p = 3 mod 4`, -1 is a non-residue and is used (this gives
    /// the classic `X1(u) = -u^2*X0(u)` map); otherwise -1 is a square
    /// and `z` is used instead.
    pub fn map_constant(&self) -> BigUint {
        if (&self.p % 4u32) == BigUint::from(3u32) {
            &self.p - 1u32
        } else {
            self.z.clone()
        }
    }
}

// ========================================================================
