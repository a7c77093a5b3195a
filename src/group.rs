//! Point arithmetic backed by external curve libraries.
//!
//! The codec does not implement group operations; it receives them
//! through `PointArithmetic`. This module provides that trait, and
//! `DomainConstants`, for the named curves:
//!
//!  - NIST P-256: `crrl::p256` (`Point`, `Scalar`, base field `GFp256`);
//!  - NIST P-224: the RustCrypto `p224` crate (`ProjectivePoint`,
//!    `Scalar`), with its `arithmetic` feature.
//!
//! Each adapter converts between `CurvePoint` (affine `BigUint`
//! coordinates) and the library's point type. A finite `CurvePoint` is
//! accepted only if the library itself accepts its coordinates, i.e. if
//! both are in `0..p` and satisfy the curve equation; for any other
//! input, `add()` and `sub()` return the point-at-infinity.
//!
//! The domain constants exposed for the registry cross-check come from
//! the libraries, never from this crate's tables. Neither library
//! exports all of them as integers, so the missing ones are recovered
//! from the library's own points: `a` and `b` are solved from the curve
//! equation at `G` and `2*G`, and (for P-224) `p` is `y(G) + y(-G)`.
//!
//! Conversions go through `BigUint` and are variable-time.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::{CurveId, CurvePoint, DomainConstants, PointArithmetic};
use crate::error::CurveError;
use crate::field;

/// A prime-order curve group provided by a curve library.
pub trait CurveGroup: PointArithmetic + DomainConstants {

    /// Identifier of the curve.
    fn id(&self) -> CurveId;

    /// The conventional generator `G`.
    fn generator(&self) -> CurvePoint;

    /// Returns `k*G`. The scalar is reduced modulo the group order.
    fn mulgen(&self, k: &BigUint) -> CurvePoint;

    /// Creates a point from affine coordinates; `None` if the library
    /// rejects them.
    fn from_affine(&self, x: BigUint, y: BigUint) -> Option<CurvePoint> {
        let q = CurvePoint::from_affine(x, y);
        if self.is_on_curve(&q) {
            Some(q)
        } else {
            None
        }
    }

    /// Checks the library constants for internal consistency: non-zero
    /// `a` and `b`, generator on the curve, `(order-1)*G = -G` and
    /// `order*G = 0`.
    fn self_check(&self) -> Result<(), CurveError> {
        let mismatch = |parameter| CurveError::ConfigurationMismatch {
            curve: self.id().name(),
            parameter,
        };
        if self.coefficient_a().map_or(true, |a| a.is_zero()) {
            return Err(mismatch("a"));
        }
        if self.coefficient_b().is_zero() {
            return Err(mismatch("b"));
        }
        let g = self.generator();
        if g.is_identity() || !self.is_on_curve(&g) {
            return Err(mismatch("generator"));
        }
        // The scalar is reduced by the library, so n*G cannot be
        // requested directly.
        let n1 = self.mulgen(&(self.group_order() - 1u32));
        if !self.add(&n1, &g).is_identity() {
            return Err(mismatch("order"));
        }
        Ok(())
    }
}

// Constants as obtained from a library.
#[derive(Clone, Debug, PartialEq, Eq)]
struct LibraryConstants {
    p: BigUint,
    a: BigUint,
    b: BigUint,
    order: BigUint,
}

impl LibraryConstants {

    // Solves y^2 = x^3 + a*x + b for (a, b) from two points with
    // distinct x coordinates.
    fn solve(id: CurveId, p: BigUint, order: BigUint,
        (x1, y1): (&BigUint, &BigUint), (x2, y2): (&BigUint, &BigUint))
        -> Result<Self, CurveError>
    {
        let mismatch = |parameter| CurveError::ConfigurationMismatch {
            curve: id.name(),
            parameter,
        };
        if p < BigUint::from(5u32) {
            return Err(mismatch("p"));
        }
        let r = |x: &BigUint, y: &BigUint| {
            let x3 = field::mul_mod(&field::mul_mod(x, x, &p), x, &p);
            field::sub_mod(&field::mul_mod(y, y, &p), &x3, &p)
        };
        let (r1, r2) = (r(x1, y1), r(x2, y2));
        let dx = field::invert(&field::sub_mod(x1, x2, &p), &p)
            .map_err(|_| mismatch("generator"))?;
        let a = field::mul_mod(&field::sub_mod(&r1, &r2, &p), &dx, &p);
        let b = field::sub_mod(&r1, &field::mul_mod(&a, x1, &p), &p);
        Ok(Self { p, a, b, order })
    }
}

fn coordinates_or<'a>(q: &'a CurvePoint, id: CurveId, parameter: &'static str)
    -> Result<(&'a BigUint, &'a BigUint), CurveError>
{
    q.coordinates().ok_or(CurveError::ConfigurationMismatch {
        curve: id.name(),
        parameter,
    })
}

// ------------------------------------------------------------------------
// P-256 (crrl)

#[cfg(feature = "p256")]
pub use self::nist_p256::P256Group;

#[cfg(feature = "p256")]
mod nist_p256 {

    // Library points use uppercase names, as in crrl.
    #![allow(non_snake_case)]

    use crrl::field::GFp256;
    use crrl::p256::{Point, Scalar};
    use num_bigint::BigUint;

    use super::{coordinates_or, CurveGroup, LibraryConstants};
    use crate::curve::{CurveId, CurvePoint, DomainConstants, PointArithmetic};
    use crate::error::CurveError;

    /// NIST P-256 arithmetic from `crrl::p256`.
    #[derive(Clone, Debug)]
    pub struct P256Group {
        consts: LibraryConstants,
    }

    // crrl keeps its moduli as 64-bit limbs, low-to-high.
    fn from_limbs(limbs: &[u64; 4]) -> BigUint {
        let mut buf = [0u8; 32];
        for (i, w) in limbs.iter().enumerate() {
            buf[(8 * i)..(8 * i + 8)].copy_from_slice(&w.to_le_bytes());
        }
        BigUint::from_bytes_le(&buf)
    }

    // Little-endian over 32 bytes; None if the value is too large.
    fn to_le32(v: &BigUint) -> Option<[u8; 32]> {
        let raw = v.to_bytes_le();
        if raw.len() > 32 {
            return None;
        }
        let mut buf = [0u8; 32];
        buf[..raw.len()].copy_from_slice(&raw);
        Some(buf)
    }

    fn from_library(P: Point) -> CurvePoint {
        if P.isneutral() != 0 {
            return CurvePoint::Identity;
        }
        let (x, y, _) = P.to_affine();
        CurvePoint::from_affine(
            BigUint::from_bytes_le(&x.encode()),
            BigUint::from_bytes_le(&y.encode()))
    }

    fn to_library(q: &CurvePoint) -> Option<Point> {
        match q.coordinates() {
            None => Some(Point::NEUTRAL),
            Some((x, y)) => {
                // GFp256::decode() refuses non-canonical values.
                let x = GFp256::decode(&to_le32(x)?)?;
                let y = GFp256::decode(&to_le32(y)?)?;
                Point::from_affine(x, y)
            }
        }
    }

    impl P256Group {

        /// Binds the `crrl` P-256 implementation and reads its domain
        /// constants.
        pub fn new() -> Result<Self, CurveError> {
            let id = CurveId::P256;
            let g = from_library(Point::BASE);
            let g2 = from_library(Point::BASE.double());
            let consts = LibraryConstants::solve(id,
                from_limbs(&GFp256::MODULUS), from_limbs(&Scalar::MODULUS),
                coordinates_or(&g, id, "generator")?,
                coordinates_or(&g2, id, "generator")?)?;
            Ok(Self { consts })
        }
    }

    impl PointArithmetic for P256Group {

        fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
            match (to_library(p), to_library(q)) {
                (Some(P), Some(Q)) => from_library(P + Q),
                _ => CurvePoint::Identity,
            }
        }

        fn sub(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
            match (to_library(p), to_library(q)) {
                (Some(P), Some(Q)) => from_library(P - Q),
                _ => CurvePoint::Identity,
            }
        }

        fn is_on_curve(&self, p: &CurvePoint) -> bool {
            to_library(p).is_some()
        }
    }

    impl DomainConstants for P256Group {

        fn field_modulus(&self) -> &BigUint {
            &self.consts.p
        }

        fn coefficient_a(&self) -> Option<&BigUint> {
            Some(&self.consts.a)
        }

        fn coefficient_b(&self) -> &BigUint {
            &self.consts.b
        }

        fn group_order(&self) -> &BigUint {
            &self.consts.order
        }
    }

    impl CurveGroup for P256Group {

        fn id(&self) -> CurveId {
            CurveId::P256
        }

        fn generator(&self) -> CurvePoint {
            from_library(Point::BASE)
        }

        fn mulgen(&self, k: &BigUint) -> CurvePoint {
            match to_le32(&(k % &self.consts.order)) {
                Some(buf) => from_library(Point::mulgen(&Scalar::decode_reduce(&buf))),
                None => CurvePoint::Identity,
            }
        }
    }
}

// ------------------------------------------------------------------------
// P-224 (RustCrypto)

#[cfg(feature = "p224")]
pub use self::nist_p224::P224Group;

#[cfg(feature = "p224")]
mod nist_p224 {

    #![allow(non_snake_case)]

    use num_bigint::BigUint;
    use p224::elliptic_curve::ff::{Field, PrimeField};
    use p224::elliptic_curve::group::{Curve as _, Group};
    use p224::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
    use p224::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};

    use super::{coordinates_or, CurveGroup, LibraryConstants};
    use crate::curve::{CurveId, CurvePoint, DomainConstants, PointArithmetic};
    use crate::error::CurveError;

    /// NIST P-224 arithmetic from the RustCrypto `p224` crate.
    #[derive(Clone, Debug)]
    pub struct P224Group {
        consts: LibraryConstants,
    }

    // Big-endian over the library's element length; None if the value
    // is too large.
    fn to_field_bytes(v: &BigUint) -> Option<FieldBytes> {
        let raw = v.to_bytes_be();
        let mut buf = FieldBytes::default();
        if raw.len() > buf.len() {
            return None;
        }
        let off = buf.len() - raw.len();
        buf[off..].copy_from_slice(&raw);
        Some(buf)
    }

    fn from_library(q: &ProjectivePoint) -> CurvePoint {
        let enc = q.to_affine().to_encoded_point(false);
        match (enc.x(), enc.y()) {
            (Some(x), Some(y)) => CurvePoint::from_affine(
                BigUint::from_bytes_be(&x[..]),
                BigUint::from_bytes_be(&y[..])),
            _ => CurvePoint::Identity,
        }
    }

    fn to_library(q: &CurvePoint) -> Option<ProjectivePoint> {
        let (x, y) = match q.coordinates() {
            None => return Some(ProjectivePoint::identity()),
            Some(c) => c,
        };
        // Decoding checks the range of both coordinates and the curve
        // equation.
        let enc = p224::EncodedPoint::from_affine_coordinates(
            &to_field_bytes(x)?, &to_field_bytes(y)?, false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&enc))
            .map(ProjectivePoint::from)
    }

    impl P224Group {

        /// Binds the RustCrypto P-224 implementation and reads its domain
        /// constants.
        pub fn new() -> Result<Self, CurveError> {
            let id = CurveId::P224;
            let g = ProjectivePoint::generator();
            let (pg, png, pg2) = (from_library(&g), from_library(&-g),
                from_library(&g.double()));
            let (gx, gy) = coordinates_or(&pg, id, "generator")?;
            let (_, ngy) = coordinates_or(&png, id, "generator")?;

            // The order is one more than the canonical encoding of -1.
            let order = BigUint::from_bytes_be(&(-Scalar::ONE).to_repr()[..]) + 1u32;
            let consts = LibraryConstants::solve(id, gy + ngy, order,
                (gx, gy), coordinates_or(&pg2, id, "generator")?)?;
            Ok(Self { consts })
        }
    }

    impl PointArithmetic for P224Group {

        fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
            match (to_library(p), to_library(q)) {
                (Some(P), Some(Q)) => from_library(&(P + Q)),
                _ => CurvePoint::Identity,
            }
        }

        fn sub(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
            match (to_library(p), to_library(q)) {
                (Some(P), Some(Q)) => from_library(&(P - Q)),
                _ => CurvePoint::Identity,
            }
        }

        fn is_on_curve(&self, p: &CurvePoint) -> bool {
            to_library(p).is_some()
        }
    }

    impl DomainConstants for P224Group {

        fn field_modulus(&self) -> &BigUint {
            &self.consts.p
        }

        fn coefficient_a(&self) -> Option<&BigUint> {
            Some(&self.consts.a)
        }

        fn coefficient_b(&self) -> &BigUint {
            &self.consts.b
        }

        fn group_order(&self) -> &BigUint {
            &self.consts.order
        }
    }

    impl CurveGroup for P224Group {

        fn id(&self) -> CurveId {
            CurveId::P224
        }

        fn generator(&self) -> CurvePoint {
            from_library(&ProjectivePoint::generator())
        }

        fn mulgen(&self, k: &BigUint) -> CurvePoint {
            let s = to_field_bytes(&(k % &self.consts.order))
                .and_then(|buf| Option::<Scalar>::from(Scalar::from_repr(buf)));
            match s {
                Some(s) => from_library(&(ProjectivePoint::generator() * s)),
                None => CurvePoint::Identity,
            }
        }
    }
}

// ------------------------------------------------------------------------

/// The library-backed group of a registered curve, selected at runtime.
#[derive(Clone, Debug)]
pub enum NamedGroup {
    #[cfg(feature = "p256")]
    P256(P256Group),
    #[cfg(feature = "p224")]
    P224(P224Group),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $e:expr) => {
        match $self {
            #[cfg(feature = "p256")]
            NamedGroup::P256($g) => $e,
            #[cfg(feature = "p224")]
            NamedGroup::P224($g) => $e,
        }
    }
}

impl NamedGroup {

    /// Binds the library for curve `id`. Curves whose feature is disabled
    /// are reported as unknown.
    pub fn new(id: CurveId) -> Result<Self, CurveError> {
        match id {
            #[cfg(feature = "p256")]
            CurveId::P256 => Ok(NamedGroup::P256(P256Group::new()?)),
            #[cfg(feature = "p224")]
            CurveId::P224 => Ok(NamedGroup::P224(P224Group::new()?)),
            #[allow(unreachable_patterns)]
            _ => Err(CurveError::UnknownCurve(id.name().to_string())),
        }
    }
}

impl PointArithmetic for NamedGroup {

    fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        dispatch!(self, g => g.add(p, q))
    }

    fn sub(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        dispatch!(self, g => g.sub(p, q))
    }

    fn is_on_curve(&self, p: &CurvePoint) -> bool {
        dispatch!(self, g => g.is_on_curve(p))
    }
}

impl DomainConstants for NamedGroup {

    fn field_modulus(&self) -> &BigUint {
        dispatch!(self, g => g.field_modulus())
    }

    fn coefficient_a(&self) -> Option<&BigUint> {
        dispatch!(self, g => g.coefficient_a())
    }

    fn coefficient_b(&self) -> &BigUint {
        dispatch!(self, g => g.coefficient_b())
    }

    fn group_order(&self) -> &BigUint {
        dispatch!(self, g => g.group_order())
    }
}

impl CurveGroup for NamedGroup {

    fn id(&self) -> CurveId {
        dispatch!(self, g => g.id())
    }

    fn generator(&self) -> CurvePoint {
        dispatch!(self, g => g.generator())
    }

    fn mulgen(&self, k: &BigUint) -> CurvePoint {
        dispatch!(self, g => g.mulgen(k))
    }
}

// ========================================================================
