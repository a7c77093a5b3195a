//! Weaving of encoded curve points.
//!
//! A list of encoded points `(u_i, v_i)` is woven coordinate by
//! coordinate against a shared basis: one coefficient vector carries the
//! `u` values, another the `v` values. Evaluating both vectors at the
//! `i`-th index yields `(u_i, v_i)` again, which decodes to the `i`-th
//! point. At any other index the evaluation yields a pair of unrelated
//! field elements, which still decodes to some curve point.

use num_bigint::BigUint;

use crate::codec::EncodedPoint;
use crate::error::WeaveError;
use crate::weave::{self, WeaveBasis, WeaveCoefficients};

/// Two coefficient vectors carrying woven encoded points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WovenPoints {
    u: WeaveCoefficients,
    v: WeaveCoefficients,
}

impl WovenPoints {

    /// Weaves `points[i]` at the `i`-th index of `basis`.
    pub fn weave(points: &[EncodedPoint], basis: &WeaveBasis)
        -> Result<Self, WeaveError>
    {
        let us: Vec<BigUint> = points.iter().map(|e| e.u.clone()).collect();
        let vs: Vec<BigUint> = points.iter().map(|e| e.v.clone()).collect();
        Ok(Self {
            u: basis.weave(&us)?,
            v: basis.weave(&vs)?,
        })
    }

    /// Recovers the encoded point woven at `index`.
    pub fn recover(&self, index: &BigUint) -> EncodedPoint {
        EncodedPoint::new(self.u.eval(index), self.v.eval(index))
    }

    /// Coefficients of the `u` values.
    pub fn u_coefficients(&self) -> &WeaveCoefficients {
        &self.u
    }

    /// Coefficients of the `v` values.
    pub fn v_coefficients(&self) -> &WeaveCoefficients {
        &self.v
    }

    /// Encodes as the `u` coefficients then the `v` coefficients, each
    /// element over the byte length of the modulus.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WeaveError> {
        let mut buf = self.u.to_bytes()?;
        buf.extend_from_slice(&self.v.to_bytes()?);
        Ok(buf)
    }

    /// Decodes from bytes; both halves must have the same size.
    pub fn from_bytes(buf: &[u8], p: &BigUint) -> Result<Self, WeaveError> {
        if buf.len() % 2 != 0 {
            return Err(WeaveError::Malformed("odd length"));
        }
        let (ub, vb) = buf.split_at(buf.len() / 2);
        let u = WeaveCoefficients::from_bytes(ub, p)?;
        let v = WeaveCoefficients::from_bytes(vb, p)?;
        Ok(Self { u, v })
    }
}

/// Shorthand for building a basis from indices and weaving points with
/// it in one call.
pub fn weave_points(points: &[EncodedPoint], xs: &[BigUint], p: &BigUint)
    -> Result<WovenPoints, WeaveError>
{
    let basis = weave::precompute(xs, p)?;
    WovenPoints::weave(points, &basis)
}

// ========================================================================
