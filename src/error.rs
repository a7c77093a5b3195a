//! Error types.
//!
//! Each area of the crate has its own error enum; the crate-level
//! [`Error`] wraps all of them so that callers combining several
//! operations can use a single `?`-friendly type.

use thiserror::Error;

/// Field arithmetic error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// An inverse was requested for a multiple of the modulus.
    #[error("value is not invertible modulo the field prime")]
    NotInvertible,

    /// A value does not fit in the requested encoding length.
    #[error("value does not fit in {len} bytes")]
    Overflow {
        /// Requested length, in bytes.
        len: usize,
    },

    /// A value is not lower than the field modulus.
    #[error("value is not a reduced field element")]
    OutOfRange,
}

/// Point encoding error.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No valid `(u, v)` pair was found within the attempt bound.
    #[error("no valid encoding found after {attempts} attempts (suspected RNG or parameter defect)")]
    Exhausted {
        /// Number of sampling attempts that were made.
        attempts: usize,
    },

    /// The point to encode is not on the curve.
    #[error("point is not on the curve")]
    NotOnCurve,

    /// The random source reported a failure.
    #[error("random source failure: {0}")]
    Rng(#[from] rand_core::Error),
}

/// Weaving engine error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WeaveError {
    /// At least one index is needed to build a basis.
    #[error("empty index set")]
    EmptyIndexSet,

    /// The modulus is not a usable prime.
    #[error("invalid modulus")]
    InvalidModulus,

    /// Two indices are equal modulo the field prime.
    #[error("indices {first} and {second} collide modulo the field prime")]
    DuplicateIndex {
        /// Position of the first occurrence.
        first: usize,
        /// Position of the colliding index.
        second: usize,
    },

    /// The number of secrets does not match the basis dimension.
    #[error("expected {expected} values, got {found}")]
    ShapeMismatch {
        /// Basis dimension.
        expected: usize,
        /// Number of values provided.
        found: usize,
    },

    /// The modulus passed along does not match the basis modulus.
    #[error("modulus does not match the basis modulus")]
    ModulusMismatch,

    /// A serialized basis or coefficient vector could not be decoded.
    #[error("malformed encoding: {0}")]
    Malformed(&'static str),

    /// A value could not be encoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] FieldError),
}

/// Curve parameter error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    /// No curve is registered under that name.
    #[error("unknown curve: {0}")]
    UnknownCurve(String),

    /// The registered parameters disagree with the curve library.
    #[error("curve {curve}: parameter {parameter} does not match the curve library")]
    ConfigurationMismatch {
        /// Curve name.
        curve: &'static str,
        /// Name of the offending parameter.
        parameter: &'static str,
    },

    /// A parameter set is malformed (e.g. an even or tiny modulus).
    #[error("curve {curve}: invalid parameter {parameter}")]
    InvalidParameter {
        /// Curve name.
        curve: &'static str,
        /// Name of the offending parameter.
        parameter: &'static str,
    },

    /// The curve does not meet the preconditions of the encoding map.
    #[error("curve {curve} cannot be used with the encoding map: {reason}")]
    UnsuitableForMap {
        /// Curve name.
        curve: &'static str,
        /// Failed precondition.
        reason: &'static str,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Weave(#[from] WeaveError),

    #[error(transparent)]
    Curve(#[from] CurveError),
}

pub type Result<T> = core::result::Result<T, Error>;
