//! Decoyweave is a Rust library for hiding curve points among decoys.
//!
//! This library implements two primitives used by decoy-based password
//! authentication handshakes, where a real curve point must be
//! indistinguishable from several random candidates, and a secret must
//! be recoverable only from the index derived from the right password:
//!
//!  - Point encoding with Elligator Squared (`codec`): a curve point is
//!    represented as a pair of field elements `(u, v)` that look uniformly
//!    random. Encoding is probabilistic (it consumes randomness from a
//!    caller-provided RNG); decoding is deterministic and never fails.
//!
//!  - Weaving (`weave`): given `n` distinct indices and `n` secrets, a
//!    single vector of `n` coefficients is computed such that evaluating
//!    it at the `i`-th index yields the `i`-th secret. The expensive part
//!    depends only on the indices and is precomputed once per index set
//!    (`WeaveBasis`). The `woven` module combines both: it weaves lists of
//!    encoded points and recovers the one stored at a given index.
//!
//! Curves are prime-order short Weierstraß curves, described by
//! `CurveParams` (module `curve`); NIST P-256 and P-224 are registered
//! (features `p256` and `p224`, both enabled by default). The codec only
//! needs group operations, obtained through the `PointArithmetic`
//! trait; the `group` module implements it on top of curve libraries
//! (`crrl` for P-256, `p224` for P-224), whose constants are checked
//! against the registered parameters when they are first loaded. Field
//! arithmetic over arbitrary primes is in `field`.
//!
//! # Conventions
//!
//! Field elements and indices are `BigUint` values, normally in the
//! `0..p` range. Byte encodings are unsigned big-endian, over the length
//! of the field modulus.
//!
//! NOTHING IN THIS LIBRARY IS CONSTANT-TIME. Big integer arithmetic has
//! data-dependent timing, and point encoding uses rejection sampling.
//!
//! Errors are returned as values; each area has its own error type (see
//! `error`), and `Error` wraps them all. The library does not configure
//! logging: it emits events through `tracing` (sampling progress,
//! exhausted encodings, curve parameter self-check failures), and the
//! application decides whether and where to collect them.
//!
//! # Usage
//!
//! ```
//! use decoyweave::codec::{ElligatorSquared, DEFAULT_MAX_ATTEMPTS};
//! use decoyweave::curve::{CurveParams, CurveId};
//! use decoyweave::weave::{hash_to_index, precompute};
//! use decoyweave::group::{CurveGroup, P256Group};
//! use decoyweave::woven::WovenPoints;
//! use num_bigint::BigUint;
//! use rand_core::OsRng;
//!
//! let params = CurveParams::get(CurveId::P256)?;
//! let curve = P256Group::new()?;
//! let codec = ElligatorSquared::new(params, &curve)?;
//!
//! let point = curve.mulgen(&BigUint::from(42u32));
//! let decoy = curve.mulgen(&BigUint::from(43u32));
//! let e1 = codec.encode(&point, &mut OsRng, DEFAULT_MAX_ATTEMPTS)?;
//! let e2 = codec.encode(&decoy, &mut OsRng, DEFAULT_MAX_ATTEMPTS)?;
//!
//! let xs = [hash_to_index(b"hunter2", params.p()), hash_to_index(b"letmein", params.p())];
//! let basis = precompute(&xs, params.p())?;
//! let woven = WovenPoints::weave(&[e1, e2], &basis)?;
//! assert_eq!(codec.decode(&woven.recover(&xs[0])), point);
//! # Ok::<(), decoyweave::Error>(())
//! ```

#[cfg(not(any(feature = "p256", feature = "p224")))]
compile_error!("at least one curve feature (p256, p224) must be enabled");

pub use rand_core::{CryptoRng, RngCore, Error as RngError};

pub mod error;
pub mod field;
pub mod curve;
pub mod group;
pub mod codec;
pub mod weave;
pub mod woven;

#[cfg(test)]
pub(crate) mod drng;

pub use error::{Error, Result};
