// This sample code shows how to use decoyweave to hide one real curve
// point among decoys, such that only the right password recovers it.

use decoyweave::codec::{ElligatorSquared, EncodedPoint, DEFAULT_MAX_ATTEMPTS};
use decoyweave::curve::{CurveParams, CurvePoint, PointArithmetic};
use decoyweave::field;
use decoyweave::weave::{hash_to_index, precompute, WeaveBasis};
use decoyweave::group::{CurveGroup, P256Group};
use decoyweave::woven::WovenPoints;
use rand_core::OsRng;
use std::vec::Vec;

fn main() {

    // The curve is selected by name. The first lookup checks the
    // registered constants against the curve library (crrl, for P-256);
    // a failure there means the build is broken and nothing can be done.
    let params = CurveParams::by_name("P-256").unwrap();
    let curve = P256Group::new().unwrap();
    let codec = ElligatorSquared::new(params, &curve).unwrap();
    let p = params.p();
    let mut rng = OsRng;

    // ====================================================================
    // SERVER SIDE
    //
    // The server holds one real point (e.g. a public key bound to the
    // user's password) and wants to send it so that only someone knowing
    // the password can pick it out. It adds decoys: random points, each
    // stored at the index derived from some other (fake) password.

    // The real point; here, an arbitrary multiple of the generator.
    let k = field::random_element(&mut rng, params.order()).unwrap();
    let real = curve.mulgen(&k);

    // Decoys: random points.
    let n_decoys = 7;
    let mut points: Vec<CurvePoint> = vec![real.clone()];
    for _ in 0..n_decoys {
        let k = field::random_element(&mut rng, params.order()).unwrap();
        points.push(curve.mulgen(&k));
    }

    // Encode every point. Encoded points are pairs of field elements that
    // look uniformly random, so the real point cannot be told apart from
    // the decoys by its encoding. Encoding can fail only with a broken
    // RNG; this is where some error handling should happen.
    let encoded: Vec<EncodedPoint> = points.iter()
        .map(|q| codec.encode(q, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap())
        .collect();

    // Indices: the real point goes at the index of the real password;
    // decoys go at indices of fake passwords. Indices must be distinct.
    let mut xs = vec![hash_to_index(b"correct horse battery staple", p)];
    for i in 0..n_decoys {
        xs.push(hash_to_index(format!("decoy password {}", i).as_bytes(), p));
    }

    // The basis depends only on the indices; when the same index set is
    // used many times, it can be computed once and stored.
    let basis = precompute(&xs, p).unwrap();
    let stored = basis.to_bytes().unwrap();
    let basis = WeaveBasis::from_bytes(&stored).unwrap();

    // Weave the encoded points. The result is what gets sent: two
    // coefficient vectors, each with one field element per point.
    let woven = WovenPoints::weave(&encoded, &basis).unwrap();
    let msg = woven.to_bytes().unwrap();
    println!("woven message: {} bytes for {} points", msg.len(), points.len());

    // ====================================================================
    // CLIENT SIDE
    //
    // The client decodes the message, derives the index from the password
    // it knows, and recovers a point. With the right password, this is
    // the real point; with any other password, it is some unrelated
    // curve point (not an error).

    let woven = WovenPoints::from_bytes(&msg, p).unwrap();

    let x = hash_to_index(b"correct horse battery staple", p);
    let q = codec.decode(&woven.recover(&x));
    assert_eq!(q, real);
    println!("right password: real point recovered");

    let x = hash_to_index(b"tr0ub4dor&3", p);
    let q = codec.decode(&woven.recover(&x));
    assert!(q != real);
    println!("wrong password: unrelated point {}",
        if curve.is_on_curve(&q) { "(on the curve)" } else { "(?)" });
}
