//! # Shamir Secret Sharing over GF(2^8)
//!
//! This library splits a secret byte sequence into `n` shares such that any
//! `threshold` of them reconstruct the secret exactly, while fewer reveal
//! nothing about it. It also supports proactively refreshing dealt shares
//! without changing the underlying secret.
//!
//! ## Shamir's Secret Sharing (SSS)
//!
//! Shamir's Secret Sharing is a cryptographic algorithm created by Adi
//! Shamir. A secret is divided into parts, giving each participant its own
//! unique part, with the property that a certain number of these parts are
//! needed to reconstruct the secret.
//!
//! ### The Mathematics Behind SSS
//!
//! The idea of SSS is based on polynomial interpolation in finite fields.
//! Given a secret byte `S`, the algorithm chooses a random polynomial of
//! degree `t-1` (where `t` is the threshold number of shares needed to
//! reconstruct the secret):
//!
//! ```ignore
//! f(x) = a0 + a1*x + a2*x^2 + ... + a(t-1)*x^(t-1)
//! ```
//!
//! where `a0 = S` (the secret), and `a1, ..., a(t-1)` are randomly chosen
//! coefficients. Each share corresponds to a point `(x, f(x))` on this
//! polynomial, with `x` a nonzero field element unique to the participant.
//! With at least `t` points, the polynomial and hence the secret can be
//! reconstructed using Lagrange interpolation at zero.
//!
//! All arithmetic happens in the Galois field GF(2^8) used by AES, which is
//! convenient for byte-oriented computation: each secret byte is shared
//! independently, and a participant's share is the byte-wise collection of
//! polynomial values at its coordinate, with the coordinate appended as the
//! final byte.
//!
//! ### Proactive Secret Sharing
//!
//! Over time, the shares of a secret can be refreshed without changing the
//! secret itself. This is achieved by generating polynomials with a zero
//! constant term and adding their values to the dealt shares, moving every
//! participant onto a new random polynomial with the same intercept.
//!
//! ## Example: Splitting and Recovering a Secret
//!
//! ```rust
//! use keyshard::sss::{combine_shares, split_secret};
//!
//! let shares = split_secret(b"my deepest secret", 3, 5).unwrap();
//!
//! // any 3 of the 5 shares rebuild the secret
//! let subset = vec![shares[4].clone(), shares[0].clone(), shares[2].clone()];
//! assert_eq!(combine_shares(&subset).unwrap(), b"my deepest secret");
//! ```
//!
//! ## Example: Refreshing Shares
//!
//! ```rust
//! use keyshard::sss::{combine_shares, refresh_shares, split_secret};
//!
//! let mut shares = split_secret(b"rotate me", 2, 4).unwrap();
//! refresh_shares(&mut shares, 2).unwrap();
//!
//! // the shares changed, the secret did not
//! assert_eq!(combine_shares(&shares).unwrap(), b"rotate me");
//! ```

/// The `error` module defines the error kinds surfaced by every fallible
/// operation in the crate. Bad input is always reported as a value, never by
/// terminating the host process.
pub mod error;

/// The `gf256` module implements arithmetic over the Galois field GF(2^8)
/// with process-wide logarithm/antilogarithm tables. Every other module's
/// correctness reduces to this one being bit-exact.
pub mod gf256;

/// The `polynomial` module provides random polynomial generation, Horner
/// evaluation and Lagrange interpolation over GF(2^8), the algebra that
/// sharing and recovery are built from.
pub mod polynomial;

/// The `random` module supplies cryptographically secure random bytes and
/// the uniform selection of distinct participant coordinates.
pub mod random;

/// The `sss` (Shamir's Secret Sharing) module orchestrates splitting,
/// recovery and proactive refresh over the share matrix.
pub mod sss;

pub use error::Error;
