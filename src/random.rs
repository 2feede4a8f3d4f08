//! Cryptographically secure randomness for polynomial coefficients and
//! participant coordinates.
//!
//! Everything here draws from an `RngCore + CryptoRng` source, which in the
//! public entry points is the operating system CSPRNG (`OsRng`). There is
//! deliberately no seeding concept: a coordinate permutation produced from a
//! predictable generator would let an observer correlate shares with
//! participants.

use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};

use crate::error::Error;

/// Fills `buf` with bytes from the secure source.
///
/// # Errors
///
/// Returns [`Error::RandomnessFailure`] if the source cannot supply bytes,
/// for example when the operating system entropy pool is unavailable.
pub fn fill_random<R: RngCore + CryptoRng>(rng: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    rng.try_fill_bytes(buf).map_err(|_| Error::RandomnessFailure)
}

/// Picks `n` distinct nonzero field elements to serve as participant
/// coordinates.
///
/// The selection is the first `n` entries of a uniform Fisher-Yates shuffle
/// of all 255 nonzero elements, so no coordinate value is more likely than
/// any other and no coordinate repeats within one call. Zero is excluded
/// because a polynomial evaluated at zero is the secret itself.
///
/// # Errors
///
/// Returns [`Error::InvalidParticipantCount`] if `n` is zero or exceeds the
/// 255 nonzero elements of GF(2^8).
pub fn pick_coordinates<R: RngCore + CryptoRng>(n: usize, rng: &mut R) -> Result<Vec<u8>, Error> {
    if n < 1 || n > 255 {
        return Err(Error::InvalidParticipantCount);
    }
    let mut pool: Vec<u8> = (1..=255).collect();
    pool.shuffle(rng);
    pool.truncate(n);
    Ok(pool)
}
