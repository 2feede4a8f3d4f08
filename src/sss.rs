//! Split, recovery and proactive refresh of secrets shared with Shamir's
//! scheme over GF(2^8).
//!
//! A secret of length `p` split for `n` participants yields a share matrix
//! of `n` rows, each `p + 1` bytes long: positions `0..p` hold the value of
//! a fresh random polynomial evaluated at the participant's coordinate, one
//! polynomial per secret byte, and position `p` holds the coordinate itself.
//! That trailing byte is the only structure a share carries; there is no
//! header, version or length prefix.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::Error;
use crate::gf256::Gf256;
use crate::polynomial::{interpolate, Polynomial};
use crate::random::pick_coordinates;

/// Fewest shares that must be combined to say anything about a secret.
const MIN_THRESHOLD: usize = 2;

/// Fewest participants a secret can be dealt to.
const MIN_SHARES: usize = 2;

/// GF(2^8) has 255 nonzero coordinates, so at most 255 participants.
const MAX_SHARES: usize = 255;

/// Splits a secret into `shares` shares such that any `threshold` of them
/// reconstruct it exactly, while fewer reveal nothing.
///
/// Each byte of the secret is protected by its own random polynomial of
/// degree `threshold - 1` whose intercept is that byte. Every participant is
/// assigned a distinct nonzero coordinate, and receives the polynomial
/// values at that coordinate with the coordinate appended as the final byte.
/// Reusing one coordinate across all byte positions of a participant does
/// not weaken the scheme as long as coordinates differ between participants.
///
/// Note that the share length leaks the secret length; callers with large or
/// length-sensitive secrets should encrypt first and share the key instead.
///
/// # Arguments
///
/// * `secret` - The byte sequence to protect; must be non-empty.
/// * `threshold` - The minimum number of shares needed for recovery.
/// * `shares` - The total number of shares to deal.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] if `threshold` is below 2 or above `shares`.
/// * [`Error::InvalidParticipantCount`] if `shares` is below 2 or above 255.
/// * [`Error::EmptySecret`] if the secret has zero length.
/// * [`Error::RandomnessFailure`] if the system randomness source fails.
///
/// # Examples
///
/// ```rust
/// use keyshard::sss::{combine_shares, split_secret};
///
/// let shares = split_secret(b"hello world", 3, 5).unwrap();
/// assert_eq!(shares.len(), 5);
/// assert_eq!(combine_shares(&shares[..3]).unwrap(), b"hello world");
/// ```
pub fn split_secret(
    secret: &[u8],
    threshold: usize,
    shares: usize,
) -> Result<Vec<Vec<u8>>, Error> {
    split_secret_with_rng(secret, threshold, shares, &mut OsRng)
}

/// Splits a secret using a caller-supplied randomness source.
///
/// The source must be cryptographically secure; the bound exists so a
/// deterministic generator can only be injected deliberately, as tests do
/// with a seeded `StdRng`.
pub fn split_secret_with_rng<R: RngCore + CryptoRng>(
    secret: &[u8],
    threshold: usize,
    shares: usize,
    rng: &mut R,
) -> Result<Vec<Vec<u8>>, Error> {
    if threshold < MIN_THRESHOLD || threshold > shares {
        return Err(Error::InvalidThreshold);
    }
    if shares < MIN_SHARES || shares > MAX_SHARES {
        return Err(Error::InvalidParticipantCount);
    }
    if secret.is_empty() {
        return Err(Error::EmptySecret);
    }

    let coordinates = pick_coordinates(shares, rng)?;
    let mut matrix = vec![vec![0u8; secret.len() + 1]; shares];

    for (j, &chunk) in secret.iter().enumerate() {
        // one fresh polynomial per secret byte, intercept set to the byte;
        // coefficients are wiped when the polynomial drops at end of iteration
        let polynomial = Polynomial::random(threshold - 1, Gf256::new(chunk), rng)?;
        for (i, &x) in coordinates.iter().enumerate() {
            matrix[i][j] = polynomial.evaluate(Gf256::new(x)).into();
        }
    }

    for (i, &x) in coordinates.iter().enumerate() {
        matrix[i][secret.len()] = x;
    }

    Ok(matrix)
}

/// Combines shares using Lagrange interpolation to reconstruct the secret.
///
/// All shares must be the same length and follow the layout produced by
/// [`split_secret`]: value bytes followed by the participant coordinate.
/// Supplying at least as many shares as the split threshold returns the
/// exact secret. Supplying fewer cannot be detected here, because the
/// threshold is not encoded in the shares; the result is then a value with
/// no relation to the secret, not an error.
///
/// # Errors
///
/// * [`Error::TooFewShares`] if fewer than 2 shares are supplied.
/// * [`Error::InconsistentShareLengths`] if the shares differ in length or
///   are too short to contain a secret byte.
/// * [`Error::DuplicateCoordinate`] if two shares carry the same coordinate.
pub fn combine_shares(shares: &[Vec<u8>]) -> Result<Vec<u8>, Error> {
    if shares.len() < MIN_THRESHOLD {
        return Err(Error::TooFewShares);
    }
    let share_length = shares[0].len();
    if shares.iter().any(|share| share.len() != share_length) {
        return Err(Error::InconsistentShareLengths);
    }
    if share_length < 2 {
        return Err(Error::InconsistentShareLengths);
    }

    let coordinates: Vec<Gf256> = shares
        .iter()
        .map(|share| Gf256::new(share[share_length - 1]))
        .collect();
    for (i, &x) in coordinates.iter().enumerate() {
        if coordinates[i + 1..].contains(&x) {
            return Err(Error::DuplicateCoordinate);
        }
    }

    let mut secret = vec![0u8; share_length - 1];
    let mut values = vec![Gf256::ZERO; shares.len()];
    for (j, chunk) in secret.iter_mut().enumerate() {
        for (value, share) in values.iter_mut().zip(shares.iter()) {
            *value = Gf256::new(share[j]);
        }
        // interpolating at zero recovers the intercept, the secret byte
        *chunk = interpolate(&coordinates, &values, Gf256::ZERO)?.into();
    }
    values.zeroize();

    Ok(secret)
}

/// Generates a refresh key: one random polynomial with a zero intercept per
/// secret byte.
///
/// Adding such a polynomial's values to every share moves all shares to a
/// new random polynomial with the same intercept, so the shares change while
/// the secret does not. Shares refreshed with different keys, or a mix of
/// refreshed and stale shares, no longer combine to the secret.
///
/// # Errors
///
/// * [`Error::InvalidThreshold`] if `threshold` is below 2.
/// * [`Error::RandomnessFailure`] if the system randomness source fails.
pub fn generate_refresh_key(
    threshold: usize,
    secret_length: usize,
) -> Result<Vec<Polynomial>, Error> {
    generate_refresh_key_with_rng(threshold, secret_length, &mut OsRng)
}

/// Generates a refresh key using a caller-supplied randomness source.
pub fn generate_refresh_key_with_rng<R: RngCore + CryptoRng>(
    threshold: usize,
    secret_length: usize,
    rng: &mut R,
) -> Result<Vec<Polynomial>, Error> {
    if threshold < MIN_THRESHOLD {
        return Err(Error::InvalidThreshold);
    }
    (0..secret_length)
        .map(|_| Polynomial::random(threshold - 1, Gf256::ZERO, rng))
        .collect()
}

/// Refreshes a single share in place using a previously generated refresh
/// key.
///
/// The share's own trailing coordinate selects where each key polynomial is
/// evaluated, so custodians can refresh independently once they hold the
/// same key.
///
/// # Errors
///
/// * [`Error::InconsistentShareLengths`] if the share length does not equal
///   the key length plus the coordinate byte.
pub fn refresh_share(share: &mut [u8], refresh_key: &[Polynomial]) -> Result<(), Error> {
    if refresh_key.is_empty() || share.len() != refresh_key.len() + 1 {
        return Err(Error::InconsistentShareLengths);
    }

    let x = Gf256::new(share[share.len() - 1]);
    for (chunk, polynomial) in share.iter_mut().zip(refresh_key.iter()) {
        *chunk = (Gf256::new(*chunk) + polynomial.evaluate(x)).into();
    }
    Ok(())
}

/// Refreshes a whole share matrix in place, generating one fresh key and
/// applying it to every share.
///
/// # Errors
///
/// * [`Error::TooFewShares`] if the matrix is empty.
/// * [`Error::InconsistentShareLengths`] if the shares differ in length.
/// * [`Error::InvalidThreshold`] if `threshold` is below 2.
/// * [`Error::RandomnessFailure`] if the system randomness source fails.
pub fn refresh_shares(shares: &mut [Vec<u8>], threshold: usize) -> Result<(), Error> {
    if shares.is_empty() {
        return Err(Error::TooFewShares);
    }
    let share_length = shares[0].len();
    if shares.iter().any(|share| share.len() != share_length) || share_length < 2 {
        return Err(Error::InconsistentShareLengths);
    }

    let refresh_key = generate_refresh_key(threshold, share_length - 1)?;
    for share in shares.iter_mut() {
        refresh_share(share, &refresh_key)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::IteratorRandom;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_split_and_combine_secret() {
        let secret = "test secret";
        let threshold = 3;
        let total_shares = 5;

        let shares = split_secret(secret.as_bytes(), threshold, total_shares).unwrap();
        let recovered = combine_shares(&shares).unwrap();

        assert_eq!(secret.as_bytes(), recovered.as_slice());
    }

    #[test]
    fn test_share_shape_and_coordinates() {
        let secret = b"hel";
        let shares = split_secret(secret, 3, 5).unwrap();

        assert_eq!(shares.len(), 5);
        assert!(shares.iter().all(|share| share.len() == secret.len() + 1));

        let mut coordinates: Vec<u8> = shares.iter().map(|share| share[secret.len()]).collect();
        assert!(coordinates.iter().all(|&x| x != 0));
        coordinates.sort_unstable();
        coordinates.dedup();
        assert_eq!(coordinates.len(), 5);
    }

    #[test]
    fn test_every_threshold_subset_recovers() {
        // 3-of-5 over a 3-byte secret: all ten 3-subsets must agree
        let secret = [0x68u8, 0x65, 0x6c];
        let shares = split_secret(&secret, 3, 5).unwrap();

        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let subset = vec![shares[a].clone(), shares[b].clone(), shares[c].clone()];
                    assert_eq!(combine_shares(&subset).unwrap(), secret);
                }
            }
        }
    }

    #[test]
    fn test_share_subset_combination() {
        let secret = "subset test";
        let threshold = 4;
        let total_shares = 9;

        let shares = split_secret(secret.as_bytes(), threshold, total_shares).unwrap();
        let mut rng = rand::thread_rng();
        let subset: Vec<Vec<u8>> = shares
            .iter()
            .choose_multiple(&mut rng, threshold)
            .into_iter()
            .cloned()
            .collect();

        assert_eq!(combine_shares(&subset).unwrap(), secret.as_bytes());
    }

    #[test]
    fn test_combine_is_order_independent() {
        let secret = b"order independent";
        let shares = split_secret(secret, 3, 6).unwrap();

        let mut subset = vec![shares[0].clone(), shares[2].clone(), shares[4].clone()];
        let forward = combine_shares(&subset).unwrap();
        subset.reverse();
        let backward = combine_shares(&subset).unwrap();
        subset.rotate_left(1);
        let rotated = combine_shares(&subset).unwrap();

        assert_eq!(forward, secret);
        assert_eq!(backward, secret);
        assert_eq!(rotated, secret);
    }

    #[test]
    fn test_round_trips_across_parameter_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(threshold, total) in &[(2, 2), (2, 3), (3, 5), (5, 8), (2, 255), (10, 32)] {
            for secret_length in [1usize, 2, 16, 64] {
                let mut secret = vec![0u8; secret_length];
                rng.fill_bytes(&mut secret);

                let shares =
                    split_secret_with_rng(&secret, threshold, total, &mut rng).unwrap();
                let recovered = combine_shares(&shares[..threshold]).unwrap();
                assert_eq!(recovered, secret);
            }
        }
    }

    #[test]
    fn test_validation_failures() {
        assert_eq!(
            split_secret(b"secret", 1, 5),
            Err(Error::InvalidThreshold)
        );
        assert_eq!(
            split_secret(b"secret", 6, 5),
            Err(Error::InvalidThreshold)
        );
        assert_eq!(
            split_secret(b"secret", 3, 300),
            Err(Error::InvalidParticipantCount)
        );
        assert_eq!(
            split_secret(b"secret", 2, 1),
            Err(Error::InvalidThreshold)
        );
        assert_eq!(split_secret(b"", 3, 5), Err(Error::EmptySecret));

        assert_eq!(
            combine_shares(&[vec![1, 2]]),
            Err(Error::TooFewShares)
        );
        assert_eq!(
            combine_shares(&[vec![1, 2, 3], vec![4, 5]]),
            Err(Error::InconsistentShareLengths)
        );
        assert_eq!(
            combine_shares(&[vec![7, 9], vec![8, 9]]),
            Err(Error::DuplicateCoordinate)
        );
    }

    #[test]
    fn test_under_threshold_yields_unrelated_value() {
        // fixed polynomial f(x) = 0x2a + 0x07*x + 0x13*x^2, threshold 3:
        // shares at coordinates 1 and 2 are 0x3e and 0x68, and interpolating
        // a line through just those two points meets zero at 0x0c, not at
        // the real intercept 0x2a
        let shares = vec![vec![0x3e, 1], vec![0x68, 2]];
        let recovered = combine_shares(&shares).unwrap();

        println!("actual:    2a");
        println!("recovered: {}", hex::encode(&recovered));

        assert_eq!(recovered, vec![0x0c]);
        assert_ne!(recovered, vec![0x2a]);
    }

    #[test]
    fn test_refresh_preserves_the_secret() {
        let secret = "refresh test";
        let threshold = 3;
        let total_shares = 5;

        let mut shares = split_secret(secret.as_bytes(), threshold, total_shares).unwrap();
        let stale = shares.clone();

        refresh_shares(&mut shares, threshold).unwrap();
        assert_ne!(shares, stale);

        let recovered = combine_shares(&shares).unwrap();
        assert_eq!(secret.as_bytes(), recovered.as_slice());
    }

    #[test]
    fn test_refresh_share_end_to_end() {
        let secret = "refresh share end to end";
        let threshold = 3;
        let total_shares = 5;

        let mut shares = split_secret(secret.as_bytes(), threshold, total_shares).unwrap();
        let refresh_key = generate_refresh_key(threshold, secret.len()).unwrap();

        for share in shares.iter_mut() {
            refresh_share(share, &refresh_key).unwrap();
        }

        let recovered = combine_shares(&shares).unwrap();
        assert_eq!(secret.as_bytes(), recovered.as_slice());
    }

    #[test]
    fn test_mixing_stale_and_refreshed_shares_fails_silently() {
        let secret = b"do not mix";
        let threshold = 2;

        let mut shares = split_secret(secret, threshold, 4).unwrap();
        let stale = shares[0].clone();
        refresh_shares(&mut shares, threshold).unwrap();

        let mixed = vec![stale, shares[1].clone()];
        let recovered = combine_shares(&mixed).unwrap();
        assert_ne!(recovered.as_slice(), secret);
    }

    #[test]
    fn test_refresh_key_validation() {
        assert_eq!(
            generate_refresh_key(1, 8),
            Err(Error::InvalidThreshold)
        );

        let refresh_key = generate_refresh_key(3, 4).unwrap();
        assert_eq!(refresh_key.len(), 4);
        assert!(refresh_key
            .iter()
            .all(|polynomial| polynomial.coefficients[0] == Gf256::ZERO));

        let mut short_share = vec![0u8; 3];
        assert_eq!(
            refresh_share(&mut short_share, &refresh_key),
            Err(Error::InconsistentShareLengths)
        );
    }

    #[test]
    fn test_repeated_refresh_with_random_subsets() {
        let secret = b"Remember what the dormouse said.";
        let threshold = 2;
        let total_shares = 5;

        let mut shares = split_secret(secret, threshold, total_shares).unwrap();
        assert_eq!(shares.len(), total_shares);

        refresh_shares(&mut shares, threshold).unwrap();
        refresh_shares(&mut shares, threshold).unwrap();
        refresh_shares(&mut shares, threshold).unwrap();

        let mut rng = rand::thread_rng();
        let subset: Vec<Vec<u8>> = shares
            .iter()
            .choose_multiple(&mut rng, threshold)
            .into_iter()
            .cloned()
            .collect();

        assert_eq!(subset.len(), threshold);
        assert_eq!(combine_shares(&subset).unwrap().as_slice(), secret);
    }
}
