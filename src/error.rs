use thiserror::Error;

/// Errors surfaced by the secret sharing engine and its building blocks.
///
/// Validation always runs before any output is produced, so a returned error
/// guarantees that no partial share matrix or partial secret escaped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The threshold is below 2 or exceeds the number of shares to deal.
    #[error("threshold must be at least 2 and no greater than the number of shares")]
    InvalidThreshold,

    /// The participant count is outside the 2..=255 range supported by GF(2^8).
    #[error("number of shares must be between 2 and 255")]
    InvalidParticipantCount,

    /// The secret to split has zero length.
    #[error("the secret cannot be empty")]
    EmptySecret,

    /// The secure randomness source could not supply bytes.
    #[error("the secure randomness source failed to supply bytes")]
    RandomnessFailure,

    /// Fewer than 2 shares were supplied for recovery.
    #[error("at least 2 shares are required to recover a secret")]
    TooFewShares,

    /// Shares of differing lengths were supplied together.
    #[error("all shares must be the same length")]
    InconsistentShareLengths,

    /// Two shares, or two selected coordinates, carry the same coordinate.
    #[error("shares must carry pairwise distinct coordinates")]
    DuplicateCoordinate,

    /// A field division by the additive identity was attempted.
    #[error("division by zero in GF(2^8)")]
    DivideByZero,

    /// Interpolation was called with differing coordinate and value counts.
    #[error("coordinate and value sequences must be the same length")]
    InconsistentInputLengths,
}
