//! Arithmetic over the Galois field GF(2^8).
//!
//! This is the field used by AES: bytes are polynomials over GF(2) reduced
//! modulo the irreducible polynomial x^8 + x^4 + x^3 + x + 1 (0x11B).
//! Addition is XOR. Multiplication, division and inversion go through
//! logarithm/antilogarithm tables keyed to the generator 0x03, built once per
//! process and immutable afterwards, so every operation is a table lookup
//! with no secret-dependent branching beyond the unavoidable zero checks.

use lazy_static::lazy_static;
use zeroize::Zeroize;

use crate::error::Error;

/// An element of GF(2^8), wrapping a single byte.
///
/// The wrapper keeps field arithmetic distinct from ordinary integer
/// arithmetic: `+` and `*` on `Gf256` are the field operations, never the
/// wrapping byte ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Zeroize)]
#[repr(transparent)]
pub struct Gf256(pub u8);

/// Low byte of the AES reduction polynomial 0x11B.
const REDUCTION_POLY: u8 = 0x1b;

struct Tables {
    log: [u8; 256],
    exp: [u8; 256],
}

impl Tables {
    /// Walks the powers of the generator 0x03, which cycles through every
    /// nonzero field element exactly once over 255 steps.
    fn build() -> Self {
        let mut log = [0u8; 256];
        let mut exp = [0u8; 256];

        let mut value: u8 = 1;
        for power in 0..255 {
            exp[power] = value;
            log[value as usize] = power as u8;
            // multiply by the generator: 3x = 2x + x
            let doubled = (value << 1) ^ (((value >> 7) & 1) * REDUCTION_POLY);
            value = doubled ^ value;
        }
        // g^255 wraps back to g^0; the slot is never indexed but keeping the
        // cycle closed makes the table self-consistent.
        exp[255] = exp[0];

        Tables { log, exp }
    }
}

lazy_static! {
    // Built on first use, read-only afterwards. Concurrent first access is
    // serialized by lazy_static, so the tables initialize exactly once.
    static ref TABLES: Tables = Tables::build();
}

impl Gf256 {
    /// The additive identity.
    pub const ZERO: Gf256 = Gf256(0);

    /// The multiplicative identity.
    pub const ONE: Gf256 = Gf256(1);

    /// Wraps a byte as a field element. Every byte value is a valid element.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Gf256(value)
    }

    /// Computes the multiplicative inverse, satisfying `a * a.inverse() == 1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivideByZero`] for the additive identity, which has
    /// no inverse.
    pub fn inverse(self) -> Result<Gf256, Error> {
        if self.0 == 0 {
            return Err(Error::DivideByZero);
        }
        let tables = &*TABLES;
        let log = tables.log[self.0 as usize] as u16;
        Ok(Gf256(tables.exp[((255 - log) % 255) as usize]))
    }

    /// Divides `self` by `rhs` as `self * rhs.inverse()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivideByZero`] when `rhs` is the additive identity.
    pub fn checked_div(self, rhs: Gf256) -> Result<Gf256, Error> {
        if rhs.0 == 0 {
            return Err(Error::DivideByZero);
        }
        if self.0 == 0 {
            return Ok(Gf256::ZERO);
        }
        let tables = &*TABLES;
        let log_a = tables.log[self.0 as usize] as u16;
        let log_b = tables.log[rhs.0 as usize] as u16;
        Ok(Gf256(tables.exp[((log_a + 255 - log_b) % 255) as usize]))
    }
}

impl From<u8> for Gf256 {
    #[inline]
    fn from(value: u8) -> Self {
        Gf256(value)
    }
}

impl From<Gf256> for u8 {
    #[inline]
    fn from(element: Gf256) -> u8 {
        element.0
    }
}

/// Field addition is bitwise XOR and therefore self-inverse: `a + a == 0`.
impl std::ops::Add for Gf256 {
    type Output = Gf256;

    #[inline]
    fn add(self, rhs: Gf256) -> Gf256 {
        Gf256(self.0 ^ rhs.0)
    }
}

impl std::ops::AddAssign for Gf256 {
    #[inline]
    fn add_assign(&mut self, rhs: Gf256) {
        *self = *self + rhs;
    }
}

/// Field multiplication via the log/antilog tables:
/// `a * b = g^(log(a) + log(b))` for nonzero operands.
impl std::ops::Mul for Gf256 {
    type Output = Gf256;

    #[inline]
    fn mul(self, rhs: Gf256) -> Gf256 {
        if self.0 == 0 || rhs.0 == 0 {
            return Gf256::ZERO;
        }
        let tables = &*TABLES;
        let log_a = tables.log[self.0 as usize] as u16;
        let log_b = tables.log[rhs.0 as usize] as u16;
        Gf256(tables.exp[((log_a + log_b) % 255) as usize])
    }
}

impl std::ops::MulAssign for Gf256 {
    #[inline]
    fn mul_assign(&mut self, rhs: Gf256) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_is_xor() {
        assert_eq!(Gf256(0x01) + Gf256(0x01), Gf256(0x00));
        assert_eq!(Gf256(0x80) + Gf256(0x7f), Gf256(0xff));
    }

    #[test]
    fn addition_axioms() {
        for a in 0..=255u8 {
            let a = Gf256(a);
            assert_eq!(a + Gf256::ZERO, a);
            assert_eq!(a + a, Gf256::ZERO);
            for b in 0..=255u8 {
                let b = Gf256(b);
                assert_eq!(a + b, b + a);
            }
        }
    }

    #[test]
    fn multiplication_known_values() {
        // AES reference vectors for the 0x11B field.
        assert_eq!(Gf256(0x02) * Gf256(0x03), Gf256(0x06));
        assert_eq!(Gf256(0x02) * Gf256(0x1b), Gf256(0x36));
        assert_eq!(Gf256(0x57) * Gf256(0x83), Gf256(0xc1));
        assert_eq!(Gf256(0x00) * Gf256(0xff), Gf256(0x00));
        assert_eq!(Gf256(0xff) * Gf256(0x00), Gf256(0x00));
    }

    #[test]
    fn multiplication_identity_and_commutativity() {
        for a in 0..=255u8 {
            let a = Gf256(a);
            assert_eq!(a * Gf256::ONE, a);
            assert_eq!(Gf256::ONE * a, a);
            for b in 0..=255u8 {
                let b = Gf256(b);
                assert_eq!(a * b, b * a);
            }
        }
    }

    #[test]
    fn multiplication_associativity_and_distributivity() {
        // sampled across the byte range; exhausting all triples is slow in
        // debug builds without telling us anything more
        let samples: Vec<Gf256> = (0..=255u8).step_by(7).map(Gf256).collect();
        for &a in &samples {
            for &b in &samples {
                for &c in &samples {
                    assert_eq!((a * b) * c, a * (b * c));
                    assert_eq!(a * (b + c), a * b + a * c);
                }
            }
        }
    }

    #[test]
    fn inverse_exhaustive() {
        for a in 1..=255u8 {
            let a = Gf256(a);
            let inv = a.inverse().unwrap();
            assert_eq!(a * inv, Gf256::ONE, "inverse failed for {:#04x}", a.0);
        }
    }

    #[test]
    fn inverse_known_values() {
        assert_eq!(Gf256(0x01).inverse().unwrap(), Gf256(0x01));
        // inverse pair straight out of the AES S-box derivation
        assert_eq!(Gf256(0x53).inverse().unwrap(), Gf256(0xca));
        assert_eq!(Gf256(0x00).inverse(), Err(Error::DivideByZero));
    }

    #[test]
    fn division() {
        assert_eq!(Gf256(0x02).checked_div(Gf256(0x00)), Err(Error::DivideByZero));
        assert_eq!(Gf256(0x00).checked_div(Gf256(0x07)), Ok(Gf256(0x00)));
        for a in 1..=255u8 {
            for b in 1..=255u8 {
                let quotient = Gf256(a).checked_div(Gf256(b)).unwrap();
                assert_eq!(quotient * Gf256(b), Gf256(a));
            }
        }
    }

    #[test]
    fn generator_table_spot_checks() {
        // powers of the generator 0x03: g^0 = 1, g^1 = 3, g^2 = 5
        assert_eq!(Gf256(0x03) * Gf256::ONE, Gf256(0x03));
        assert_eq!(Gf256(0x03) * Gf256(0x03), Gf256(0x05));
    }
}
