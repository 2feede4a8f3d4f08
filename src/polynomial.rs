use core::fmt;

use rand::{CryptoRng, RngCore};
use serde::{
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;
use crate::gf256::Gf256;
use crate::random::fill_random;

/// Represents a polynomial over the Galois field GF(2^8).
///
/// Each polynomial is represented by its coefficients, stored in a vector.
/// Index 0 is the intercept, the value the polynomial takes at zero; in a
/// sharing scheme that is the byte being protected, so the whole coefficient
/// vector is sensitive and is zeroed when the polynomial is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
    /// The coefficients of the polynomial, where each coefficient is an
    /// element of GF(2^8).
    pub coefficients: Vec<Gf256>,
}

impl Polynomial {
    /// Constructs a polynomial of the given degree whose constant term is
    /// `intercept` and whose higher coefficients are drawn independently and
    /// uniformly from the secure randomness source.
    ///
    /// # Arguments
    ///
    /// * `degree` - The degree of the polynomial; in a (k,n) scheme this is
    ///   `k - 1`, giving `k` coefficients.
    /// * `intercept` - The constant term, the value protected by the scheme.
    /// * `rng` - The cryptographically secure source to draw coefficients from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomnessFailure`] if the source cannot supply bytes.
    pub fn random<R: RngCore + CryptoRng>(
        degree: usize,
        intercept: Gf256,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut bytes = vec![0u8; degree + 1];
        fill_random(rng, &mut bytes[1..])?;

        let mut coefficients: Vec<Gf256> = bytes.iter().map(|&b| Gf256::new(b)).collect();
        coefficients[0] = intercept;
        bytes.zeroize();

        Ok(Polynomial { coefficients })
    }

    /// Evaluates the polynomial at a given point using Horner's method,
    /// accumulating from the highest-degree coefficient downward.
    ///
    /// At `x = 0` the result is exactly the intercept; the early return makes
    /// that guarantee direct instead of relying on every higher-degree term
    /// vanishing through the multiply steps.
    ///
    /// # Arguments
    ///
    /// * `x` - The point at which to evaluate the polynomial.
    ///
    /// # Returns
    ///
    /// The value of the polynomial at point `x`.
    pub fn evaluate(&self, x: Gf256) -> Gf256 {
        if self.coefficients.is_empty() {
            return Gf256::ZERO;
        }
        if x == Gf256::ZERO {
            return self.coefficients[0];
        }

        let mut value = Gf256::ZERO;
        for &coefficient in self.coefficients.iter().rev() {
            value = coefficient + value * x;
        }
        value
    }

    /// Number of coefficients, one more than the degree.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// True for the zero-coefficient polynomial.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Evaluates at `z` the unique polynomial of degree `k - 1` passing through
/// the `k` supplied `(coordinate, value)` pairs, using Lagrange
/// interpolation.
///
/// Each basis term accumulates the product over all other points of
/// `(z + x[j]) / (x[i] + x[j])`; the running product starts from the
/// multiplicative identity. The field has characteristic 2, so the
/// subtractions of the textbook formula are the same operation as addition.
///
/// # Arguments
///
/// * `coordinates` - The x value of each sample point.
/// * `values` - The corresponding y values, in the same order.
/// * `z` - The point to evaluate at; zero recovers the intercept.
///
/// # Errors
///
/// * [`Error::InconsistentInputLengths`] if the two slices differ in length.
/// * [`Error::DuplicateCoordinate`] if any two coordinates are equal, which
///   would make a basis denominator zero.
pub fn interpolate(coordinates: &[Gf256], values: &[Gf256], z: Gf256) -> Result<Gf256, Error> {
    if coordinates.len() != values.len() {
        return Err(Error::InconsistentInputLengths);
    }
    for (i, &x) in coordinates.iter().enumerate() {
        if coordinates[i + 1..].contains(&x) {
            return Err(Error::DuplicateCoordinate);
        }
    }

    let mut value = Gf256::ZERO;
    for (i, (&x_i, &y_i)) in coordinates.iter().zip(values.iter()).enumerate() {
        let mut basis = Gf256::ONE;
        for (j, &x_j) in coordinates.iter().enumerate() {
            if i != j {
                basis *= (z + x_j).checked_div(x_i + x_j)?;
            }
        }
        value += basis * y_i;
    }
    Ok(value)
}

/// Implements serialization for `Polynomial` as a sequence of bytes, the
/// format in which refresh keys are handed to custodians.
impl Serialize for Polynomial {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.coefficients.len()))?;
        for &coefficient in &self.coefficients {
            seq.serialize_element(&u8::from(coefficient))?;
        }
        seq.end()
    }
}

/// Implements deserialization for `Polynomial` from a sequence of bytes.
impl<'de> Deserialize<'de> for Polynomial {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PolynomialVisitor;

        impl<'de> Visitor<'de> for PolynomialVisitor {
            type Value = Polynomial;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of bytes representing polynomial coefficients")
            }

            fn visit_seq<V>(self, mut seq: V) -> Result<Polynomial, V::Error>
            where
                V: SeqAccess<'de>,
            {
                let mut coefficients = Vec::new();
                while let Some(byte) = seq.next_element::<u8>()? {
                    coefficients.push(Gf256::new(byte));
                }
                Ok(Polynomial { coefficients })
            }
        }

        deserializer.deserialize_seq(PolynomialVisitor)
    }
}
