//! Finite field GF(p^m) arithmetic
//!
//! ## Representation
//!
//! A [`GaloisField`] is an immutable field context built once and shared
//! through an [`Arc`]. Elements are plain `u64` integers in `[0, q)`:
//!
//! - for prime fields (`m == 1`) the integer is the residue mod `p`
//! - for extension fields the base-`p` digits of the integer are the
//!   coefficients of a polynomial over GF(p) of degree `< m`, reduced modulo
//!   the field's irreducible polynomial
//!
//! Irreducible polynomials use the same integer form including the leading
//! term, so `x^8 + x^4 + x^3 + x^2 + 1` over GF(2) is `0x11D`.
//!
//! ## Defaults
//!
//! Without an explicit polynomial the lexicographically smallest monic
//! primitive polynomial of degree `m` is used (`0x13` for GF(2^4), `0x11D` for
//! GF(2^8)). The default primitive element is the smallest integer that
//! generates the multiplicative group.
//!
//! ## Arithmetic modes
//!
//! Fields up to [`LOOKUP_LIMIT`] elements use log/antilog tables, larger ones
//! compute products directly. Both produce identical results.

pub mod bulk;
pub mod dtype;
mod kernel;
pub mod primes;
mod tables;

pub use bulk::{BinaryOp, UnaryOp};
pub use dtype::Dtype;

use crate::error::{GaloisError, Result};
use crate::poly::Poly;
use kernel::Kernel;
use log::debug;
use primes::{checked_pow, is_prime, prime_factors, prime_power};
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use tables::LogTables;

/// Largest supported field order; elements fit 32 bits and products fit 64
pub const MAX_ORDER: u64 = 1 << 32;

/// Largest order for which lookup tables are built by default
pub const LOOKUP_LIMIT: u64 = 1 << 20;

/// How multiplication, reciprocal and power are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticMode {
    /// Log/antilog table lookups
    Lookup,
    /// Direct polynomial arithmetic modulo the irreducible polynomial
    Calculate,
}

impl fmt::Display for ArithmeticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticMode::Lookup => write!(f, "lookup"),
            ArithmeticMode::Calculate => write!(f, "calculate"),
        }
    }
}

/// Immutable description of GF(p^m) together with its arithmetic
pub struct GaloisField {
    characteristic: u64,
    degree: u32,
    order: u64,
    irreducible_poly: u64,
    primitive_element: u64,
    mode: ArithmeticMode,
    dtype: Dtype,
    group_factors: Vec<u64>,
    kernel: Kernel,
    tables: Option<LogTables>,
}

/// Builder for [`GaloisField`] with optional polynomial, primitive element and mode
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    characteristic: u64,
    degree: u32,
    irreducible_poly: Option<u64>,
    primitive_element: Option<u64>,
    mode: Option<ArithmeticMode>,
}

impl FieldBuilder {
    pub fn new(characteristic: u64, degree: u32) -> Self {
        Self {
            characteristic,
            degree,
            irreducible_poly: None,
            primitive_element: None,
            mode: None,
        }
    }

    /// Irreducible polynomial in integer form, leading term included
    pub fn irreducible_poly(mut self, poly: u64) -> Self {
        self.irreducible_poly = Some(poly);
        self
    }

    /// Irreducible polynomial as coefficients over GF(p), highest degree first
    pub fn irreducible_coeffs(mut self, coeffs: &[u64]) -> Result<Self> {
        let p = self.characteristic;
        let mut value = 0u64;
        for &c in coeffs {
            if c >= p {
                return Err(GaloisError::InvalidElement { value: c, order: p });
            }
            value = value
                .checked_mul(p)
                .and_then(|v| v.checked_add(c))
                .ok_or_else(|| {
                    GaloisError::InvalidParameters("irreducible polynomial is too large".into())
                })?;
        }
        self.irreducible_poly = Some(value);
        Ok(self)
    }

    pub fn primitive_element(mut self, element: u64) -> Self {
        self.primitive_element = Some(element);
        self
    }

    pub fn mode(mut self, mode: ArithmeticMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<Arc<GaloisField>> {
        let p = self.characteristic;
        let m = self.degree;
        if m == 0 {
            return Err(GaloisError::InvalidParameters(
                "degree must be at least 1".into(),
            ));
        }
        let order = match checked_pow(p, m) {
            Some(q) if q <= MAX_ORDER => q,
            _ => {
                return Err(GaloisError::InvalidParameters(format!(
                    "GF({}^{}) exceeds the supported order {}",
                    p, m, MAX_ORDER
                )))
            }
        };
        if !is_prime(p) {
            return Err(GaloisError::InvalidParameters(format!(
                "characteristic must be prime, not {}",
                p
            )));
        }
        let group_factors = prime_factors(order - 1);

        let irreducible_poly = match self.irreducible_poly {
            Some(poly) => {
                validate_irreducible(p, m, order, poly)?;
                poly
            }
            None if m == 1 => 0, // filled in from the primitive element below
            None => default_primitive_poly(p, m, order, &group_factors)?,
        };

        let kernel = Kernel::new(p, m, if m == 1 { p } else { irreducible_poly });

        let primitive_element = match self.primitive_element {
            Some(alpha) => {
                if alpha >= order || !kernel.generates_group(alpha, &group_factors) {
                    return Err(GaloisError::InvalidParameters(format!(
                        "{} is not a primitive element of GF({})",
                        alpha, order
                    )));
                }
                alpha
            }
            None => (1..order)
                .find(|&a| kernel.generates_group(a, &group_factors))
                .ok_or_else(|| {
                    GaloisError::InvalidParameters(format!(
                        "GF({}) has no primitive element under the given polynomial",
                        order
                    ))
                })?,
        };

        // Prime fields report x - alpha as their defining polynomial
        let irreducible_poly = if m == 1 && self.irreducible_poly.is_none() {
            p + (p - primitive_element) % p
        } else {
            irreducible_poly
        };

        let mode = self.mode.unwrap_or(if order <= LOOKUP_LIMIT {
            ArithmeticMode::Lookup
        } else {
            ArithmeticMode::Calculate
        });
        let tables = match mode {
            ArithmeticMode::Lookup => Some(LogTables::new(&kernel, primitive_element)),
            ArithmeticMode::Calculate => None,
        };

        debug!(
            "Built GF({}^{}) with irreducible poly {:#x}, primitive element {}, {} mode",
            p, m, irreducible_poly, primitive_element, mode
        );

        Ok(Arc::new(GaloisField {
            characteristic: p,
            degree: m,
            order,
            irreducible_poly,
            primitive_element,
            mode,
            dtype: Dtype::for_order(order),
            group_factors,
            kernel,
            tables,
        }))
    }
}

fn validate_irreducible(p: u64, m: u32, order: u64, poly: u64) -> Result<()> {
    // Monic of degree m means the integer lies in [p^m, 2 p^m)
    if poly < order || poly >= 2 * order {
        return Err(GaloisError::InvalidParameters(format!(
            "irreducible polynomial {:#x} is not monic of degree {}",
            poly, m
        )));
    }
    if m == 1 {
        return Ok(());
    }
    let prime_field = FieldBuilder::new(p, 1)
        .mode(ArithmeticMode::Calculate)
        .build()?;
    let candidate = Poly::from_int(&prime_field, poly)?;
    if !candidate.is_irreducible()? {
        return Err(GaloisError::InvalidParameters(format!(
            "polynomial {} is not irreducible over GF({})",
            candidate, p
        )));
    }
    Ok(())
}

/// Lexicographically smallest monic primitive polynomial of degree `m` over GF(p)
fn default_primitive_poly(p: u64, m: u32, order: u64, group_factors: &[u64]) -> Result<u64> {
    // x has full order modulo f only when f is primitive, so testing the
    // element `p` (the polynomial x) is enough; reducible f fail the test
    // because their unit group is smaller than q - 1.
    (order + 1..2 * order)
        .filter(|candidate| candidate % p != 0)
        .find(|&candidate| Kernel::new(p, m, candidate).generates_group(p, group_factors))
        .ok_or_else(|| {
            GaloisError::InvalidParameters(format!(
                "no primitive polynomial of degree {} over GF({})",
                m, p
            ))
        })
}

impl GaloisField {
    /// GF(p^m) with default polynomial, primitive element and mode
    pub fn new(characteristic: u64, degree: u32) -> Result<Arc<Self>> {
        FieldBuilder::new(characteristic, degree).build()
    }

    /// GF(q) for a prime power `q`
    pub fn from_order(order: u64) -> Result<Arc<Self>> {
        if order > MAX_ORDER {
            return Err(GaloisError::InvalidParameters(format!(
                "GF({}) exceeds the supported order {}",
                order, MAX_ORDER
            )));
        }
        let (p, m) = prime_power(order).ok_or_else(|| {
            GaloisError::InvalidParameters(format!("{} is not a prime power", order))
        })?;
        Self::new(p, m)
    }

    pub fn builder(characteristic: u64, degree: u32) -> FieldBuilder {
        FieldBuilder::new(characteristic, degree)
    }

    pub fn characteristic(&self) -> u64 {
        self.characteristic
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn is_prime_field(&self) -> bool {
        self.degree == 1
    }

    /// Irreducible polynomial in integer form, leading term included
    pub fn irreducible_poly(&self) -> u64 {
        self.irreducible_poly
    }

    /// Irreducible polynomial coefficients over GF(p), highest degree first
    pub fn irreducible_coeffs(&self) -> Vec<u64> {
        let p = self.characteristic;
        let mut value = self.irreducible_poly;
        let mut coeffs = Vec::with_capacity(self.degree as usize + 1);
        for _ in 0..=self.degree {
            coeffs.push(value % p);
            value /= p;
        }
        coeffs.reverse();
        coeffs
    }

    pub fn primitive_element(&self) -> u64 {
        self.primitive_element
    }

    pub fn mode(&self) -> ArithmeticMode {
        self.mode
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn zero(&self) -> u64 {
        0
    }

    pub fn one(&self) -> u64 {
        1
    }

    /// All field elements in integer order
    pub fn elements(&self) -> Range<u64> {
        0..self.order
    }

    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value < self.order
    }

    /// Fail with `InvalidElement` unless `value` lies in `[0, q)`
    #[inline]
    pub fn check(&self, value: u64) -> Result<u64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(GaloisError::InvalidElement {
                value,
                order: self.order,
            })
        }
    }

    /// Fail with `TypeMismatch` unless both contexts describe the same field
    pub fn check_same(&self, other: &GaloisField) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(GaloisError::TypeMismatch {
                left: self.to_string(),
                right: other.to_string(),
            })
        }
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.order && b < self.order);
        self.kernel.add(a, b)
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.order && b < self.order);
        self.kernel.sub(a, b)
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        self.kernel.neg(a)
    }

    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.order && b < self.order);
        match &self.tables {
            Some(tables) => tables.mul(a, b),
            None => self.kernel.mul(a, b),
        }
    }

    /// Multiplicative inverse; `DivideByZero` for zero
    #[inline]
    pub fn reciprocal(&self, a: u64) -> Result<u64> {
        if a == 0 {
            return Err(GaloisError::DivideByZero);
        }
        match &self.tables {
            Some(tables) => Ok(tables.reciprocal(a)),
            None => self.kernel.reciprocal(a).ok_or(GaloisError::DivideByZero),
        }
    }

    #[inline]
    pub fn div(&self, a: u64, b: u64) -> Result<u64> {
        Ok(self.mul(a, self.reciprocal(b)?))
    }

    /// `a^exponent`; negative exponents require `a != 0`
    pub fn power(&self, a: u64, exponent: i64) -> Result<u64> {
        if exponent == 0 {
            return Ok(1);
        }
        if a == 0 {
            return if exponent > 0 {
                Ok(0)
            } else {
                Err(GaloisError::DivideByZero)
            };
        }
        let group = self.order - 1;
        let reduced = (exponent as i128).rem_euclid(group as i128) as u64;
        Ok(match &self.tables {
            Some(tables) => tables.pow(a, reduced),
            None => self.kernel.pow(a, reduced),
        })
    }

    /// `alpha^i` for the field's primitive element
    pub fn alpha_power(&self, exponent: u64) -> u64 {
        match &self.tables {
            Some(tables) => tables.antilog(exponent),
            None => self
                .kernel
                .pow(self.primitive_element, exponent % (self.order - 1)),
        }
    }

    /// Discrete logarithm base the primitive element, in `[0, q - 1)`
    pub fn log(&self, a: u64) -> Result<u64> {
        if a == 0 {
            return Err(GaloisError::InvalidArgument(
                "logarithm of zero is undefined".into(),
            ));
        }
        self.check(a)?;
        if let Some(tables) = &self.tables {
            return Ok(tables.log(a));
        }

        // Baby-step giant-step
        let group = self.order - 1;
        let step = (group as f64).sqrt().ceil() as u64;
        let mut baby: HashMap<u64, u64> = HashMap::default();
        let mut value = 1u64;
        for j in 0..step {
            baby.entry(value).or_insert(j);
            value = self.kernel.mul(value, self.primitive_element);
        }
        let giant = self
            .kernel
            .reciprocal(self.kernel.pow(self.primitive_element, step))
            .ok_or(GaloisError::DivideByZero)?;
        let mut gamma = a;
        for i in 0..step {
            if let Some(&j) = baby.get(&gamma) {
                return Ok((i * step + j) % group);
            }
            gamma = self.kernel.mul(gamma, giant);
        }
        Err(GaloisError::InvalidArgument(format!(
            "{} has no logarithm in GF({})",
            a, self.order
        )))
    }

    /// Smallest `e > 0` with `a^e == 1`
    pub fn multiplicative_order(&self, a: u64) -> Result<u64> {
        if a == 0 {
            return Err(GaloisError::InvalidArgument(
                "zero has no multiplicative order".into(),
            ));
        }
        self.check(a)?;
        let mut order = self.order - 1;
        for &r in &self.group_factors {
            while order % r == 0 && self.kernel.pow(a, order / r) == 1 {
                order /= r;
            }
        }
        Ok(order)
    }

    pub fn is_primitive_element(&self, a: u64) -> bool {
        a != 0 && self.contains(a) && self.kernel.generates_group(a, &self.group_factors)
    }

    /// Integer `n` reduced into the prime subfield, i.e. `1 + 1 + ... + 1`
    #[inline]
    pub fn scalar(&self, n: u64) -> u64 {
        n % self.characteristic
    }
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        self.characteristic == other.characteristic
            && self.degree == other.degree
            && self.irreducible_poly == other.irreducible_poly
            && self.primitive_element == other.primitive_element
    }
}

impl Eq for GaloisField {}

impl fmt::Debug for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GaloisField")
            .field("characteristic", &self.characteristic)
            .field("degree", &self.degree)
            .field("order", &self.order)
            .field("irreducible_poly", &self.irreducible_poly)
            .field("primitive_element", &self.primitive_element)
            .field("mode", &self.mode)
            .field("dtype", &self.dtype)
            .finish()
    }
}

impl fmt::Display for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.degree == 1 {
            write!(f, "GF({})", self.characteristic)
        } else {
            write!(f, "GF({}^{})", self.characteristic, self.degree)
        }
    }
}
