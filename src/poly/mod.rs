//! Polynomials over a finite field
//!
//! [`Poly`] is an immutable value holding its coefficients highest degree
//! first, with leading zeros stripped. The zero polynomial is stored as a
//! single zero coefficient and has no degree.
//!
//! All binary operations check that both operands live in the same field and
//! fail with `TypeMismatch` otherwise.

mod berlekamp_massey;
mod irreducible;
mod roots;

pub use berlekamp_massey::berlekamp_massey;
pub use roots::PolyRoot;

use crate::config::ExecutionConfig;
use crate::error::{GaloisError, Result};
use crate::field::bulk::PARALLEL_THRESHOLD;
use crate::field::GaloisField;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Polynomial over a finite field, coefficients in descending degree order
#[derive(Clone)]
pub struct Poly {
    field: Arc<GaloisField>,
    coeffs: Vec<u64>,
}

/// Drop leading zeros, keeping at least one coefficient
fn strip(mut coeffs: Vec<u64>) -> Vec<u64> {
    let first = coeffs.iter().position(|&c| c != 0).unwrap_or(coeffs.len());
    if first == coeffs.len() {
        return vec![0];
    }
    coeffs.drain(..first);
    coeffs
}

/// Convolution of two descending coefficient sequences
pub(crate) fn convolve(field: &GaloisField, a: &[u64], b: &[u64]) -> Vec<u64> {
    if a.is_empty() || b.is_empty() {
        return vec![0];
    }
    let mut out = vec![0u64; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] = field.add(out[i + j], field.mul(x, y));
        }
    }
    out
}

/// Horner evaluation of descending coefficients
#[inline]
pub(crate) fn horner(field: &GaloisField, coeffs: &[u64], x: u64) -> u64 {
    coeffs
        .iter()
        .fold(0, |acc, &c| field.add(field.mul(acc, x), c))
}

impl Poly {
    /// Build from coefficients, highest degree first
    pub fn new(field: &Arc<GaloisField>, coeffs: impl Into<Vec<u64>>) -> Result<Self> {
        let coeffs = coeffs.into();
        field.validate(&coeffs)?;
        Ok(Self::from_raw(field, coeffs))
    }

    /// Build from coefficients, constant term first
    pub fn from_ascending(field: &Arc<GaloisField>, coeffs: &[u64]) -> Result<Self> {
        let mut descending = coeffs.to_vec();
        descending.reverse();
        Self::new(field, descending)
    }

    /// Internal constructor for coefficients already known to be field elements
    pub(crate) fn from_raw(field: &Arc<GaloisField>, coeffs: Vec<u64>) -> Self {
        Poly {
            field: Arc::clone(field),
            coeffs: strip(coeffs),
        }
    }

    pub fn zero(field: &Arc<GaloisField>) -> Self {
        Self::from_raw(field, vec![0])
    }

    pub fn one(field: &Arc<GaloisField>) -> Self {
        Self::from_raw(field, vec![1])
    }

    /// The polynomial `x`
    pub fn x(field: &Arc<GaloisField>) -> Self {
        Self::from_raw(field, vec![1, 0])
    }

    /// `coeff * x^degree`
    pub fn monomial(field: &Arc<GaloisField>, degree: usize, coeff: u64) -> Result<Self> {
        field.check(coeff)?;
        let mut coeffs = vec![0u64; degree + 1];
        coeffs[0] = coeff;
        Ok(Self::from_raw(field, coeffs))
    }

    /// `(x - r_0)(x - r_1)...(x - r_{n-1})`
    pub fn from_roots(field: &Arc<GaloisField>, roots: &[u64]) -> Result<Self> {
        field.validate(roots)?;
        let mut coeffs = vec![1u64];
        for &r in roots {
            coeffs = convolve(field, &coeffs, &[1, field.neg(r)]);
        }
        Ok(Self::from_raw(field, coeffs))
    }

    /// Decode the integer representation: base-`q` digits are the coefficients
    pub fn from_int(field: &Arc<GaloisField>, mut value: u64) -> Result<Self> {
        let q = field.order();
        let mut coeffs = Vec::new();
        while value > 0 {
            coeffs.push(value % q);
            value /= q;
        }
        coeffs.reverse();
        Ok(Self::from_raw(field, coeffs))
    }

    /// Integer representation; `None` when it does not fit 64 bits
    pub fn to_int(&self) -> Option<u64> {
        let q = self.field.order();
        self.coeffs.iter().try_fold(0u64, |acc, &c| {
            acc.checked_mul(q).and_then(|v| v.checked_add(c))
        })
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// Coefficients, highest degree first
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Coefficients, constant term first
    pub fn ascending_coeffs(&self) -> Vec<u64> {
        self.coeffs.iter().rev().copied().collect()
    }

    /// Degree, or `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        if self.is_zero() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 0
    }

    pub fn leading_coeff(&self) -> u64 {
        self.coeffs[0]
    }

    /// Coefficient of `x^power`
    pub fn coeff(&self, power: usize) -> u64 {
        if power >= self.coeffs.len() {
            0
        } else {
            self.coeffs[self.coeffs.len() - 1 - power]
        }
    }

    pub fn is_monic(&self) -> bool {
        self.leading_coeff() == 1
    }

    fn check_field(&self, other: &Poly) -> Result<()> {
        if Arc::ptr_eq(&self.field, &other.field) {
            return Ok(());
        }
        self.field.check_same(&other.field)
    }

    fn combine(&self, other: &Poly, op: impl Fn(u64, u64) -> u64) -> Result<Poly> {
        self.check_field(other)?;
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .rev()
            .map(|power| op(self.coeff(power), other.coeff(power)))
            .collect();
        Ok(Self::from_raw(&self.field, coeffs))
    }

    pub fn add(&self, other: &Poly) -> Result<Poly> {
        self.combine(other, |a, b| self.field.add(a, b))
    }

    pub fn sub(&self, other: &Poly) -> Result<Poly> {
        self.combine(other, |a, b| self.field.sub(a, b))
    }

    pub fn neg(&self) -> Poly {
        let coeffs = self.coeffs.iter().map(|&c| self.field.neg(c)).collect();
        Self::from_raw(&self.field, coeffs)
    }

    pub fn mul(&self, other: &Poly) -> Result<Poly> {
        self.check_field(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(Self::zero(&self.field));
        }
        Ok(Self::from_raw(
            &self.field,
            convolve(&self.field, &self.coeffs, &other.coeffs),
        ))
    }

    /// Multiply every coefficient by a field element
    pub fn scale(&self, scalar: u64) -> Result<Poly> {
        let coeffs = self.field.scale(&self.coeffs, scalar)?;
        Ok(Self::from_raw(&self.field, coeffs))
    }

    /// Schoolbook long division, returning `(quotient, remainder)`
    pub fn divmod(&self, divisor: &Poly) -> Result<(Poly, Poly)> {
        self.check_field(divisor)?;
        if divisor.is_zero() {
            return Err(GaloisError::DivideByZero);
        }
        let field = &self.field;
        let divisor_len = divisor.coeffs.len();
        if self.coeffs.len() < divisor_len || self.is_zero() {
            return Ok((Self::zero(field), self.clone()));
        }

        let inv_lead = field.reciprocal(divisor.leading_coeff())?;
        let quotient_len = self.coeffs.len() - divisor_len + 1;
        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![0u64; quotient_len];

        for i in 0..quotient_len {
            let coef = field.mul(remainder[i], inv_lead);
            quotient[i] = coef;
            if coef == 0 {
                continue;
            }
            for (j, &d) in divisor.coeffs.iter().enumerate() {
                remainder[i + j] = field.sub(remainder[i + j], field.mul(coef, d));
            }
        }

        let remainder = remainder.split_off(quotient_len);
        Ok((
            Self::from_raw(field, quotient),
            Self::from_raw(field, remainder),
        ))
    }

    pub fn div(&self, divisor: &Poly) -> Result<Poly> {
        Ok(self.divmod(divisor)?.0)
    }

    pub fn rem(&self, divisor: &Poly) -> Result<Poly> {
        Ok(self.divmod(divisor)?.1)
    }

    /// `self^exponent mod modulus` by square-and-multiply
    pub fn pow_mod(&self, mut exponent: u64, modulus: &Poly) -> Result<Poly> {
        self.check_field(modulus)?;
        let mut result = Self::one(&self.field).rem(modulus)?;
        let mut base = self.rem(modulus)?;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(&base)?.rem(modulus)?;
            }
            base = base.mul(&base)?.rem(modulus)?;
            exponent >>= 1;
        }
        Ok(result)
    }

    /// Formal derivative
    ///
    /// The coefficient of `x^(i-1)` is `i * a_i` where `i` is reduced mod the
    /// characteristic, so every term whose power is a multiple of `p` vanishes.
    pub fn derivative(&self) -> Poly {
        let degree = match self.degree() {
            Some(d) if d > 0 => d,
            _ => return Self::zero(&self.field),
        };
        let coeffs = self.coeffs[..degree]
            .iter()
            .enumerate()
            .map(|(i, &c)| self.field.mul(self.field.scalar((degree - i) as u64), c))
            .collect();
        Self::from_raw(&self.field, coeffs)
    }

    /// Horner's rule evaluation at `x`
    pub fn evaluate(&self, x: u64) -> Result<u64> {
        self.field.check(x)?;
        Ok(horner(&self.field, &self.coeffs, x))
    }

    /// Evaluate at many points
    pub fn evaluate_many(&self, xs: &[u64]) -> Result<Vec<u64>> {
        self.evaluate_many_with_config(xs, &ExecutionConfig::default())
    }

    /// Evaluate at many points, splitting large inputs across threads when
    /// the config allows it
    pub fn evaluate_many_with_config(
        &self,
        xs: &[u64],
        config: &ExecutionConfig,
    ) -> Result<Vec<u64>> {
        self.field.validate(xs)?;
        let field = &self.field;
        let coeffs = &self.coeffs;
        if config.parallel && xs.len() >= PARALLEL_THRESHOLD {
            Ok(xs.par_iter().map(|&x| horner(field, coeffs, x)).collect())
        } else {
            Ok(xs.iter().map(|&x| horner(field, coeffs, x)).collect())
        }
    }

    /// Scale so the leading coefficient is one; the zero polynomial is returned as is
    pub fn monic(&self) -> Result<Poly> {
        if self.is_zero() || self.is_monic() {
            return Ok(self.clone());
        }
        self.scale(self.field.reciprocal(self.leading_coeff())?)
    }

    /// Coefficient reversal `x^deg * f(1/x)`
    pub fn reverse(&self) -> Poly {
        let mut coeffs = self.coeffs.clone();
        coeffs.reverse();
        Self::from_raw(&self.field, coeffs)
    }

    /// Monic greatest common divisor; `gcd(0, 0) == 0`
    pub fn gcd(&self, other: &Poly) -> Result<Poly> {
        self.check_field(other)?;
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.rem(&b)?;
            a = b;
            b = r;
        }
        a.monic()
    }

    /// Extended Euclid: `(d, s, t)` with `self * s + other * t == d` and `d` monic
    pub fn egcd(&self, other: &Poly) -> Result<(Poly, Poly, Poly)> {
        self.check_field(other)?;
        let field = &self.field;
        let (mut r0, mut r1) = (self.clone(), other.clone());
        let (mut s0, mut s1) = (Self::one(field), Self::zero(field));
        let (mut t0, mut t1) = (Self::zero(field), Self::one(field));

        while !r1.is_zero() {
            let (q, r) = r0.divmod(&r1)?;
            let s = s0.sub(&q.mul(&s1)?)?;
            let t = t0.sub(&q.mul(&t1)?)?;
            (r0, r1) = (r1, r);
            (s0, s1) = (s1, s);
            (t0, t1) = (t1, t);
        }

        if r0.is_zero() {
            return Ok((r0, s0, t0));
        }
        let scale = field.reciprocal(r0.leading_coeff())?;
        Ok((r0.scale(scale)?, s0.scale(scale)?, t0.scale(scale)?))
    }
}

impl PartialEq for Poly {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
            && (Arc::ptr_eq(&self.field, &other.field) || self.field == other.field)
    }
}

impl Eq for Poly {}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = match self.degree() {
            Some(d) => d,
            None => return write!(f, "0"),
        };
        let mut terms = Vec::new();
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let power = degree - i;
            let coef = if c == 1 && power > 0 {
                String::new()
            } else {
                c.to_string()
            };
            terms.push(match power {
                0 => coef,
                1 => format!("{}x", coef),
                _ => format!("{}x^{}", coef, power),
            });
        }
        write!(f, "{}", terms.join(" + "))
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Poly({}, {})", self, self.field)
    }
}
