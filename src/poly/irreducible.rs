//! Irreducibility and primitivity tests

use super::Poly;
use crate::error::{GaloisError, Result};
use crate::field::primes::{checked_pow, prime_factors};

impl Poly {
    /// Rabin's irreducibility test
    ///
    /// `f` of degree `d` over GF(q) is irreducible iff `x^(q^d) == x mod f` and
    /// `gcd(x^(q^(d/r)) - x, f) == 1` for every prime `r` dividing `d`.
    pub fn is_irreducible(&self) -> Result<bool> {
        let degree = match self.degree() {
            None | Some(0) => return Ok(false),
            Some(1) => return Ok(true),
            Some(d) => d,
        };
        let f = self.monic()?;
        let field = &self.field;
        let q = field.order();
        let x = Poly::x(field);

        // frobenius[k] = x^(q^k) mod f
        let mut frobenius = Vec::with_capacity(degree + 1);
        frobenius.push(x.rem(&f)?);
        for k in 1..=degree {
            let next = frobenius[k - 1].pow_mod(q, &f)?;
            frobenius.push(next);
        }

        if frobenius[degree] != x.rem(&f)? {
            return Ok(false);
        }
        for r in prime_factors(degree as u64) {
            let h = frobenius[degree / r as usize].sub(&x)?;
            if h.gcd(&f)?.degree() != Some(0) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Irreducible and `x` generates the multiplicative group of GF(q)[x]/(f)
    pub fn is_primitive(&self) -> Result<bool> {
        if !self.is_irreducible()? {
            return Ok(false);
        }
        let degree = self.degree().unwrap_or(0) as u32;
        let field = &self.field;
        let extension_order = checked_pow(field.order(), degree).ok_or_else(|| {
            GaloisError::InvalidArgument(format!(
                "GF({}^{}) is too large to test primitivity",
                field.order(),
                degree
            ))
        })?;
        let f = self.monic()?;
        let x = Poly::x(field);
        let one = Poly::one(field);
        let group = extension_order - 1;

        if x.pow_mod(group, &f)? != one {
            return Ok(false);
        }
        for r in prime_factors(group) {
            if x.pow_mod(group / r, &f)? == one {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
