//! Syndrome decoding of a single Reed-Solomon codeword
//!
//! With `X_l = alpha^(j_l)` the locator of an error of value `e_l` at power
//! `j_l`, the syndromes are `S_i = sum_l e_l X_l^(c+i)` for `i = 0..2t`.
//!
//! 1. Berlekamp-Massey on `S` gives the error locator
//!    `sigma(x) = prod_l (1 - X_l x)`, of degree `v`.
//! 2. Berlekamp-Massey on the reversed syndromes gives `prod_l (1 - X_l^-1 x)`,
//!    whose roots are the locators `X_l` themselves. The Chien search in
//!    [`Poly::roots`] reports each root with its power `j_l`.
//! 3. Forney: `Omega(x) = S(x) sigma(x) mod x^v` and
//!    `e_l = -X_l^(1-c) Omega(X_l^-1) / sigma'(X_l^-1)`.
//!
//! Power `j` is codeword index `n - 1 - j`. A pattern is only accepted when
//! it reproduces all `2t` syndromes.

use super::reed_solomon::ErrorCount;
use crate::error::Result;
use crate::field::GaloisField;
use crate::poly::{berlekamp_massey, Poly};
use log::trace;
use std::sync::Arc;

/// Correct `codeword` in place from its `syndrome`
///
/// The codeword is left untouched when the error pattern is uncorrectable.
pub(crate) fn correct_errors(
    field: &Arc<GaloisField>,
    codeword: &mut [u64],
    syndrome: &[u64],
    t: usize,
    c: usize,
) -> ErrorCount {
    if syndrome.iter().all(|&s| s == 0) {
        return ErrorCount::Corrected(0);
    }
    match locate_and_evaluate(field, codeword.len(), syndrome, t, c) {
        Ok(Some(corrections)) => {
            for &(index, value) in &corrections {
                codeword[index] = field.sub(codeword[index], value);
            }
            ErrorCount::Corrected(corrections.len())
        }
        Ok(None) => ErrorCount::Uncorrectable,
        Err(e) => {
            trace!("Decoding failed: {}", e);
            ErrorCount::Uncorrectable
        }
    }
}

/// `(index, error value)` pairs, or `None` when there are more than `t` errors
fn locate_and_evaluate(
    field: &Arc<GaloisField>,
    n: usize,
    syndrome: &[u64],
    t: usize,
    c: usize,
) -> Result<Option<Vec<(usize, u64)>>> {
    let sigma = berlekamp_massey(field, syndrome)?;
    let v = sigma.degree().unwrap_or(0);
    if v == 0 || v > t {
        trace!("Error locator degree {} exceeds capability {}", v, t);
        return Ok(None);
    }

    let reversed: Vec<u64> = syndrome.iter().rev().copied().collect();
    let sigma_rev = berlekamp_massey(field, &reversed)?;
    if sigma_rev.degree() != Some(v) {
        trace!(
            "Reversed locator degree {:?} differs from {}",
            sigma_rev.degree(),
            v
        );
        return Ok(None);
    }

    let roots = sigma_rev.roots()?;
    if roots.len() != v {
        trace!("Error locator has {} roots, expected {}", roots.len(), v);
        return Ok(None);
    }

    // Omega(x) = S(x) sigma(x) mod x^v, ascending
    let sigma_asc = sigma.ascending_coeffs();
    let omega_asc: Vec<u64> = (0..v)
        .map(|i| {
            (0..=i.min(sigma_asc.len() - 1)).fold(0, |acc, j| {
                field.add(acc, field.mul(syndrome[i - j], sigma_asc[j]))
            })
        })
        .collect();
    let omega = Poly::from_ascending(field, &omega_asc)?;
    let sigma_prime = sigma.derivative();

    let mut corrections = Vec::with_capacity(v);
    for root in roots {
        let power = match root.power {
            Some(power) if (power as usize) < n => power,
            _ => return Ok(None),
        };
        let locator = root.value;
        let locator_inv = field.reciprocal(locator)?;
        let denominator = sigma_prime.evaluate(locator_inv)?;
        if denominator == 0 {
            return Ok(None);
        }
        let numerator = omega.evaluate(locator_inv)?;
        let factor = field.power(locator, 1 - c as i64)?;
        let magnitude = field.neg(field.mul(factor, field.div(numerator, denominator)?));
        corrections.push((n - 1 - power as usize, locator, magnitude));
    }

    if corrections.iter().any(|&(_, _, e)| e == 0) {
        return Ok(None);
    }
    // The error pattern must reproduce every syndrome
    for (i, &s) in syndrome.iter().enumerate() {
        let mut expected = 0;
        for &(_, locator, magnitude) in &corrections {
            let term = field.mul(magnitude, field.power(locator, (c + i) as i64)?);
            expected = field.add(expected, term);
        }
        if expected != s {
            trace!("Error pattern disagrees with syndrome {}", i);
            return Ok(None);
        }
    }
    Ok(Some(
        corrections
            .into_iter()
            .map(|(index, _, magnitude)| (index, magnitude))
            .collect(),
    ))
}
