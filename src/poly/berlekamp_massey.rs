//! Berlekamp–Massey algorithm over GF(q)

use super::Poly;
use crate::error::Result;
use crate::field::GaloisField;
use log::trace;
use std::sync::Arc;

/// Shortest linear recurrence generating `sequence`
///
/// Returns the connection polynomial `C(x) = 1 + c_1 x + ... + c_L x^L` such
/// that `s_n + c_1 s_{n-1} + ... + c_L s_{n-L} == 0` for every `n >= L`.
/// Applied to Reed–Solomon syndromes this is the error-locator polynomial.
pub fn berlekamp_massey(field: &Arc<GaloisField>, sequence: &[u64]) -> Result<Poly> {
    field.validate(sequence)?;

    // Ascending coefficient vectors
    let mut c = vec![1u64];
    let mut b = vec![1u64];
    let mut length = 0usize;
    let mut shift = 1usize;
    let mut last_discrepancy = 1u64;

    for n in 0..sequence.len() {
        let mut discrepancy = sequence[n];
        for i in 1..=length.min(c.len() - 1) {
            discrepancy = field.add(discrepancy, field.mul(c[i], sequence[n - i]));
        }

        if discrepancy == 0 {
            shift += 1;
            continue;
        }

        let factor = field.div(discrepancy, last_discrepancy)?;
        let previous = c.clone();
        if c.len() < b.len() + shift {
            c.resize(b.len() + shift, 0);
        }
        for (i, &bi) in b.iter().enumerate() {
            c[i + shift] = field.sub(c[i + shift], field.mul(factor, bi));
        }

        if 2 * length <= n {
            length = n + 1 - length;
            b = previous;
            last_discrepancy = discrepancy;
            shift = 1;
        } else {
            shift += 1;
        }
    }

    c.truncate(length + 1);
    c.resize(length + 1, 0);
    trace!("Berlekamp-Massey: linear complexity {}, C(x) = {:?}", length, c);
    Poly::from_ascending(field, &c)
}
