//! Root finding by exhaustive search over the multiplicative group
//!
//! Non-zero elements are visited as consecutive powers `alpha^i`, so each
//! root comes out together with its discrete logarithm. Every term
//! `a_j * alpha^(i*j)` is advanced by one multiplication per step (a Chien
//! search), avoiding a full Horner evaluation at every point.

use super::Poly;
use crate::error::{GaloisError, Result};

/// A root of a polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyRoot {
    /// The root as a field element
    pub value: u64,
    /// `i` such that `alpha^i == value`; `None` for the root zero
    pub power: Option<u64>,
}

impl Poly {
    /// Distinct roots in the field, zero first, then in increasing power of alpha
    pub fn roots(&self) -> Result<Vec<PolyRoot>> {
        let degree = match self.degree() {
            Some(d) => d,
            None => {
                return Err(GaloisError::InvalidArgument(
                    "every element is a root of the zero polynomial".into(),
                ))
            }
        };
        let field = &self.field;
        let mut roots = Vec::new();
        if degree == 0 {
            return Ok(roots);
        }
        if self.coeff(0) == 0 {
            roots.push(PolyRoot {
                value: 0,
                power: None,
            });
        }

        // terms[j] holds a_j * alpha^(i*j) for the current i
        let ascending = self.ascending_coeffs();
        let steps: Vec<u64> = (0..ascending.len())
            .map(|j| field.alpha_power(j as u64))
            .collect();
        let mut terms = ascending;

        let group = field.order() - 1;
        let mut value = 1u64;
        for i in 0..group {
            if roots.len() == degree {
                break;
            }
            let sum = terms.iter().fold(0, |acc, &t| field.add(acc, t));
            if sum == 0 {
                roots.push(PolyRoot {
                    value,
                    power: Some(i),
                });
            }
            for (term, &step) in terms.iter_mut().zip(steps.iter()) {
                *term = field.mul(*term, step);
            }
            value = field.mul(value, field.primitive_element());
        }
        Ok(roots)
    }

    /// Distinct roots with their multiplicities
    pub fn roots_with_multiplicity(&self) -> Result<Vec<(PolyRoot, usize)>> {
        let field = &self.field;
        let mut result = Vec::new();
        for root in self.roots()? {
            let linear = Poly::from_raw(field, vec![1, field.neg(root.value)]);
            let mut multiplicity = 0;
            let mut rest = self.clone();
            loop {
                let (quotient, remainder) = rest.divmod(&linear)?;
                if !remainder.is_zero() {
                    break;
                }
                multiplicity += 1;
                rest = quotient;
            }
            result.push((root, multiplicity));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GaloisField;

    #[test]
    fn test_roots_carry_powers() {
        let gf = GaloisField::new(2, 4).unwrap();
        let wanted = [gf.alpha_power(3), gf.alpha_power(7), gf.alpha_power(12)];
        let p = Poly::from_roots(&gf, &wanted).unwrap();
        let roots = p.roots().unwrap();
        let powers: Vec<Option<u64>> = roots.iter().map(|r| r.power).collect();
        assert_eq!(powers, vec![Some(3), Some(7), Some(12)]);
        for r in roots {
            assert_eq!(p.evaluate(r.value).unwrap(), 0);
        }
    }

    #[test]
    fn test_zero_root_and_no_roots() {
        let gf = GaloisField::new(5, 1).unwrap();
        let p = Poly::new(&gf, vec![1, 0, 0]).unwrap(); // x^2
        assert_eq!(p.roots().unwrap(), vec![PolyRoot { value: 0, power: None }]);
        // x^2 + 2 has no roots mod 5
        assert!(Poly::new(&gf, vec![1, 0, 2]).unwrap().roots().unwrap().is_empty());
        assert!(Poly::zero(&gf).roots().is_err());
    }

    #[test]
    fn test_multiplicity() {
        let gf = GaloisField::new(7, 1).unwrap();
        let p = Poly::from_roots(&gf, &[2, 2, 2, 5]).unwrap();
        let result = p.roots_with_multiplicity().unwrap();
        let summary: Vec<(u64, usize)> = result.iter().map(|(r, m)| (r.value, *m)).collect();
        assert!(summary.contains(&(2, 3)));
        assert!(summary.contains(&(5, 1)));
        assert_eq!(summary.len(), 2);
    }
}
