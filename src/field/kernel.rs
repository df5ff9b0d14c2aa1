//! Calculate-mode arithmetic for GF(p^m)
//!
//! Elements are integers in `[0, p^m)`. Their base-`p` digits are the
//! coefficients of a polynomial over GF(p) of degree `< m` (least significant
//! digit is the constant term). Multiplication is polynomial multiplication
//! reduced modulo the irreducible polynomial, which is stored in the same
//! integer form including its leading term (e.g. `x^4 + x + 1` is `0x13`).
//!
//! Three paths are used:
//! - `m == 1`: plain arithmetic mod `p`
//! - `p == 2`: carry-less shift-and-xor multiplication
//! - otherwise: digit vectors with schoolbook multiplication and reduction

use super::primes::mod_inverse;
use smallvec::SmallVec;

/// Digit vector of an element, least significant (constant term) first
pub(crate) type Digits = SmallVec<[u64; 16]>;

/// Direct arithmetic over a fixed GF(p^m)
#[derive(Debug, Clone)]
pub(crate) struct Kernel {
    p: u64,
    m: u32,
    order: u64,
    modulus: u64,
    modulus_digits: Digits,
}

impl Kernel {
    pub fn new(p: u64, m: u32, modulus: u64) -> Self {
        let order = p.pow(m);
        let mut kernel = Kernel {
            p,
            m,
            order,
            modulus,
            modulus_digits: Digits::new(),
        };
        kernel.modulus_digits = kernel.digits_of(modulus, m as usize + 1);
        kernel
    }

    #[inline]
    pub fn order(&self) -> u64 {
        self.order
    }

    fn digits_of(&self, mut value: u64, len: usize) -> Digits {
        let mut digits = Digits::with_capacity(len);
        for _ in 0..len {
            digits.push(value % self.p);
            value /= self.p;
        }
        digits
    }

    #[inline]
    pub fn to_digits(&self, value: u64) -> Digits {
        self.digits_of(value, self.m as usize)
    }

    #[inline]
    pub fn from_digits(&self, digits: &[u64]) -> u64 {
        digits.iter().rev().fold(0u64, |acc, &d| acc * self.p + d)
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        if self.m == 1 {
            let s = a + b;
            if s >= self.p {
                s - self.p
            } else {
                s
            }
        } else if self.p == 2 {
            a ^ b
        } else {
            let da = self.to_digits(a);
            let db = self.to_digits(b);
            let sum: Digits = da
                .iter()
                .zip(db.iter())
                .map(|(&x, &y)| (x + y) % self.p)
                .collect();
            self.from_digits(&sum)
        }
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        if self.p == 2 {
            a
        } else if self.m == 1 {
            if a == 0 {
                0
            } else {
                self.p - a
            }
        } else {
            let digits: Digits = self
                .to_digits(a)
                .iter()
                .map(|&d| (self.p - d) % self.p)
                .collect();
            self.from_digits(&digits)
        }
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        if self.m == 1 {
            if a >= b {
                a - b
            } else {
                a + self.p - b
            }
        } else if self.p == 2 {
            a ^ b
        } else {
            self.add(a, self.neg(b))
        }
    }

    pub fn mul(&self, a: u64, b: u64) -> u64 {
        if a == 0 || b == 0 {
            return 0;
        }
        if self.m == 1 {
            return (a * b) % self.p;
        }
        if self.p == 2 {
            let mut result = 0u64;
            let mut a = a;
            let mut b = b;
            while b != 0 {
                if b & 1 == 1 {
                    result ^= a;
                }
                b >>= 1;
                a <<= 1;
                if a & self.order != 0 {
                    a ^= self.modulus;
                }
            }
            return result;
        }

        let m = self.m as usize;
        let da = self.to_digits(a);
        let db = self.to_digits(b);
        let mut product: Digits = SmallVec::from_elem(0, 2 * m - 1);
        for (i, &x) in da.iter().enumerate() {
            if x == 0 {
                continue;
            }
            for (j, &y) in db.iter().enumerate() {
                product[i + j] = (product[i + j] + x * y) % self.p;
            }
        }

        // Reduce from the top; the modulus is monic so each step clears one digit
        for i in (m..product.len()).rev() {
            let coef = product[i];
            if coef == 0 {
                continue;
            }
            for (j, &f) in self.modulus_digits.iter().enumerate() {
                let idx = i - m + j;
                product[idx] = (product[idx] + self.p - (coef * f) % self.p) % self.p;
            }
        }
        self.from_digits(&product[..m])
    }

    /// Square-and-multiply exponentiation
    pub fn pow(&self, base: u64, mut exp: u64) -> u64 {
        let mut result = 1u64;
        let mut base = base;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        result
    }

    pub fn reciprocal(&self, a: u64) -> Option<u64> {
        if a == 0 {
            return None;
        }
        if self.m == 1 {
            mod_inverse(a, self.p)
        } else {
            Some(self.pow(a, self.order - 2))
        }
    }

    /// Whether `a` generates the whole multiplicative group, given the prime
    /// factors of `order - 1`
    pub fn generates_group(&self, a: u64, group_factors: &[u64]) -> bool {
        let group = self.order - 1;
        if a == 0 || self.pow(a, group) != 1 {
            return false;
        }
        group_factors.iter().all(|&r| self.pow(a, group / r) != 1)
    }
}
