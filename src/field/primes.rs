//! Small number theory helpers for field construction
//!
//! Field orders are bounded by [`MAX_ORDER`](super::MAX_ORDER), so trial division
//! up to the square root is always cheap here.

/// Check whether `n` is prime
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Distinct prime factors of `n` in increasing order
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut d = 2u64;
    while d <= n / d {
        if n % d == 0 {
            factors.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += if d == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Decompose `q` as `p^m` with `p` prime
pub fn prime_power(q: u64) -> Option<(u64, u32)> {
    if q < 2 {
        return None;
    }
    let factors = prime_factors(q);
    if factors.len() != 1 {
        return None;
    }
    let p = factors[0];
    let mut m = 0u32;
    let mut rest = q;
    while rest % p == 0 {
        rest /= p;
        m += 1;
    }
    Some((p, m))
}

/// `base^exp` returning `None` on overflow
pub fn checked_pow(base: u64, exp: u32) -> Option<u64> {
    let mut acc = 1u64;
    for _ in 0..exp {
        acc = acc.checked_mul(base)?;
    }
    Some(acc)
}

/// Modular inverse of `a` mod prime `p` via extended Euclid
pub fn mod_inverse(a: u64, p: u64) -> Option<u64> {
    let (mut old_r, mut r) = (a as i128, p as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(p as i128) as u64)
}
