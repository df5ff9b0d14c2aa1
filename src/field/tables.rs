//! Log/antilog lookup tables for lookup-mode arithmetic
//!
//! Built once per field by walking the powers of the primitive element with
//! the calculate kernel. Multiplication, reciprocal and power then reduce to
//! index arithmetic modulo `q - 1`.

use super::kernel::Kernel;

/// Galois Field lookup tables for fast arithmetic
pub(crate) struct LogTables {
    pub log: Vec<u32>,
    pub antilog: Vec<u32>,
    limit: u64,
}

impl LogTables {
    pub fn new(kernel: &Kernel, primitive_element: u64) -> Self {
        let count = kernel.order() as usize;
        let limit = count - 1;
        let mut table = LogTables {
            log: vec![0; count],
            antilog: vec![0; limit.max(1)],
            limit: limit as u64,
        };

        let mut b = 1u64;
        for l in 0..limit {
            table.log[b as usize] = l as u32;
            table.antilog[l] = b as u32;
            b = kernel.mul(b, primitive_element);
        }

        // log(0) is undefined; callers check for zero before indexing
        table.log[0] = limit as u32;
        table
    }

    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = (self.log[a as usize] as u64 + self.log[b as usize] as u64) % self.limit;
        self.antilog[log_sum as usize] as u64
    }

    #[inline]
    pub fn reciprocal(&self, a: u64) -> u64 {
        let log_a = self.log[a as usize] as u64;
        self.antilog[((self.limit - log_a) % self.limit) as usize] as u64
    }

    /// `a^exp` for non-zero `a` and an exponent already reduced mod `q - 1`
    #[inline]
    pub fn pow(&self, a: u64, exp: u64) -> u64 {
        let log_a = self.log[a as usize] as u128;
        let result_log = (log_a * exp as u128) % self.limit as u128;
        self.antilog[result_log as usize] as u64
    }

    #[inline]
    pub fn log(&self, a: u64) -> u64 {
        self.log[a as usize] as u64
    }

    #[inline]
    pub fn antilog(&self, exp: u64) -> u64 {
        self.antilog[(exp % self.limit) as usize] as u64
    }
}
