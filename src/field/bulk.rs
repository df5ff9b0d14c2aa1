//! Element-wise arithmetic over arrays of field elements
//!
//! Every scalar primitive of [`GaloisField`] can be applied across slices of
//! any length with the same semantics as the scalar case. Inputs are checked
//! for shape and membership before any arithmetic runs, and the `_par`
//! variants split the work across the rayon thread pool.

use super::GaloisField;
use crate::error::{GaloisError, Result};
use rayon::prelude::*;

/// Slices shorter than this are never split across threads
pub const PARALLEL_THRESHOLD: usize = 1 << 14;

/// Binary element-wise operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary element-wise operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negative,
    Reciprocal,
    Square,
}

impl GaloisField {
    /// Check that every value is an element of this field
    pub fn validate(&self, values: &[u64]) -> Result<()> {
        match values.iter().find(|&&v| !self.contains(v)) {
            Some(&value) => Err(GaloisError::InvalidElement {
                value,
                order: self.order(),
            }),
            None => Ok(()),
        }
    }

    #[inline]
    fn binary(&self, op: BinaryOp, a: u64, b: u64) -> Result<u64> {
        match op {
            BinaryOp::Add => Ok(self.add(a, b)),
            BinaryOp::Subtract => Ok(self.sub(a, b)),
            BinaryOp::Multiply => Ok(self.mul(a, b)),
            BinaryOp::Divide => self.div(a, b),
        }
    }

    #[inline]
    fn unary(&self, op: UnaryOp, a: u64) -> Result<u64> {
        match op {
            UnaryOp::Negative => Ok(self.neg(a)),
            UnaryOp::Reciprocal => self.reciprocal(a),
            UnaryOp::Square => Ok(self.mul(a, a)),
        }
    }

    fn check_binary_operands(&self, a: &[u64], b: &[u64]) -> Result<()> {
        if a.len() != b.len() {
            return Err(GaloisError::shape(
                format!("({},)", a.len()),
                format!("({},)", b.len()),
            ));
        }
        self.validate(a)?;
        self.validate(b)
    }

    /// Apply `op` pairwise over two equally sized slices
    pub fn apply_binary(&self, op: BinaryOp, a: &[u64], b: &[u64]) -> Result<Vec<u64>> {
        self.check_binary_operands(a, b)?;
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| self.binary(op, x, y))
            .collect()
    }

    /// Parallel [`apply_binary`](Self::apply_binary) for large slices
    pub fn apply_binary_par(&self, op: BinaryOp, a: &[u64], b: &[u64]) -> Result<Vec<u64>> {
        if a.len() < PARALLEL_THRESHOLD {
            return self.apply_binary(op, a, b);
        }
        self.check_binary_operands(a, b)?;
        a.par_iter()
            .zip(b.par_iter())
            .map(|(&x, &y)| self.binary(op, x, y))
            .collect()
    }

    /// Apply `op` to every element
    pub fn apply_unary(&self, op: UnaryOp, a: &[u64]) -> Result<Vec<u64>> {
        self.validate(a)?;
        a.iter().map(|&x| self.unary(op, x)).collect()
    }

    pub fn apply_unary_par(&self, op: UnaryOp, a: &[u64]) -> Result<Vec<u64>> {
        if a.len() < PARALLEL_THRESHOLD {
            return self.apply_unary(op, a);
        }
        self.validate(a)?;
        a.par_iter().map(|&x| self.unary(op, x)).collect()
    }

    /// Multiply every element by `scalar`
    pub fn scale(&self, a: &[u64], scalar: u64) -> Result<Vec<u64>> {
        self.check(scalar)?;
        self.validate(a)?;
        Ok(a.iter().map(|&x| self.mul(x, scalar)).collect())
    }

    /// Raise every element to `exponent`
    pub fn power_all(&self, a: &[u64], exponent: i64) -> Result<Vec<u64>> {
        self.validate(a)?;
        a.iter().map(|&x| self.power(x, exponent)).collect()
    }

    /// Inner product of two equally sized slices
    pub fn dot(&self, a: &[u64], b: &[u64]) -> Result<u64> {
        self.check_binary_operands(a, b)?;
        Ok(a.iter()
            .zip(b.iter())
            .fold(0, |acc, (&x, &y)| self.add(acc, self.mul(x, y))))
    }

    /// Encode elements with the field's storage width
    pub fn pack(&self, a: &[u64]) -> Result<Vec<u8>> {
        self.validate(a)?;
        Ok(self.dtype().pack(a))
    }

    /// Decode elements stored with the field's storage width
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<u64>> {
        let values = self.dtype().unpack(bytes)?;
        self.validate(&values)?;
        Ok(values)
    }
}
