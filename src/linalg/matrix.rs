//! Field-valued matrices
//!
//! [`FieldMatrix`] stores its elements row-major together with the field they
//! belong to. Products over prime fields accumulate exact integer sums in
//! 128-bit lanes and reduce once per output element; extension fields go
//! through the field kernel element by element.

use crate::config::ExecutionConfig;
use crate::error::{GaloisError, Result};
use crate::field::{BinaryOp, GaloisField};
use rayon::prelude::*;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Products with at least this many multiply-adds split rows across threads
const PARALLEL_WORK: usize = 1 << 16;

/// Dense matrix over a finite field
#[derive(Clone)]
pub struct FieldMatrix {
    field: Arc<GaloisField>,
    rows: usize,
    cols: usize,
    data: Vec<u64>,
}

impl FieldMatrix {
    /// Build from row-major data
    pub fn new(field: &Arc<GaloisField>, rows: usize, cols: usize, data: Vec<u64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(GaloisError::shape(
                format!("{} elements for ({}, {})", rows * cols, rows, cols),
                format!("{} elements", data.len()),
            ));
        }
        field.validate(&data)?;
        Ok(Self::from_raw(field, rows, cols, data))
    }

    pub(crate) fn from_raw(field: &Arc<GaloisField>, rows: usize, cols: usize, data: Vec<u64>) -> Self {
        FieldMatrix {
            field: Arc::clone(field),
            rows,
            cols,
            data,
        }
    }

    pub fn zeros(field: &Arc<GaloisField>, rows: usize, cols: usize) -> Self {
        Self::from_raw(field, rows, cols, vec![0; rows * cols])
    }

    pub fn identity(field: &Arc<GaloisField>, size: usize) -> Self {
        let mut matrix = Self::zeros(field, size, size);
        for i in 0..size {
            matrix.data[i * size + i] = 1;
        }
        matrix
    }

    /// Build from a list of equally long rows
    pub fn from_rows(field: &Arc<GaloisField>, rows: &[Vec<u64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(GaloisError::shape(
                format!("rows of length {}", cols),
                format!("a row of length {}", bad.len()),
            ));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(field, rows.len(), cols, data)
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u64) -> Result<()> {
        self.field.check(value)?;
        if row >= self.rows || col >= self.cols {
            return Err(GaloisError::shape(
                format!("index within ({}, {})", self.rows, self.cols),
                format!("({}, {})", row, col),
            ));
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[u64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u64]> {
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Row-major elements
    pub fn data(&self) -> &[u64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u64> {
        self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    fn check_field(&self, other: &FieldMatrix) -> Result<()> {
        if Arc::ptr_eq(&self.field, &other.field) {
            return Ok(());
        }
        self.field.check_same(&other.field)
    }

    pub fn transpose(&self) -> FieldMatrix {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.get(r, c));
            }
        }
        Self::from_raw(&self.field, self.cols, self.rows, data)
    }

    /// Concatenate columns: `[self | other]`
    pub fn hstack(&self, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.check_field(other)?;
        if self.rows != other.rows {
            return Err(GaloisError::shape(
                format!("{} rows", self.rows),
                format!("{} rows", other.rows),
            ));
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        for r in 0..self.rows {
            data.extend_from_slice(self.row(r));
            data.extend_from_slice(other.row(r));
        }
        Ok(Self::from_raw(&self.field, self.rows, self.cols + other.cols, data))
    }

    /// Sub-matrix made of the given column range
    pub fn columns(&self, range: Range<usize>) -> Result<FieldMatrix> {
        if range.start > range.end || range.end > self.cols {
            return Err(GaloisError::shape(
                format!("columns within 0..{}", self.cols),
                format!("{}..{}", range.start, range.end),
            ));
        }
        let width = range.end - range.start;
        let mut data = Vec::with_capacity(self.rows * width);
        for r in 0..self.rows {
            data.extend_from_slice(&self.row(r)[range.clone()]);
        }
        Ok(Self::from_raw(&self.field, self.rows, width, data))
    }

    fn elementwise(&self, op: BinaryOp, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.check_field(other)?;
        if self.shape() != other.shape() {
            return Err(GaloisError::shape(
                format!("{:?}", self.shape()),
                format!("{:?}", other.shape()),
            ));
        }
        let data = self.field.apply_binary_par(op, &self.data, &other.data)?;
        Ok(Self::from_raw(&self.field, self.rows, self.cols, data))
    }

    pub fn add(&self, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.elementwise(BinaryOp::Add, other)
    }

    pub fn sub(&self, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.elementwise(BinaryOp::Subtract, other)
    }

    /// Element-wise (Hadamard) product
    pub fn mul_elementwise(&self, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.elementwise(BinaryOp::Multiply, other)
    }

    /// Matrix product `self @ other`
    pub fn matmul(&self, other: &FieldMatrix) -> Result<FieldMatrix> {
        self.matmul_with_config(other, &ExecutionConfig::default())
    }

    /// Matrix product; large products split rows across threads only when
    /// `config.parallel` is set
    pub fn matmul_with_config(
        &self,
        other: &FieldMatrix,
        config: &ExecutionConfig,
    ) -> Result<FieldMatrix> {
        self.check_field(other)?;
        if self.cols != other.rows {
            return Err(GaloisError::shape(
                format!("({}, {}) @ ({}, _)", self.rows, self.cols, self.cols),
                format!("({}, {}) @ ({}, {})", self.rows, self.cols, other.rows, other.cols),
            ));
        }

        let out_cols = other.cols;
        let mut data = vec![0u64; self.rows * out_cols];
        if out_cols == 0 {
            return Ok(Self::from_raw(&self.field, self.rows, 0, data));
        }

        let work = self.rows * self.cols * out_cols;
        let fill_row = |(r, out): (usize, &mut [u64])| self.product_row(self.row(r), other, out);
        if config.parallel && work >= PARALLEL_WORK {
            data.par_chunks_mut(out_cols).enumerate().for_each(fill_row);
        } else {
            data.chunks_mut(out_cols).enumerate().for_each(fill_row);
        }
        Ok(Self::from_raw(&self.field, self.rows, out_cols, data))
    }

    /// Row vector times matrix
    pub fn vecmul(&self, vector: &[u64]) -> Result<Vec<u64>> {
        if vector.len() != self.rows {
            return Err(GaloisError::shape(
                format!("({},)", self.rows),
                format!("({},)", vector.len()),
            ));
        }
        self.field.validate(vector)?;
        let mut out = vec![0u64; self.cols];
        self.product_row(vector, self, &mut out);
        Ok(out)
    }

    /// `out = lhs_row @ rhs`
    fn product_row(&self, lhs_row: &[u64], rhs: &FieldMatrix, out: &mut [u64]) {
        let field = &self.field;
        if field.is_prime_field() {
            let p = field.characteristic() as u128;
            for (c, slot) in out.iter_mut().enumerate() {
                let acc: u128 = lhs_row
                    .iter()
                    .enumerate()
                    .map(|(k, &a)| a as u128 * rhs.get(k, c) as u128)
                    .sum();
                *slot = (acc % p) as u64;
            }
        } else {
            for (k, &a) in lhs_row.iter().enumerate() {
                if a == 0 {
                    continue;
                }
                for (slot, &b) in out.iter_mut().zip(rhs.row(k)) {
                    *slot = field.add(*slot, field.mul(a, b));
                }
            }
        }
    }

    /// Reduced row echelon form and rank
    pub fn row_reduce(&self) -> Result<(FieldMatrix, usize)> {
        let field = &self.field;
        let mut m = self.clone();
        let mut pivot_row = 0;

        for col in 0..m.cols {
            if pivot_row == m.rows {
                break;
            }
            let found = (pivot_row..m.rows).find(|&r| m.get(r, col) != 0);
            let Some(src) = found else {
                continue;
            };
            m.swap_rows(pivot_row, src);

            let inv = field.reciprocal(m.get(pivot_row, col))?;
            for c in 0..m.cols {
                let v = m.get(pivot_row, c);
                m.data[pivot_row * m.cols + c] = field.mul(v, inv);
            }

            for r in 0..m.rows {
                let factor = m.get(r, col);
                if r == pivot_row || factor == 0 {
                    continue;
                }
                for c in 0..m.cols {
                    let v = field.sub(m.get(r, c), field.mul(factor, m.get(pivot_row, c)));
                    m.data[r * m.cols + c] = v;
                }
            }
            pivot_row += 1;
        }
        Ok((m, pivot_row))
    }

    pub fn rank(&self) -> Result<usize> {
        Ok(self.row_reduce()?.1)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    fn require_square(&self) -> Result<()> {
        if self.rows != self.cols {
            return Err(GaloisError::shape(
                "a square matrix",
                format!("({}, {})", self.rows, self.cols),
            ));
        }
        Ok(())
    }

    /// Inverse by Gauss-Jordan elimination on `[A | I]`
    pub fn inverse(&self) -> Result<FieldMatrix> {
        self.require_square()?;
        let n = self.rows;
        let augmented = self.hstack(&Self::identity(&self.field, n))?;
        let (reduced, _) = augmented.row_reduce()?;
        if reduced.columns(0..n)? != Self::identity(&self.field, n) {
            return Err(GaloisError::InvalidArgument("matrix is singular".into()));
        }
        reduced.columns(n..2 * n)
    }

    /// Determinant by Gaussian elimination
    pub fn determinant(&self) -> Result<u64> {
        self.require_square()?;
        let field = &self.field;
        let n = self.rows;
        let mut m = self.clone();
        let mut det = 1u64;

        for col in 0..n {
            let Some(src) = (col..n).find(|&r| m.get(r, col) != 0) else {
                return Ok(0);
            };
            if src != col {
                m.swap_rows(col, src);
                det = field.neg(det);
            }
            let pivot = m.get(col, col);
            det = field.mul(det, pivot);
            let inv = field.reciprocal(pivot)?;
            for r in col + 1..n {
                let factor = field.mul(m.get(r, col), inv);
                if factor == 0 {
                    continue;
                }
                for c in col..n {
                    let v = field.sub(m.get(r, c), field.mul(factor, m.get(col, c)));
                    m.data[r * n + c] = v;
                }
            }
        }
        Ok(det)
    }

    /// LU decomposition `A = L @ U` without row exchanges
    ///
    /// `L` is unit lower triangular and `U` upper triangular. A zero pivot with
    /// non-zero entries below it has no such factorization and yields
    /// `InvalidArgument`; [`plu_decompose`](Self::plu_decompose) handles those.
    pub fn lu_decompose(&self) -> Result<(FieldMatrix, FieldMatrix)> {
        let (_, lower, upper) = self.triangularize(false)?;
        Ok((lower, upper))
    }

    /// PLU decomposition `A = P @ L @ U` with row pivoting
    pub fn plu_decompose(&self) -> Result<(FieldMatrix, FieldMatrix, FieldMatrix)> {
        let (order, lower, upper) = self.triangularize(true)?;
        let n = self.rows;
        let mut permutation = Self::zeros(&self.field, n, n);
        for (i, &src) in order.iter().enumerate() {
            permutation.data[src * n + i] = 1;
        }
        Ok((permutation, lower, upper))
    }

    /// Doolittle elimination, returning which source row ended up in each row of `U`
    fn triangularize(&self, pivoting: bool) -> Result<(Vec<usize>, FieldMatrix, FieldMatrix)> {
        self.require_square()?;
        let field = &self.field;
        let n = self.rows;
        let mut upper = self.clone();
        let mut lower = Self::zeros(field, n, n);
        let mut order: Vec<usize> = (0..n).collect();

        for col in 0..n {
            lower.data[col * n + col] = 1;
            if upper.get(col, col) == 0 {
                match (col + 1..n).find(|&r| upper.get(r, col) != 0) {
                    None => continue,
                    Some(src) if pivoting => {
                        upper.swap_rows(col, src);
                        // Only the already filled columns of L move with the row
                        for c in 0..col {
                            lower.data.swap(col * n + c, src * n + c);
                        }
                        order.swap(col, src);
                    }
                    Some(_) => {
                        return Err(GaloisError::InvalidArgument(
                            "LU decomposition does not exist without row exchanges".into(),
                        ))
                    }
                }
            }

            let inv = field.reciprocal(upper.get(col, col))?;
            for r in col + 1..n {
                let factor = field.mul(upper.get(r, col), inv);
                lower.data[r * n + col] = factor;
                if factor == 0 {
                    continue;
                }
                for c in col..n {
                    let v = field.sub(upper.get(r, c), field.mul(factor, upper.get(col, c)));
                    upper.data[r * n + c] = v;
                }
            }
        }
        Ok((order, lower, upper))
    }

    /// Solve `self @ x == b` for a square non-singular matrix
    pub fn solve(&self, b: &[u64]) -> Result<Vec<u64>> {
        self.require_square()?;
        if b.len() != self.rows {
            return Err(GaloisError::shape(
                format!("({},)", self.rows),
                format!("({},)", b.len()),
            ));
        }
        let column = FieldMatrix::new(&self.field, b.len(), 1, b.to_vec())?;
        let (reduced, rank) = self.hstack(&column)?.row_reduce()?;
        if rank < self.rows || reduced.columns(0..self.cols)? != Self::identity(&self.field, self.rows) {
            return Err(GaloisError::InvalidArgument("matrix is singular".into()));
        }
        Ok(reduced.columns(self.cols..self.cols + 1)?.into_data())
    }
}

impl PartialEq for FieldMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.data == other.data
            && (Arc::ptr_eq(&self.field, &other.field) || self.field == other.field)
    }
}

impl Eq for FieldMatrix {}

impl fmt::Debug for FieldMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FieldMatrix({}, {}x{})", self.field, self.rows, self.cols)?;
        for row in self.iter_rows() {
            writeln!(f, "  {:?}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_prime_field() {
        let gf = GaloisField::new(7, 1).unwrap();
        let a = FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![3, 4]]).unwrap();
        let b = FieldMatrix::from_rows(&gf, &[vec![5, 6], vec![0, 1]]).unwrap();
        let c = a.matmul(&b).unwrap();
        assert_eq!(c.to_rows(), vec![vec![5, 8 % 7], vec![15 % 7, 22 % 7]]);
    }

    #[test]
    fn test_matmul_shape_mismatch() {
        let gf = GaloisField::new(2, 4).unwrap();
        let a = FieldMatrix::zeros(&gf, 2, 3);
        let b = FieldMatrix::zeros(&gf, 2, 3);
        assert!(matches!(a.matmul(&b), Err(GaloisError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_matmul_type_mismatch() {
        let a = FieldMatrix::identity(&GaloisField::new(2, 4).unwrap(), 2);
        let b = FieldMatrix::identity(&GaloisField::new(2, 3).unwrap(), 2);
        assert!(matches!(a.matmul(&b), Err(GaloisError::TypeMismatch { .. })));
    }

    #[test]
    fn test_inverse_and_determinant() {
        let gf = GaloisField::new(2, 8).unwrap();
        // unit lower times unit upper triangular, so det(a) == 1
        let lower = FieldMatrix::from_rows(&gf, &[vec![1, 0, 0], vec![4, 1, 0], vec![7, 8, 1]]).unwrap();
        let upper = FieldMatrix::from_rows(&gf, &[vec![1, 2, 3], vec![0, 1, 6], vec![0, 0, 1]]).unwrap();
        let a = lower.matmul(&upper).unwrap();
        let inv = a.inverse().unwrap();
        assert_eq!(a.matmul(&inv).unwrap(), FieldMatrix::identity(&gf, 3));
        assert_eq!(a.determinant().unwrap(), 1);
        assert_eq!(inv.matmul(&a).unwrap(), FieldMatrix::identity(&gf, 3));

        let singular = FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![1, 2]]).unwrap();
        assert_eq!(singular.determinant().unwrap(), 0);
        assert!(singular.inverse().is_err());
        assert_eq!(singular.rank().unwrap(), 1);
    }

    #[test]
    fn test_lu_requires_pivoting() {
        let gf = GaloisField::new(7, 1).unwrap();
        let a = FieldMatrix::from_rows(&gf, &[vec![0, 3], vec![2, 5]]).unwrap();
        assert!(matches!(a.lu_decompose(), Err(GaloisError::InvalidArgument(_))));

        let (p, l, u) = a.plu_decompose().unwrap();
        assert_eq!(p.to_rows(), vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(l, FieldMatrix::identity(&gf, 2));
        assert_eq!(u.to_rows(), vec![vec![2, 5], vec![0, 3]]);
    }

    #[test]
    fn test_solve() {
        let gf = GaloisField::new(5, 1).unwrap();
        let a = FieldMatrix::from_rows(&gf, &[vec![2, 1], vec![1, 3]]).unwrap();
        let x = a.solve(&[4, 2]).unwrap();
        assert_eq!(a.vecmul(&[0, 0]).unwrap(), vec![0, 0]);
        let check = a.matmul(&FieldMatrix::new(&gf, 2, 1, x).unwrap()).unwrap();
        assert_eq!(check.data(), &[4, 2]);
    }
}
