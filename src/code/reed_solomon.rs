//! Reed-Solomon codes over GF(q)
//!
//! ## Overview
//!
//! An RS(n, k) code lives in GF(q) with `n = q - 1`. Its generator polynomial
//! is `g(x) = (x - alpha^c)(x - alpha^(c+1))...(x - alpha^(c+2t-1))` with
//! `t = (n - k) / 2` the number of correctable symbol errors.
//!
//! Vectors are stored highest degree first: the message `[m_(k-1), ..., m_0]`
//! is the polynomial `m(x)` and codeword position `i` holds the coefficient
//! of `x^(n-1-i)`.
//!
//! - Systematic codes produce `c(x) = m(x) x^(n-k) - (m(x) x^(n-k) mod g(x))`,
//!   i.e. the message followed by `n - k` parity symbols.
//! - Non-systematic codes produce `c(x) = m(x) g(x)`.
//!
//! Everything derived from the parameters (field, `g(x)`, its roots, `G` and
//! `H`) is computed once in the constructor. Encoding and decoding only read
//! this state, so a code can be shared between threads freely.

use super::decoder::correct_errors;
use crate::config::ExecutionConfig;
use crate::error::{GaloisError, Result};
use crate::field::primes::prime_power;
use crate::field::{ArithmeticMode, GaloisField, MAX_ORDER};
use crate::linalg::FieldMatrix;
use crate::poly::Poly;
use log::debug;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Number of symbol errors corrected in one codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCount {
    /// Decoding succeeded after fixing this many symbols (`0..=t`)
    Corrected(usize),
    /// The codeword has more errors than the code can correct
    Uncorrectable,
}

impl ErrorCount {
    /// Error count with `-1` standing for an uncorrectable codeword
    pub fn as_i64(&self) -> i64 {
        match self {
            ErrorCount::Corrected(n) => *n as i64,
            ErrorCount::Uncorrectable => -1,
        }
    }

    /// True unless the codeword exceeded the correction capability
    pub fn is_correctable(&self) -> bool {
        matches!(self, ErrorCount::Corrected(_))
    }

    /// Number of fixed symbols, `None` for an uncorrectable codeword
    pub fn corrected(&self) -> Option<usize> {
        match self {
            ErrorCount::Corrected(n) => Some(*n),
            ErrorCount::Uncorrectable => None,
        }
    }
}

impl fmt::Display for ErrorCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Decoded message of a single codeword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Corrected message, or a best-effort message when uncorrectable
    pub message: Vec<u64>,
    /// Symbols fixed in the codeword, or `Uncorrectable`
    pub errors: ErrorCount,
    /// Error-correcting capability `t` of the code that produced this result
    pub capacity: usize,
}

impl Decoded {
    /// The message, or `Uncorrectable` if decoding could not be trusted
    pub fn into_message(self) -> Result<Vec<u64>> {
        match self.errors {
            ErrorCount::Corrected(_) => Ok(self.message),
            ErrorCount::Uncorrectable => Err(GaloisError::Uncorrectable {
                capacity: self.capacity,
            }),
        }
    }
}

/// Decoded messages of a batch of codewords, one row per codeword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDecoded {
    /// `(N, k)` matrix of messages, best effort for uncorrectable rows
    pub messages: FieldMatrix,
    /// Per-row outcome, aligned with the rows of `messages`
    pub errors: Vec<ErrorCount>,
}

fn check_code_parameters(field: &GaloisField, n: usize, k: usize, c: usize) -> Result<()> {
    if k == 0 || k >= n {
        return Err(GaloisError::InvalidParameters(format!(
            "message size k must satisfy 0 < k < n, not k = {} with n = {}",
            k, n
        )));
    }
    if (n - k) % 2 != 0 {
        return Err(GaloisError::InvalidParameters(format!(
            "n - k must be even, not {}",
            n - k
        )));
    }
    if n as u64 != field.order() - 1 {
        return Err(GaloisError::InvalidParameters(format!(
            "n must be q - 1 = {} for {}, not {}",
            field.order() - 1,
            field,
            n
        )));
    }
    if c < 1 {
        return Err(GaloisError::InvalidParameters(format!(
            "c must be at least 1, not {}",
            c
        )));
    }
    Ok(())
}

/// Generator polynomial `g(x)` of RS(n, k) and its `2t` roots `alpha^c, ..., alpha^(c+2t-1)`
pub fn rs_generator_poly(
    field: &Arc<GaloisField>,
    n: usize,
    k: usize,
    c: usize,
) -> Result<(Poly, Vec<u64>)> {
    check_code_parameters(field, n, k, c)?;
    let roots: Vec<u64> = (0..n - k)
        .map(|i| field.alpha_power((c + i) as u64))
        .collect();
    let g = Poly::from_roots(field, &roots)?;
    Ok((g, roots))
}

/// `(k, n)` generator matrix of the cyclic code generated by `g(x)`
pub fn generator_poly_to_matrix(n: usize, g: &Poly, systematic: bool) -> Result<FieldMatrix> {
    let field = g.field();
    let degree = match g.degree() {
        Some(d) if d < n => d,
        _ => {
            return Err(GaloisError::InvalidArgument(format!(
                "generator polynomial must have degree below n = {}",
                n
            )))
        }
    };
    let k = n - degree;
    let mut data = vec![0u64; k * n];

    if systematic {
        // Row i encodes the unit message x^(k-1-i): [e_i | -(x^(n-1-i) mod g)]
        for i in 0..k {
            data[i * n + i] = 1;
            let shifted = Poly::monomial(field, n - 1 - i, 1)?;
            let parity = shifted.rem(g)?.neg();
            let coeffs = parity.coeffs();
            if !parity.is_zero() {
                let offset = n - coeffs.len();
                data[i * n + offset..(i + 1) * n].copy_from_slice(coeffs);
            }
        }
    } else {
        for i in 0..k {
            data[i * n + i..i * n + i + degree + 1].copy_from_slice(g.coeffs());
        }
    }
    FieldMatrix::new(field, k, n, data)
}

/// `(roots, n)` parity-check matrix with `H[i][j] = roots[i]^(n-1-j)`
pub fn roots_to_parity_check_matrix(
    field: &Arc<GaloisField>,
    n: usize,
    roots: &[u64],
) -> Result<FieldMatrix> {
    field.validate(roots)?;
    let mut data = Vec::with_capacity(roots.len() * n);
    for &root in roots {
        for j in 0..n {
            data.push(field.power(root, (n - 1 - j) as i64)?);
        }
    }
    FieldMatrix::new(field, roots.len(), n, data)
}

/// Generator matrix `G` of RS(n, k)
pub fn rs_generator_matrix(
    field: &Arc<GaloisField>,
    n: usize,
    k: usize,
    c: usize,
    systematic: bool,
) -> Result<FieldMatrix> {
    let (g, _) = rs_generator_poly(field, n, k, c)?;
    generator_poly_to_matrix(n, &g, systematic)
}

/// Parity-check matrix `H` of RS(n, k)
pub fn rs_parity_check_matrix(
    field: &Arc<GaloisField>,
    n: usize,
    k: usize,
    c: usize,
) -> Result<FieldMatrix> {
    let (_, roots) = rs_generator_poly(field, n, k, c)?;
    roots_to_parity_check_matrix(field, n, &roots)
}

/// Builder for [`ReedSolomon`] codes
#[derive(Debug, Clone)]
pub struct ReedSolomonBuilder {
    n: usize,
    k: usize,
    c: usize,
    primitive_poly: Option<u64>,
    primitive_element: Option<u64>,
    systematic: bool,
    mode: Option<ArithmeticMode>,
}

impl ReedSolomonBuilder {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            c: 1,
            primitive_poly: None,
            primitive_element: None,
            systematic: true,
            mode: None,
        }
    }

    /// First consecutive power of alpha among the generator roots
    pub fn c(mut self, c: usize) -> Self {
        self.c = c;
        self
    }

    /// Polynomial defining GF(n + 1), integer form with leading term
    pub fn primitive_poly(mut self, poly: u64) -> Self {
        self.primitive_poly = Some(poly);
        self
    }

    pub fn primitive_element(mut self, element: u64) -> Self {
        self.primitive_element = Some(element);
        self
    }

    pub fn systematic(mut self, systematic: bool) -> Self {
        self.systematic = systematic;
        self
    }

    pub fn mode(mut self, mode: ArithmeticMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> Result<ReedSolomon> {
        let (n, k) = (self.n, self.k);
        if k >= n || (n - k) % 2 != 0 {
            return Err(GaloisError::InvalidParameters(format!(
                "n - k must be positive and even, not n = {}, k = {}",
                n, k
            )));
        }
        let (p, m) = (n as u64)
            .checked_add(1)
            .filter(|&q| q <= MAX_ORDER)
            .and_then(prime_power)
            .ok_or_else(|| {
                GaloisError::InvalidParameters(format!(
                    "n must have value q - 1 for a prime power q, not {}",
                    n
                ))
            })?;
        if self.c < 1 {
            return Err(GaloisError::InvalidParameters(format!(
                "c must be at least 1, not {}",
                self.c
            )));
        }

        let mut builder = GaloisField::builder(p, m);
        if let Some(poly) = self.primitive_poly {
            builder = builder.irreducible_poly(poly);
        }
        if let Some(alpha) = self.primitive_element {
            builder = builder.primitive_element(alpha);
        }
        if let Some(mode) = self.mode {
            builder = builder.mode(mode);
        }
        let field = builder.build()?;
        ReedSolomon::from_field(&field, n, k, self.c, self.systematic)
    }
}

/// A Reed-Solomon RS(n, k) code
pub struct ReedSolomon {
    field: Arc<GaloisField>,
    n: usize,
    k: usize,
    t: usize,
    c: usize,
    systematic: bool,
    generator_poly: Poly,
    roots: Vec<u64>,
    generator_matrix: FieldMatrix,
    parity_check_matrix: FieldMatrix,
    /// `H^T`, shape `(n, 2t)`, for syndrome computation
    parity_check_transposed: FieldMatrix,
    /// Parity block `P` of a systematic `G = [I | P]`, shape `(k, n - k)`
    parity_block: FieldMatrix,
}

impl ReedSolomon {
    /// Narrow-sense systematic RS(n, k) over the default GF(n + 1)
    pub fn new(n: usize, k: usize) -> Result<Self> {
        ReedSolomonBuilder::new(n, k).build()
    }

    pub fn builder(n: usize, k: usize) -> ReedSolomonBuilder {
        ReedSolomonBuilder::new(n, k)
    }

    /// RS(n, k) over an already constructed field
    pub fn from_field(
        field: &Arc<GaloisField>,
        n: usize,
        k: usize,
        c: usize,
        systematic: bool,
    ) -> Result<Self> {
        let (generator_poly, roots) = rs_generator_poly(field, n, k, c)?;
        let generator_matrix = generator_poly_to_matrix(n, &generator_poly, systematic)?;
        let parity_check_matrix = roots_to_parity_check_matrix(field, n, &roots)?;
        let parity_check_transposed = parity_check_matrix.transpose();
        let parity_block = generator_matrix.columns(k..n)?;

        debug!(
            "Constructed RS({}, {}) over {} with c = {}, g(x) = {}",
            n, k, field, c, generator_poly
        );

        Ok(ReedSolomon {
            field: Arc::clone(field),
            n,
            k,
            t: (n - k) / 2,
            c,
            systematic,
            generator_poly,
            roots,
            generator_matrix,
            parity_check_matrix,
            parity_check_transposed,
            parity_block,
        })
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.field
    }

    /// Codeword size
    pub fn n(&self) -> usize {
        self.n
    }

    /// Message size
    pub fn k(&self) -> usize {
        self.k
    }

    /// Error-correcting capability
    pub fn t(&self) -> usize {
        self.t
    }

    /// Exponent of the first consecutive root
    pub fn c(&self) -> usize {
        self.c
    }

    /// Minimum distance `n - k + 1`
    pub fn d(&self) -> usize {
        self.n - self.k + 1
    }

    pub fn systematic(&self) -> bool {
        self.systematic
    }

    /// Roots start at `alpha^1`
    pub fn is_narrow_sense(&self) -> bool {
        self.c == 1
    }

    pub fn generator_poly(&self) -> &Poly {
        &self.generator_poly
    }

    /// Roots of the generator polynomial, consecutive powers of alpha
    pub fn roots(&self) -> &[u64] {
        &self.roots
    }

    /// `G`, shape `(k, n)`
    pub fn generator_matrix(&self) -> &FieldMatrix {
        &self.generator_matrix
    }

    /// `H`, shape `(2t, n)`
    pub fn parity_check_matrix(&self) -> &FieldMatrix {
        &self.parity_check_matrix
    }

    fn check_length(&self, values: &[u64], expected: usize, what: &str) -> Result<()> {
        if values.len() != expected {
            return Err(GaloisError::shape(
                format!("{} of length {}", what, expected),
                format!("length {}", values.len()),
            ));
        }
        self.field.validate(values)
    }

    fn check_batch(&self, matrix: &FieldMatrix, expected_cols: usize) -> Result<()> {
        self.field.check_same(matrix.field())?;
        if matrix.cols() != expected_cols {
            return Err(GaloisError::shape(
                format!("(_, {})", expected_cols),
                format!("{:?}", matrix.shape()),
            ));
        }
        Ok(())
    }

    fn require_systematic(&self) -> Result<()> {
        if !self.systematic {
            return Err(GaloisError::InvalidArgument(
                "parity-only encoding only applies to systematic codes".into(),
            ));
        }
        Ok(())
    }

    /// Encode a length-`k` message into a length-`n` codeword
    pub fn encode(&self, message: &[u64]) -> Result<Vec<u64>> {
        self.check_length(message, self.k, "message")?;
        if self.systematic {
            let mut codeword = message.to_vec();
            codeword.extend(self.parity_block.vecmul(message)?);
            Ok(codeword)
        } else {
            self.generator_matrix.vecmul(message)
        }
    }

    /// Only the `n - k` parity symbols of a systematic codeword
    pub fn encode_parity(&self, message: &[u64]) -> Result<Vec<u64>> {
        self.require_systematic()?;
        self.check_length(message, self.k, "message")?;
        self.parity_block.vecmul(message)
    }

    /// Encode every row of a `(N, k)` matrix into a `(N, n)` matrix
    pub fn encode_batch(&self, messages: &FieldMatrix) -> Result<FieldMatrix> {
        self.encode_batch_with_config(messages, &ExecutionConfig::default())
    }

    /// Batch encode; the products run on multiple threads only when `config.parallel` is set
    pub fn encode_batch_with_config(
        &self,
        messages: &FieldMatrix,
        config: &ExecutionConfig,
    ) -> Result<FieldMatrix> {
        self.check_batch(messages, self.k)?;
        if self.systematic {
            messages.hstack(&messages.matmul_with_config(&self.parity_block, config)?)
        } else {
            messages.matmul_with_config(&self.generator_matrix, config)
        }
    }

    /// Parity symbols for every row of a `(N, k)` matrix
    pub fn encode_parity_batch(&self, messages: &FieldMatrix) -> Result<FieldMatrix> {
        self.encode_parity_batch_with_config(messages, &ExecutionConfig::default())
    }

    /// Batch parity encode following `config`
    pub fn encode_parity_batch_with_config(
        &self,
        messages: &FieldMatrix,
        config: &ExecutionConfig,
    ) -> Result<FieldMatrix> {
        self.require_systematic()?;
        self.check_batch(messages, self.k)?;
        messages.matmul_with_config(&self.parity_block, config)
    }

    /// Syndrome `s = c H^T`, all zero exactly for valid codewords
    pub fn syndrome(&self, codeword: &[u64]) -> Result<Vec<u64>> {
        self.check_length(codeword, self.n, "codeword")?;
        self.parity_check_transposed.vecmul(codeword)
    }

    /// Decode a codeword into its message
    ///
    /// Uncorrectable codewords still return a best-effort message; use
    /// [`decode_with_errors`](Self::decode_with_errors) to learn whether the
    /// result can be trusted.
    pub fn decode(&self, codeword: &[u64]) -> Result<Vec<u64>> {
        Ok(self.decode_with_errors(codeword)?.message)
    }

    /// Decode a codeword and report how many symbol errors were corrected
    pub fn decode_with_errors(&self, codeword: &[u64]) -> Result<Decoded> {
        let syndrome = self.syndrome(codeword)?;
        Ok(self.decode_row(codeword, &syndrome))
    }

    fn decode_row(&self, codeword: &[u64], syndrome: &[u64]) -> Decoded {
        let mut corrected = codeword.to_vec();
        let errors = correct_errors(&self.field, &mut corrected, syndrome, self.t, self.c);
        // Uncorrectable words are decoded as received
        let source = if errors.is_correctable() {
            &corrected[..]
        } else {
            codeword
        };
        Decoded {
            message: self.extract_message(source),
            errors,
            capacity: self.t,
        }
    }

    /// Decode every row of a `(N, n)` matrix with the default execution config
    pub fn decode_batch(&self, codewords: &FieldMatrix) -> Result<BatchDecoded> {
        self.decode_batch_with_config(codewords, &ExecutionConfig::default())
    }

    /// Decode every row of a `(N, n)` matrix; rows are decoded independently
    /// so an uncorrectable row does not affect the others
    pub fn decode_batch_with_config(
        &self,
        codewords: &FieldMatrix,
        config: &ExecutionConfig,
    ) -> Result<BatchDecoded> {
        self.check_batch(codewords, self.n)?;
        let syndromes = codewords.matmul_with_config(&self.parity_check_transposed, config)?;

        let decode_one = |r: usize| self.decode_row(codewords.row(r), syndromes.row(r));
        let rows: Vec<Decoded> = if config.parallel {
            (0..codewords.rows()).into_par_iter().map(decode_one).collect()
        } else {
            (0..codewords.rows()).map(decode_one).collect()
        };

        let uncorrectable = rows.iter().filter(|d| !d.errors.is_correctable()).count();
        debug!(
            "Decoded {} codewords, {} uncorrectable",
            rows.len(),
            uncorrectable
        );

        let mut data = Vec::with_capacity(rows.len() * self.k);
        let mut errors = Vec::with_capacity(rows.len());
        for row in rows {
            data.extend(row.message);
            errors.push(row.errors);
        }
        Ok(BatchDecoded {
            messages: FieldMatrix::new(&self.field, errors.len(), self.k, data)?,
            errors,
        })
    }

    /// Message part of a (corrected) codeword
    fn extract_message(&self, codeword: &[u64]) -> Vec<u64> {
        if self.systematic {
            return codeword[..self.k].to_vec();
        }
        // c(x) = m(x) g(x); g is monic so the division cannot fail
        let received = Poly::from_raw(&self.field, codeword.to_vec());
        let quotient = match received.div(&self.generator_poly) {
            Ok(q) => q,
            Err(_) => Poly::zero(&self.field),
        };
        let coeffs = quotient.coeffs();
        let mut message = vec![0u64; self.k];
        let offset = self.k.saturating_sub(coeffs.len());
        let take = coeffs.len().min(self.k);
        message[offset..].copy_from_slice(&coeffs[coeffs.len() - take..]);
        message
    }
}

impl fmt::Debug for ReedSolomon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReedSolomon")
            .field("n", &self.n)
            .field("k", &self.k)
            .field("t", &self.t)
            .field("c", &self.c)
            .field("field", &self.field)
            .field("generator_poly", &self.generator_poly)
            .field("systematic", &self.systematic)
            .finish()
    }
}

impl fmt::Display for ReedSolomon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RS({}, {}) over {}", self.n, self.k, self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_sense_generator_gf16() {
        let rs = ReedSolomon::new(15, 9).unwrap();
        assert_eq!(rs.t(), 3);
        assert_eq!(rs.d(), 7);
        assert!(rs.is_narrow_sense());
        let g = rs.generator_poly();
        assert_eq!(g.degree(), Some(6));
        assert!(g.is_monic());
        for &root in rs.roots() {
            assert_eq!(g.evaluate(root).unwrap(), 0);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(ReedSolomon::new(14, 8), Err(GaloisError::InvalidParameters(_))));
        assert!(matches!(ReedSolomon::new(15, 8), Err(GaloisError::InvalidParameters(_))));
        assert!(matches!(ReedSolomon::new(15, 15), Err(GaloisError::InvalidParameters(_))));
        assert!(matches!(
            ReedSolomon::builder(15, 9).c(0).build(),
            Err(GaloisError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_systematic_generator_is_identity_prefixed() {
        let rs = ReedSolomon::new(15, 11).unwrap();
        let g = rs.generator_matrix();
        assert_eq!(g.columns(0..11).unwrap(), FieldMatrix::identity(rs.field(), 11));
    }

    #[test]
    fn test_parity_only_requires_systematic() {
        let rs = ReedSolomon::builder(15, 9).systematic(false).build().unwrap();
        assert!(matches!(
            rs.encode_parity(&[0; 9]),
            Err(GaloisError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_error_count_sentinel() {
        assert_eq!(ErrorCount::Uncorrectable.as_i64(), -1);
        assert_eq!(ErrorCount::Corrected(2).as_i64(), 2);
        assert_eq!(ErrorCount::Uncorrectable.to_string(), "-1");
    }
}
