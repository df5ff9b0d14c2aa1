//! Finite field arithmetic and Reed-Solomon codes
//!
//! - [`field`]: GF(p^m) with lookup-table or direct arithmetic
//! - [`poly`]: polynomials over a field, roots and Berlekamp-Massey
//! - [`linalg`]: matrices over a field
//! - [`code`]: Reed-Solomon encoding and error-correcting decoding
//!
//! ```no_run
//! use galoisrs::ReedSolomon;
//!
//! let rs = ReedSolomon::new(15, 9)?;
//! let mut codeword = rs.encode(&[1, 2, 3, 4, 5, 6, 7, 8, 9])?;
//! codeword[3] ^= 5;
//! assert_eq!(rs.decode(&codeword)?, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! # Ok::<(), galoisrs::GaloisError>(())
//! ```

pub mod code;
pub mod config;
pub mod error;
pub mod field;
pub mod linalg;
pub mod poly;

pub use code::{CodeParameters, Decoded, ErrorCount, ReedSolomon, ReedSolomonBuilder};
pub use config::ExecutionConfig;
pub use error::{GaloisError, Result};
pub use field::{ArithmeticMode, Dtype, FieldBuilder, GaloisField};
pub use linalg::FieldMatrix;
pub use poly::{berlekamp_massey, Poly, PolyRoot};
