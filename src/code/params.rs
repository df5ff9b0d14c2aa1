//! Serializable code parameters
//!
//! [`CodeParameters`] captures everything needed to rebuild an identical
//! [`ReedSolomon`] code, including the field's polynomial and primitive
//! element, so codes can be stored next to the data they protect.

use super::reed_solomon::ReedSolomon;
use crate::error::{GaloisError, Result};
use crate::field::primes::checked_pow;
use crate::field::GaloisField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParameters {
    pub n: usize,
    pub k: usize,
    pub c: usize,
    pub characteristic: u64,
    pub degree: u32,
    /// Coefficients of the field's irreducible polynomial, highest degree first
    pub irreducible_poly: Vec<u64>,
    pub primitive_element: u64,
    pub systematic: bool,
}

impl CodeParameters {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GaloisError::InvalidArgument(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| GaloisError::InvalidArgument(e.to_string()))
    }
}

impl ReedSolomon {
    pub fn parameters(&self) -> CodeParameters {
        let field = self.field();
        CodeParameters {
            n: self.n(),
            k: self.k(),
            c: self.c(),
            characteristic: field.characteristic(),
            degree: field.degree(),
            irreducible_poly: field.irreducible_coeffs(),
            primitive_element: field.primitive_element(),
            systematic: self.systematic(),
        }
    }

    /// Rebuild a code from stored parameters
    pub fn from_parameters(params: &CodeParameters) -> Result<Self> {
        let order = checked_pow(params.characteristic, params.degree);
        if order.is_none() || order != (params.n as u64).checked_add(1) {
            return Err(GaloisError::InvalidParameters(format!(
                "n = {} does not match GF({}^{})",
                params.n, params.characteristic, params.degree
            )));
        }
        let field = GaloisField::builder(params.characteristic, params.degree)
            .irreducible_coeffs(&params.irreducible_poly)?
            .primitive_element(params.primitive_element)
            .build()?;
        ReedSolomon::from_field(&field, params.n, params.k, params.c, params.systematic)
    }
}
