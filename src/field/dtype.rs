//! Storage width selection for field elements
//!
//! Arithmetic runs on `u64` words. For storage and interchange the smallest
//! unsigned width that holds `q - 1` is used, chosen once when the field is
//! built.

use crate::error::{GaloisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest unsigned integer width that can hold every element of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    U8,
    U16,
    U32,
}

impl Dtype {
    /// Pick the width for a field of the given order
    pub fn for_order(order: u64) -> Self {
        let max_element = order.saturating_sub(1);
        if max_element <= u8::MAX as u64 {
            Dtype::U8
        } else if max_element <= u16::MAX as u64 {
            Dtype::U16
        } else {
            Dtype::U32
        }
    }

    /// Bytes per element
    pub fn bytes(&self) -> usize {
        match self {
            Dtype::U8 => 1,
            Dtype::U16 => 2,
            Dtype::U32 => 4,
        }
    }

    /// Encode elements as little-endian words of this width
    pub fn pack(&self, elements: &[u64]) -> Vec<u8> {
        let mut out = Vec::with_capacity(elements.len() * self.bytes());
        for &e in elements {
            match self {
                Dtype::U8 => out.push(e as u8),
                Dtype::U16 => out.extend_from_slice(&(e as u16).to_le_bytes()),
                Dtype::U32 => out.extend_from_slice(&(e as u32).to_le_bytes()),
            }
        }
        out
    }

    /// Decode little-endian words of this width
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<u64>> {
        let width = self.bytes();
        if bytes.len() % width != 0 {
            return Err(GaloisError::shape(
                format!("a multiple of {} bytes", width),
                format!("{} bytes", bytes.len()),
            ));
        }
        Ok(bytes
            .chunks_exact(width)
            .map(|chunk| match self {
                Dtype::U8 => chunk[0] as u64,
                Dtype::U16 => u16::from_le_bytes([chunk[0], chunk[1]]) as u64,
                Dtype::U32 => u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as u64,
            })
            .collect())
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::U8 => "u8",
            Dtype::U16 => "u16",
            Dtype::U32 => "u32",
        };
        write!(f, "{}", name)
    }
}
