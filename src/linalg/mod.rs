//! Linear algebra over finite fields

pub mod matrix;

pub use matrix::FieldMatrix;
