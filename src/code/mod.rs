//! Forward error-correcting codes

mod decoder;
pub mod params;
pub mod reed_solomon;

pub use params::CodeParameters;
pub use reed_solomon::{
    generator_poly_to_matrix, roots_to_parity_check_matrix, rs_generator_matrix,
    rs_generator_poly, rs_parity_check_matrix, BatchDecoded, Decoded, ErrorCount, ReedSolomon,
    ReedSolomonBuilder,
};
