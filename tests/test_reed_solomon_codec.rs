//! Reed-Solomon encoding and decoding scenarios

use galoisrs::code::{rs_generator_matrix, rs_parity_check_matrix};
use galoisrs::{
    ArithmeticMode, ErrorCount, ExecutionConfig, FieldMatrix, GaloisError, GaloisField,
    ReedSolomon,
};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// Add a random non-zero value at `count` distinct random positions
fn corrupt(rs: &ReedSolomon, codeword: &mut [u64], count: usize, rng: &mut StdRng) {
    let field = rs.field();
    for pos in sample(rng, codeword.len(), count).into_iter() {
        let delta = rng.random_range(1..field.order());
        codeword[pos] = field.add(codeword[pos], delta);
    }
}

fn random_message(rs: &ReedSolomon, rng: &mut StdRng) -> Vec<u64> {
    (0..rs.k())
        .map(|_| rng.random_range(0..rs.field().order()))
        .collect()
}

// ============================================================================
// Code construction
// ============================================================================

#[test]
fn test_rs_15_9_properties() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    assert_eq!((rs.n(), rs.k(), rs.t(), rs.d(), rs.c()), (15, 9, 3, 7, 1));
    assert_eq!(rs.field().order(), 16);
    assert!(rs.systematic());
    assert_eq!(rs.generator_matrix().shape(), (9, 15));
    assert_eq!(rs.parity_check_matrix().shape(), (6, 15));
    assert_eq!(rs.roots().len(), 6);
    assert_eq!(rs.to_string(), "RS(15, 9) over GF(2^4)");
}

#[test]
fn test_parity_check_annihilates_generator() {
    for systematic in [true, false] {
        for (n, k, c) in [(15, 9, 1), (26, 20, 3), (30, 20, 1), (8, 4, 2)] {
            let rs = ReedSolomon::builder(n, k)
                .c(c)
                .systematic(systematic)
                .build()
                .unwrap();
            let product = rs
                .parity_check_matrix()
                .matmul(&rs.generator_matrix().transpose())
                .unwrap();
            assert!(
                product.data().iter().all(|&x| x == 0),
                "H G^T != 0 for RS({}, {}), c = {}",
                n,
                k,
                c
            );
        }
    }
}

#[test]
fn test_free_matrix_functions_match_code() {
    let gf = GaloisField::new(2, 4).unwrap();
    let rs = ReedSolomon::from_field(&gf, 15, 11, 1, false).unwrap();
    assert_eq!(&rs_generator_matrix(&gf, 15, 11, 1, false).unwrap(), rs.generator_matrix());
    assert_eq!(&rs_parity_check_matrix(&gf, 15, 11, 1).unwrap(), rs.parity_check_matrix());
    assert!(matches!(
        rs_generator_matrix(&gf, 14, 10, 1, true),
        Err(GaloisError::InvalidParameters(_))
    ));
}

#[test]
fn test_non_default_field_parameters() {
    let rs = ReedSolomon::builder(255, 223)
        .primitive_poly(0x11B)
        .primitive_element(3)
        .mode(ArithmeticMode::Calculate)
        .build()
        .unwrap();
    assert_eq!(rs.field().irreducible_poly(), 0x11B);
    assert_eq!(rs.field().primitive_element(), 3);
    assert_eq!(rs.field().mode(), ArithmeticMode::Calculate);
    assert!(matches!(
        ReedSolomon::builder(15, 9).primitive_poly(0x15).build(),
        Err(GaloisError::InvalidParameters(_))
    ));
}

#[test]
fn test_codeword_length_out_of_range() {
    assert!(matches!(
        ReedSolomon::new(usize::MAX, 1),
        Err(GaloisError::InvalidParameters(_))
    ));
    // 2^61 - 1 is prime but far beyond the supported field orders
    assert!(matches!(
        ReedSolomon::new((1usize << 61) - 2, 2),
        Err(GaloisError::InvalidParameters(_))
    ));
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_systematic_encoding_keeps_message() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    let message: Vec<u64> = (1..=9).collect();
    let codeword = rs.encode(&message).unwrap();
    assert_eq!(codeword.len(), 15);
    assert_eq!(&codeword[..9], message.as_slice());
    assert_eq!(&codeword[9..], rs.encode_parity(&message).unwrap().as_slice());
    assert!(rs.syndrome(&codeword).unwrap().iter().all(|&s| s == 0));

    // Codewords are multiples of g(x)
    let field = rs.field();
    for &root in rs.roots() {
        let value = codeword.iter().fold(0, |acc, &c| field.add(field.mul(acc, root), c));
        assert_eq!(value, 0);
    }
}

#[test]
fn test_non_systematic_encoding_is_polynomial_product() {
    let rs = ReedSolomon::builder(15, 9).systematic(false).build().unwrap();
    let message: Vec<u64> = vec![3, 0, 0, 7, 1, 0, 2, 9, 15];
    let codeword = rs.encode(&message).unwrap();
    let field = rs.field();
    let m = galoisrs::Poly::new(field, message.clone()).unwrap();
    let expected = m.mul(rs.generator_poly()).unwrap();
    let coeffs = expected.coeffs();
    assert_eq!(&codeword[15 - coeffs.len()..], coeffs);
    assert!(matches!(
        rs.encode_parity(&message),
        Err(GaloisError::InvalidArgument(_))
    ));
}

#[test]
fn test_encode_rejects_bad_input() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    assert!(matches!(rs.encode(&[1; 8]), Err(GaloisError::ShapeMismatch { .. })));
    assert!(matches!(
        rs.encode(&[16, 0, 0, 0, 0, 0, 0, 0, 0]),
        Err(GaloisError::InvalidElement { value: 16, order: 16 })
    ));
    assert!(matches!(rs.decode(&[0; 14]), Err(GaloisError::ShapeMismatch { .. })));

    let other = GaloisField::builder(2, 4).irreducible_poly(0x19).build().unwrap();
    let messages = FieldMatrix::zeros(&other, 2, 9);
    assert!(matches!(
        rs.encode_batch(&messages),
        Err(GaloisError::TypeMismatch { .. })
    ));
}

#[test]
fn test_batch_encoding_matches_single() {
    let rs = ReedSolomon::new(31, 25).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let rows: Vec<Vec<u64>> = (0..8).map(|_| random_message(&rs, &mut rng)).collect();
    let messages = FieldMatrix::from_rows(rs.field(), &rows).unwrap();

    let codewords = rs.encode_batch(&messages).unwrap();
    let parity = rs.encode_parity_batch(&messages).unwrap();
    assert_eq!(codewords.shape(), (8, 31));
    assert_eq!(parity.shape(), (8, 6));
    for (i, row) in rows.iter().enumerate() {
        let single = rs.encode(row).unwrap();
        assert_eq!(codewords.row(i), single.as_slice());
        assert_eq!(parity.row(i), &single[25..]);
    }
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_rs_15_9_single_error() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    let message: Vec<u64> = (1..=9).collect();
    let mut codeword = rs.encode(&message).unwrap();
    codeword[3] ^= 5;

    let decoded = rs.decode_with_errors(&codeword).unwrap();
    assert_eq!(decoded.errors, ErrorCount::Corrected(1));
    assert_eq!(decoded.errors.as_i64(), 1);
    assert_eq!(decoded.message, message);
    assert_eq!(rs.decode(&codeword).unwrap(), message);
}

#[test]
fn test_rs_15_9_error_in_parity_and_clean_word() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    let message: Vec<u64> = vec![0; 9];
    let mut codeword = rs.encode(&message).unwrap();
    assert_eq!(rs.decode_with_errors(&codeword).unwrap().errors, ErrorCount::Corrected(0));

    codeword[14] = 1;
    codeword[10] = 12;
    codeword[0] = 3;
    let decoded = rs.decode_with_errors(&codeword).unwrap();
    assert_eq!(decoded.errors, ErrorCount::Corrected(3));
    assert_eq!(decoded.message, message);
}

#[test]
fn test_rs_15_9_beyond_capability() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    let message: Vec<u64> = (1..=9).collect();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let mut codeword = rs.encode(&message).unwrap();
        corrupt(&rs, &mut codeword, 4, &mut rng);
        let decoded = rs.decode_with_errors(&codeword).unwrap();
        // Either flagged, or a different codeword within distance t was found
        assert!(!decoded.errors.is_correctable() || decoded.message != message);
        if !decoded.errors.is_correctable() {
            assert_eq!(decoded.errors.as_i64(), -1);
            assert_eq!(decoded.message, codeword[..9].to_vec());
            assert_eq!(
                decoded.into_message(),
                Err(GaloisError::Uncorrectable { capacity: 3 })
            );
        }
    }
}

#[test]
fn test_rs_255_223_corrects_sixteen_errors() {
    let rs = ReedSolomon::new(255, 223).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for count in [1, 8, 15, 16] {
        let message = random_message(&rs, &mut rng);
        let mut codeword = rs.encode(&message).unwrap();
        corrupt(&rs, &mut codeword, count, &mut rng);
        let decoded = rs.decode_with_errors(&codeword).unwrap();
        assert_eq!(decoded.errors, ErrorCount::Corrected(count));
        assert_eq!(decoded.into_message().unwrap(), message);
    }
}

#[test]
fn test_non_systematic_decoding() {
    let rs = ReedSolomon::builder(15, 7).systematic(false).build().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for count in 0..=4 {
        let message = random_message(&rs, &mut rng);
        let mut codeword = rs.encode(&message).unwrap();
        corrupt(&rs, &mut codeword, count, &mut rng);
        let decoded = rs.decode_with_errors(&codeword).unwrap();
        assert_eq!(decoded.errors, ErrorCount::Corrected(count));
        assert_eq!(decoded.message, message);
    }
}

#[test]
fn test_non_narrow_sense_odd_characteristic() {
    // GF(3^3), roots alpha^4 .. alpha^9
    let rs = ReedSolomon::builder(26, 20).c(4).build().unwrap();
    assert!(!rs.is_narrow_sense());
    let mut rng = StdRng::seed_from_u64(9);
    for count in 0..=3 {
        let message = random_message(&rs, &mut rng);
        let mut codeword = rs.encode(&message).unwrap();
        corrupt(&rs, &mut codeword, count, &mut rng);
        let decoded = rs.decode_with_errors(&codeword).unwrap();
        assert_eq!(decoded.errors, ErrorCount::Corrected(count));
        assert_eq!(decoded.message, message);
    }
}

#[test]
fn test_prime_field_code() {
    let rs = ReedSolomon::new(6, 2).unwrap();
    assert!(rs.field().is_prime_field());
    let message = vec![4, 5];
    let mut codeword = rs.encode(&message).unwrap();
    codeword[1] = (codeword[1] + 3) % 7;
    codeword[4] = (codeword[4] + 1) % 7;
    let decoded = rs.decode_with_errors(&codeword).unwrap();
    assert_eq!(decoded.errors, ErrorCount::Corrected(2));
    assert_eq!(decoded.message, message);
}

#[test]
fn test_sequential_batch_matches_parallel() {
    // Large enough that the default config splits the products across threads
    let rs = ReedSolomon::new(255, 223).unwrap();
    let mut rng = StdRng::seed_from_u64(19);
    let rows: Vec<Vec<u64>> = (0..24).map(|_| random_message(&rs, &mut rng)).collect();
    let messages = FieldMatrix::from_rows(rs.field(), &rows).unwrap();
    let sequential = ExecutionConfig::sequential();

    let codewords = rs.encode_batch(&messages).unwrap();
    assert_eq!(rs.encode_batch_with_config(&messages, &sequential).unwrap(), codewords);
    assert_eq!(
        rs.encode_parity_batch_with_config(&messages, &sequential).unwrap(),
        codewords.columns(223..255).unwrap()
    );
    for (row, message) in codewords.iter_rows().zip(&rows) {
        assert_eq!(row, rs.encode(message).unwrap().as_slice());
    }

    let decoded = rs.decode_batch_with_config(&codewords, &sequential).unwrap();
    assert_eq!(decoded, rs.decode_batch(&codewords).unwrap());
    assert_eq!(decoded.messages, messages);
    assert!(decoded.errors.iter().all(|e| *e == ErrorCount::Corrected(0)));
}

#[test]
fn test_batch_decoding_isolates_rows() {
    let rs = ReedSolomon::new(15, 9).unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let messages: Vec<Vec<u64>> = (0..6).map(|_| random_message(&rs, &mut rng)).collect();
    let mut received = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        let mut codeword = rs.encode(message).unwrap();
        // Row 2 is swamped with errors, the others stay within t
        let count = if i == 2 { 7 } else { i % 4 };
        corrupt(&rs, &mut codeword, count, &mut rng);
        received.push(codeword);
    }
    let received = FieldMatrix::from_rows(rs.field(), &received).unwrap();

    let parallel = rs.decode_batch(&received).unwrap();
    let sequential = rs
        .decode_batch_with_config(&received, &ExecutionConfig::sequential())
        .unwrap();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel.messages.shape(), (6, 9));

    for (i, message) in messages.iter().enumerate() {
        if i == 2 {
            let row_ok = parallel.errors[i].is_correctable()
                && parallel.messages.row(i) == message.as_slice();
            assert!(!row_ok);
        } else {
            assert_eq!(parallel.errors[i], ErrorCount::Corrected(i % 4));
            assert_eq!(parallel.messages.row(i), message.as_slice());
        }
    }
}
