//! Matrices over finite fields

use galoisrs::{ExecutionConfig, FieldMatrix, GaloisError, GaloisField};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(gf: &std::sync::Arc<GaloisField>, rng: &mut StdRng, rows: usize, cols: usize) -> FieldMatrix {
    let data = (0..rows * cols)
        .map(|_| rng.random_range(0..gf.order()))
        .collect();
    FieldMatrix::new(gf, rows, cols, data).unwrap()
}

#[test]
fn test_construction_validates() {
    let gf = GaloisField::new(7, 1).unwrap();
    assert!(matches!(
        FieldMatrix::new(&gf, 2, 2, vec![1, 2, 3]),
        Err(GaloisError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![3]]),
        Err(GaloisError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        FieldMatrix::from_rows(&gf, &[vec![1, 9]]),
        Err(GaloisError::InvalidElement { value: 9, order: 7 })
    ));
}

#[test]
fn test_determinant_inverse_and_rank() {
    let gf = GaloisField::new(7, 1).unwrap();
    let a = FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![3, 4]]).unwrap();
    assert_eq!(a.determinant().unwrap(), 5);
    assert_eq!(a.rank().unwrap(), 2);
    let inv = a.inverse().unwrap();
    assert_eq!(a.matmul(&inv).unwrap(), FieldMatrix::identity(&gf, 2));
    assert_eq!(inv.matmul(&a).unwrap(), FieldMatrix::identity(&gf, 2));

    let singular = FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![2, 4]]).unwrap();
    assert_eq!(singular.determinant().unwrap(), 0);
    assert_eq!(singular.rank().unwrap(), 1);
    assert!(matches!(singular.inverse(), Err(GaloisError::InvalidArgument(_))));
}

#[test]
fn test_inverse_random_extension_field() {
    let gf = GaloisField::new(2, 8).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let mut checked = 0;
    while checked < 5 {
        let m = random_matrix(&gf, &mut rng, 6, 6);
        if m.determinant().unwrap() == 0 {
            assert!(m.inverse().is_err());
            continue;
        }
        let inv = m.inverse().unwrap();
        assert_eq!(m.matmul(&inv).unwrap(), FieldMatrix::identity(&gf, 6));
        checked += 1;
    }
}

#[test]
fn test_solve() {
    let gf = GaloisField::new(3, 2).unwrap();
    let a = FieldMatrix::from_rows(&gf, &[vec![1, 2, 0], vec![0, 1, 5], vec![3, 0, 1]]).unwrap();
    if a.determinant().unwrap() != 0 {
        let b = vec![4, 7, 2];
        let x = a.solve(&b).unwrap();
        let column = FieldMatrix::new(&gf, 3, 1, x).unwrap();
        assert_eq!(a.matmul(&column).unwrap().into_data(), b);
    }
}

#[test]
fn test_matmul_matches_vecmul() {
    let gf = GaloisField::new(31, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_matrix(&gf, &mut rng, 4, 9);
    let b = random_matrix(&gf, &mut rng, 9, 5);
    let product = a.matmul(&b).unwrap();
    for r in 0..a.rows() {
        assert_eq!(product.row(r), b.vecmul(a.row(r)).unwrap().as_slice());
    }
    assert_eq!(product.transpose(), b.transpose().matmul(&a.transpose()).unwrap());
}

#[test]
fn test_large_parallel_product() {
    let gf = GaloisField::new(2, 8).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_matrix(&gf, &mut rng, 64, 48);
    let b = random_matrix(&gf, &mut rng, 48, 40);
    let product = a.matmul(&b).unwrap();
    let i = 17;
    let j = 23;
    let expected = (0..48).fold(0, |acc, k| gf.add(acc, gf.mul(a.get(i, k), b.get(k, j))));
    assert_eq!(product.get(i, j), expected);
    let sequential = a.matmul_with_config(&b, &ExecutionConfig::sequential()).unwrap();
    assert_eq!(sequential, product);
}

#[test]
fn test_mismatched_operands() {
    let gf7 = GaloisField::new(7, 1).unwrap();
    let gf5 = GaloisField::new(5, 1).unwrap();
    let a = FieldMatrix::identity(&gf7, 2);
    let b = FieldMatrix::identity(&gf5, 2);
    assert!(matches!(a.matmul(&b), Err(GaloisError::TypeMismatch { .. })));
    assert!(matches!(a.add(&b), Err(GaloisError::TypeMismatch { .. })));

    let c = FieldMatrix::zeros(&gf7, 3, 2);
    assert!(matches!(a.matmul(&c), Err(GaloisError::ShapeMismatch { .. })));
    assert!(matches!(c.inverse(), Err(GaloisError::ShapeMismatch { .. })));
}

#[test]
fn test_stacking_and_slicing() {
    let gf = GaloisField::new(5, 1).unwrap();
    let a = FieldMatrix::from_rows(&gf, &[vec![1, 2], vec![3, 4]]).unwrap();
    let i = FieldMatrix::identity(&gf, 2);
    let stacked = a.hstack(&i).unwrap();
    assert_eq!(stacked.shape(), (2, 4));
    assert_eq!(stacked.columns(0..2).unwrap(), a);
    assert_eq!(stacked.columns(2..4).unwrap(), i);
    assert_eq!(a.add(&a).unwrap().to_rows(), vec![vec![2, 4], vec![1, 3]]);
    assert!(a.sub(&a).unwrap().data().iter().all(|&x| x == 0));
    assert_eq!(a.mul_elementwise(&i).unwrap().to_rows(), vec![vec![1, 0], vec![0, 4]]);
}

#[test]
fn test_row_reduce() {
    let gf = GaloisField::new(5, 1).unwrap();
    let a = FieldMatrix::from_rows(&gf, &[vec![2, 4, 1], vec![1, 2, 4]]).unwrap();
    let (reduced, rank) = a.row_reduce().unwrap();
    assert_eq!(rank, 2);
    // Second column is twice the first, so pivots land in columns 0 and 2
    assert_eq!(reduced.to_rows(), vec![vec![1, 2, 0], vec![0, 0, 1]]);
}

fn is_unit_lower(m: &FieldMatrix) -> bool {
    (0..m.rows()).all(|r| m.get(r, r) == 1 && (r + 1..m.cols()).all(|c| m.get(r, c) == 0))
}

fn is_upper(m: &FieldMatrix) -> bool {
    (0..m.rows()).all(|r| (0..r.min(m.cols())).all(|c| m.get(r, c) == 0))
}

#[test]
fn test_lu_decompose() {
    for gf in [GaloisField::new(2, 8).unwrap(), GaloisField::new(31, 1).unwrap()] {
        let mut rng = StdRng::seed_from_u64(11);
        let mut checked = 0;
        while checked < 5 {
            let a = random_matrix(&gf, &mut rng, 5, 5);
            let Ok((l, u)) = a.lu_decompose() else {
                continue;
            };
            assert!(is_unit_lower(&l));
            assert!(is_upper(&u));
            assert_eq!(l.matmul(&u).unwrap(), a);
            checked += 1;
        }
    }
}

#[test]
fn test_plu_decompose() {
    for gf in [GaloisField::new(3, 3).unwrap(), GaloisField::new(13, 1).unwrap()] {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let mut a = random_matrix(&gf, &mut rng, 6, 6);
            // Force a zero leading pivot so row exchanges are needed
            a.set(0, 0, 0).unwrap();
            let (p, l, u) = a.plu_decompose().unwrap();
            assert!(is_unit_lower(&l));
            assert!(is_upper(&u));
            assert_eq!(p.matmul(&l).unwrap().matmul(&u).unwrap(), a);
            assert_eq!(p.matmul(&p.transpose()).unwrap(), FieldMatrix::identity(&gf, 6));
        }
    }

    // Singular input still factors
    let gf = GaloisField::new(5, 1).unwrap();
    let singular = FieldMatrix::from_rows(&gf, &[vec![0, 0, 1], vec![0, 2, 3], vec![0, 4, 1]]).unwrap();
    let (p, l, u) = singular.plu_decompose().unwrap();
    assert_eq!(p.matmul(&l).unwrap().matmul(&u).unwrap(), singular);
    assert!(matches!(
        FieldMatrix::zeros(&gf, 2, 3).plu_decompose(),
        Err(GaloisError::ShapeMismatch { .. })
    ));
}
