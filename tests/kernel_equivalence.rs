use rand::rngs::StdRng;
use rand::SeedableRng;

use tilebench::kernels::{multiply_blocked, multiply_naive, multiply_standard};
use tilebench::Matrix;
use tilebench::TilebenchError;

fn random_square_pair(n: usize, seed: u64) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = Matrix::random(n, n, &mut rng).unwrap();
    let b = Matrix::random(n, n, &mut rng).unwrap();
    (a, b)
}

fn assert_matrices_identical(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.rows(), actual.rows(), "{}: row mismatch", name);
    assert_eq!(expected.cols(), actual.cols(), "{}: col mismatch", name);
    let expected = expected.as_slice();
    let actual = actual.as_slice();
    for i in 0..expected.len() {
        // Strict equality: both kernels accumulate in the same order.
        assert!(
            expected[i] == actual[i],
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}

// ============================================================
// Blocked kernel vs the standard reference
// ============================================================

#[test]
fn test_blocked_equals_standard_across_block_sizes() {
    let n = 96;
    let (a, b) = random_square_pair(n, 42);

    let mut c_standard = Matrix::zeroed(n, n).unwrap();
    multiply_standard(&a, &b, &mut c_standard).unwrap();

    // Dividing sizes, non-dividing sizes and sizes past the dimension.
    let block_sizes = [1, 7, 8, 16, 20, 32, 48, 96, 100, 200];

    for block_size in block_sizes {
        let mut c_blocked = Matrix::zeroed(n, n).unwrap();
        multiply_blocked(&a, &b, &mut c_blocked, block_size).unwrap();
        assert_matrices_identical(
            &c_standard,
            &c_blocked,
            &format!("block_size_{}", block_size),
        );
    }
}

#[test]
fn test_block_size_at_dimension_degenerates_to_single_tile() {
    let n = 32;
    let (a, b) = random_square_pair(n, 7);

    let mut c_standard = Matrix::zeroed(n, n).unwrap();
    let mut c_one_tile = Matrix::zeroed(n, n).unwrap();
    let mut c_past_dim = Matrix::zeroed(n, n).unwrap();

    multiply_standard(&a, &b, &mut c_standard).unwrap();
    multiply_blocked(&a, &b, &mut c_one_tile, n).unwrap();
    multiply_blocked(&a, &b, &mut c_past_dim, 2 * n).unwrap();

    assert_matrices_identical(&c_standard, &c_one_tile, "block_size_eq_dim");
    assert_matrices_identical(&c_standard, &c_past_dim, "block_size_past_dim");
}

#[test]
fn test_non_dividing_block_size_covers_every_index() {
    // 17 is prime, so no block size in 2..17 divides it. If any (i, j, k)
    // triple were skipped or double-counted, the exact sums would differ.
    let n = 17;
    let (a, b) = random_square_pair(n, 99);

    let mut c_standard = Matrix::zeroed(n, n).unwrap();
    multiply_standard(&a, &b, &mut c_standard).unwrap();

    for block_size in 2..n {
        let mut c_blocked = Matrix::zeroed(n, n).unwrap();
        multiply_blocked(&a, &b, &mut c_blocked, block_size).unwrap();
        assert_matrices_identical(&c_standard, &c_blocked, &format!("prime_bs_{}", block_size));
    }
}

// ============================================================
// Known products
// ============================================================

#[test]
fn test_all_ones_4x4_with_block_size_2() {
    let a = Matrix::from_vec(4, 4, vec![1.0; 16]).unwrap();
    let b = Matrix::from_vec(4, 4, vec![1.0; 16]).unwrap();
    let mut c = Matrix::zeroed(4, 4).unwrap();

    multiply_blocked(&a, &b, &mut c, 2).unwrap();

    // Each dot product sums four 1*1 terms.
    assert!(c.as_slice().iter().all(|&v| v == 4.0));
}

#[test]
fn test_identity_times_matrix_with_block_size_1() {
    let identity = Matrix::identity(3).unwrap();
    let m = Matrix::from_vec(3, 3, vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0, 3.0]).unwrap();
    let mut c = Matrix::zeroed(3, 3).unwrap();

    multiply_blocked(&identity, &m, &mut c, 1).unwrap();

    assert_eq!(c, m);
}

#[test]
fn test_naive_and_standard_agree_on_integer_inputs() {
    let n = 24;
    let (a, b) = random_square_pair(n, 3);

    let mut c_naive = Matrix::zeroed(n, n).unwrap();
    let mut c_standard = Matrix::zeroed(n, n).unwrap();

    multiply_naive(&a, &b, &mut c_naive).unwrap();
    multiply_standard(&a, &b, &mut c_standard).unwrap();

    // Inputs are small integers, so the sums are exact in f64 regardless of
    // accumulation order.
    assert_matrices_identical(&c_naive, &c_standard, "naive_vs_standard");
}

// ============================================================
// Operand checks
// ============================================================

#[test]
fn test_incompatible_operands_are_rejected() {
    let a = Matrix::zeroed(4, 5).unwrap();
    let b = Matrix::zeroed(6, 4).unwrap();
    let mut c = Matrix::zeroed(4, 4).unwrap();

    for result in [
        multiply_naive(&a, &b, &mut c),
        multiply_standard(&a, &b, &mut c),
        multiply_blocked(&a, &b, &mut c, 2),
    ] {
        assert_eq!(
            result.unwrap_err(),
            TilebenchError::DimensionMismatch {
                left: (4, 5),
                right: (6, 4)
            }
        );
    }
}

#[test]
fn test_rectangular_product_matches_across_kernels() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = Matrix::random(10, 22, &mut rng).unwrap();
    let b = Matrix::random(22, 14, &mut rng).unwrap();

    let mut c_standard = Matrix::zeroed(10, 14).unwrap();
    let mut c_blocked = Matrix::zeroed(10, 14).unwrap();

    multiply_standard(&a, &b, &mut c_standard).unwrap();
    multiply_blocked(&a, &b, &mut c_blocked, 5).unwrap();

    assert_matrices_identical(&c_standard, &c_blocked, "rectangular");
}
