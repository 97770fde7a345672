use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tilemul::{
    ALIGNMENT, CacheGeometry, VectorSupport, aligned_copy, matmul_reference, multiply,
    multiply_parallel, multiply_threaded, multiply_tiled, multiply_with, transpose, worker_range,
};

fn assert_matrices_close(expected: &[f64], actual: &[f64], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", name);
    for i in 0..expected.len() {
        assert!(
            (expected[i] - actual[i]).abs() < 1e-8,
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}

fn patterned(len: usize, modulus: usize) -> Vec<f64> {
    (0..len).map(|i| (i % modulus) as f64).collect()
}

fn random(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

// ============================================================
// Known-value tests
// ============================================================

#[test]
fn test_concrete_2x3() {
    // A = [[1,2,3],[4,5,6]], B = [[1,0],[0,1],[1,1]] (3×2)
    let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let b = vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0];

    let mut bt = vec![0.0; 6];
    transpose(&b, &mut bt, 3, 2);
    assert_eq!(bt, vec![1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);

    let c = multiply(&a, &bt, 2, 3, 2).unwrap();
    assert_eq!(c, vec![4.0, 5.0, 10.0, 11.0]);
}

#[test]
fn test_2x2_multiply() {
    let a = vec![1.0, 2.0, 3.0, 4.0];
    let bt = vec![5.0, 6.0, 7.0, 8.0];

    let mut c_ref = vec![0.0; 4];
    matmul_reference(&a, &bt, &mut c_ref, 2, 2, 2);

    let c = multiply(&a, &bt, 2, 2, 2).unwrap();
    assert_matrices_close(&c_ref, &c, "2x2");
}

// ============================================================
// Reference comparison across shapes
// ============================================================

#[test]
fn test_small_odd_sizes() {
    let test_sizes = [
        (3, 3, 3),
        (5, 5, 5),
        (7, 7, 7),
        (3, 5, 7),
        (7, 3, 5),
        (11, 13, 17),
    ];

    for (m, n, k) in test_sizes {
        let a = patterned(m * n, 10);
        let bt = patterned(k * n, 10);

        let mut c_ref = vec![0.0; m * k];
        matmul_reference(&a, &bt, &mut c_ref, m, n, k);

        let c = multiply(&a, &bt, m, n, k).unwrap();
        assert_matrices_close(&c_ref, &c, &format!("{}x{}x{}", m, n, k));
    }
}

#[test]
fn test_vector_tail_lengths() {
    // n around the 4-lane boundary exercises the scalar tail of the kernel.
    for n in [1, 3, 4, 5, 8, 9] {
        let (m, k) = (6, 7);
        let a = random(m * n, 1);
        let bt = random(k * n, 2);

        let mut c_ref = vec![0.0; m * k];
        matmul_reference(&a, &bt, &mut c_ref, m, n, k);

        let c = multiply(&a, &bt, m, n, k).unwrap();
        assert_matrices_close(&c_ref, &c, &format!("tail_n_{}", n));
    }
}

#[test]
fn test_random_larger_sizes() {
    let test_sizes = [(33, 29, 47), (64, 64, 64), (65, 67, 63)];

    for (m, n, k) in test_sizes {
        let a = random(m * n, 3);
        let bt = random(k * n, 4);

        let mut c_ref = vec![0.0; m * k];
        matmul_reference(&a, &bt, &mut c_ref, m, n, k);

        let c = multiply(&a, &bt, m, n, k).unwrap();
        assert_matrices_close(&c_ref, &c, &format!("random_{}x{}x{}", m, n, k));
    }
}

// ============================================================
// Blocking and kernel-path invariance
// ============================================================

#[test]
fn test_geometry_invariance() {
    // Tiling never splits the shared dimension, so any geometry must produce
    // bit-identical output, including degenerate one-row blocks.
    let (m, n, k) = (23, 31, 19);
    let a = random(m * n, 5);
    let bt = random(k * n, 6);

    let baseline = multiply_with(&a, &bt, m, n, k, CacheGeometry::default()).unwrap();

    let geometries = [
        CacheGeometry::new(16, 64, 256),
        CacheGeometry::new(1024, 8 * 1024, 64 * 1024),
        CacheGeometry::new(32 * 1024, 256 * 1024, 8 * 1024 * 1024),
    ];

    for geometry in geometries {
        let c = multiply_with(&a, &bt, m, n, k, geometry).unwrap();
        assert_eq!(baseline, c, "geometry {:?}", geometry);
    }
}

#[test]
fn test_scalar_matches_detected() {
    let (m, n, k) = (17, 21, 13);
    let a = random(m * n, 7);
    let bt = random(k * n, 8);

    let mut c_scalar = vec![0.0; m * k];
    let mut c_detected = vec![0.0; m * k];
    let geometry = CacheGeometry::default();

    multiply_tiled(&a, &bt, &mut c_scalar, m, n, k, geometry, VectorSupport::Scalar);
    multiply_tiled(&a, &bt, &mut c_detected, m, n, k, geometry, VectorSupport::detect());

    assert_matrices_close(&c_scalar, &c_detected, "scalar_vs_detected");
}

// ============================================================
// Partitioning
// ============================================================

#[test]
fn test_worker_range_tiles_output_exactly() {
    let shapes = [(0, 0), (1, 1), (2, 3), (5, 5), (7, 11), (16, 16), (13, 1)];

    for (m, k) in shapes {
        for workers in 1..=8 {
            let mut next = 0;
            for worker in 1..=workers {
                let range = worker_range(m, k, worker, workers);
                assert_eq!(
                    range.start, next,
                    "gap or overlap at worker {} of {} for {}x{}",
                    worker, workers, m, k
                );
                assert!(range.end >= range.start);
                next = range.end;
            }
            assert_eq!(next, m * k, "{} workers must cover {}x{}", workers, m, k);
        }
    }
}

#[test]
#[should_panic(expected = "worker ordinal")]
fn test_worker_range_rejects_bad_ordinal() {
    worker_range(4, 4, 5, 4);
}

#[test]
fn test_parallel_merged_equals_sequential() {
    let (m, n, k) = (19, 23, 17);
    let a = random(m * n, 9);
    let bt = random(k * n, 10);

    let expected = multiply(&a, &bt, m, n, k).unwrap();

    for workers in 1..=8 {
        let mut c = vec![0.0; m * k];
        for worker in 1..=workers {
            multiply_parallel(&a, &bt, &mut c, m, n, k, worker, workers).unwrap();
        }
        assert_eq!(expected, c, "{} workers", workers);
    }
}

#[test]
fn test_parallel_writes_only_own_range() {
    let (m, n, k) = (6, 5, 7);
    let a = patterned(m * n, 9);
    let bt = patterned(k * n, 7);

    let sentinel = f64::NAN;
    let workers = 4;
    let worker = 2;

    let mut c = vec![sentinel; m * k];
    multiply_parallel(&a, &bt, &mut c, m, n, k, worker, workers).unwrap();

    let range = worker_range(m, k, worker, workers);
    for (idx, value) in c.iter().enumerate() {
        if range.contains(&idx) {
            assert!(!value.is_nan(), "cell {} in range left unwritten", idx);
        } else {
            assert!(value.is_nan(), "cell {} outside range was written", idx);
        }
    }
}

#[test]
fn test_threaded_matches_sequential() {
    let test_sizes = [(8, 8, 8), (64, 64, 64), (100, 35, 77)];

    for (m, n, k) in test_sizes {
        let a = random(m * n, 11);
        let bt = random(k * n, 12);

        let expected = multiply(&a, &bt, m, n, k).unwrap();

        for threads in [1, 2, 4, 7] {
            let mut c = vec![0.0; m * k];
            multiply_threaded(&a, &bt, &mut c, m, n, k, threads).unwrap();
            assert_eq!(expected, c, "{}x{}x{} with {} threads", m, n, k, threads);
        }
    }
}

// ============================================================
// Degenerate shapes
// ============================================================

#[test]
fn test_zero_sized_dimensions() {
    // m = 0: no rows, empty output.
    let c = multiply(&[], &patterned(12, 5), 0, 3, 4).unwrap();
    assert!(c.is_empty());

    // k = 0: no columns, empty output.
    let c = multiply(&patterned(12, 5), &[], 4, 3, 0).unwrap();
    assert!(c.is_empty());

    // n = 0: empty dot products, all-zero 2x3 output.
    let c = multiply(&[], &[], 2, 0, 3).unwrap();
    assert_eq!(c, vec![0.0; 6]);

    // Parallel path on the same degenerate shapes.
    let mut c = vec![0.0; 6];
    for worker in 1..=3 {
        multiply_parallel(&[], &[], &mut c, 2, 0, 3, worker, 3).unwrap();
    }
    assert_eq!(c, vec![0.0; 6]);

    let mut empty: Vec<f64> = Vec::new();
    multiply_threaded(&patterned(12, 5), &[], &mut empty, 4, 3, 0, 4).unwrap();
}

// ============================================================
// Aligned copies
// ============================================================

#[test]
fn test_aligned_copy_round_trip() {
    let src = random(129, 13);
    let copy = aligned_copy(&src).unwrap();

    assert_eq!(&copy[..], &src[..]);
    for (orig, copied) in src.iter().zip(copy.iter()) {
        assert_eq!(orig.to_bits(), copied.to_bits());
    }
    assert_eq!(copy.as_ptr() as usize % ALIGNMENT, 0);
}

#[test]
fn test_aligned_copy_empty() {
    let copy = aligned_copy(&[]).unwrap();
    assert!(copy.is_empty());
}
