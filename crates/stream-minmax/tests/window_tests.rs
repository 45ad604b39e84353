//! Windowed extrema against a from-scratch reference

use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::thread;
use stream_core::Metric;
use stream_minmax::{Max, Min};

fn generate_stream(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect()
}

fn reference(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

#[test]
fn test_value_depends_only_on_last_window() {
    let stream = generate_stream(5_000, 21);
    for window in [1usize, 3, 10, 64, 1000] {
        let min = Min::new(window as i64).unwrap();
        let max = Max::new(window as i64).unwrap();
        for (i, &x) in stream.iter().enumerate() {
            min.push(x).unwrap();
            max.push(x).unwrap();
            let start = (i + 1).saturating_sub(window);
            let (lo, hi) = reference(&stream[start..=i]);
            assert_eq!(min.value().unwrap(), lo);
            assert_eq!(max.value().unwrap(), hi);
        }
    }
}

#[test]
fn test_clear_then_replay_matches_fresh_instance() {
    let stream = generate_stream(200, 5);
    let reused = Max::new(8).unwrap();
    reused.push_all(&generate_stream(30, 6)).unwrap();
    reused.clear();
    reused.push_all(&stream).unwrap();

    let fresh = Max::new(8).unwrap();
    fresh.push_all(&stream).unwrap();
    assert_eq!(reused.value().unwrap(), fresh.value().unwrap());
    assert_eq!(reused.len().unwrap(), fresh.len().unwrap());
}

#[test]
fn test_shared_between_threads() {
    let min = Arc::new(Min::new(0).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let min = Arc::clone(&min);
            thread::spawn(move || {
                for i in 0..100 {
                    min.push((t * 100 + i) as f64).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(min.value().unwrap(), 0.0);
    assert_eq!(min.len().unwrap(), 400);
}

#[test]
fn test_nan_reported_the_same_by_window_and_global() {
    let global = Min::new(0).unwrap();
    let windowed = Min::new(4).unwrap();
    for x in [2.0, f64::NAN, -1.0] {
        global.push(x).unwrap();
        windowed.push(x).unwrap();
    }
    assert!(global.value().unwrap().is_nan());
    assert!(windowed.value().unwrap().is_nan());
}

proptest! {
    #[test]
    fn prop_global_window_matches_fold(values in prop::collection::vec(-1e9f64..1e9, 1..500)) {
        let min = Min::new(0).unwrap();
        let max = Max::new(0).unwrap();
        min.push_all(&values).unwrap();
        max.push_all(&values).unwrap();
        let (lo, hi) = reference(&values);
        prop_assert_eq!(min.value().unwrap(), lo);
        prop_assert_eq!(max.value().unwrap(), hi);
    }
}
