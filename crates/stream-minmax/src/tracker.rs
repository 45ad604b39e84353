//! Monotonic deque engine shared by the minimum and maximum metrics
//!
//! The deque holds, in arrival order, only the samples that can still become
//! the extreme of the window: a new sample drops every entry behind it that
//! it dominates, since those entries will expire before it does. The front
//! is therefore always the current extreme, and each sample is pushed and
//! popped at most once (amortized O(1) per push).

use num_traits::Float;
use std::collections::VecDeque;
use std::marker::PhantomData;
use stream_core::{BoundedHistory, IdSequence, Observation, Result, Window};
use tracing::trace;

/// Which extreme a tracker follows
pub trait Extremum: Send + Sync + 'static {
    /// Label used in metric descriptions
    const NAME: &'static str;

    /// Value of the running extreme before any sample is seen
    fn identity<T: Float>() -> T;

    /// True if `candidate` is at least as extreme as `incumbent`
    ///
    /// NaN is more extreme than any number, so a NaN sample is the extreme
    /// for as long as it stays in the window.
    fn supersedes<T: Float>(candidate: T, incumbent: T) -> bool;
}

/// Track the largest sample
#[derive(Debug, Clone, Copy, Default)]
pub struct Maximum;

/// Track the smallest sample
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimum;

impl Extremum for Maximum {
    const NAME: &'static str = "Max";

    fn identity<T: Float>() -> T {
        T::neg_infinity()
    }

    fn supersedes<T: Float>(candidate: T, incumbent: T) -> bool {
        candidate.is_nan() || candidate >= incumbent
    }
}

impl Extremum for Minimum {
    const NAME: &'static str = "Min";

    fn identity<T: Float>() -> T {
        T::infinity()
    }

    fn supersedes<T: Float>(candidate: T, incumbent: T) -> bool {
        candidate.is_nan() || candidate <= incumbent
    }
}

/// Windowed extreme of a stream
///
/// With a global window the deque and history are bypassed and a single
/// running extreme is kept instead.
#[derive(Debug, Clone)]
pub struct MonotonicExtremeTracker<T, O> {
    window: Window,
    history: BoundedHistory<Observation<T>>,
    deque: VecDeque<Observation<T>>,
    running: T,
    count: usize,
    ids: IdSequence,
    _order: PhantomData<O>,
}

impl<T: Float, O: Extremum> MonotonicExtremeTracker<T, O> {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            history: BoundedHistory::new(window),
            deque: VecDeque::new(),
            running: O::identity(),
            count: 0,
            ids: IdSequence::new(),
            _order: PhantomData,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Number of live samples
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Add a sample, evicting the oldest one if the window is full
    pub fn push(&mut self, x: T) -> Result<()> {
        if self.window.is_global() {
            if O::supersedes(x, self.running) {
                self.running = x;
            }
            self.count += 1;
            return Ok(());
        }

        let sample = self.ids.stamp(x);
        let expired = self
            .history
            .admit(sample, x.to_f64().unwrap_or(f64::NAN))?;
        if let Some(expired) = expired {
            self.count -= 1;
            if self
                .deque
                .front()
                .is_some_and(|front| front.same_sample(&expired))
            {
                trace!(id = expired.id, "expired sample was the current {}", O::NAME);
                self.deque.pop_front();
            }
        }
        self.count += 1;

        while self
            .deque
            .back()
            .is_some_and(|back| O::supersedes(x, back.value))
        {
            self.deque.pop_back();
        }
        self.deque.push_back(sample);
        Ok(())
    }

    /// Current extreme, or `None` before any sample
    pub fn value(&self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        if self.window.is_global() {
            return Some(self.running);
        }
        self.deque.front().map(|front| front.value)
    }

    /// Back to the freshly constructed state
    pub fn clear(&mut self) {
        self.history.reset();
        self.deque = VecDeque::new();
        self.running = O::identity();
        self.count = 0;
        self.ids.reset();
    }

    /// Values still eligible to become the extreme, front first
    pub fn candidates(&self) -> impl Iterator<Item = T> + '_ {
        self.deque.iter().map(|o| o.value)
    }

    #[cfg(test)]
    pub(crate) fn history_mut(&mut self) -> &mut BoundedHistory<Observation<T>> {
        &mut self.history
    }

    #[cfg(test)]
    pub(crate) fn running(&self) -> T {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker<O: Extremum>(window: usize) -> MonotonicExtremeTracker<f64, O> {
        MonotonicExtremeTracker::new(Window::bounded(window))
    }

    #[test]
    fn test_max_deque_shape() {
        let mut max = tracker::<Maximum>(5);
        for x in [9.0, 4.0, 6.0, 1.0, 8.0] {
            max.push(x).unwrap();
        }
        assert_eq!(max.candidates().collect::<Vec<_>>(), vec![9.0, 8.0]);
        assert_eq!(max.value(), Some(9.0));

        // 9 expires
        max.push(2.0).unwrap();
        assert_eq!(max.candidates().collect::<Vec<_>>(), vec![8.0, 2.0]);
        assert_eq!(max.value(), Some(8.0));
    }

    #[test]
    fn test_min_deque_shape() {
        let mut min = tracker::<Minimum>(5);
        for x in [9.0, 4.0, 6.0, 1.0, 8.0, 2.0, 2.0, 5.0, 5.0, 3.0] {
            min.push(x).unwrap();
        }
        assert_eq!(min.candidates().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(min.value(), Some(2.0));
        assert_eq!(min.len(), 5);
    }

    #[test]
    fn test_equal_values_keep_newest_instance() {
        let mut max = tracker::<Maximum>(2);
        max.push(7.0).unwrap();
        max.push(7.0).unwrap();
        assert_eq!(max.candidates().count(), 1);

        // The first 7 expires but the live duplicate is still the max
        max.push(1.0).unwrap();
        assert_eq!(max.value(), Some(7.0));

        max.push(0.0).unwrap();
        assert_eq!(max.value(), Some(1.0));
    }

    #[test]
    fn test_global_window_tracks_running_extreme() {
        let mut min = tracker::<Minimum>(0);
        assert_eq!(min.value(), None);
        for x in [9.0, 4.0, 6.0, 1.0, 8.0] {
            min.push(x).unwrap();
        }
        assert_eq!(min.value(), Some(1.0));
        assert_eq!(min.candidates().count(), 0);
        assert_eq!(min.len(), 5);
    }

    #[test]
    fn test_clear() {
        let mut max = tracker::<Maximum>(3);
        for x in [1.0, 2.0, 3.0] {
            max.push(x).unwrap();
        }
        max.clear();
        assert!(max.is_empty());
        assert_eq!(max.value(), None);
        assert_eq!(max.running(), f64::NEG_INFINITY);
        assert_eq!(max.candidates().count(), 0);
    }

    fn replay<O: Extremum>(
        window: usize,
        stream: &[f64],
    ) -> (Vec<f64>, MonotonicExtremeTracker<f64, O>) {
        let mut tracker = tracker::<O>(window);
        let values = stream
            .iter()
            .map(|&x| {
                tracker.push(x).unwrap();
                tracker.value().unwrap()
            })
            .collect();
        (values, tracker)
    }

    #[test]
    fn test_nan_is_extreme_while_live() {
        let stream = [3.0, f64::NAN, 1.0, 5.0, 2.0];

        for (global, windowed) in [
            (replay::<Maximum>(0, &stream).0, replay::<Maximum>(3, &stream).0),
            (replay::<Minimum>(0, &stream).0, replay::<Minimum>(3, &stream).0),
        ] {
            assert_eq!(global[0], 3.0);
            assert_eq!(windowed[0], 3.0);

            // Global mode never forgets the NaN
            assert!(global[1..].iter().all(|v| v.is_nan()));

            // The window reports NaN until it expires on the fifth push
            assert!(windowed[1..4].iter().all(|v| v.is_nan()));
            assert!(!windowed[4].is_nan());
        }

        let (values, max) = replay::<Maximum>(3, &stream);
        assert_eq!(values[4], 5.0);
        assert_eq!(max.candidates().collect::<Vec<_>>(), vec![5.0, 2.0]);

        let (values, min) = replay::<Minimum>(3, &stream);
        assert_eq!(values[4], 1.0);
        assert_eq!(min.candidates().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_failed_push_leaves_deque_untouched() {
        let mut max = tracker::<Maximum>(3);
        for x in [5.0, 1.0, 2.0] {
            max.push(x).unwrap();
        }
        max.history_mut().dispose();

        let err = max.push(9.0).unwrap_err();
        assert_eq!(err.to_string(), "error popping item from queue: queue: disposed");
        assert_eq!(max.len(), 3);
        assert_eq!(max.value(), Some(5.0));
        assert_eq!(max.candidates().collect::<Vec<_>>(), vec![5.0, 2.0]);
    }

    fn assert_strictly_monotonic<O: Extremum>(tracker: &MonotonicExtremeTracker<f64, O>) {
        let values: Vec<f64> = tracker.candidates().collect();
        for pair in values.windows(2) {
            assert!(
                O::supersedes(pair[0], pair[1]) && pair[0] != pair[1],
                "{} deque not strictly monotonic: {values:?}",
                O::NAME
            );
        }
    }

    proptest! {
        #[test]
        fn prop_deques_stay_monotonic_and_exact(
            values in prop::collection::vec(-20i32..20, 1..300),
            window in 1usize..30
        ) {
            let mut max = tracker::<Maximum>(window);
            let mut min = tracker::<Minimum>(window);
            for (i, &v) in values.iter().enumerate() {
                max.push(v as f64).unwrap();
                min.push(v as f64).unwrap();
                assert_strictly_monotonic(&max);
                assert_strictly_monotonic(&min);

                let start = (i + 1).saturating_sub(window);
                let live = &values[start..=i];
                prop_assert_eq!(max.value(), live.iter().max().map(|&m| m as f64));
                prop_assert_eq!(min.value(), live.iter().min().map(|&m| m as f64));
            }
        }
    }
}
