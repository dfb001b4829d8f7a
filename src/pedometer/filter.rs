// PedoWatch — Magnitude Signal Filter
//
// Moving average over the last N magnitudes (running sum, O(1) per sample,
// fixed-size ring) minus a slow exponential baseline that tracks gravity.
// The output is a signed deviation in g centred on zero, so the step
// thresholds do not depend on sensor gain or on gravity being exactly 1 g.

use crate::events::AccelSample;

pub struct SignalFilter<const N: usize> {
    window: [f32; N],
    index: usize,
    filled: usize,
    sum: f32,
    baseline: Option<f32>,
    baseline_alpha: f32,
}

impl<const N: usize> SignalFilter<N> {
    pub fn new(baseline_alpha: f32) -> Self {
        assert!(N > 0, "filter window must hold at least one sample");
        Self {
            window: [0.0; N],
            index: 0,
            filled: 0,
            sum: 0.0,
            baseline: None,
            baseline_alpha,
        }
    }

    /// Feed one sample. Returns `None` while the window is still warming up
    /// (the first `N - 1` samples after a reset); detection is suppressed for
    /// those samples.
    pub fn process(&mut self, sample: &AccelSample) -> Option<f32> {
        self.process_magnitude(sample.magnitude())
    }

    /// Non-finite magnitudes are dropped without touching any state.
    pub fn process_magnitude(&mut self, magnitude: f32) -> Option<f32> {
        if !magnitude.is_finite() {
            log::warn!("Ignoring non-finite accelerometer magnitude {}", magnitude);
            return None;
        }

        // Slot being overwritten leaves the running sum.
        self.sum += magnitude - self.window[self.index];
        self.window[self.index] = magnitude;
        self.index = (self.index + 1) % N;
        if self.filled < N {
            self.filled += 1;
        } else if self.index == 0 {
            // Re-derive once per lap so float drift cannot accumulate.
            self.sum = self.window.iter().sum();
        }

        let baseline = match self.baseline {
            Some(b) => b + self.baseline_alpha * (magnitude - b),
            None => magnitude,
        };
        self.baseline = Some(baseline);

        if !self.is_warm() {
            return None;
        }
        Some(self.sum / N as f32 - baseline)
    }

    pub fn is_warm(&self) -> bool {
        self.filled == N
    }

    pub fn reset(&mut self) {
        self.window = [0.0; N];
        self.index = 0;
        self.filled = 0;
        self.sum = 0.0;
        self.baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_output_until_window_is_full() {
        let mut filter = SignalFilter::<4>::new(0.02);
        for _ in 0..3 {
            assert_eq!(filter.process_magnitude(1.0), None);
        }
        assert!(filter.process_magnitude(1.0).is_some());
        assert!(filter.is_warm());
    }

    #[test]
    fn steady_gravity_filters_to_zero() {
        let mut filter = SignalFilter::<5>::new(0.02);
        let still = AccelSample::new(0.0, 0.0, 1.0);
        let mut last = None;
        for _ in 0..200 {
            last = filter.process(&still);
        }
        let value = last.expect("window should be warm");
        assert!(value.abs() < 1e-5, "resting signal should be ~0, got {}", value);
    }

    #[test]
    fn moving_average_smooths_single_spike() {
        let mut filter = SignalFilter::<5>::new(0.02);
        for _ in 0..50 {
            filter.process_magnitude(1.0);
        }
        let spiked = filter.process_magnitude(2.0).unwrap();
        // A 1 g spike spread over five samples, minus a baseline that moved 0.02 g.
        assert!((spiked - 0.18).abs() < 1e-3, "got {}", spiked);
    }

    #[test]
    fn non_finite_magnitude_leaves_state_untouched() {
        let mut filter = SignalFilter::<5>::new(0.02);
        for _ in 0..50 {
            filter.process_magnitude(1.0);
        }
        assert_eq!(filter.process_magnitude(f32::INFINITY), None);
        assert_eq!(filter.process_magnitude(f32::NAN), None);
        assert_eq!(filter.process(&AccelSample::new(0.0, f32::NEG_INFINITY, 1.0)), None);

        let value = filter.process_magnitude(1.0).expect("window stays warm");
        assert!(value.abs() < 1e-6, "baseline was disturbed: {}", value);
        let spiked = filter.process_magnitude(2.0).unwrap();
        assert!((spiked - 0.18).abs() < 1e-3, "got {}", spiked);
    }

    #[test]
    fn non_finite_during_warm_up_does_not_count_towards_window() {
        let mut filter = SignalFilter::<3>::new(0.1);
        assert_eq!(filter.process_magnitude(f32::NAN), None);
        assert_eq!(filter.process_magnitude(1.0), None);
        assert_eq!(filter.process_magnitude(1.0), None);
        assert!(!filter.is_warm());
        let value = filter.process_magnitude(1.0).unwrap();
        assert!(value.abs() < 1e-6, "got {}", value);
    }

    #[test]
    fn reset_restarts_warm_up() {
        let mut filter = SignalFilter::<3>::new(0.1);
        for _ in 0..10 {
            filter.process_magnitude(1.3);
        }
        filter.reset();
        assert!(!filter.is_warm());
        assert_eq!(filter.process_magnitude(1.0), None);
        assert_eq!(filter.process_magnitude(1.0), None);
        let value = filter.process_magnitude(1.0).unwrap();
        assert!(value.abs() < 1e-6, "stale history leaked into {}", value);
    }
}
