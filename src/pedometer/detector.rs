// PedoWatch — Step Detector
//
// Two-state hysteresis detector with a refractory interval. A step is
// counted on the falling edge (AboveThreshold -> BelowThreshold), and only if
// at least `min_step_interval_ms` has elapsed since the previous counted step.

use crate::config::DetectorConfig;
use crate::events::StepEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    BelowThreshold,
    AboveThreshold,
}

pub struct StepDetector {
    threshold_high: f32,
    threshold_low: f32,
    min_step_interval_ms: u64,
    state: DetectorState,
    /// `None` until the first step, so the first qualifying crossing always counts.
    last_step_ms: Option<u64>,
}

impl StepDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            threshold_high: config.threshold_high,
            threshold_low: config.threshold_low,
            min_step_interval_ms: config.min_step_interval_ms,
            state: DetectorState::BelowThreshold,
            last_step_ms: None,
        }
    }

    /// Advance the state machine with one filtered value observed at `now_ms`.
    pub fn update(&mut self, value: f32, now_ms: u64) -> Option<StepEvent> {
        match self.state {
            DetectorState::BelowThreshold => {
                if value > self.threshold_high {
                    self.state = DetectorState::AboveThreshold;
                }
                None
            }
            DetectorState::AboveThreshold => {
                if value >= self.threshold_low {
                    return None;
                }
                self.state = DetectorState::BelowThreshold;

                let due = match self.last_step_ms {
                    None => true,
                    Some(last) => now_ms.saturating_sub(last) >= self.min_step_interval_ms,
                };
                if !due {
                    log::trace!("Suppressed bounce at {} ms", now_ms);
                    return None;
                }
                self.last_step_ms = Some(now_ms);
                Some(StepEvent { timestamp_ms: now_ms })
            }
        }
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn last_step_ms(&self) -> Option<u64> {
        self.last_step_ms
    }

    pub fn reset(&mut self) {
        self.state = DetectorState::BelowThreshold;
        self.last_step_ms = None;
    }
}
