// PedoWatch — Step Detection Engine
//
// Sample path: SampleSource -> SignalFilter -> StepDetector -> StepCounter.
// The platform pushes every accelerometer reading into `on_sample` (or
// `on_sample_at` when it stamped the reading itself); the engine never polls
// and never queues, so samples are handled strictly in arrival order. Distance is derived on demand from the count and a height.

mod counter;
mod detector;
mod distance;
mod filter;

pub use counter::StepCounter;
pub use detector::{DetectorState, StepDetector};
pub use distance::estimate_distance;
pub use filter::SignalFilter;

use crate::config::{DetectorConfig, FILTER_WINDOW};
use crate::error::{ConfigError, DetectionError, SensorError};
use crate::events::{AccelSample, StepEvent};
use crate::height::UserHeight;

/// Platform accelerometer. Samples themselves are delivered by calling
/// [`Pedometer::on_sample`]; this trait only switches delivery on and off.
pub trait SampleSource {
    fn subscribe(&mut self, sample_rate_hz: u32) -> Result<(), SensorError>;
    /// Must tolerate being called when not subscribed.
    fn unsubscribe(&mut self);
}

/// Monotonic millisecond clock used for the step refractory interval.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<F: Fn() -> u64> Clock for F {
    fn now_ms(&self) -> u64 {
        self()
    }
}

pub struct Pedometer<S: SampleSource, C: Clock> {
    source: S,
    clock: C,
    config: DetectorConfig,
    filter: SignalFilter<FILTER_WINDOW>,
    detector: StepDetector,
    counter: StepCounter,
    subscribed: bool,
}

impl<S: SampleSource, C: Clock> Pedometer<S, C> {
    pub fn new(source: S, clock: C, config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            clock,
            filter: SignalFilter::new(config.baseline_alpha),
            detector: StepDetector::new(&config),
            counter: StepCounter::new(),
            config,
            subscribed: false,
        })
    }

    /// Reset filter and detector state and subscribe to the sample source.
    ///
    /// Calling this while already subscribed re-initialises the signal path
    /// without subscribing a second time. On failure the engine stays
    /// stopped and the error is returned once; there is no retry.
    pub fn init_detection(&mut self) -> Result<(), DetectionError> {
        self.filter.reset();
        self.detector.reset();

        if self.subscribed {
            log::info!("Step detection re-initialised");
            return Ok(());
        }

        if let Err(e) = self.source.subscribe(self.config.sample_rate_hz) {
            log::error!("Accelerometer subscription failed: {}", e);
            return Err(DetectionError::StartFailed(e));
        }
        self.subscribed = true;
        log::info!(
            "Step detection started ({} Hz, count {})",
            self.config.sample_rate_hz,
            self.counter.current_count()
        );
        Ok(())
    }

    /// Unsubscribe and discard filter/detector state. The step count is kept.
    /// No-op when not subscribed.
    pub fn stop_detection(&mut self) {
        if !self.subscribed {
            return;
        }
        self.source.unsubscribe();
        self.subscribed = false;
        self.filter.reset();
        self.detector.reset();
        log::info!("Step detection stopped at {} steps", self.counter.current_count());
    }

    /// Entry point for the platform's sample dispatcher.
    ///
    /// Samples arriving while stopped (e.g. already in flight when a reset
    /// unsubscribed) are dropped, so they can never bump a fresh count.
    pub fn on_sample(&mut self, sample: AccelSample) -> Option<StepEvent> {
        let now_ms = self.clock.now_ms();
        self.on_sample_at(sample, now_ms)
    }

    /// Like [`on_sample`](Self::on_sample), but with the time the reading was
    /// taken. Use this when samples can sit in a queue before being handled,
    /// so the refractory interval is measured between reads.
    pub fn on_sample_at(&mut self, sample: AccelSample, timestamp_ms: u64) -> Option<StepEvent> {
        if !self.subscribed {
            log::trace!("Dropping sample received while stopped");
            return None;
        }
        let value = self.filter.process(&sample)?;
        let event = self.detector.update(value, timestamp_ms)?;
        let count = self.counter.on_step_event();
        log::debug!("Step at {} ms (count {})", event.timestamp_ms, count);
        Some(event)
    }

    pub fn current_step_count(&self) -> u32 {
        self.counter.current_count()
    }

    /// Zero the count only. Detection keeps running if it was running.
    pub fn reset_step_count(&mut self) {
        self.counter.reset();
        log::info!("Step count reset");
    }

    /// Stop detection and zero the count as one step; what the user's
    /// "Reset" action does.
    pub fn reset(&mut self) {
        self.stop_detection();
        self.reset_step_count();
    }

    pub fn is_detecting(&self) -> bool {
        self.subscribed
    }

    pub fn distance_m(&self, height: &UserHeight) -> u64 {
        estimate_distance(self.current_step_count(), height.metres(), height.centimetres())
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
