// PedoWatch — Error Types

use thiserror::Error;

/// Failures reported by an accelerometer [`SampleSource`](crate::pedometer::SampleSource).
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("accelerometer not responding")]
    NotResponding,
    #[error("unsupported sample rate: {0} Hz")]
    UnsupportedRate(u32),
    #[error("sensor bus error: {0}")]
    Bus(String),
}

/// Reported once by `init_detection` when sampling could not start.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("failed to start step detection: {0}")]
    StartFailed(#[from] SensorError),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("sample rate {0} Hz is not supported")]
    UnsupportedSampleRate(u32),
    #[error("step thresholds must be finite")]
    NonFiniteThreshold,
    #[error("low threshold {low} must be below high threshold {high}")]
    InvertedHysteresis { low: f32, high: f32 },
    #[error("minimum step interval must be non-zero")]
    ZeroStepInterval,
    #[error("baseline alpha {0} outside (0, 1]")]
    BaselineAlpha(f32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightError {
    #[error("height {0} cm outside supported range")]
    OutOfRange(u16),
    #[error("height {0} cm is not a multiple of the adjustment step")]
    Misaligned(u16),
}
