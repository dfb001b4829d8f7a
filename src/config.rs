// PedoWatch — Hardware, Timing & Step-Detection Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) + MPU6050 + SSD1306

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON_UP: i32 = 2;     // D0/A0 Up button (INPUT_PULLUP, active LOW)
pub const PIN_BUTTON_SELECT: i32 = 3; // D1/A1 Select button
pub const PIN_BUTTON_DOWN: i32 = 4;   // D2/A2 Down button
pub const PIN_BUTTON_BACK: i32 = 5;   // D3    Back button
pub const PIN_I2C_SDA: i32 = 6;       // D4    I2C data line
pub const PIN_I2C_SCL: i32 = 7;       // D5    I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 4096;
pub const STACK_INPUT: usize = 4096;
pub const STACK_APP: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const UI_POLL_INTERVAL_MS: u64 = 10;   // 100 Hz button poll
pub const BUTTON_DEBOUNCE_MS: u64 = 50;
pub const RESET_NOTICE_MS: u64 = 1000;     // "Reset Done!" stays up for 1 s
pub const SENSOR_IDLE_POLL_MS: u64 = 100;  // sensor task wake-up while unsubscribed

// ---------------------------------------------------------------------------
// Accelerometer sampling
// ---------------------------------------------------------------------------
pub const SAMPLE_RATE_HZ: u32 = 50;
pub const SUPPORTED_SAMPLE_RATES_HZ: [u32; 4] = [10, 25, 50, 100];

// ---------------------------------------------------------------------------
// Step detection tuning (units: g for thresholds, ms for intervals)
// ---------------------------------------------------------------------------
pub const FILTER_WINDOW: usize = 5;              // 100 ms moving average @ 50 Hz
pub const BASELINE_ALPHA: f32 = 0.02;            // ~1 s gravity time constant @ 50 Hz
pub const STEP_THRESHOLD_HIGH_G: f32 = 0.12;     // rising edge of the hysteresis band
pub const STEP_THRESHOLD_LOW_G: f32 = -0.05;     // falling edge of the hysteresis band
pub const MIN_STEP_INTERVAL_MS: u64 = 250;       // max ~4 steps/s

// ---------------------------------------------------------------------------
// Distance estimation
// ---------------------------------------------------------------------------
/// Average stride length per centimetre of user height, in metres.
pub const STRIDE_FACTOR: f64 = 0.00414;
/// [`STRIDE_FACTOR`] as an exact fraction: `STRIDE_FACTOR_NUM / STRIDE_FACTOR_DEN`.
pub const STRIDE_FACTOR_NUM: u64 = 414;
pub const STRIDE_FACTOR_DEN: u64 = 100_000;

// ---------------------------------------------------------------------------
// User height (centimetres)
// ---------------------------------------------------------------------------
pub const HEIGHT_MIN_CM: u16 = 70;
pub const HEIGHT_MAX_CM: u16 = 295;
pub const HEIGHT_STEP_CM: u16 = 5;
pub const HEIGHT_DEFAULT_CM: u16 = 170;

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_4G: f32 = 8192.0; // LSB/g at ±4 g
pub const MPU_GYRO_OUTPUT_RATE_HZ: u32 = 1000; // with DLPF enabled

/// Tunable values for the sampling path.
///
/// Thresholds are applied to the filtered magnitude after the gravity
/// baseline has been removed, so they are signed deviations in g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub sample_rate_hz: u32,
    pub threshold_high: f32,
    pub threshold_low: f32,
    pub min_step_interval_ms: u64,
    pub baseline_alpha: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            threshold_high: STEP_THRESHOLD_HIGH_G,
            threshold_low: STEP_THRESHOLD_LOW_G,
            min_step_interval_ms: MIN_STEP_INTERVAL_MS,
            baseline_alpha: BASELINE_ALPHA,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_SAMPLE_RATES_HZ.contains(&self.sample_rate_hz) {
            return Err(ConfigError::UnsupportedSampleRate(self.sample_rate_hz));
        }
        if !self.threshold_high.is_finite() || !self.threshold_low.is_finite() {
            return Err(ConfigError::NonFiniteThreshold);
        }
        if self.threshold_low >= self.threshold_high {
            return Err(ConfigError::InvertedHysteresis {
                low: self.threshold_low,
                high: self.threshold_high,
            });
        }
        if self.min_step_interval_ms == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }
        if !(self.baseline_alpha > 0.0 && self.baseline_alpha <= 1.0) {
            return Err(ConfigError::BaselineAlpha(self.baseline_alpha));
        }
        Ok(())
    }

    /// Nominal time between two samples.
    pub fn sample_period_ms(&self) -> u64 {
        1000 / u64::from(self.sample_rate_hz.max(1))
    }
}
