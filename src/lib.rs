//! PedoWatch — wrist pedometer.
//!
//! Turns a fixed-rate stream of 3-axis accelerometer samples into a step
//! count and a walking distance estimated from the user's height.
//!
//! Everything here is platform independent and runs on the host; the
//! firmware binary wires it to the MPU6050, the OLED and the buttons.
//!
//! ```
//! use pedowatch::config::DetectorConfig;
//! use pedowatch::error::SensorError;
//! use pedowatch::events::AccelSample;
//! use pedowatch::pedometer::{Pedometer, SampleSource};
//!
//! struct Always;
//! impl SampleSource for Always {
//!     fn subscribe(&mut self, _hz: u32) -> Result<(), SensorError> { Ok(()) }
//!     fn unsubscribe(&mut self) {}
//! }
//!
//! let mut pedometer = Pedometer::new(Always, || 0u64, DetectorConfig::default()).unwrap();
//! pedometer.init_detection().unwrap();
//! pedometer.on_sample(AccelSample::new(0.0, 0.0, 1.0));
//! assert_eq!(pedometer.current_step_count(), 0);
//! ```

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod height;
pub mod input;
pub mod pedometer;

pub use app::{App, View};
pub use error::{ConfigError, DetectionError, HeightError, SensorError};
pub use events::{AccelSample, AppEvent, Button, StepEvent};
pub use height::UserHeight;
pub use pedometer::{estimate_distance, Clock, Pedometer, SampleSource};
