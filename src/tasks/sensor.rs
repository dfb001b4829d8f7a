// PedoWatch — Sensor Task
//
// While the pedometer is subscribed, reads the accelerometer at the
// configured cadence and pushes each sample into the app channel. While
// unsubscribed the sensor sleeps and the task only checks the flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pedowatch::config::*;
use pedowatch::error::SensorError;
use pedowatch::events::AppEvent;
use pedowatch::pedometer::SampleSource;

use crate::drivers::imu::{Mpu6050, SharedBus};

/// Shared between the sensor task and the app task's `ImuSubscription`.
pub struct SensorControl {
    subscribed: AtomicBool,
    period_ms: AtomicU64,
}

impl SensorControl {
    pub fn new() -> Self {
        Self {
            subscribed: AtomicBool::new(false),
            period_ms: AtomicU64::new(1000 / u64::from(SAMPLE_RATE_HZ)),
        }
    }
}

impl Default for SensorControl {
    fn default() -> Self {
        Self::new()
    }
}

/// `SampleSource` backed by the MPU6050: subscribing wakes and configures
/// the sensor, then lets the sensor task start streaming.
pub struct ImuSubscription {
    imu: Mpu6050,
    control: Arc<SensorControl>,
}

impl ImuSubscription {
    pub fn new(bus: SharedBus, control: Arc<SensorControl>) -> Self {
        Self { imu: Mpu6050::new(bus), control }
    }
}

impl SampleSource for ImuSubscription {
    fn subscribe(&mut self, sample_rate_hz: u32) -> Result<(), SensorError> {
        if !SUPPORTED_SAMPLE_RATES_HZ.contains(&sample_rate_hz) {
            return Err(SensorError::UnsupportedRate(sample_rate_hz));
        }
        if !self.imu.is_connected() {
            return Err(SensorError::NotResponding);
        }
        self.imu
            .init(sample_rate_hz)
            .map_err(|e| SensorError::Bus(e.to_string()))?;

        self.control
            .period_ms
            .store(1000 / u64::from(sample_rate_hz), Ordering::SeqCst);
        self.control.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.control.subscribed.store(false, Ordering::SeqCst);
        if let Err(e) = self.imu.sleep() {
            log::warn!("MPU6050 sleep failed: {}", e);
        }
    }
}

pub fn sensor_task(bus: SharedBus, control: Arc<SensorControl>, app_tx: Sender<AppEvent>) {
    log::info!("Sensor task started");

    let imu = Mpu6050::new(bus);
    let idle = Duration::from_millis(SENSOR_IDLE_POLL_MS);

    loop {
        if !control.subscribed.load(Ordering::SeqCst) {
            thread::sleep(idle);
            continue;
        }

        let tick_start = Instant::now();
        let interval = Duration::from_millis(control.period_ms.load(Ordering::SeqCst));

        match imu.read_accel() {
            Ok(sample) => {
                // Stamp at read time; the app task may be busy flushing the display.
                let timestamp_ms = crate::now_ms();
                if app_tx.send(AppEvent::Sample { sample, timestamp_ms }).is_err() {
                    // Receiver dropped: app task has exited.
                    log::warn!("App channel closed — exiting sensor task");
                    return;
                }
            }
            Err(e) => {
                log::warn!("IMU read error: {}", e);
            }
        }

        // Sleep for the remainder of the sampling interval to hold the cadence.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
