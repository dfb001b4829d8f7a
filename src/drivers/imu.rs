// PedoWatch — MPU6050 Accelerometer Driver
//
// Register-level driver over the shared I2C bus. Only the accelerometer is
// used; the gyro is left at its power-on defaults.

use std::sync::Mutex;

use anyhow::anyhow;
use esp_idf_hal::i2c::I2cDriver;

use pedowatch::config::*;
use pedowatch::events::AccelSample;

/// Thread-safe handle to a shared I2C bus.
pub type SharedBus = &'static Mutex<I2cDriver<'static>>;

// MPU6050 register addresses
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 6-byte accel burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

const PWR_SLEEP: u8 = 0x40;

pub struct Mpu6050 {
    bus: SharedBus,
}

impl Mpu6050 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and configure accel (±4 g), DLPF 21 Hz and the
    /// internal sample rate to match `sample_rate_hz`.
    pub fn init(&self, sample_rate_hz: u32) -> anyhow::Result<()> {
        let divider = (MPU_GYRO_OUTPUT_RATE_HZ / sample_rate_hz.max(1)).clamp(1, 256) - 1;
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;

        // Wake up (clear SLEEP bit)
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x00], I2C_TIMEOUT_TICKS)?;

        // DLPF bandwidth 21 Hz (gyro output rate drops to 1 kHz)
        bus.write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x04], I2C_TIMEOUT_TICKS)?;

        bus.write(I2C_ADDR_MPU6050, &[REG_SMPLRT_DIV, divider as u8], I2C_TIMEOUT_TICKS)?;

        // Accelerometer: ±4 g
        bus.write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x08], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU6050 initialised (±4g, DLPF 21Hz, {} Hz)", sample_rate_hz);
        Ok(())
    }

    /// Put the sensor into its low-power sleep state.
    pub fn sleep(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, PWR_SLEEP], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }

    /// Burst-read the three accel axes and convert to g.
    pub fn read_accel(&self) -> anyhow::Result<AccelSample> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        let mut raw = [0u8; 6];
        bus.write_read(I2C_ADDR_MPU6050, &[REG_ACCEL_XOUT_H], &mut raw, I2C_TIMEOUT_TICKS)?;

        Ok(AccelSample {
            x: i16::from_be_bytes([raw[0], raw[1]]) as f32 / ACCEL_SCALE_4G,
            y: i16::from_be_bytes([raw[2], raw[3]]) as f32 / ACCEL_SCALE_4G,
            z: i16::from_be_bytes([raw[4], raw[5]]) as f32 / ACCEL_SCALE_4G,
        })
    }
}
