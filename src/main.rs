// PedoWatch — Firmware Entry Point
//
// Boot sequence:
//   1. Bring up the shared I2C bus, the OLED and the MPU6050.
//   2. Show the component self-test result for 1 second.
//   3. Spawn the sensor, input and app tasks.
//
// Step detection starts when the user picks "Start" from the menu; the
// sensor stays asleep until then.
//
// On a non-ESP host this binary replays a synthetic walk through the
// pedometer instead.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod tasks;

// ---------------------------------------------------------------------------
// Utility: milliseconds since boot
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u64 {
    (unsafe { esp_idf_sys::esp_timer_get_time() } / 1000) as u64
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{IOPin, PinDriver, Pull};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use pedowatch::config::*;
    use pedowatch::display::FrameBuffer;
    use pedowatch::events::Button;
    use pedowatch::pedometer::Pedometer;

    use crate::drivers::imu::Mpu6050;
    use crate::drivers::oled::OledDisplay;
    use crate::tasks::sensor::{ImuSubscription, SensorControl};

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("PedoWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus (shared between OLED and MPU6050) ------------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    // SAFETY: The I2C peripheral is a singleton obtained from `Peripherals::take()`.
    // It will live for the entire programme duration (embedded firmware never exits).
    let i2c_bus: &'static Mutex<I2cDriver<'static>> =
        Box::leak(Box::new(Mutex::new(unsafe { core::mem::transmute(i2c) })));

    // ---- Self-test --------------------------------------------------------
    let mut display = OledDisplay::new(i2c_bus);
    display.init()?;

    let oled_ok = display.is_connected();
    let imu = Mpu6050::new(i2c_bus);
    let imu_ok = imu.is_connected();
    if imu_ok {
        // Keep the sensor asleep until detection is started.
        imu.sleep()?;
    }

    let mut frame = FrameBuffer::new();
    pedowatch::display::render_self_test(oled_ok, imu_ok, &mut frame)?;
    display.flush(&frame)?;
    thread::sleep(Duration::from_secs(1));

    if !oled_ok || !imu_ok {
        log::error!("Boot check FAILED — OLED:{} IMU:{}", oled_ok, imu_ok);
        // Continue anyway; starting detection will report the failure.
    }

    // ---- Buttons (pull-up, active LOW) ------------------------------------
    let button = |pin: esp_idf_hal::gpio::AnyIOPin| -> anyhow::Result<tasks::input::ButtonPin> {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    };
    let buttons = [
        (Button::Up, button(peripherals.pins.gpio2.downgrade())?),
        (Button::Select, button(peripherals.pins.gpio3.downgrade())?),
        (Button::Down, button(peripherals.pins.gpio4.downgrade())?),
        (Button::Back, button(peripherals.pins.gpio5.downgrade())?),
    ];

    // ---- Engine -----------------------------------------------------------
    let (app_tx, app_rx) = mpsc::channel();
    let control = Arc::new(SensorControl::new());
    let source = ImuSubscription::new(i2c_bus, control.clone());
    let pedometer = Pedometer::new(source, now_ms as fn() -> u64, DetectorConfig::default())?;

    // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ---------------

    // Sensor task first, it has the tightest timing.
    let sensor_tx = app_tx.clone();
    thread::Builder::new()
        .name("sensor".into())
        .stack_size(STACK_SENSOR)
        .spawn(move || {
            tasks::sensor::sensor_task(i2c_bus, control, sensor_tx);
        })?;

    thread::Builder::new()
        .name("input".into())
        .stack_size(STACK_INPUT)
        .spawn(move || {
            tasks::input::input_task(buttons, app_tx);
        })?;

    thread::Builder::new()
        .name("app".into())
        .stack_size(STACK_APP)
        .spawn(move || {
            tasks::app::app_task(pedometer, display, app_rx);
        })?;

    log::info!("Boot complete — entering normal operation");

    // Main thread has nothing left to do; park it.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

// ---------------------------------------------------------------------------
// Host simulator
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use std::cell::Cell;
    use std::rc::Rc;

    use pedowatch::config::DetectorConfig;
    use pedowatch::display::format_steps;
    use pedowatch::error::SensorError;
    use pedowatch::events::AccelSample;
    use pedowatch::height::UserHeight;
    use pedowatch::pedometer::{Pedometer, SampleSource};

    struct Replay;

    impl SampleSource for Replay {
        fn subscribe(&mut self, _sample_rate_hz: u32) -> Result<(), SensorError> {
            Ok(())
        }

        fn unsubscribe(&mut self) {}
    }

    let config = DetectorConfig::default();
    let period_ms = config.sample_period_ms();
    let time = Rc::new(Cell::new(0u64));
    let clock = {
        let time = Rc::clone(&time);
        move || time.get()
    };

    let mut pedometer = Pedometer::new(Replay, clock, config)?;
    pedometer.init_detection()?;

    // One minute at 1.8 steps/s, with a little deterministic sensor noise.
    let cadence_hz = 1.8f32;
    let mut noise: u32 = 0x2545_f491;
    for i in 0..(60_000 / period_ms) {
        noise ^= noise << 13;
        noise ^= noise >> 17;
        noise ^= noise << 5;
        let jitter = (noise % 1000) as f32 / 1000.0 * 0.04 - 0.02;

        let t = i as f32 * period_ms as f32 / 1000.0;
        let bounce = 0.35 * (t * cadence_hz * std::f32::consts::TAU).sin();
        pedometer.on_sample(AccelSample::new(0.05 + jitter, 0.1, 0.98 + bounce));
        time.set(time.get() + period_ms);
    }
    pedometer.stop_detection();

    let height = UserHeight::default();
    let steps = pedometer.current_step_count();
    println!("PedoWatch simulator — 60 s walk at {:.1} steps/s", cadence_hz);
    println!("{}", format_steps(steps, pedometer.distance_m(&height)));
    Ok(())
}
