//! End-to-end tests: synthetic accelerometer traces through the public API.

use std::cell::Cell;
use std::f32::consts::TAU;
use std::rc::Rc;

use pedowatch::config::DetectorConfig;
use pedowatch::error::SensorError;
use pedowatch::events::{AccelSample, Button};
use pedowatch::pedometer::{Pedometer, SampleSource};
use pedowatch::{estimate_distance, App, UserHeight, View};

const PERIOD_MS: u64 = 20; // 50 Hz

#[derive(Default)]
struct Source {
    active: bool,
    subscriptions: u32,
}

impl SampleSource for Source {
    fn subscribe(&mut self, _sample_rate_hz: u32) -> Result<(), SensorError> {
        assert!(!self.active, "duplicate subscription");
        self.active = true;
        self.subscriptions += 1;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.active = false;
    }
}

type Clock = Box<dyn Fn() -> u64>;

struct Rig {
    pedometer: Pedometer<Source, Clock>,
    time: Rc<Cell<u64>>,
}

impl Rig {
    fn new() -> Self {
        let time = Rc::new(Cell::new(0));
        let t = Rc::clone(&time);
        let clock: Clock = Box::new(move || t.get());
        let pedometer = Pedometer::new(Source::default(), clock, DetectorConfig::default()).unwrap();
        Self { pedometer, time }
    }

    /// Feed one vertical-axis reading and advance the clock by one period.
    fn feed(&mut self, z: f32) -> bool {
        let step = self.pedometer.on_sample(AccelSample::new(0.0, 0.0, z)).is_some();
        self.time.set(self.time.get() + PERIOD_MS);
        step
    }

    /// Sinusoidal gait around 1 g; returns steps emitted.
    fn walk(&mut self, cycles: u64, period_ms: u64) -> u32 {
        let per_cycle = period_ms / PERIOD_MS;
        let mut steps = 0;
        for i in 0..cycles * per_cycle {
            let phase = (i % per_cycle) as f32 / per_cycle as f32;
            if self.feed(1.0 + 0.4 * (phase * TAU).sin()) {
                steps += 1;
            }
        }
        steps
    }

    /// One sharp 240 ms heel-strike; a fresh detector counts it at the
    /// eleventh sample (200 ms after the pulse starts).
    fn pulse(&mut self) -> u32 {
        let shape = [1.0, 1.0, 1.0, 1.0, 1.0, 1.6, 1.6, 1.6, 0.4, 0.4, 0.4, 0.4];
        shape.iter().filter(|&&z| self.feed(z)).count() as u32
    }
}

#[test]
fn nominal_cadence_counts_every_cycle() {
    for period_ms in [340u64, 500, 660, 1000, 2000] {
        let mut rig = Rig::new();
        rig.pedometer.init_detection().unwrap();
        let steps = rig.walk(24, period_ms);
        assert_eq!(steps, 24, "period {} ms", period_ms);
        assert_eq!(rig.pedometer.current_step_count(), 24);
    }
}

#[test]
fn resting_wrist_counts_nothing() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    for _ in 0..1000 {
        assert!(!rig.feed(1.0));
    }
    assert_eq!(rig.pedometer.current_step_count(), 0);
}

#[test]
fn bounce_inside_refractory_interval_counts_once() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    assert_eq!(rig.pulse(), 1);
    // Second strike lands 240 ms after the first step.
    assert_eq!(rig.pulse(), 0);
    // Third lands 480 ms after the first.
    assert_eq!(rig.pulse(), 1);
    assert_eq!(rig.pedometer.current_step_count(), 2);
}

#[test]
fn restart_discards_refractory_history() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    assert_eq!(rig.pulse(), 1);

    rig.pedometer.stop_detection();
    rig.pedometer.init_detection().unwrap();
    // Same timing that was suppressed above now counts.
    assert_eq!(rig.pulse(), 1);
    assert_eq!(rig.pedometer.current_step_count(), 2);
    assert_eq!(rig.pedometer.source().subscriptions, 2);
}

#[test]
fn count_never_decreases_without_reset() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    let mut last = 0;
    for i in 0..2000u32 {
        let phase = (i % 27) as f32 / 27.0;
        let noise = if i % 7 == 0 { 0.3 } else { 0.0 };
        rig.feed(1.0 + 0.45 * (phase * TAU).sin() + noise);
        let now = rig.pedometer.current_step_count();
        assert!(now >= last);
        last = now;
        if i == 1000 {
            rig.pedometer.stop_detection();
            assert_eq!(rig.pedometer.current_step_count(), last);
            rig.pedometer.init_detection().unwrap();
        }
    }
    assert!(last > 0);
}

#[test]
fn reset_twice_reads_zero() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    rig.walk(10, 500);
    assert!(rig.pedometer.current_step_count() > 0);

    rig.pedometer.reset_step_count();
    assert_eq!(rig.pedometer.current_step_count(), 0);
    rig.pedometer.reset_step_count();
    assert_eq!(rig.pedometer.current_step_count(), 0);
}

#[test]
fn user_reset_drops_in_flight_samples() {
    let mut rig = Rig::new();
    rig.pedometer.init_detection().unwrap();
    rig.walk(10, 500);
    rig.pedometer.reset();
    assert!(!rig.pedometer.source().active);
    assert_eq!(rig.walk(10, 500), 0);
    assert_eq!(rig.pedometer.current_step_count(), 0);
}

#[test]
fn menu_drives_a_full_session() {
    let mut rig = Rig::new();
    let mut app = App::default();

    // Start from the menu.
    app.handle_button(Button::Select, 0, &mut rig.pedometer);
    assert!(rig.pedometer.is_detecting());
    rig.walk(20, 500);

    let steps = rig.pedometer.current_step_count();
    assert_eq!(steps, 20);
    assert_eq!(
        app.view(&rig.pedometer),
        View::Steps { steps, distance_m: estimate_distance(steps, 1, 70) }
    );

    // Reset from the menu: back, down twice, select.
    for button in [Button::Back, Button::Down, Button::Down, Button::Select] {
        app.handle_button(button, 10_000, &mut rig.pedometer);
    }
    assert_eq!(rig.pedometer.current_step_count(), 0);
    assert!(!rig.pedometer.is_detecting());
    assert_eq!(app.view(&rig.pedometer), View::ResetNotice);
    app.tick(11_000);

    // Starting again subscribes afresh.
    for button in [Button::Up, Button::Up, Button::Select] {
        app.handle_button(button, 12_000, &mut rig.pedometer);
    }
    assert!(rig.pedometer.is_detecting());
    assert_eq!(rig.pedometer.source().subscriptions, 2);
}

#[test]
fn distance_reference_values() {
    let height = UserHeight::new(1, 70).unwrap();
    assert_eq!(estimate_distance(1000, height.metres(), height.centimetres()), 703);
    assert_eq!(estimate_distance(2000, height.metres(), height.centimetres()), 1407);
}
