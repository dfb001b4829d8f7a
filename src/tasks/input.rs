// PedoWatch — Input Task
//
// Polls the four buttons at ~100 Hz through debouncers and forwards presses
// to the app task.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

use pedowatch::config::*;
use pedowatch::events::{AppEvent, Button};
use pedowatch::input::ButtonDebouncer;

pub type ButtonPin = PinDriver<'static, AnyIOPin, Input>;

pub fn input_task(pins: [(Button, ButtonPin); 4], app_tx: Sender<AppEvent>) {
    log::info!("Input task started");

    let now = crate::now_ms();
    let mut buttons = pins.map(|(button, pin)| (pin, ButtonDebouncer::new(button, now)));
    let poll_interval = Duration::from_millis(UI_POLL_INTERVAL_MS);

    loop {
        let now = crate::now_ms();
        for (pin, debouncer) in buttons.iter_mut() {
            // Active LOW with pull-up.
            if let Some(button) = debouncer.update(pin.is_low(), now) {
                if app_tx.send(AppEvent::Button(button)).is_err() {
                    log::warn!("App channel closed — exiting input task");
                    return;
                }
            }
        }
        thread::sleep(poll_interval);
    }
}
