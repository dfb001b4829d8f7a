// PedoWatch — App Task
//
// Sole owner of the pedometer engine, the screen controller and the display.
// Samples and button presses arrive on one channel and are handled one at a
// time, so a reset can never interleave with a step being counted.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use pedowatch::app::App;
use pedowatch::config::*;
use pedowatch::display::{render, FrameBuffer};
use pedowatch::events::AppEvent;
use pedowatch::pedometer::Pedometer;

use crate::drivers::oled::OledDisplay;
use crate::tasks::sensor::ImuSubscription;

pub type WatchPedometer = Pedometer<ImuSubscription, fn() -> u64>;

pub fn app_task(mut pedometer: WatchPedometer, mut display: OledDisplay, app_rx: Receiver<AppEvent>) {
    log::info!("App task started");

    let mut app = App::default();
    let mut frame = FrameBuffer::new();
    redraw(&app, &pedometer, &mut display, &mut frame);

    // Wake at least this often so the reset notice can time out.
    let tick = Duration::from_millis(UI_POLL_INTERVAL_MS * 10);

    loop {
        let dirty = match app_rx.recv_timeout(tick) {
            Ok(AppEvent::Sample { sample, timestamp_ms }) => {
                pedometer.on_sample_at(sample, timestamp_ms).is_some() && app.shows_steps()
            }
            Ok(AppEvent::Button(button)) => {
                app.handle_button(button, crate::now_ms(), &mut pedometer)
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("App channel closed — exiting app task");
                pedometer.stop_detection();
                let _ = display.turn_off();
                return;
            }
        };

        let expired = app.tick(crate::now_ms());
        if dirty || expired {
            redraw(&app, &pedometer, &mut display, &mut frame);
        }
    }
}

fn redraw(app: &App, pedometer: &WatchPedometer, display: &mut OledDisplay, frame: &mut FrameBuffer) {
    let view = app.view(pedometer);
    // FrameBuffer drawing is infallible.
    let _ = render(&view, frame);
    if let Err(e) = display.flush(frame) {
        log::error!("Display error: {}", e);
    }
}
