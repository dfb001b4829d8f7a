// PedoWatch — Button Debouncing
//
// A raw level must hold for BUTTON_DEBOUNCE_MS before it is believed; a
// press is reported once, on the accepted released -> pressed edge.
// Designed to be polled at ~100 Hz from the input task.

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::events::Button;

pub struct ButtonDebouncer {
    button: Button,
    last_raw: bool,
    last_change_ms: u64,
    pressed: bool,
}

impl ButtonDebouncer {
    pub fn new(button: Button, now_ms: u64) -> Self {
        Self {
            button,
            last_raw: false,
            last_change_ms: now_ms,
            pressed: false,
        }
    }

    /// Feed the current level (`true` = held down). Returns the button on a
    /// debounced press edge.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u64) -> Option<Button> {
        if raw_pressed != self.last_raw {
            self.last_raw = raw_pressed;
            self.last_change_ms = now_ms;
        }

        let stable_ms = now_ms.saturating_sub(self.last_change_ms);
        if stable_ms < BUTTON_DEBOUNCE_MS || raw_pressed == self.pressed {
            return None;
        }

        self.pressed = raw_pressed;
        if raw_pressed {
            log::debug!("Button {:?} pressed", self.button);
            Some(self.button)
        } else {
            None
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(d: &mut ButtonDebouncer, raw: bool, from: u64, to: u64) -> usize {
        (from..to)
            .step_by(10)
            .filter(|&t| d.update(raw, t).is_some())
            .count()
    }

    #[test]
    fn clean_press_reports_once() {
        let mut d = ButtonDebouncer::new(Button::Select, 0);
        assert_eq!(poll(&mut d, true, 0, 500), 1);
        assert!(d.is_pressed());
        assert_eq!(poll(&mut d, false, 500, 600), 0);
        assert!(!d.is_pressed());
    }

    #[test]
    fn bounces_are_ignored() {
        let mut d = ButtonDebouncer::new(Button::Up, 0);
        let mut presses = 0;
        for t in (0..40).step_by(10) {
            if d.update(t % 20 == 0, t).is_some() {
                presses += 1;
            }
        }
        assert_eq!(presses, 0);
        presses += poll(&mut d, true, 40, 200);
        assert_eq!(presses, 1);
    }

    #[test]
    fn reports_the_configured_button() {
        let mut d = ButtonDebouncer::new(Button::Down, 0);
        d.update(true, 0);
        assert_eq!(d.update(true, BUTTON_DEBOUNCE_MS), Some(Button::Down));
    }

    #[test]
    fn two_separate_presses() {
        let mut d = ButtonDebouncer::new(Button::Back, 0);
        assert_eq!(poll(&mut d, true, 0, 200), 1);
        assert_eq!(poll(&mut d, false, 200, 400), 0);
        assert_eq!(poll(&mut d, true, 400, 600), 1);
    }
}
