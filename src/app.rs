// PedoWatch — Screen Controller
//
// Menu with three rows (start/step count, change height, reset), the step
// screen, the height editor and a short "Reset Done!" notice. Owns the user
// height; drives the pedometer's start/reset lifecycle from button presses.

use crate::config::RESET_NOTICE_MS;
use crate::events::Button;
use crate::height::UserHeight;
use crate::pedometer::{Clock, Pedometer, SampleSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartCount,
    ChangeHeight,
    Reset,
}

pub const MENU_ITEMS: [MenuItem; 3] = [MenuItem::StartCount, MenuItem::ChangeHeight, MenuItem::Reset];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Steps,
    Height,
    ResetNotice { until_ms: u64 },
}

/// Snapshot of what the display should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Menu { selected: usize, started: bool },
    Steps { steps: u32, distance_m: u64 },
    Height(UserHeight),
    ResetNotice,
}

pub struct App {
    screen: Screen,
    selected: usize,
    height: UserHeight,
    /// True until detection has been started since boot or the last reset.
    first_start: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(UserHeight::default())
    }
}

impl App {
    pub fn new(height: UserHeight) -> Self {
        Self {
            screen: Screen::Menu,
            selected: 0,
            height,
            first_start: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn height(&self) -> UserHeight {
        self.height
    }

    /// Returns `true` when the screen needs redrawing.
    pub fn handle_button<S: SampleSource, C: Clock>(
        &mut self,
        button: Button,
        now_ms: u64,
        pedometer: &mut Pedometer<S, C>,
    ) -> bool {
        match self.screen {
            Screen::Menu => self.handle_menu(button, now_ms, pedometer),
            Screen::Steps => {
                if button == Button::Back {
                    self.screen = Screen::Menu;
                    return true;
                }
                false
            }
            Screen::Height => match button {
                Button::Up => {
                    let changed = self.height.increase();
                    if changed {
                        log::info!("Height set to {} cm", self.height.total_centimetres());
                    }
                    changed
                }
                Button::Down => {
                    let changed = self.height.decrease();
                    if changed {
                        log::info!("Height set to {} cm", self.height.total_centimetres());
                    }
                    changed
                }
                Button::Select | Button::Back => {
                    self.screen = Screen::Menu;
                    true
                }
            },
            // Input is ignored while the notice is up.
            Screen::ResetNotice { .. } => false,
        }
    }

    fn handle_menu<S: SampleSource, C: Clock>(
        &mut self,
        button: Button,
        now_ms: u64,
        pedometer: &mut Pedometer<S, C>,
    ) -> bool {
        match button {
            Button::Up if self.selected > 0 => {
                self.selected -= 1;
                true
            }
            Button::Down if self.selected + 1 < MENU_ITEMS.len() => {
                self.selected += 1;
                true
            }
            Button::Select => {
                match MENU_ITEMS[self.selected] {
                    MenuItem::StartCount => {
                        self.screen = Screen::Steps;
                        if self.first_start {
                            match pedometer.init_detection() {
                                Ok(()) => self.first_start = false,
                                Err(e) => log::warn!("Pedometer not started: {}", e),
                            }
                        }
                    }
                    MenuItem::ChangeHeight => self.screen = Screen::Height,
                    MenuItem::Reset => {
                        pedometer.reset();
                        self.first_start = true;
                        self.screen = Screen::ResetNotice { until_ms: now_ms + RESET_NOTICE_MS };
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Advance timers. Returns `true` when the screen changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if let Screen::ResetNotice { until_ms } = self.screen {
            if now_ms >= until_ms {
                self.screen = Screen::Menu;
                return true;
            }
        }
        false
    }

    /// Whether a new step should trigger a redraw.
    pub fn shows_steps(&self) -> bool {
        self.screen == Screen::Steps
    }

    pub fn view<S: SampleSource, C: Clock>(&self, pedometer: &Pedometer<S, C>) -> View {
        match self.screen {
            Screen::Menu => View::Menu {
                selected: self.selected,
                started: !self.first_start,
            },
            Screen::Steps => View::Steps {
                steps: pedometer.current_step_count(),
                distance_m: pedometer.distance_m(&self.height),
            },
            Screen::Height => View::Height(self.height),
            Screen::ResetNotice { .. } => View::ResetNotice,
        }
    }
}
