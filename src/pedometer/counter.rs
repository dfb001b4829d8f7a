// PedoWatch — Step Counter

/// Total steps since the last reset. Saturates at `u32::MAX` instead of
/// wrapping; at 4 steps/s that is decades of continuous walking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter {
    count: u32,
}

impl StepCounter {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    pub fn on_step_event(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn current_count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
