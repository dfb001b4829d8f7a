// PedoWatch — User Height
//
// Adjusted from the height screen in 5 cm steps and kept within
// [0.70 m, 2.95 m]. Stored as total centimetres; the m/cm split is what the
// screen shows and what the distance estimate takes.

use crate::config::{HEIGHT_DEFAULT_CM, HEIGHT_MAX_CM, HEIGHT_MIN_CM, HEIGHT_STEP_CM};
use crate::error::HeightError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserHeight {
    total_cm: u16,
}

impl Default for UserHeight {
    fn default() -> Self {
        Self { total_cm: HEIGHT_DEFAULT_CM }
    }
}

impl UserHeight {
    pub fn new(metres: u16, centimetres: u16) -> Result<Self, HeightError> {
        Self::from_centimetres(metres.saturating_mul(100).saturating_add(centimetres))
    }

    pub fn from_centimetres(total_cm: u16) -> Result<Self, HeightError> {
        if !(HEIGHT_MIN_CM..=HEIGHT_MAX_CM).contains(&total_cm) {
            return Err(HeightError::OutOfRange(total_cm));
        }
        if total_cm % HEIGHT_STEP_CM != 0 {
            return Err(HeightError::Misaligned(total_cm));
        }
        Ok(Self { total_cm })
    }

    pub fn metres(&self) -> u16 {
        self.total_cm / 100
    }

    pub fn centimetres(&self) -> u16 {
        self.total_cm % 100
    }

    pub fn total_centimetres(&self) -> u16 {
        self.total_cm
    }

    /// Raise by one step. Returns `false` (and leaves the height alone) at
    /// the upper bound.
    pub fn increase(&mut self) -> bool {
        let next = self.total_cm + HEIGHT_STEP_CM;
        if next > HEIGHT_MAX_CM {
            return false;
        }
        self.total_cm = next;
        true
    }

    /// Lower by one step. Returns `false` at the lower bound.
    pub fn decrease(&mut self) -> bool {
        if self.total_cm < HEIGHT_MIN_CM + HEIGHT_STEP_CM {
            return false;
        }
        self.total_cm -= HEIGHT_STEP_CM;
        true
    }
}
