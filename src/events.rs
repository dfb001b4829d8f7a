// PedoWatch — System Events & Data Types

// ---------------------------------------------------------------------------
// Accelerometer sample (3-axis, in g)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm; independent of how the watch is oriented on the wrist.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One detected step. Produced by the detector and consumed immediately by
/// the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub timestamp_ms: u64,
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Select,
    Down,
    Back,
}

// ---------------------------------------------------------------------------
// App Events: everything the app task reacts to arrives through one channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// New accelerometer reading from the sensor task, stamped when read.
    Sample { sample: AccelSample, timestamp_ms: u64 },
    /// Debounced button press from the input task.
    Button(Button),
}
