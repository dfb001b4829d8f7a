// PedoWatch — SSD1306 OLED Driver
//
// 128x64 panel on the shared I2C bus. Drawing happens into a `FrameBuffer`;
// `flush` pushes the whole buffer in horizontal addressing mode.

use anyhow::anyhow;

use pedowatch::config::*;
use pedowatch::display::FrameBuffer;

use super::imu::SharedBus;

const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const DATA_CHUNK: usize = 16;

const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset 0
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4, // resume to RAM content
    0xA6, // normal (not inverted)
    0xAF, // display on
];

pub struct OledDisplay {
    bus: SharedBus,
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    pub fn is_connected(&self) -> bool {
        self.command(&[0xE3]).is_ok() // NOP
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        self.command(INIT_SEQUENCE)?;
        log::info!("SSD1306 initialised");
        Ok(())
    }

    pub fn turn_off(&mut self) -> anyhow::Result<()> {
        self.command(&[0xAE])
    }

    pub fn flush(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        let last_col = (SCREEN_WIDTH - 1) as u8;
        let last_page = (SCREEN_HEIGHT / 8 - 1) as u8;
        self.command(&[0x21, 0, last_col, 0x22, 0, last_page])?;

        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in frame.as_bytes().chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    fn command(&self, cmds: &[u8]) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus poisoned"))?;
        for &cmd in cmds {
            bus.write(I2C_ADDR_OLED, &[CONTROL_CMD, cmd], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}
