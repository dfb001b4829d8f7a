// PedoWatch — Screen Text & Rendering
//
// Text goes into fixed-capacity heapless buffers; anything that does not fit
// is dropped and the buffer keeps what was already written. Rendering targets
// any 1-bit embedded-graphics DrawTarget; on the watch that is `FrameBuffer`,
// which the SSD1306 driver pushes to the panel.

use core::convert::Infallible;
use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;

use crate::app::{MenuItem, View, MENU_ITEMS};
use crate::config::{DISPLAY_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::height::UserHeight;

pub const STEPS_TEXT_CAPACITY: usize = 60;
pub const HEIGHT_TEXT_CAPACITY: usize = 5;

const MENU_ROW_HEIGHT: i32 = 21;

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Step screen text. Distances from 1 km up are shown as `k.mmm km`.
pub fn format_steps(steps: u32, distance_m: u64) -> String<STEPS_TEXT_CAPACITY> {
    let mut text = String::new();
    let _ = if distance_m >= 1000 {
        write!(
            text,
            "Steps:\n{}\nDistance:\n{}.{:03} km",
            steps,
            distance_m / 1000,
            distance_m % 1000
        )
    } else {
        write!(text, "Steps:\n{}\nDistance:\n{} m", steps, distance_m)
    };
    text
}

/// Height screen text as (metres, centimetres), e.g. `("1m", "05")`.
pub fn format_height(
    height: &UserHeight,
) -> (String<HEIGHT_TEXT_CAPACITY>, String<HEIGHT_TEXT_CAPACITY>) {
    let mut metres = String::new();
    let mut centimetres = String::new();
    let _ = write!(metres, "{}m", height.metres());
    let _ = write!(centimetres, "{:02}", height.centimetres());
    (metres, centimetres)
}

pub fn menu_label(item: MenuItem, started: bool) -> &'static str {
    match item {
        MenuItem::StartCount if started => "Step count",
        MenuItem::StartCount => "Start",
        MenuItem::ChangeHeight => "Change height",
        MenuItem::Reset => "Reset",
    }
}

// ---------------------------------------------------------------------------
// Frame buffer (SSD1306 page layout: 8 vertical pixels per byte)
// ---------------------------------------------------------------------------

pub struct FrameBuffer {
    buf: [u8; DISPLAY_BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self { buf: [0; DISPLAY_BUFFER_SIZE] }
    }

    pub fn as_bytes(&self) -> &[u8; DISPLAY_BUFFER_SIZE] {
        &self.buf
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        self.buf[idx] & (1 << (y % 8)) != 0
    }

    pub fn lit_pixels(&self) -> u32 {
        self.buf.iter().map(|b| b.count_ones()).sum()
    }

    fn set_pixel(&mut self, point: Point, on: bool) {
        if point.x < 0 || point.y < 0 {
            return;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return;
        }
        let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
        let mask = 1u8 << (y % 8);
        if on {
            self.buf[idx] |= mask;
        } else {
            self.buf[idx] &= !mask;
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(if color.is_on() { 0xFF } else { 0x00 });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render<D>(view: &View, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    let centre_x = target.bounding_box().center().x;
    let centred = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    match *view {
        View::Menu { selected, started } => {
            let normal = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
            let highlighted = MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(BinaryColor::Off)
                .build();
            let width = target.bounding_box().size.width;

            for (row, item) in MENU_ITEMS.iter().enumerate() {
                let top = row as i32 * MENU_ROW_HEIGHT;
                let style = if row == selected {
                    Rectangle::new(Point::new(0, top), Size::new(width, MENU_ROW_HEIGHT as u32))
                        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                        .draw(target)?;
                    highlighted
                } else {
                    normal
                };
                Text::with_baseline(
                    menu_label(*item, started),
                    Point::new(4, top + 6),
                    style,
                    Baseline::Top,
                )
                .draw(target)?;
            }
        }
        View::Steps { steps, distance_m } => {
            let text = format_steps(steps, distance_m);
            let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
            Text::with_text_style(&text, Point::new(centre_x, 12), style, centred).draw(target)?;
        }
        View::Height(height) => {
            let (metres, centimetres) = format_height(&height);
            let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
            Text::with_text_style(&metres, Point::new(centre_x, 8), style, centred).draw(target)?;
            Text::with_text_style(&centimetres, Point::new(centre_x, 36), style, centred)
                .draw(target)?;
        }
        View::ResetNotice => {
            let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
            Text::with_text_style("Reset Done!", Point::new(centre_x, 22), style, centred)
                .draw(target)?;
        }
    }
    Ok(())
}

/// Boot screen listing which components answered on the bus.
pub fn render_self_test<D>(oled_ok: bool, imu_ok: bool, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let status = |ok: bool| if ok { "OK" } else { "FAIL" };
    let mut text: String<32> = String::new();
    let _ = write!(text, "PedoWatch\nOLED: {}\nIMU: {}", status(oled_ok), status(imu_ok));

    target.clear(BinaryColor::Off)?;
    let centre_x = target.bounding_box().center().x;
    let centred = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Text::with_text_style(&text, Point::new(centre_x, 16), style, centred).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metres_below_one_kilometre() {
        assert_eq!(format_steps(0, 0).as_str(), "Steps:\n0\nDistance:\n0 m");
        assert_eq!(format_steps(1000, 703).as_str(), "Steps:\n1000\nDistance:\n703 m");
    }

    #[test]
    fn kilometres_are_zero_padded() {
        assert_eq!(format_steps(2000, 1407).as_str(), "Steps:\n2000\nDistance:\n1.407 km");
        assert_eq!(format_steps(1, 1005).as_str(), "Steps:\n1\nDistance:\n1.005 km");
        assert_eq!(format_steps(1, 12_050).as_str(), "Steps:\n1\nDistance:\n12.050 km");
    }

    #[test]
    fn worst_case_fits_capacity() {
        let text = format_steps(u32::MAX, u64::from(u32::MAX) * 295 * 414 / 100_000);
        assert!(text.ends_with(" km"), "truncated: {:?}", text);
    }

    #[test]
    fn height_text() {
        let (m, cm) = format_height(&UserHeight::default());
        assert_eq!((m.as_str(), cm.as_str()), ("1m", "70"));

        let (m, cm) = format_height(&UserHeight::new(0, 70).unwrap());
        assert_eq!((m.as_str(), cm.as_str()), ("0m", "70"));

        let (m, cm) = format_height(&UserHeight::new(2, 5).unwrap());
        assert_eq!((m.as_str(), cm.as_str()), ("2m", "05"));
    }

    #[test]
    fn menu_labels_follow_start_state() {
        assert_eq!(menu_label(MenuItem::StartCount, false), "Start");
        assert_eq!(menu_label(MenuItem::StartCount, true), "Step count");
        assert_eq!(menu_label(MenuItem::ChangeHeight, true), "Change height");
        assert_eq!(menu_label(MenuItem::Reset, false), "Reset");
    }

    #[test]
    fn frame_buffer_uses_page_layout() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(3, 9), BinaryColor::On).draw(&mut fb).unwrap();
        assert!(fb.pixel(3, 9));
        assert_eq!(fb.as_bytes()[3 + 128], 0b0000_0010);
        assert_eq!(fb.lit_pixels(), 1);

        // Off-screen pixels are clipped.
        Pixel(Point::new(-1, 0), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(128, 64), BinaryColor::On).draw(&mut fb).unwrap();
        assert_eq!(fb.lit_pixels(), 1);

        fb.clear(BinaryColor::Off).unwrap();
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn every_view_draws_something() {
        let views = [
            View::Menu { selected: 1, started: false },
            View::Steps { steps: 12, distance_m: 8 },
            View::Height(UserHeight::default()),
            View::ResetNotice,
        ];
        for view in views.iter() {
            let mut fb = FrameBuffer::new();
            render(view, &mut fb).unwrap();
            assert!(fb.lit_pixels() > 0, "{:?} rendered blank", view);
        }
    }

    #[test]
    fn selected_menu_row_is_inverted() {
        let mut fb = FrameBuffer::new();
        render(&View::Menu { selected: 0, started: true }, &mut fb).unwrap();
        // Corner of the highlight bar is lit, same spot on row 2 is not.
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(0, 2 * MENU_ROW_HEIGHT as u32));
    }

    #[test]
    fn self_test_screen_draws() {
        let mut fb = FrameBuffer::new();
        render_self_test(true, false, &mut fb).unwrap();
        assert!(fb.lit_pixels() > 0);
    }
}
