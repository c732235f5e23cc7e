//! LED feedback for the keys and the encoder ring
//!
//! The pad has an 18 pixel chain: pixels 0..6 sit under keys 1..6, pixels
//! 6..18 form the ring around the encoder. [`LedFeedback`] keeps a logical
//! copy of the frame, forwards every change to an [`LedDriver`] and commits
//! it with an explicit [`LedFeedback::flush`]. Callers flush once per input
//! event, before the bound action runs, so a half-updated frame is never
//! on display.

use smart_leds::RGB8;

use crate::config::{KEY_COUNT, LED_COUNT, RING_HUE_STEP, RING_LED_BASE, RING_LED_COUNT};
use crate::types::{Brightness, Direction, Hue, Pixel, RingOffset};

/// Narrow contract to the bit-level LED chain driver
pub trait LedDriver {
    /// Stage `slot` to show `hue` at `brightness`
    fn write_hue(&mut self, slot: usize, hue: Hue, brightness: Brightness);

    /// Stage `slot` as dark
    fn clear_slot(&mut self, slot: usize);

    /// Commit all staged slots to the chain as one frame
    fn flush(&mut self);
}

/// Convert a wheel position into an RGB color.
///
/// The wheel has six 32-step segments: red, yellow, green, cyan, blue,
/// magenta and back to red. The strongest channel peaks at 63, 127 or 255
/// for the three brightness levels.
pub fn hue_to_rgb(hue: Hue, brightness: Brightness) -> RGB8 {
    let peak: u16 = (64u16 << brightness.level()) - 1;
    let step = (hue.value() % 32) as u16;
    let rising = (step << (brightness.level() + 1)) as u8;
    let peak = peak as u8;
    let falling = peak - rising;

    let (r, g, b) = match hue.value() / 32 {
        0 => (peak, rising, 0),
        1 => (falling, peak, 0),
        2 => (0, peak, rising),
        3 => (0, falling, peak),
        4 => (rising, 0, peak),
        _ => (peak, 0, falling),
    };
    RGB8::new(r, g, b)
}

/// Logical content of the whole LED chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedFrame {
    pixels: [Pixel; LED_COUNT],
}

impl LedFrame {
    pub const fn new() -> Self {
        Self {
            pixels: [Pixel::Off; LED_COUNT],
        }
    }

    pub fn pixel(&self, slot: usize) -> Option<Pixel> {
        self.pixels.get(slot).copied()
    }

    pub fn pixels(&self) -> &[Pixel; LED_COUNT] {
        &self.pixels
    }

    pub fn key_pixels(&self) -> &[Pixel] {
        &self.pixels[..KEY_COUNT]
    }

    pub fn ring_pixels(&self) -> &[Pixel] {
        &self.pixels[RING_LED_BASE..]
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Hue of ring pixel `index` (0..12) for a given ring offset
pub fn ring_hue(offset: RingOffset, index: usize) -> Hue {
    Hue::wrapping(offset.value() as u16 + RING_HUE_STEP as u16 * index as u16)
}

pub struct LedFeedback<L> {
    driver: L,
    frame: LedFrame,
    ring_brightness: Brightness,
    pending: bool,
}

impl<L: LedDriver> LedFeedback<L> {
    pub fn new(driver: L, ring_brightness: Brightness) -> Self {
        Self {
            driver,
            frame: LedFrame::new(),
            ring_brightness,
            pending: false,
        }
    }

    /// Startup frame: keys dark, ring painted at `ring`
    pub fn init(&mut self, ring: RingOffset) {
        for slot in 0..KEY_COUNT {
            self.stage(slot, Pixel::Off);
        }
        self.paint_ring(ring);
        self.flush();
    }

    /// Light the pixel under key `index` (0 based)
    pub fn set_key(&mut self, index: usize, hue: Hue, brightness: Brightness) {
        if index >= KEY_COUNT {
            warn!("set_key: key index {} out of range", index);
            return;
        }
        self.stage(index, Pixel::Lit { hue, brightness });
    }

    /// Turn off the pixel under key `index` (0 based)
    pub fn clear_key(&mut self, index: usize) {
        if index >= KEY_COUNT {
            warn!("clear_key: key index {} out of range", index);
            return;
        }
        self.stage(index, Pixel::Off);
    }

    /// Move the ring one detent in `direction` and repaint it
    pub fn rotate_ring(&mut self, ring: &mut RingOffset, direction: Direction) {
        ring.step(direction);
        trace!("Ring offset now {}", ring.value());
        self.paint_ring(*ring);
    }

    /// Repaint all ring pixels as an evenly spaced wheel starting at `ring`
    pub fn paint_ring(&mut self, ring: RingOffset) {
        for i in 0..RING_LED_COUNT {
            self.stage(
                RING_LED_BASE + i,
                Pixel::Lit {
                    hue: ring_hue(ring, i),
                    brightness: self.ring_brightness,
                },
            );
        }
    }

    pub fn flush(&mut self) {
        self.driver.flush();
        self.pending = false;
    }

    /// Whether staged changes are waiting for a flush
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn frame(&self) -> &LedFrame {
        &self.frame
    }

    pub fn driver(&self) -> &L {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut L {
        &mut self.driver
    }

    fn stage(&mut self, slot: usize, pixel: Pixel) {
        self.frame.pixels[slot] = pixel;
        match pixel {
            Pixel::Off => self.driver.clear_slot(slot),
            Pixel::Lit { hue, brightness } => self.driver.write_hue(slot, hue, brightness),
        }
        self.pending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Write(usize, u8, u8),
        Clear(usize),
        Flush,
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl LedDriver for Recorder {
        fn write_hue(&mut self, slot: usize, hue: Hue, brightness: Brightness) {
            self.ops.push(Op::Write(slot, hue.value(), brightness.level()));
        }

        fn clear_slot(&mut self, slot: usize) {
            self.ops.push(Op::Clear(slot));
        }

        fn flush(&mut self) {
            self.ops.push(Op::Flush);
        }
    }

    fn hue(v: u8) -> Hue {
        Hue::new(v).unwrap()
    }

    #[test]
    fn primary_hues_map_to_primary_colors() {
        assert_eq!(hue_to_rgb(hue(0), Brightness::High), RGB8::new(255, 0, 0));
        assert_eq!(hue_to_rgb(hue(64), Brightness::High), RGB8::new(0, 255, 0));
        assert_eq!(hue_to_rgb(hue(128), Brightness::High), RGB8::new(0, 0, 255));
        assert_eq!(hue_to_rgb(hue(32), Brightness::Low), RGB8::new(63, 63, 0));
        assert_eq!(hue_to_rgb(hue(96), Brightness::Medium), RGB8::new(0, 127, 127));
        assert_eq!(hue_to_rgb(hue(160), Brightness::High), RGB8::new(255, 0, 255));
    }

    #[test]
    fn colors_stay_below_peak_for_every_hue() {
        for (brightness, peak) in [
            (Brightness::Low, 63u8),
            (Brightness::Medium, 127),
            (Brightness::High, 255),
        ] {
            for h in 0..192u8 {
                let c = hue_to_rgb(hue(h), brightness);
                assert!(c.r <= peak && c.g <= peak && c.b <= peak, "hue {}", h);
                assert_eq!(c.r.max(c.g).max(c.b), peak, "hue {}", h);
            }
        }
    }

    #[test]
    fn init_clears_keys_and_paints_wheel() {
        let mut leds = LedFeedback::new(Recorder::default(), Brightness::Low);
        leds.init(RingOffset::ZERO);

        let frame = leds.frame();
        assert!(frame.key_pixels().iter().all(|p| *p == Pixel::Off));
        for (i, p) in frame.ring_pixels().iter().enumerate() {
            assert_eq!(
                *p,
                Pixel::Lit {
                    hue: hue((16 * i) as u8),
                    brightness: Brightness::Low
                }
            );
        }
        assert_eq!(leds.driver().ops.last(), Some(&Op::Flush));
        assert_eq!(
            leds.driver().ops.iter().filter(|op| **op == Op::Flush).count(),
            1
        );
        assert!(!leds.is_pending());
    }

    #[test]
    fn key_updates_stay_pending_until_flush() {
        let mut leds = LedFeedback::new(Recorder::default(), Brightness::Low);
        leds.set_key(2, hue(64), Brightness::High);
        assert!(leds.is_pending());
        assert_eq!(leds.driver().ops, [Op::Write(2, 64, 2)]);

        leds.flush();
        leds.clear_key(2);
        leds.flush();
        assert_eq!(
            leds.driver().ops,
            [Op::Write(2, 64, 2), Op::Flush, Op::Clear(2), Op::Flush]
        );
        assert_eq!(leds.frame().pixel(2), Some(Pixel::Off));
    }

    #[test]
    fn out_of_range_key_is_ignored() {
        let mut leds = LedFeedback::new(Recorder::default(), Brightness::Low);
        leds.set_key(6, hue(0), Brightness::High);
        leds.clear_key(17);
        assert!(leds.driver().ops.is_empty());
        assert!(!leds.is_pending());
    }

    #[test]
    fn rotating_ring_shifts_every_ring_hue() {
        let mut leds = LedFeedback::new(Recorder::default(), Brightness::Medium);
        let mut ring = RingOffset::ZERO;
        leds.rotate_ring(&mut ring, Direction::CounterClockwise);
        leds.flush();

        assert_eq!(ring.value(), 184);
        let hues: Vec<u8> = leds
            .frame()
            .ring_pixels()
            .iter()
            .map(|p| match p {
                Pixel::Lit { hue, .. } => hue.value(),
                Pixel::Off => panic!("ring pixel off"),
            })
            .collect();
        assert_eq!(
            hues,
            [184, 8, 24, 40, 56, 72, 88, 104, 120, 136, 152, 168]
        );
    }
}
