//! Integer-multiple RGB565 scaling from a plugin's frame onto the host's
//! fixed-size destination surface, with centered letterboxing.

use crate::video::{Frame, VideoSink};

/// Which scan-line kernel is used when drawing into a destination surface.
/// `Lcd` and `Dmg` only have a genuine 3x-block kernel (ported from the
/// reference `scale3x_lcd`/`scale3x_dmg` routines); at any other
/// scale factor they fall back to plain nearest-neighbor replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalerKind {
    #[default]
    Nearest,
    Lcd,
    Dmg,
}

/// Scales one source frame onto a [`VideoSink`]'s surface, clearing the
/// destination whenever the source dimensions change between calls.
pub struct Scaler {
    kind: ScalerKind,
    last_dims: Option<(usize, usize)>,
}

impl Scaler {
    pub fn new(kind: ScalerKind) -> Self {
        Self {
            kind,
            last_dims: None,
        }
    }

    pub fn scale(&mut self, frame: &Frame, sink: &mut dyn VideoSink) {
        let screen_width = sink.screen_width();
        let screen_height = sink.screen_height();

        if self.last_dims != Some((frame.width, frame.height)) {
            sink.clear();
            self.last_dims = Some((frame.width, frame.height));
        }

        let factor = scale_factor(frame.width, frame.height, screen_width, screen_height);
        let (ox, oy) = letterbox_offset(frame.width, frame.height, screen_width, screen_height, factor);

        let pitch = sink.screen_pitch();
        let surface = sink.surface_mut();

        match (self.kind, factor) {
            (ScalerKind::Lcd, 3) => blit_3x_lcd(frame, surface, pitch, ox, oy),
            (ScalerKind::Dmg, 3) => blit_3x_dmg(frame, surface, pitch, ox, oy),
            _ => blit_nearest(frame, surface, pitch, ox, oy, factor),
        }
    }
}

/// `s = min(floor(screen_width/width), floor(screen_height/height))`,
/// clamped to `[1, 4]`.
fn scale_factor(width: usize, height: usize, screen_width: usize, screen_height: usize) -> usize {
    let sx = screen_width / width;
    let sy = screen_height / height;

    sx.min(sy).clamp(1, 4)
}

fn letterbox_offset(
    width: usize,
    height: usize,
    screen_width: usize,
    screen_height: usize,
    factor: usize,
) -> (usize, usize) {
    let ox = screen_width.saturating_sub(width * factor) / 2;
    let oy = screen_height.saturating_sub(height * factor) / 2;

    (ox, oy)
}

fn blit_nearest(frame: &Frame, surface: &mut [u16], pitch: usize, ox: usize, oy: usize, factor: usize) {
    for y in 0..frame.height {
        for x in 0..frame.width {
            let pixel = frame.pixel(x, y);

            for dy in 0..factor {
                let row = (oy + y * factor + dy) * pitch;

                for dx in 0..factor {
                    surface[row + ox + x * factor + dx] = pixel;
                }
            }
        }
    }
}

/// Splits each source pixel into a black/green/red-blue 3x3 block with
/// black seams between sub-pixel columns, simulating an LCD's aperture
/// grille.
fn blit_3x_lcd(frame: &Frame, surface: &mut [u16], pitch: usize, ox: usize, oy: usize) {
    const BLACK: u16 = 0x0000;

    for y in 0..frame.height {
        for x in 0..frame.width {
            let s = frame.pixel(x, y);
            let r = s & 0b1111_1000_0000_0000;
            let g = s & 0b0000_0111_1110_0000;
            let b = s & 0b0000_0000_0001_1111;

            let row0 = (oy + y * 3) * pitch + ox + x * 3;
            let row1 = row0 + pitch;
            let row2 = row1 + pitch;

            surface[row0] = BLACK;
            surface[row0 + 1] = g;
            surface[row0 + 2] = BLACK;

            surface[row1] = r;
            surface[row1 + 1] = g;
            surface[row1 + 2] = b;

            surface[row2] = r;
            surface[row2 + 1] = BLACK;
            surface[row2 + 2] = b;
        }
    }
}

/// Blends each source pixel 2/3 and 3/2 toward white, simulating the
/// ghosting trail of an unlit DMG LCD.
fn blit_3x_dmg(frame: &Frame, surface: &mut [u16], pitch: usize, ox: usize, oy: usize) {
    const WHITE: u16 = 0xffff;

    for y in 0..frame.height {
        for x in 0..frame.width {
            let a = frame.pixel(x, y);
            let b = weight_3_2(a, WHITE);
            let c = weight_2_3(a, WHITE);

            let row0 = (oy + y * 3) * pitch + ox + x * 3;
            let row1 = row0 + pitch;
            let row2 = row1 + pitch;

            surface[row0] = b;
            surface[row0 + 1] = a;
            surface[row0 + 2] = a;

            surface[row1] = b;
            surface[row1 + 1] = a;
            surface[row1 + 2] = a;

            surface[row2] = c;
            surface[row2 + 1] = b;
            surface[row2 + 2] = b;
        }
    }
}

const fn channel_r(pixel: u16) -> u16 {
    (pixel & 0xf800) >> 11
}

const fn channel_g(pixel: u16) -> u16 {
    (pixel & 0x7e0) >> 5
}

const fn channel_b(pixel: u16) -> u16 {
    pixel & 0x1f
}

/// `2/5 * a + 3/5 * b`, per channel, in RGB565.
const fn weight_2_3(a: u16, b: u16) -> u16 {
    let r = (((channel_r(a) << 1) + channel_r(b) * 3) / 5) & 0x1f;
    let g = (((channel_g(a) << 1) + channel_g(b) * 3) / 5) & 0x3f;
    let b = (((channel_b(a) << 1) + channel_b(b) * 3) / 5) & 0x1f;

    (r << 11) | (g << 5) | b
}

/// `3/5 * a + 2/5 * b`, per channel, in RGB565 — the mirror of
/// [`weight_2_3`].
const fn weight_3_2(a: u16, b: u16) -> u16 {
    weight_2_3(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_is_clamped_and_floored() {
        assert_eq!(scale_factor(160, 144, 640, 480), 3);
        assert_eq!(scale_factor(160, 144, 6400, 4800), 4);
        assert_eq!(scale_factor(1000, 1000, 640, 480), 1);
    }

    #[test]
    fn letterbox_centers_scaled_image() {
        let (ox, oy) = letterbox_offset(160, 144, 640, 480, 3);
        assert_eq!((ox, oy), (80, 24));
    }

    #[test]
    fn nearest_blit_covers_expected_rectangle() {
        let width = 2usize;
        let height = 1usize;
        let pitch = width * 2;
        let mut bytes = vec![0u8; pitch];
        bytes[0..2].copy_from_slice(&0x1234u16.to_le_bytes());
        bytes[2..4].copy_from_slice(&0x5678u16.to_le_bytes());

        let frame = unsafe { Frame::from_raw(bytes.as_ptr().cast(), width as u32, height as u32, pitch) }.unwrap();

        let screen_width = 8usize;
        let screen_height = 4usize;
        let mut surface = vec![0u16; screen_width * screen_height];

        let factor = scale_factor(width, height, screen_width, screen_height);
        let (ox, oy) = letterbox_offset(width, height, screen_width, screen_height, factor);
        blit_nearest(&frame, &mut surface, screen_width, ox, oy, factor);

        assert_eq!(surface[oy * screen_width + ox], 0x1234);
        assert_eq!(surface[oy * screen_width + ox + factor], 0x5678);
    }

    #[test]
    fn weight_macros_match_reference_formula() {
        let a = 0b11111_000000_00000u16;
        let b = 0b00000_000000_11111u16;

        let blended = weight_2_3(a, b);
        assert_eq!(channel_r(blended), (2 * 31) / 5);
        assert_eq!(channel_b(blended), (3 * 31) / 5);
    }
}
