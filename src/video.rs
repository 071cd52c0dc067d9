use std::ffi::c_uint;
use std::os::raw::c_void;
use std::slice;

use anyhow::{Context, Result};
use minifb::{Window, WindowOptions};

/// A single RGB565 frame as delivered by the plugin's video-refresh
/// callback. Only valid for the duration of that callback — the plugin
/// owns the pointer this borrows from and may reuse it on the next call.
pub struct Frame<'a> {
    buffer: &'a [u8],
    pub width: usize,
    pub height: usize,
    pub pitch: usize,
}

impl<'a> Frame<'a> {
    /// # Safety
    /// `data` must be non-null and point to at least `height * pitch`
    /// readable bytes, valid for the borrow's lifetime.
    pub unsafe fn from_raw(
        data: *const c_void,
        width: c_uint,
        height: c_uint,
        pitch: usize,
    ) -> Option<Self> {
        if data.is_null() {
            return None;
        }

        let height = height as usize;
        let buffer = slice::from_raw_parts(data.cast::<u8>(), height * pitch);

        Some(Self {
            buffer,
            width: width as usize,
            height,
            pitch,
        })
    }

    /// Reads the RGB565 pixel at `(x, y)`, row-stepping by `pitch` rather
    /// than `width * 2` — the source row may be padded.
    pub fn pixel(&self, x: usize, y: usize) -> u16 {
        let row_start = y * self.pitch;
        let offset = row_start + x * 2;
        u16::from_le_bytes([self.buffer[offset], self.buffer[offset + 1]])
    }
}

/// The host-owned destination surface: a fixed `screen_width x
/// screen_height` RGB565 framebuffer with its own `screen_pitch`, which
/// the [`crate::scaler::Scaler`] writes into and which is flipped once
/// per video-refresh.
pub trait VideoSink {
    fn screen_width(&self) -> usize;
    fn screen_height(&self) -> usize;

    /// Row stride of [`Self::surface_mut`], in RGB565 elements (not bytes).
    fn screen_pitch(&self) -> usize;

    fn surface_mut(&mut self) -> &mut [u16];

    /// Clears the whole destination to black. Called once whenever the
    /// source frame's dimensions change between refreshes, to erase stale
    /// letterbox content.
    fn clear(&mut self);

    fn present(&mut self) -> Result<()>;
}

/// Default [`VideoSink`] backed by a `minifb` window. `minifb` only
/// accepts a packed 0RGB8888 buffer, so the RGB565 surface is converted on
/// every present.
pub struct MinifbSink {
    window: Window,
    width: usize,
    height: usize,
    surface: Vec<u16>,
    present_buffer: Vec<u32>,
}

impl MinifbSink {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .context("failed to open video window")?;

        Ok(Self {
            window,
            width,
            height,
            surface: vec![0u16; width * height],
            present_buffer: vec![0u32; width * height],
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }
}

impl VideoSink for MinifbSink {
    fn screen_width(&self) -> usize {
        self.width
    }

    fn screen_height(&self) -> usize {
        self.height
    }

    fn screen_pitch(&self) -> usize {
        self.width
    }

    fn surface_mut(&mut self) -> &mut [u16] {
        &mut self.surface
    }

    fn clear(&mut self) {
        self.surface.fill(0);
    }

    fn present(&mut self) -> Result<()> {
        for (dst, &pixel) in self.present_buffer.iter_mut().zip(&self.surface) {
            let r = (pixel >> 11) & 0b11111;
            let g = (pixel >> 5) & 0b111111;
            let b = pixel & 0b11111;

            let r = (r << 3) | (r >> 2);
            let g = (g << 2) | (g >> 4);
            let b = (b << 3) | (b >> 2);

            *dst = (r as u32) << 16 | (g as u32) << 8 | b as u32;
        }

        self.window
            .update_with_buffer(&self.present_buffer, self.width, self.height)
            .context("failed to present video frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_pixel_honors_pitch_over_width() {
        let width = 2usize;
        let pitch = 8usize;
        let mut bytes = vec![0u8; pitch * 1];
        // pixel (1, 0) sits at byte offset 2 within the padded row.
        bytes[2] = 0x34;
        bytes[3] = 0x12;

        let frame = unsafe {
            Frame::from_raw(bytes.as_ptr().cast(), width as u32, 1, pitch).unwrap()
        };

        assert_eq!(frame.pixel(1, 0), 0x1234);
    }
}
