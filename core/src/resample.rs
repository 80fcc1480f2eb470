use crate::error::{RenderError, Result};
use crate::window::NativeAudioWindow;

const SAMPLE_SCALE: f32 = 1.0 / 32768.0;

/// Linear interpolation from the native window to the output rate.
///
/// Positions are kept as the exact fraction `index * native / output` so
/// the overflow boundary never depends on float rounding.
#[derive(Copy, Clone, Debug)]
pub struct Resampler {
    native_rate: u32,
    output_rate: u32,
}

impl Resampler {
    pub fn new(native_rate: u32, output_rate: u32) -> Resampler {
        assert!(native_rate > 0 && output_rate > 0, "sample rates must be positive");
        Resampler { native_rate, output_rate }
    }

    /// Native frames needed so that `output_window` output samples fit in one
    /// window, i.e. `floor(output_window * ratio) + 1`.
    pub fn window_frames(&self, output_window: usize) -> usize {
        (output_window as u64 * self.native_rate as u64 / self.output_rate as u64) as usize + 1
    }

    /// Number of output indices one refresh of `window` can satisfy.
    pub fn capacity(&self, window: &NativeAudioWindow) -> usize {
        let last_valid = window.last_valid_index() as u64;
        let native = self.native_rate as u64;
        let output = self.output_rate as u64;

        // largest count with floor(i * native / output) + 1 <= last_valid for all i < count
        ((last_valid * output + native - 1) / native) as usize
    }

    fn position(&self, index: usize) -> (usize, f32) {
        let numerator = index as u64 * self.native_rate as u64;
        let output = self.output_rate as u64;
        let base = numerator / output;
        let frac = (numerator % output) as f64 / output as f64;

        (base as usize, frac as f32)
    }

    pub fn sample(&self, window: &NativeAudioWindow, channel: usize, index: usize) -> Result<f32> {
        let (base, frac) = self.position(index);
        let last_valid = window.last_valid_index();
        if base + 1 > last_valid {
            return Err(RenderError::ResampleOverflow { index, base, last_valid });
        }

        let low = window.sample(channel, base) as f32 * (1.0 - frac);
        let high = window.sample(channel, base + 1) as f32 * frac;

        Ok((low + high) * SAMPLE_SCALE)
    }

    /// Fills `out` with output indices `0..out.len()` of one channel.
    pub fn fill(&self, window: &NativeAudioWindow, channel: usize, out: &mut [f32]) -> Result<()> {
        for (index, dst) in out.iter_mut().enumerate() {
            *dst = self.sample(window, channel, index)?;
        }
        Ok(())
    }
}
