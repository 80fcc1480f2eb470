use crate::CHANNELS;

/// One batch of native-rate frames, stored interleaved (L, R, L, R, ...).
/// Every refresh overwrites the whole window.
pub struct NativeAudioWindow {
  samples: Vec<i16>,
  frames: usize,
}

impl NativeAudioWindow {
  pub fn new(frames: usize) -> NativeAudioWindow {
    NativeAudioWindow {
      samples: vec![0; frames * CHANNELS],
      frames,
    }
  }

  pub fn frames(&self) -> usize {
    self.frames
  }

  /// Highest frame index an interpolation may read.
  pub fn last_valid_index(&self) -> usize {
    self.frames.saturating_sub(1)
  }

  pub fn sample(&self, channel: usize, index: usize) -> i16 {
    self.samples[index * CHANNELS + channel]
  }

  pub fn as_slice(&self) -> &[i16] {
    &self.samples
  }

  pub(crate) fn as_mut_slice(&mut self) -> &mut [i16] {
    &mut self.samples
  }
}
