/// Linear fade-out over the last `fade_samples` samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FadeEnvelope {
  fade_samples: usize,
}

impl FadeEnvelope {
  pub fn new(fade_samples: usize) -> FadeEnvelope {
    FadeEnvelope { fade_samples }
  }

  pub fn from_millis(fade_millis: f64, sample_rate: u32) -> FadeEnvelope {
    FadeEnvelope::new((fade_millis / 1000.0 * sample_rate as f64).floor() as usize)
  }

  pub fn fade_samples(&self) -> usize {
    self.fade_samples
  }

  pub fn factor(&self, i: usize) -> f32 {
    1.0 - (i as f32 / self.fade_samples as f32)
  }

  /// Fading a whole track to silence is never intended, so the envelope only
  /// runs when it is strictly shorter than the signal.
  pub fn applies_to(&self, total_samples: usize) -> bool {
    0 < self.fade_samples && self.fade_samples < total_samples
  }

  pub fn apply(&self, left: &mut [f32], right: &mut [f32]) {
    let total_samples = left.len();
    debug_assert_eq!(total_samples, right.len());

    if !self.applies_to(total_samples) {
      log::debug!("fade skipped: {} of {} samples", self.fade_samples, total_samples);
      return;
    }

    let start = total_samples - self.fade_samples;
    left[start..].iter_mut()
      .zip(right[start..].iter_mut())
      .enumerate()
      .for_each(|(i, (l, r))| {
        let factor = self.factor(i);
        *l *= factor;
        *r *= factor;
      });
  }
}
