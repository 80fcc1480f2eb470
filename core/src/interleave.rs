/// Merges two equally long channels into L, R, L, R, ...
pub fn interleave(left: &[f32], right: &[f32]) -> Vec<f32> {
  assert_eq!(left.len(), right.len(), "channel lengths differ");

  let mut out = Vec::with_capacity(left.len() * 2);
  for (&l, &r) in left.iter().zip(right.iter()) {
    out.push(l);
    out.push(r);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alternates_channels() {
    let out = interleave(&[1.0, 2.0, 3.0], &[-1.0, -2.0, -3.0]);
    assert_eq!(out, vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
  }

  #[test]
  fn empty_channels() {
    assert!(interleave(&[], &[]).is_empty());
  }
}
