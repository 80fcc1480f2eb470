use crate::error::{RenderError, Result};

const DURATION_OFFSET: usize = 169;
const DURATION_LENGTH: usize = 3;
const FADE_OFFSET: usize = 172;
const FADE_LENGTH: usize = 4;

/// Playback length read from the ID666 text fields of a snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapshotMetadata {
    pub duration_seconds: f64,
    pub fade_millis: f64,
}

impl SnapshotMetadata {
    pub fn extract(bytes: &[u8]) -> Result<SnapshotMetadata> {
        let duration = extract_field(bytes, DURATION_OFFSET, DURATION_LENGTH);
        let fade = extract_field(bytes, FADE_OFFSET, FADE_LENGTH);

        let metadata = SnapshotMetadata {
            duration_seconds: parse_field("duration", duration)?,
            fade_millis: parse_field("fade", fade)?,
        };

        log::debug!(
            "metadata: duration {}s, fade {}ms",
            metadata.duration_seconds,
            metadata.fade_millis
        );

        Ok(metadata)
    }

    pub fn total_samples(&self, sample_rate: u32) -> usize {
        (self.duration_seconds * sample_rate as f64).floor() as usize
    }

    pub fn fade_samples(&self, sample_rate: u32) -> usize {
        (self.fade_millis / 1000.0 * sample_rate as f64).floor() as usize
    }
}

/// Reads up to `length` bytes from `start`, stopping at the first NUL.
/// Missing bytes past the end of `bytes` read as an empty field.
pub fn extract_field(bytes: &[u8], start: usize, length: usize) -> String {
    let end = usize::min(start + length, bytes.len());
    let field = bytes.get(start..end).unwrap_or(&[]);
    let real_length = field.iter().position(|&b| b == 0).unwrap_or(field.len());

    // latin1
    field[..real_length].iter().map(|&b| b as char).collect()
}

/// Fields are plain decimal digits; signs, exponents and fractions are rejected
/// so a three-byte field can never describe more than 999 seconds.
fn parse_field(name: &'static str, raw: String) -> Result<f64> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii_whitespace());
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RenderError::InvalidMetadata { field: name, raw });
    }

    match trimmed.parse::<u32>() {
        Ok(value) => Ok(value as f64),
        Err(_) => Err(RenderError::InvalidMetadata { field: name, raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(duration: &[u8], fade: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 256];
        bytes[DURATION_OFFSET..DURATION_OFFSET + duration.len()].copy_from_slice(duration);
        bytes[FADE_OFFSET..FADE_OFFSET + fade.len()].copy_from_slice(fade);
        bytes
    }

    #[test]
    fn reads_fixed_width_fields() {
        let metadata = SnapshotMetadata::extract(&snapshot(b"002", b"0500")).unwrap();
        assert_eq!(metadata.duration_seconds, 2.0);
        assert_eq!(metadata.fade_millis, 500.0);
        assert_eq!(metadata.total_samples(48000), 96000);
        assert_eq!(metadata.fade_samples(48000), 24000);
    }

    #[test]
    fn field_stops_at_nul() {
        let bytes = snapshot(b"90\0", b"10\x0099");
        assert_eq!(extract_field(&bytes, DURATION_OFFSET, DURATION_LENGTH), "90");
        assert_eq!(extract_field(&bytes, FADE_OFFSET, FADE_LENGTH), "10");

        let metadata = SnapshotMetadata::extract(&bytes).unwrap();
        assert_eq!(metadata.duration_seconds, 90.0);
        assert_eq!(metadata.fade_millis, 10.0);
    }

    #[test]
    fn duration_field_does_not_bleed_into_fade() {
        let bytes = snapshot(b"123", b"4567");
        assert_eq!(extract_field(&bytes, DURATION_OFFSET, DURATION_LENGTH), "123");
    }

    #[test]
    fn empty_field_is_invalid() {
        let err = SnapshotMetadata::extract(&snapshot(b"", b"0500")).unwrap_err();
        match err {
            RenderError::InvalidMetadata { field, raw } => {
                assert_eq!(field, "duration");
                assert_eq!(raw, "");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_numeric_field_is_invalid() {
        let err = SnapshotMetadata::extract(&snapshot(b"002", b"abcd")).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMetadata { field: "fade", .. }));
    }

    #[test]
    fn negative_and_nan_are_invalid() {
        assert!(SnapshotMetadata::extract(&snapshot(b"-1", b"0")).is_err());
        assert!(SnapshotMetadata::extract(&snapshot(b"NaN", b"0")).is_err());
        assert!(SnapshotMetadata::extract(&snapshot(b"inf", b"0")).is_err());
    }

    #[test]
    fn exponent_and_fraction_forms_are_invalid() {
        for duration in [&b"9e9"[..], &b"1e3"[..], &b"1.5"[..], &b"+12"[..]] {
            let err = SnapshotMetadata::extract(&snapshot(duration, b"0")).unwrap_err();
            assert!(matches!(err, RenderError::InvalidMetadata { field: "duration", .. }));
        }

        let err = SnapshotMetadata::extract(&snapshot(b"002", b"5e10")).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMetadata { field: "fade", .. }));
    }

    #[test]
    fn longest_fields_stay_bounded() {
        let metadata = SnapshotMetadata::extract(&snapshot(b"999", b"9999")).unwrap();
        assert_eq!(metadata.total_samples(48000), 999 * 48000);
        assert!(metadata.fade_samples(48000) < 10 * 48000);
    }

    #[test]
    fn truncated_snapshot_is_invalid() {
        let err = SnapshotMetadata::extract(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMetadata { .. }));
    }

    #[test]
    fn surrounding_spaces_are_ignored() {
        let metadata = SnapshotMetadata::extract(&snapshot(b" 5 ", b"0")).unwrap();
        assert_eq!(metadata.duration_seconds, 5.0);
        assert_eq!(metadata.fade_millis, 0.0);
    }
}
