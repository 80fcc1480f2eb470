//! 16-bit PCM encoding, with or without the canonical 44-byte RIFF/WAVE header.

use std::io::Cursor;

use crate::error::Result;

pub const HEADER_SIZE: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = BITS_PER_SAMPLE as usize / 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Wav,
    RawPcm,
}

/// Clamps to `[-1, 1]` and scales by 32768 below zero, 32767 above.
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

pub fn encode_pcm(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    samples.iter()
        .map(|&s| sample_to_i16(s))
        .for_each(|s| out.extend_from_slice(&s.to_le_bytes()));
    out
}

pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(HEADER_SIZE + samples.len() * BYTES_PER_SAMPLE));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(sample_to_i16(sample))?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

pub fn encode(samples: &[f32], format: OutputFormat, sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Wav => encode_wav(samples, sample_rate, channels),
        OutputFormat::RawPcm => Ok(encode_pcm(samples)),
    }
}
