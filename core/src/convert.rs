use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::engine::EmulationEngine;
use crate::error::Result;
use crate::fade::FadeEnvelope;
use crate::interleave::interleave;
use crate::metadata::SnapshotMetadata;
use crate::resample::Resampler;
use crate::schedule::{self, CancelToken, RenderTask, Schedule};
use crate::session::RenderSession;
use crate::wav::{self, OutputFormat};
use crate::{CHANNELS, DEFAULT_SLICE_REFRESHES, NATIVE_SAMPLE_RATE, OUTPUT_SAMPLE_RATE, OUTPUT_WINDOW};

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub schedule: Schedule,
    /// Output samples requested per engine refresh.
    pub output_window: usize,
    pub cancel: Option<CancelToken>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            format: OutputFormat::Wav,
            schedule: Schedule::Bounded { refreshes_per_slice: DEFAULT_SLICE_REFRESHES },
            output_window: OUTPUT_WINDOW,
            cancel: None,
        }
    }
}

/// Faded, interleaved output of one conversion.
#[derive(Clone, Debug)]
pub struct RenderedAudio {
    pub metadata: SnapshotMetadata,
    pub total_samples: usize,
    pub fade_samples: usize,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl RenderedAudio {
    pub fn encode(&self, format: OutputFormat) -> Result<Vec<u8>> {
        wav::encode(&self.samples, format, self.sample_rate, CHANNELS as u16)
    }
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let bytes = fs::read(path.as_ref())?;
    log::debug!("read {} bytes from {}", bytes.len(), path.as_ref().display());
    Ok(bytes)
}

/// Renders a snapshot with a fresh session around `engine`.
///
/// The session is dropped before this returns, whatever the outcome.
pub fn render<E: EmulationEngine>(snapshot: &[u8], engine: E, options: &ConvertOptions) -> Result<RenderedAudio> {
    let metadata = SnapshotMetadata::extract(snapshot)?;
    let total_samples = metadata.total_samples(OUTPUT_SAMPLE_RATE);
    let fade = FadeEnvelope::from_millis(metadata.fade_millis, OUTPUT_SAMPLE_RATE);
    log::info!(
        "rendering {} samples at {}Hz ({} fade samples)",
        total_samples,
        OUTPUT_SAMPLE_RATE,
        fade.fade_samples()
    );

    let resampler = Resampler::new(NATIVE_SAMPLE_RATE, OUTPUT_SAMPLE_RATE);
    let session = RenderSession::open(engine, snapshot, resampler.window_frames(options.output_window))?;
    let task = RenderTask::new(session, resampler, total_samples);

    let mut output = schedule::run(task, options.schedule, options.cancel.clone())?;
    fade.apply(&mut output.left, &mut output.right);

    Ok(RenderedAudio {
        metadata,
        total_samples,
        fade_samples: fade.fade_samples(),
        sample_rate: OUTPUT_SAMPLE_RATE,
        samples: interleave(&output.left, &output.right),
    })
}

pub fn render_to_bytes<E: EmulationEngine>(snapshot: &[u8], engine: E, options: &ConvertOptions) -> Result<Vec<u8>> {
    render(snapshot, engine, options)?.encode(options.format)
}

/// Writes `bytes` next to `path` and renames into place, so a failure never
/// leaves a partial file behind.
pub fn write_output<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn convert_file<E, P, Q>(input: P, output: Q, engine: E, options: &ConvertOptions) -> Result<RenderedAudio>
where
    E: EmulationEngine,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let snapshot = load_snapshot(input)?;
    let rendered = render(&snapshot, engine, options)?;
    write_output(output, &rendered.encode(options.format)?)?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    struct SilentEngine;

    impl EmulationEngine for SilentEngine {
        fn load(&mut self, _snapshot: &[u8]) -> Result<()> {
            Ok(())
        }

        fn play(&mut self, out: &mut [i16]) -> Result<()> {
            out.fill(0);
            Ok(())
        }
    }

    fn snapshot(duration: &[u8], fade: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; crate::SNAPSHOT_SIZE];
        bytes[169..169 + duration.len()].copy_from_slice(duration);
        bytes[172..172 + fade.len()].copy_from_slice(fade);
        bytes
    }

    #[test]
    fn raw_pcm_has_no_header() {
        let options = ConvertOptions { format: OutputFormat::RawPcm, ..ConvertOptions::default() };
        let bytes = render_to_bytes(&snapshot(b"1", b"0"), SilentEngine, &options).unwrap();
        assert_eq!(bytes.len(), 48000 * 2 * 2);
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn invalid_metadata_stops_before_rendering() {
        struct PanickingEngine;
        impl EmulationEngine for PanickingEngine {
            fn load(&mut self, _snapshot: &[u8]) -> Result<()> {
                panic!("engine must not be touched")
            }
            fn play(&mut self, _out: &mut [i16]) -> Result<()> {
                panic!("engine must not be touched")
            }
        }

        let err = render(&snapshot(b"", b""), PanickingEngine, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMetadata { field: "duration", .. }));
    }

    #[test]
    fn write_output_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        fs::write(&path, b"old").unwrap();

        write_output(&path, b"new contents").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new contents");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
