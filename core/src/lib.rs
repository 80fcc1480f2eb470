pub mod convert;
pub mod engine;
pub mod error;
pub mod fade;
pub mod interleave;
pub mod metadata;
pub mod resample;
pub mod schedule;
pub mod session;
pub mod wav;
pub mod window;

pub use convert::{convert_file, load_snapshot, render, render_to_bytes, write_output, ConvertOptions, RenderedAudio};
pub use engine::native::NativeEngine;
pub use engine::EmulationEngine;
pub use error::{RenderError, Result};
pub use metadata::SnapshotMetadata;
pub use schedule::{CancelToken, Progress, RenderTask, Schedule};
pub use session::RenderSession;
pub use wav::OutputFormat;

/// Rate the SPC700 DSP produces samples at.
pub const NATIVE_SAMPLE_RATE: u32 = 32000;
pub const OUTPUT_SAMPLE_RATE: u32 = 48000;
pub const CHANNELS: usize = 2;
/// Output samples requested per engine refresh.
pub const OUTPUT_WINDOW: usize = 16384;
pub const DEFAULT_SLICE_REFRESHES: usize = 10;
/// Size of a full SPC file (header, 64KB RAM, DSP registers, extra RAM).
pub const SNAPSHOT_SIZE: usize = 66048;
