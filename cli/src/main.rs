use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use spc2wav_core::engine::native::default_library_name;
use spc2wav_core::{convert_file, ConvertOptions, NativeEngine, Schedule};

#[derive(Parser, Debug)]
#[command(version, about = "Render SPC snapshots to WAV files")]
struct Args {
    /// Input snapshot (.spc)
    input: Option<PathBuf>,

    /// Output file (.wav)
    output: Option<PathBuf>,

    /// Shared library providing the snes_spc API
    #[arg(short, long, env = "SPC2WAV_ENGINE")]
    engine: Option<PathBuf>,

    /// Engine refreshes rendered between progress updates (0 renders in one pass)
    #[arg(short, long, default_value_t = spc2wav_core::DEFAULT_SLICE_REFRESHES)]
    slice: usize,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().map_or(false, |ext| ext == extension)
}

fn validate(args: &Args) -> Result<(&Path, &Path), String> {
    let input = args.input.as_deref()
        .filter(|input| has_extension(input, "spc"))
        .ok_or("Please supply a valid input SPC file as the first argument.")?;

    let output = args.output.as_deref()
        .filter(|output| has_extension(output, "wav"))
        .ok_or("This tool outputs .wav files. Please supply a .wav file extension for your output file.")?;

    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()));
    }

    Ok((input, output))
}

fn convert(input: &Path, output: &Path, args: &Args) -> Result<()> {
    let library: OsString = args.engine.clone()
        .map(PathBuf::into_os_string)
        .unwrap_or_else(default_library_name);
    let engine = NativeEngine::open(&library)
        .with_context(|| format!("failed to load engine {}", library.to_string_lossy()))?;

    let schedule = match args.slice {
        0 => Schedule::Direct,
        refreshes_per_slice => Schedule::Bounded { refreshes_per_slice },
    };
    let options = ConvertOptions { schedule, ..ConvertOptions::default() };

    println!("Converting {} to {}...", input.display(), output.display());
    let rendered = convert_file(input, output, engine, &options)?;
    log::info!(
        "{} samples, {} faded, {}s",
        rendered.total_samples,
        rendered.fade_samples,
        rendered.metadata.duration_seconds
    );

    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::builder()
        .format(|buf, record| {
            writeln!(buf, "{}: {}", record.level(), record.args())
        })
        .init();

    println!("spc2wav version {}\n", env!("CARGO_PKG_VERSION"));

    let (input, output) = match validate(&args) {
        Ok(paths) => paths,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    match convert(input, output, &args) {
        Ok(()) => println!("Successfully wrote {}", output.display()),
        Err(err) => {
            eprintln!("Error during conversion: {:#}", err);
            process::exit(1);
        }
    }
}
