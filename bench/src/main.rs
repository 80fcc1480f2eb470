use spc2wav_core::{render, ConvertOptions, EmulationEngine, Result, Schedule, SNAPSHOT_SIZE};
use std::time::{Duration, SystemTime};

const COUNT_UPPER: usize = 20;

/// Square wave source so the measurement covers resampling and encoding only.
struct SquareEngine {
    phase: u32,
}

impl EmulationEngine for SquareEngine {
    fn load(&mut self, _snapshot: &[u8]) -> Result<()> {
        self.phase = 0;
        Ok(())
    }

    fn play(&mut self, out: &mut [i16]) -> Result<()> {
        for frame in out.chunks_mut(2) {
            let value = if (self.phase / 64) % 2 == 0 { 12000 } else { -12000 };
            frame.fill(value);
            self.phase = self.phase.wrapping_add(1);
        }
        Ok(())
    }
}

fn measure(snapshot: &[u8], schedule: Schedule) -> Duration {
    let options = ConvertOptions { schedule, ..ConvertOptions::default() };

    let mut times = Vec::new();
    for _ in 0..COUNT_UPPER {
        let before = SystemTime::now();
        let rendered = render(snapshot, SquareEngine { phase: 0 }, &options).unwrap();
        let bytes = rendered.encode(options.format).unwrap();
        std::hint::black_box(bytes);
        times.push(before.elapsed().unwrap());
    }

    times.iter().sum::<Duration>() / COUNT_UPPER as u32
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let seconds = args.get(1).map(String::as_str).unwrap_or("60");

    let mut snapshot = vec![0u8; SNAPSHOT_SIZE];
    snapshot[169..169 + seconds.len().min(3)].copy_from_slice(&seconds.as_bytes()[..seconds.len().min(3)]);
    snapshot[172..176].copy_from_slice(b"5000");

    let direct = measure(&snapshot, Schedule::Direct);
    let bounded = measure(&snapshot, Schedule::Bounded { refreshes_per_slice: 10 });
    println!("direct average: {} us", direct.as_micros());
    println!("bounded average: {} us", bounded.as_micros());
}
