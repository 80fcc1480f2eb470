pub mod native;

use crate::error::Result;

/// A chip emulator treated as a black box.
///
/// `load` hands a whole snapshot to the engine. `play` renders exactly
/// `out.len() / 2` stereo frames at the native rate into `out`, interleaved
/// left then right. An engine that cannot honor a request must return
/// `RenderError::EngineFault` rather than fill `out` partially.
pub trait EmulationEngine {
  fn load(&mut self, snapshot: &[u8]) -> Result<()>;
  fn play(&mut self, out: &mut [i16]) -> Result<()>;
}

impl<E: EmulationEngine + ?Sized> EmulationEngine for &mut E {
  fn load(&mut self, snapshot: &[u8]) -> Result<()> {
    (**self).load(snapshot)
  }

  fn play(&mut self, out: &mut [i16]) -> Result<()> {
    (**self).play(out)
  }
}

impl<E: EmulationEngine + ?Sized> EmulationEngine for Box<E> {
  fn load(&mut self, snapshot: &[u8]) -> Result<()> {
    (**self).load(snapshot)
  }

  fn play(&mut self, out: &mut [i16]) -> Result<()> {
    (**self).play(out)
  }
}
