use crate::engine::EmulationEngine;
use crate::error::Result;
use crate::window::NativeAudioWindow;

/// Exclusive pairing of a loaded engine and its native window.
///
/// A session is loaded exactly once, in `open`. Dropping it releases the
/// engine together with the snapshot it holds.
pub struct RenderSession<E: EmulationEngine> {
  engine: E,
  window: NativeAudioWindow,
  refreshes: usize,
}

impl<E: EmulationEngine> RenderSession<E> {
  pub fn open(mut engine: E, snapshot: &[u8], window_frames: usize) -> Result<RenderSession<E>> {
    engine.load(snapshot)?;
    log::debug!("session opened: {} bytes snapshot, {} frames window", snapshot.len(), window_frames);

    Ok(RenderSession {
      engine,
      window: NativeAudioWindow::new(window_frames),
      refreshes: 0,
    })
  }

  /// Renders the next window. The returned borrow ends before the next refresh.
  pub fn refresh(&mut self) -> Result<&NativeAudioWindow> {
    self.engine.play(self.window.as_mut_slice())?;
    self.refreshes += 1;
    Ok(&self.window)
  }

  pub fn refreshes(&self) -> usize {
    self.refreshes
  }

  /// Tears down the session but keeps the engine for a later conversion.
  pub fn into_engine(self) -> E {
    self.engine
  }
}
