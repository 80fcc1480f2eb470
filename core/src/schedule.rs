//! Drives the session/resampler pair until the requested number of output
//! samples has been produced, either in one pass or in bounded slices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::EmulationEngine;
use crate::error::{RenderError, Result};
use crate::resample::Resampler;
use crate::session::RenderSession;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Render everything without handing control back.
    Direct,
    /// Hand control back after every `refreshes_per_slice` window refreshes.
    Bounded { refreshes_per_slice: usize },
}

/// Shared flag checked between bounded slices.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub offset: usize,
    pub total_samples: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total_samples == 0 {
            1.0
        } else {
            self.offset as f64 / self.total_samples as f64
        }
    }
}

/// Left and right output-rate channels, each `total_samples` long.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputBuffers {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl OutputBuffers {
    fn new(total_samples: usize) -> OutputBuffers {
        OutputBuffers {
            left: vec![0.0; total_samples],
            right: vec![0.0; total_samples],
        }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// A resumable render. Owns everything a conversion mutates.
pub struct RenderTask<E: EmulationEngine> {
    session: RenderSession<E>,
    resampler: Resampler,
    output: OutputBuffers,
    offset: usize,
}

impl<E: EmulationEngine> RenderTask<E> {
    pub fn new(session: RenderSession<E>, resampler: Resampler, total_samples: usize) -> RenderTask<E> {
        RenderTask {
            session,
            resampler,
            output: OutputBuffers::new(total_samples),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_samples(&self) -> usize {
        self.output.len()
    }

    pub fn is_finished(&self) -> bool {
        self.offset >= self.total_samples()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            offset: self.offset,
            total_samples: self.total_samples(),
        }
    }

    /// Plays one window and writes as many output samples as it can satisfy.
    pub fn refresh_once(&mut self) -> Result<usize> {
        let remaining = self.total_samples() - self.offset;
        if remaining == 0 {
            return Ok(0);
        }

        let window = self.session.refresh()?;
        let count = usize::min(self.resampler.capacity(window), remaining);
        if count == 0 {
            return Err(RenderError::EngineFault(format!(
                "window of {} frames cannot produce output samples",
                window.frames()
            )));
        }

        let range = self.offset..self.offset + count;
        self.resampler.fill(window, 0, &mut self.output.left[range.clone()])?;
        self.resampler.fill(window, 1, &mut self.output.right[range])?;

        self.offset += count;
        Ok(count)
    }

    /// Runs at most `refreshes` refreshes, stopping early when finished.
    pub fn run_slice(&mut self, refreshes: usize) -> Result<Progress> {
        for _ in 0..refreshes {
            if self.is_finished() {
                break;
            }
            self.refresh_once()?;
        }
        Ok(self.progress())
    }

    pub fn run_to_end(mut self) -> Result<OutputBuffers> {
        while !self.is_finished() {
            self.refresh_once()?;
        }
        log::debug!("direct render finished after {} refreshes", self.session.refreshes());
        Ok(self.output)
    }

    pub fn slices(&mut self, refreshes_per_slice: usize, cancel: Option<CancelToken>) -> Slices<'_, E> {
        Slices {
            task: self,
            refreshes_per_slice: refreshes_per_slice.max(1),
            cancel,
            done: false,
        }
    }

    /// Consumes a finished task. Returns `None` if samples are still missing.
    pub fn into_output(self) -> Option<OutputBuffers> {
        if self.is_finished() {
            Some(self.output)
        } else {
            None
        }
    }
}

/// Bounded mode: yields progress once per slice until the task is finished,
/// an error occurs, or the cancel token is set.
pub struct Slices<'a, E: EmulationEngine> {
    task: &'a mut RenderTask<E>,
    refreshes_per_slice: usize,
    cancel: Option<CancelToken>,
    done: bool,
}

impl<'a, E: EmulationEngine> Iterator for Slices<'a, E> {
    type Item = Result<Progress>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.task.is_finished() {
            return None;
        }

        if self.cancel.as_ref().map_or(false, |c| c.is_cancelled()) {
            self.done = true;
            return Some(Err(RenderError::Cancelled));
        }

        let result = self.task.run_slice(self.refreshes_per_slice);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Renders `task` to completion with the given schedule.
pub fn run<E: EmulationEngine>(
    mut task: RenderTask<E>,
    schedule: Schedule,
    cancel: Option<CancelToken>,
) -> Result<OutputBuffers> {
    let refreshes_per_slice = match schedule {
        Schedule::Direct => return task.run_to_end(),
        Schedule::Bounded { refreshes_per_slice } => refreshes_per_slice,
    };

    for progress in task.slices(refreshes_per_slice, cancel) {
        let progress = progress?;
        log::debug!(
            "rendered {}/{} samples ({:.0}%)",
            progress.offset,
            progress.total_samples,
            progress.fraction() * 100.0
        );
    }

    task.into_output().ok_or(RenderError::Cancelled)
}
