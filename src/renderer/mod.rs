//! Presentation adapters
//!
//! A renderer sees a read-only snapshot once per tick. Drawing is someone
//! else's job; the crate only ships adapters that discard or log frames.

use serde::Serialize;

use crate::error::RenderError;
use crate::sim::{Agent, Ground, Obstacle};

/// Read-only view of the world at the end of a tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub agents: Vec<&'a Agent>,
    pub obstacles: &'a [Obstacle],
    pub ground: &'a Ground,
    pub score: u32,
    /// Owned by the harness, shown for context only
    pub generation: u32,
    pub tick: u64,
}

impl Frame<'_> {
    /// JSON snapshot, for adapters that stream frames elsewhere
    pub fn to_json(&self) -> Result<String, RenderError> {
        serde_json::to_string(self).map_err(|e| RenderError(e.to_string()))
    }
}

/// Consumes frames. An error is unrecoverable and stops the whole run.
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Logs score changes at debug level and every frame at trace level
#[derive(Debug, Clone, Default)]
pub struct LogRenderer {
    last_score: Option<(u32, u32)>,
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        let key = (frame.generation, frame.score);
        if self.last_score != Some(key) {
            log::debug!(
                "Gen {} tick {}: score {}, {} alive",
                frame.generation,
                frame.tick,
                frame.score,
                frame.agents.len()
            );
            self.last_score = Some(key);
        }
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", frame.to_json()?);
        }
        Ok(())
    }
}
