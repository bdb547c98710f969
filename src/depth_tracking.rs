use crate::error::{Error, Result};

/// Tracks container nesting during encode and decode.
#[derive(Clone, Debug)]
pub struct DepthTracker {
    depth: usize,
    max: usize,
}

impl DepthTracker {
    /// Create a new depth tracker that allows at most `max` nested containers.
    pub fn new(max: usize) -> Self {
        Self { depth: 0, max }
    }

    /// Step into a container.
    pub fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max {
            return Err(Error::DepthLimit(self.max));
        }
        Ok(())
    }

    /// Step back out of a container.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
