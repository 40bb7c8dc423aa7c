use crate::foundation::core::BlendMode;
use crate::geom::matrix::Matrix;
use crate::render::buffer::RenderBuffer;

/// Pool configuration for scratch render buffers.
#[derive(Debug, Clone, Copy)]
pub struct BufferPoolOpts {
    /// Maximum number of idle buffers kept after a top-level pass.
    pub capacity: usize,
    /// Resize retained buffers to 0x0 at trim time, freeing their pixels.
    pub shrink_on_trim: bool,
}

impl Default for BufferPoolOpts {
    fn default() -> Self {
        Self {
            capacity: 6,
            shrink_on_trim: true,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferPoolStats {
    pub retained: usize,
    pub created: u64,
    pub reused: u64,
    pub trimmed: u64,
}

/// Bounded pool of idle off-screen buffers.
///
/// Buffers are taken for one filter, mask or cached-surface composite and handed back right
/// after. The pool may grow past its capacity while a pass is running; [`RenderBufferPool::trim`]
/// brings it back down once the outermost pass returns.
pub struct RenderBufferPool<B> {
    opts: BufferPoolOpts,
    stats: BufferPoolStats,
    idle: Vec<B>,
}

impl<B: RenderBuffer> RenderBufferPool<B> {
    pub fn new(opts: BufferPoolOpts) -> Self {
        Self {
            opts,
            stats: BufferPoolStats::default(),
            idle: Vec::new(),
        }
    }

    pub fn opts(&self) -> BufferPoolOpts {
        self.opts
    }

    pub fn stats(&self) -> BufferPoolStats {
        BufferPoolStats {
            retained: self.idle.len(),
            ..self.stats.clone()
        }
    }

    /// Idle buffers currently held.
    pub fn len(&self) -> usize {
        self.idle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idle.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &B> {
        self.idle.iter()
    }

    /// Take a cleared `width` x `height` buffer with default state.
    ///
    /// Prefers the smallest idle buffer that already covers the size, then the most recently
    /// released one; creates a new buffer compatible with `like` when the pool is empty.
    pub fn acquire(&mut self, like: &B, width: u32, height: u32) -> B {
        let covering = self
            .idle
            .iter()
            .enumerate()
            .filter(|(_, b)| b.width() >= width && b.height() >= height)
            .min_by_key(|(_, b)| u64::from(b.width()) * u64::from(b.height()))
            .map(|(i, _)| i);
        let Some(i) = covering.or_else(|| self.idle.len().checked_sub(1)) else {
            self.stats.created = self.stats.created.saturating_add(1);
            return like.make_render_buffer(width, height, true);
        };

        self.stats.reused = self.stats.reused.saturating_add(1);
        let mut buffer = self.idle.remove(i);
        buffer.resize(width, height, None);
        buffer.set_matrix(Matrix::IDENTITY);
        buffer.set_alpha(1.0);
        buffer.set_blend_mode(BlendMode::Normal);
        buffer.set_color_filter(None);
        buffer
    }

    /// Hand a buffer back. Its clip stack must be balanced.
    pub fn release(&mut self, buffer: B) {
        debug_assert_eq!(buffer.clip_depth(), 0, "released buffer still clipped");
        self.idle.push(buffer);
    }

    /// Drop buffers beyond capacity (zero-sized first) and optionally shrink the rest.
    ///
    /// Returns how many buffers were dropped.
    pub fn trim(&mut self) -> usize {
        let capacity = self.opts.capacity;
        let mut dropped = 0usize;
        if self.idle.len() > capacity {
            for mut b in self.idle.drain(capacity..) {
                b.resize(0, 0, None);
                dropped += 1;
            }
        }
        if self.opts.shrink_on_trim {
            for b in &mut self.idle {
                b.resize(0, 0, None);
            }
        }
        self.stats.trimmed = self.stats.trimmed.saturating_add(dropped as u64);
        if dropped > 0 {
            tracing::debug!(dropped, retained = self.idle.len(), "render buffer pool trimmed");
        }
        dropped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
