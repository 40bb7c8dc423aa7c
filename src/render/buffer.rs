//! Render-buffer capability and scoped state guards.
//!
//! The renderer never touches pixels itself: everything goes through [`RenderBuffer`]. State
//! that must be undone before returning (clips, blend mode, color filter, saved state) is pushed
//! through a guard whose `Drop` pops it, so early returns cannot leak clip state into the next
//! use of the buffer.

use std::ops::{Deref, DerefMut};

use crate::foundation::core::{BitmapData, BlendMode, Point, Rect};
use crate::foundation::error::StageResult;
use crate::geom::matrix::Matrix;
use crate::scene::filter::{ColorMatrix, Filter};

/// Row order of a buffer's backing storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceOrigin {
    /// First row is the top of the image.
    #[default]
    TopLeft,
    /// First row is the bottom of the image (GL-style textures).
    BottomLeft,
}

/// Encodings accepted by [`RenderBuffer::to_data_url`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeFormat {
    Png,
    Jpeg,
}

impl EncodeFormat {
    pub fn mime(self) -> &'static str {
        match self {
            EncodeFormat::Png => "image/png",
            EncodeFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A pixel target with transform, alpha, blend and clip state.
///
/// Coordinates passed to [`RenderBuffer::draw_image`] and [`RenderBuffer::draw_mesh`] go
/// through the current matrix. Buffer-to-buffer composites and scissors are in device pixels,
/// top-left origin, regardless of [`RenderBuffer::origin`].
pub trait RenderBuffer: Sized {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn origin(&self) -> SurfaceOrigin {
        SurfaceOrigin::TopLeft
    }

    /// Resize the backing storage. With `offset`, old content is kept and moved by it;
    /// without, the buffer is cleared.
    fn resize(&mut self, width: u32, height: u32, offset: Option<Point>);

    fn alpha(&self) -> f32;

    /// Global alpha applied to subsequent draws.
    fn set_alpha(&mut self, alpha: f32);

    /// Bilinear (`true`) or nearest sampling for scaled images.
    fn set_smoothing(&mut self, smoothing: bool);

    /// Clear a device-space rectangle to transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn clear(&mut self) {
        let r = Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()));
        self.clear_rect(r);
    }

    /// Push transform, alpha, blend mode, color filter, smoothing and clip depth.
    fn save(&mut self);

    /// Pop state pushed by [`RenderBuffer::save`], dropping clips pushed since.
    fn restore(&mut self);

    fn matrix(&self) -> Matrix;

    fn set_matrix(&mut self, matrix: Matrix);

    fn reset_matrix(&mut self) {
        self.set_matrix(Matrix::IDENTITY);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(&Matrix::translation(dx, dy));
    }

    /// Apply `matrix` before the current transform.
    fn transform(&mut self, matrix: &Matrix) {
        let m = self.matrix().pre_multiply(matrix);
        self.set_matrix(m);
    }

    fn blend_mode(&self) -> BlendMode;

    fn set_blend_mode(&mut self, mode: BlendMode);

    fn color_filter(&self) -> Option<ColorMatrix>;

    /// Color matrix applied to subsequent image draws.
    fn set_color_filter(&mut self, filter: Option<ColorMatrix>);

    /// Clip to `rect` under the current transform until the next [`RenderBuffer::restore`].
    fn clip_rect(&mut self, rect: Rect) {
        let m = self.matrix();
        self.push_mask(rect, &m);
    }

    /// Push an axis-aligned device-space scissor.
    fn push_scissor(&mut self, rect: Rect);

    fn pop_scissor(&mut self);

    fn has_scissor(&self) -> bool;

    /// Push a clip covering `rect` mapped through `matrix`; works for any rotation or skew.
    fn push_mask(&mut self, rect: Rect, matrix: &Matrix);

    fn pop_mask(&mut self);

    /// Number of active scissors and masks.
    fn clip_depth(&self) -> usize;

    /// Encode the whole buffer as a `data:` URL. `quality` applies to JPEG only.
    fn to_data_url(&self, format: EncodeFormat, quality: Option<f32>) -> StageResult<String>;

    /// Premultiplied RGBA8 rows, top row first. Pixels outside the buffer read as transparent.
    fn get_pixels(&self, x: i64, y: i64, width: u32, height: u32) -> Vec<u8>;

    /// Composite `src` with its top-left at device `(x, y)`, honoring blend mode and clips.
    fn draw_buffer(&mut self, src: &Self, x: f64, y: f64);

    /// Like [`RenderBuffer::draw_buffer`] with `filters` applied to `src` first.
    fn draw_buffer_with_filters(&mut self, src: &Self, filters: &[Filter], x: f64, y: f64);

    /// Draw the `src` pixels of `image` into the local rectangle `dst`.
    fn draw_image(&mut self, image: &BitmapData, src: Rect, dst: Rect);

    /// Draw textured triangles; `uvs` are `0..1` over `src`, vertices are local and offset by
    /// `origin`.
    fn draw_mesh(
        &mut self,
        image: &BitmapData,
        src: Rect,
        origin: Point,
        vertices: &[f32],
        uvs: &[f32],
        indices: &[u16],
    );

    /// A compatible buffer of the given size. `temporary` buffers are short-lived scratch targets.
    fn make_render_buffer(&self, width: u32, height: u32, temporary: bool) -> Self;

    /// Submit batched work.
    fn flush(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClipKind {
    Scissor,
    Mask,
}

/// Clip pushed for the guard's lifetime.
///
/// Uses a scissor when the transform is axis aligned and no scissor is active, a mask otherwise.
pub struct ClipScope<'a, B: RenderBuffer> {
    buffer: &'a mut B,
    kind: ClipKind,
}

impl<'a, B: RenderBuffer> ClipScope<'a, B> {
    pub fn push(buffer: &'a mut B, local: Rect, matrix: &Matrix) -> Self {
        let kind = if matrix.is_axis_aligned() && !buffer.has_scissor() {
            buffer.push_scissor(matrix.transform_bounds(local));
            ClipKind::Scissor
        } else {
            buffer.push_mask(local, matrix);
            ClipKind::Mask
        };
        Self { buffer, kind }
    }

    pub fn uses_scissor(&self) -> bool {
        self.kind == ClipKind::Scissor
    }
}

impl<B: RenderBuffer> Deref for ClipScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buffer
    }
}

impl<B: RenderBuffer> DerefMut for ClipScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buffer
    }
}

impl<B: RenderBuffer> Drop for ClipScope<'_, B> {
    fn drop(&mut self) {
        match self.kind {
            ClipKind::Scissor => self.buffer.pop_scissor(),
            ClipKind::Mask => self.buffer.pop_mask(),
        }
    }
}

/// Blend mode set for the guard's lifetime; the previous mode comes back on drop.
pub struct BlendScope<'a, B: RenderBuffer> {
    buffer: &'a mut B,
    previous: BlendMode,
}

impl<'a, B: RenderBuffer> BlendScope<'a, B> {
    pub fn new(buffer: &'a mut B, mode: BlendMode) -> Self {
        let previous = buffer.blend_mode();
        buffer.set_blend_mode(mode);
        Self { buffer, previous }
    }
}

impl<B: RenderBuffer> Deref for BlendScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buffer
    }
}

impl<B: RenderBuffer> DerefMut for BlendScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buffer
    }
}

impl<B: RenderBuffer> Drop for BlendScope<'_, B> {
    fn drop(&mut self) {
        self.buffer.set_blend_mode(self.previous);
    }
}

/// Color filter bound for the guard's lifetime.
pub struct FilterScope<'a, B: RenderBuffer> {
    buffer: &'a mut B,
    previous: Option<ColorMatrix>,
}

impl<'a, B: RenderBuffer> FilterScope<'a, B> {
    pub fn new(buffer: &'a mut B, filter: Option<ColorMatrix>) -> Self {
        let previous = buffer.color_filter();
        buffer.set_color_filter(filter);
        Self { buffer, previous }
    }
}

impl<B: RenderBuffer> Deref for FilterScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buffer
    }
}

impl<B: RenderBuffer> DerefMut for FilterScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buffer
    }
}

impl<B: RenderBuffer> Drop for FilterScope<'_, B> {
    fn drop(&mut self) {
        self.buffer.set_color_filter(self.previous);
    }
}

/// [`RenderBuffer::save`] on creation, [`RenderBuffer::restore`] on drop.
pub struct StateScope<'a, B: RenderBuffer> {
    buffer: &'a mut B,
}

impl<'a, B: RenderBuffer> StateScope<'a, B> {
    pub fn new(buffer: &'a mut B) -> Self {
        buffer.save();
        Self { buffer }
    }
}

impl<B: RenderBuffer> Deref for StateScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buffer
    }
}

impl<B: RenderBuffer> DerefMut for StateScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buffer
    }
}

impl<B: RenderBuffer> Drop for StateScope<'_, B> {
    fn drop(&mut self) {
        self.buffer.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
