//! Scratch rasterization of text and vector content into bitmaps.
//!
//! Glyph runs and paths are drawn with `vello_cpu` onto a power-of-two scratch canvas, then
//! cropped to the content box plus one pixel of padding on every side so antialiased edges are
//! not cut. The renderer caches the result on the node and blits it like any other image.

use crate::foundation::core::{BezPath, BitmapData, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::next_pow2;
use crate::scene::node::{GraphicsNode, PathPaint, TextNode};

/// Padding in pixels around rasterized content.
pub(crate) const PAD: f64 = 1.0;

struct Canvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

/// Reusable scratch canvas for text and graphics nodes.
#[derive(Default)]
pub(crate) struct ScratchRasterizer {
    canvas: Option<Canvas>,
}

impl std::fmt::Debug for ScratchRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.canvas.as_ref().map(|c| (c.width, c.height));
        f.debug_struct("ScratchRasterizer")
            .field("canvas", &size)
            .finish()
    }
}

/// Local rectangle a padded raster of `bounds` is drawn into.
pub(crate) fn padded_dst(bounds: Rect, bitmap: &BitmapData) -> Rect {
    Rect::new(
        bounds.x0 - PAD,
        bounds.y0 - PAD,
        bounds.x0 - PAD + f64::from(bitmap.width()),
        bounds.y0 - PAD + f64::from(bitmap.height()),
    )
}

impl ScratchRasterizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rasterize glyph runs; `None` for an empty text box.
    pub(crate) fn rasterize_text(&mut self, text: &TextNode) -> StageResult<Option<BitmapData>> {
        let bounds = Rect::new(text.x, text.y, text.x + text.width, text.y + text.height);
        self.rasterize(bounds, |ctx| {
            for run in &text.runs {
                let [r, g, b, a] = run.color;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&run.font)
                    .font_size(run.size)
                    .fill_glyphs(glyphs);
            }
        })
    }

    /// Rasterize fill and stroke commands; `None` when nothing has area.
    pub(crate) fn rasterize_graphics(
        &mut self,
        graphics: &GraphicsNode,
    ) -> StageResult<Option<BitmapData>> {
        let bounds = Rect::new(
            graphics.x,
            graphics.y,
            graphics.x + graphics.width,
            graphics.y + graphics.height,
        );
        self.rasterize(bounds, |ctx| {
            for cmd in &graphics.commands {
                let path = bezpath_to_cpu(&cmd.path);
                match cmd.paint {
                    PathPaint::Fill { color: [r, g, b, a] } => {
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                        ctx.fill_path(&path);
                    }
                    PathPaint::Stroke {
                        color: [r, g, b, a],
                        width,
                    } => {
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                        ctx.stroke_path(&path);
                    }
                }
            }
        })
    }

    fn rasterize(
        &mut self,
        bounds: Rect,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> StageResult<Option<BitmapData>> {
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Ok(None);
        }
        let out_w = (bounds.width().ceil() + 2.0 * PAD) as u32;
        let out_h = (bounds.height().ceil() + 2.0 * PAD) as u32;
        let canvas = self.canvas_for(out_w, out_h)?;

        let mut ctx = vello_cpu::RenderContext::new(canvas.width, canvas.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            PAD - bounds.x0,
            PAD - bounds.y0,
        )));
        draw(&mut ctx);
        ctx.flush();
        canvas.pixmap.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut canvas.pixmap);

        let stride = usize::from(canvas.width) * 4;
        let row = out_w as usize * 4;
        let data = canvas.pixmap.data_as_u8_slice();
        let mut pixels = Vec::with_capacity(row * out_h as usize);
        for y in 0..out_h as usize {
            pixels.extend_from_slice(&data[y * stride..y * stride + row]);
        }
        tracing::trace!(out_w, out_h, "content rasterized");
        BitmapData::from_premul(out_w, out_h, pixels).map(Some)
    }

    fn canvas_for(&mut self, width: u32, height: u32) -> StageResult<&mut Canvas> {
        let fits = self
            .canvas
            .as_ref()
            .is_some_and(|c| u32::from(c.width) >= width && u32::from(c.height) >= height);
        if !fits {
            let to_u16 = |v: u32| {
                u16::try_from(next_pow2(f64::from(v)))
                    .map_err(|_| StageError::render("scratch canvas exceeds u16"))
            };
            let (w, h) = (to_u16(width)?, to_u16(height)?);
            if u32::from(w) < width || u32::from(h) < height {
                return Err(StageError::render(format!(
                    "content {width}x{height} exceeds the scratch canvas limit"
                )));
            }
            self.canvas = Some(Canvas {
                width: w,
                height: h,
                pixmap: vello_cpu::Pixmap::new(w, h),
            });
        }
        self.canvas
            .as_mut()
            .ok_or_else(|| StageError::render("scratch canvas missing"))
    }
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
