//! Software [`RenderBuffer`]: premultiplied RGBA8 pixels in memory.
//!
//! Used as the reference target in tests and for headless rendering. Draws are sampled per
//! device pixel center; clips are tested per pixel.

mod blur;
mod composite;
mod filter;

use std::io::Cursor;

use base64::Engine as _;

use crate::foundation::core::{BitmapData, BlendMode, Point, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::math::{unit_to_u8, unpremultiply_rgba8_in_place};
use crate::geom::matrix::Matrix;
use crate::render::buffer::{EncodeFormat, RenderBuffer, SurfaceOrigin};
use crate::scene::filter::{ColorMatrix, Filter};

use self::composite::{PremulRgba8, blend, skips_transparent};
use self::filter::{apply_filters, filter_pixel};

#[derive(Clone, Copy, Debug)]
struct DrawState {
    matrix: Matrix,
    alpha: f32,
    blend: BlendMode,
    filter: Option<ColorMatrix>,
    smoothing: bool,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            alpha: 1.0,
            blend: BlendMode::Normal,
            filter: None,
            smoothing: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Clip {
    Scissor(Rect),
    /// `rect` in the space `inverse` maps device points into.
    Mask { inverse: Matrix, rect: Rect, bounds: Rect },
    /// Mask through a singular transform: nothing passes.
    Empty,
}

impl Clip {
    fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Clip::Scissor(r) => x >= r.x0 && x < r.x1 && y >= r.y0 && y < r.y1,
            Clip::Mask { inverse, rect, .. } => {
                let p = inverse.transform_point(x, y);
                p.x >= rect.x0 && p.x < rect.x1 && p.y >= rect.y0 && p.y < rect.y1
            }
            Clip::Empty => false,
        }
    }

    fn bounds(&self) -> Rect {
        match self {
            Clip::Scissor(r) => *r,
            Clip::Mask { bounds, .. } => *bounds,
            Clip::Empty => Rect::ZERO,
        }
    }
}

/// In-memory premultiplied RGBA8 render target.
#[derive(Clone, Debug)]
pub struct CpuRenderBuffer {
    width: u32,
    height: u32,
    origin: SurfaceOrigin,
    pixels: Vec<u8>,
    state: DrawState,
    saved: Vec<(DrawState, usize)>,
    clips: Vec<Clip>,
}

impl CpuRenderBuffer {
    /// Transparent buffer with top-left row order.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_origin(width, height, SurfaceOrigin::TopLeft)
    }

    pub fn with_origin(width: u32, height: u32, origin: SurfaceOrigin) -> Self {
        Self {
            width,
            height,
            origin,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            state: DrawState::default(),
            saved: Vec::new(),
            clips: Vec::new(),
        }
    }

    /// Pixel at device `(x, y)`, top-left origin; transparent outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = self.index(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Snapshot as immutable bitmap data (top-left row order).
    pub fn to_bitmap(&self) -> StageResult<BitmapData> {
        let px = self.get_pixels(0, 0, self.width, self.height);
        BitmapData::from_premul(self.width, self.height, px)
    }

    /// Fill the whole buffer with one premultiplied color, ignoring state.
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        let row = match self.origin {
            SurfaceOrigin::TopLeft => y,
            SurfaceOrigin::BottomLeft => self.height - 1 - y,
        };
        ((row as usize) * (self.width as usize) + x as usize) * 4
    }

    fn clip_contains(&self, x: f64, y: f64) -> bool {
        self.clips.iter().all(|c| c.contains(x, y))
    }

    /// Device pixel span covered by `bounds`, the buffer and every clip.
    fn pixel_span(&self, bounds: Rect) -> Option<(u32, u32, u32, u32)> {
        let mut r = bounds.intersect(Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        for c in &self.clips {
            r = r.intersect(c.bounds());
        }
        if !(r.width() > 0.0 && r.height() > 0.0) {
            return None;
        }
        let x0 = r.x0.floor().max(0.0) as u32;
        let y0 = r.y0.floor().max(0.0) as u32;
        let x1 = (r.x1.ceil() as u32).min(self.width);
        let y1 = (r.y1.ceil() as u32).min(self.height);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn put(&mut self, x: u32, y: u32, src: PremulRgba8, opacity: u16) {
        let mode = self.state.blend;
        if src[3] == 0 && skips_transparent(mode) {
            return;
        }
        let src = match &self.state.filter {
            Some(cm) => filter_pixel(src, cm),
            None => src,
        };
        let i = self.index(x, y);
        let dst = [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ];
        self.pixels[i..i + 4].copy_from_slice(&blend(mode, dst, src, opacity));
    }

    fn composite_pixels(&mut self, src: &[u8], width: u32, height: u32, x: f64, y: f64) {
        let (ox, oy) = (x.round() as i64, y.round() as i64);
        let mode = self.state.blend;
        let bounds = Rect::new(
            ox as f64,
            oy as f64,
            ox as f64 + f64::from(width),
            oy as f64 + f64::from(height),
        );
        let Some((x0, y0, x1, y1)) = self.pixel_span(bounds) else {
            return;
        };
        for dy in y0..y1 {
            for dx in x0..x1 {
                if !self.clip_contains(f64::from(dx) + 0.5, f64::from(dy) + 0.5) {
                    continue;
                }
                let sx = (i64::from(dx) - ox) as usize;
                let sy = (i64::from(dy) - oy) as usize;
                let si = (sy * width as usize + sx) * 4;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                if s[3] == 0 && skips_transparent(mode) {
                    continue;
                }
                let i = self.index(dx, dy);
                let dst = [
                    self.pixels[i],
                    self.pixels[i + 1],
                    self.pixels[i + 2],
                    self.pixels[i + 3],
                ];
                self.pixels[i..i + 4].copy_from_slice(&blend(mode, dst, s, 255));
            }
        }
    }
}

/// Nearest-neighbour or bilinear read from `image`, clamped to the `src` rect.
fn sample(image: &BitmapData, src: &Rect, u: f64, v: f64, bilinear: bool) -> PremulRgba8 {
    let min_x = src.x0.floor().max(0.0);
    let min_y = src.y0.floor().max(0.0);
    let max_x = (src.x1.ceil() - 1.0).min(f64::from(image.width()) - 1.0);
    let max_y = (src.y1.ceil() - 1.0).min(f64::from(image.height()) - 1.0);
    if max_x < min_x || max_y < min_y {
        return [0; 4];
    }
    if !bilinear {
        let x = u.floor().clamp(min_x, max_x) as u32;
        let y = v.floor().clamp(min_y, max_y) as u32;
        return image.pixel(x, y);
    }
    let fx = (u - 0.5).clamp(min_x, max_x);
    let fy = (v - 0.5).clamp(min_y, max_y);
    let (x0, y0) = (fx.floor(), fy.floor());
    let (x1, y1) = ((x0 + 1.0).min(max_x), (y0 + 1.0).min(max_y));
    let (tx, ty) = (fx - x0, fy - y0);
    let p = |x: f64, y: f64| image.pixel(x as u32, y as u32).map(f64::from);
    let (a, b, c, d) = (p(x0, y0), p(x1, y0), p(x0, y1), p(x1, y1));
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = a[i] + (b[i] - a[i]) * tx;
        let bottom = c[i] + (d[i] - c[i]) * tx;
        out[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Image-space to device-space transform for one blit.
fn blit_matrix(matrix: &Matrix, src: &Rect, dst: &Rect) -> Matrix {
    let sx = dst.width() / src.width();
    let sy = dst.height() / src.height();
    matrix
        .pre_multiply(&Matrix::translation(dst.x0, dst.y0))
        .pre_multiply(&Matrix::scale(sx, sy))
        .pre_multiply(&Matrix::translation(-src.x0, -src.y0))
}

fn is_pixel_exact(m: &Matrix) -> bool {
    m.a == 1.0 && m.d == 1.0 && m.is_axis_aligned() && m.tx.fract() == 0.0 && m.ty.fract() == 0.0
}

impl RenderBuffer for CpuRenderBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn origin(&self) -> SurfaceOrigin {
        self.origin
    }

    fn resize(&mut self, width: u32, height: u32, offset: Option<Point>) {
        let mut next = CpuRenderBuffer::with_origin(width, height, self.origin);
        if let Some(off) = offset {
            let (ox, oy) = (off.x.round() as i64, off.y.round() as i64);
            for y in 0..self.height {
                for x in 0..self.width {
                    let (nx, ny) = (i64::from(x) + ox, i64::from(y) + oy);
                    if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                        continue;
                    }
                    let src = self.index(x, y);
                    let dst = next.index(nx as u32, ny as u32);
                    next.pixels[dst..dst + 4].copy_from_slice(&self.pixels[src..src + 4]);
                }
            }
        }
        self.width = width;
        self.height = height;
        self.pixels = next.pixels;
    }

    fn alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_smoothing(&mut self, smoothing: bool) {
        self.state.smoothing = smoothing;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let bounds = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        let r = rect.abs().intersect(bounds);
        if !(r.width() > 0.0 && r.height() > 0.0) {
            return;
        }
        for y in (r.y0.floor() as u32)..(r.y1.ceil() as u32).min(self.height) {
            for x in (r.x0.floor() as u32)..(r.x1.ceil() as u32).min(self.width) {
                let i = self.index(x, y);
                self.pixels[i..i + 4].fill(0);
            }
        }
    }

    fn save(&mut self) {
        self.saved.push((self.state, self.clips.len()));
    }

    fn restore(&mut self) {
        if let Some((state, depth)) = self.saved.pop() {
            self.state = state;
            self.clips.truncate(depth);
        }
    }

    fn matrix(&self) -> Matrix {
        self.state.matrix
    }

    fn set_matrix(&mut self, matrix: Matrix) {
        self.state.matrix = matrix;
    }

    fn blend_mode(&self) -> BlendMode {
        self.state.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend = mode;
    }

    fn color_filter(&self) -> Option<ColorMatrix> {
        self.state.filter
    }

    fn set_color_filter(&mut self, filter: Option<ColorMatrix>) {
        self.state.filter = filter;
    }

    fn push_scissor(&mut self, rect: Rect) {
        self.clips.push(Clip::Scissor(rect.abs()));
    }

    fn pop_scissor(&mut self) {
        if let Some(i) = self
            .clips
            .iter()
            .rposition(|c| matches!(c, Clip::Scissor(_)))
        {
            self.clips.remove(i);
        }
    }

    fn has_scissor(&self) -> bool {
        self.clips.iter().any(|c| matches!(c, Clip::Scissor(_)))
    }

    fn push_mask(&mut self, rect: Rect, matrix: &Matrix) {
        let clip = match matrix.invert() {
            Some(inverse) => Clip::Mask {
                inverse,
                rect: rect.abs(),
                bounds: matrix.transform_bounds(rect.abs()),
            },
            None => Clip::Empty,
        };
        self.clips.push(clip);
    }

    fn pop_mask(&mut self) {
        if let Some(i) = self
            .clips
            .iter()
            .rposition(|c| !matches!(c, Clip::Scissor(_)))
        {
            self.clips.remove(i);
        }
    }

    fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    fn to_data_url(&self, format: EncodeFormat, quality: Option<f32>) -> StageResult<String> {
        if self.width == 0 || self.height == 0 {
            return Err(StageError::encode("cannot encode an empty buffer"));
        }
        let mut rgba = self.get_pixels(0, 0, self.width, self.height);
        unpremultiply_rgba8_in_place(&mut rgba);
        let img = image::RgbaImage::from_raw(self.width, self.height, rgba)
            .ok_or_else(|| StageError::encode("pixel buffer does not match its size"))?;

        let mut bytes = Vec::new();
        match format {
            EncodeFormat::Png => image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                .map_err(|e| StageError::encode(format!("png: {e}")))?,
            EncodeFormat::Jpeg => {
                let q = (quality.unwrap_or(0.92).clamp(0.0, 1.0) * 100.0).round() as u8;
                let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, q.max(1));
                image::DynamicImage::ImageRgb8(rgb)
                    .write_with_encoder(encoder)
                    .map_err(|e| StageError::encode(format!("jpeg: {e}")))?;
            }
        }
        let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:{};base64,{b64}", format.mime()))
    }

    fn get_pixels(&self, x: i64, y: i64, width: u32, height: u32) -> Vec<u8> {
        let mut out = vec![0u8; (width as usize) * (height as usize) * 4];
        for row in 0..i64::from(height) {
            let sy = y + row;
            if sy < 0 || sy >= i64::from(self.height) {
                continue;
            }
            for col in 0..i64::from(width) {
                let sx = x + col;
                if sx < 0 || sx >= i64::from(self.width) {
                    continue;
                }
                let i = self.index(sx as u32, sy as u32);
                let o = ((row * i64::from(width) + col) as usize) * 4;
                out[o..o + 4].copy_from_slice(&self.pixels[i..i + 4]);
            }
        }
        out
    }

    fn draw_buffer(&mut self, src: &Self, x: f64, y: f64) {
        let px = src.get_pixels(0, 0, src.width, src.height);
        self.composite_pixels(&px, src.width, src.height, x, y);
    }

    fn draw_buffer_with_filters(&mut self, src: &Self, filters: &[Filter], x: f64, y: f64) {
        let mut px = src.get_pixels(0, 0, src.width, src.height);
        if let Err(e) = apply_filters(&mut px, src.width, src.height, filters) {
            tracing::warn!(error = %e, "filter chain failed; compositing unfiltered");
            px = src.get_pixels(0, 0, src.width, src.height);
        }
        self.composite_pixels(&px, src.width, src.height, x, y);
    }

    fn draw_image(&mut self, image: &BitmapData, src: Rect, dst: Rect) {
        let (src, dst) = (src.abs(), dst.abs());
        if image.is_empty() || !(src.width() > 0.0 && src.height() > 0.0) {
            return;
        }
        if !(dst.width() > 0.0 && dst.height() > 0.0) {
            return;
        }
        let to_device = blit_matrix(&self.state.matrix, &src, &dst);
        let Some(to_image) = to_device.invert() else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.pixel_span(to_device.transform_bounds(src)) else {
            return;
        };
        let bilinear = self.state.smoothing && !is_pixel_exact(&to_device);
        let opacity = unit_to_u8(self.state.alpha);
        for y in y0..y1 {
            for x in x0..x1 {
                let (cx, cy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                if !self.clip_contains(cx, cy) {
                    continue;
                }
                let p = to_image.transform_point(cx, cy);
                if p.x < src.x0 || p.x >= src.x1 || p.y < src.y0 || p.y >= src.y1 {
                    continue;
                }
                let s = sample(image, &src, p.x, p.y, bilinear);
                self.put(x, y, s, opacity);
            }
        }
    }

    fn draw_mesh(
        &mut self,
        image: &BitmapData,
        src: Rect,
        origin: Point,
        vertices: &[f32],
        uvs: &[f32],
        indices: &[u16],
    ) {
        let src = src.abs();
        if image.is_empty() || !(src.width() > 0.0 && src.height() > 0.0) {
            return;
        }
        let m = self.state.matrix;
        let opacity = unit_to_u8(self.state.alpha);
        let bilinear = self.state.smoothing;
        let count = vertices.len().min(uvs.len()) / 2;
        let vertex = |i: usize| {
            let p = m.transform_point(
                f64::from(vertices[i * 2]) + origin.x,
                f64::from(vertices[i * 2 + 1]) + origin.y,
            );
            let uv = (
                src.x0 + f64::from(uvs[i * 2]) * src.width(),
                src.y0 + f64::from(uvs[i * 2 + 1]) * src.height(),
            );
            (p, uv)
        };
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(usize::from);
            if a >= count || b >= count || c >= count {
                continue;
            }
            let (pa, ua) = vertex(a);
            let (pb, ub) = vertex(b);
            let (pc, uc) = vertex(c);
            let area = (pb.x - pa.x) * (pc.y - pa.y) - (pc.x - pa.x) * (pb.y - pa.y);
            if area == 0.0 {
                continue;
            }
            let bounds = Rect::from_points(pa, pb).union_pt(pc);
            let Some((x0, y0, x1, y1)) = self.pixel_span(bounds) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    let (cx, cy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                    let w0 = ((pb.x - cx) * (pc.y - cy) - (pc.x - cx) * (pb.y - cy)) / area;
                    let w1 = ((pc.x - cx) * (pa.y - cy) - (pa.x - cx) * (pc.y - cy)) / area;
                    let w2 = 1.0 - w0 - w1;
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 || !self.clip_contains(cx, cy) {
                        continue;
                    }
                    let u = w0 * ua.0 + w1 * ub.0 + w2 * uc.0;
                    let v = w0 * ua.1 + w1 * ub.1 + w2 * uc.1;
                    let s = sample(image, &src, u, v, bilinear);
                    self.put(x, y, s, opacity);
                }
            }
        }
    }

    fn make_render_buffer(&self, width: u32, height: u32, _temporary: bool) -> Self {
        CpuRenderBuffer::with_origin(width, height, self.origin)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/render/cpu/mod.rs"]
mod tests;
