//! Render nodes: per-frame descriptions of drawable content.
//!
//! A display object exposes at most one [`RenderNode`]. The payload ([`NodeKind`]) is fixed once
//! built; replacing content means building a new node. The tree update fills in the frame data
//! (`render_region`, `render_matrix`, `render_alpha`), and the renderer toggles `need_redraw`.

use std::fmt;

use crate::foundation::core::{BezPath, BitmapData, BlendMode, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::geom::matrix::Matrix;
use crate::geom::region::Region;
use crate::scene::filter::ColorMatrix;

/// One source/destination rectangle pair from a flat draw-data array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blit {
    /// Rectangle in image pixels.
    pub src: Rect,
    /// Rectangle in node-local space.
    pub dst: Rect,
}

/// Decode a flat `[sx, sy, sw, sh, dx, dy, dw, dh]*` array.
pub fn decode_blits(draw_data: &[f32]) -> StageResult<Vec<Blit>> {
    if !draw_data.len().is_multiple_of(8) {
        return Err(StageError::validation(format!(
            "draw data length {} is not a multiple of 8",
            draw_data.len()
        )));
    }
    Ok(draw_data
        .chunks_exact(8)
        .map(|o| {
            let f = |v: f32| f64::from(v);
            Blit {
                src: Rect::new(f(o[0]), f(o[1]), f(o[0] + o[2]), f(o[1] + o[3])),
                dst: Rect::new(f(o[4]), f(o[5]), f(o[4] + o[6]), f(o[5] + o[7])),
            }
        })
        .collect())
}

/// Image blits sharing one texture.
#[derive(Clone, Debug, PartialEq)]
pub struct BitmapNode {
    /// Source pixels.
    pub image: BitmapData,
    /// Repeated `[sx, sy, sw, sh, dx, dy, dw, dh]` octets.
    pub draw_data: Vec<f32>,
    /// Extra local transform applied around the blits.
    pub matrix: Option<Matrix>,
    /// Blend mode for these blits only.
    pub blend_mode: Option<BlendMode>,
    /// Alpha multiplier for these blits only; `None` inherits.
    pub alpha: Option<f32>,
    /// Color filter for these blits only.
    pub filter: Option<ColorMatrix>,
    /// Bilinear sampling when scaled.
    pub smoothing: bool,
}

impl BitmapNode {
    /// Node drawing the whole image once at the origin.
    pub fn new(image: BitmapData) -> Self {
        let (w, h) = (image.width() as f32, image.height() as f32);
        Self {
            image,
            draw_data: vec![0.0, 0.0, w, h, 0.0, 0.0, w, h],
            matrix: None,
            blend_mode: None,
            alpha: None,
            filter: None,
            smoothing: true,
        }
    }

    /// Node with no blits yet.
    pub fn empty(image: BitmapData) -> Self {
        Self {
            draw_data: Vec::new(),
            ..Self::new(image)
        }
    }

    /// Append one blit.
    #[allow(clippy::too_many_arguments)]
    pub fn push_blit(
        &mut self,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) {
        self.draw_data
            .extend_from_slice(&[sx, sy, sw, sh, dx, dy, dw, dh]);
    }
}

/// Positioned glyph inside a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Glyph id in the run's font.
    pub id: u32,
    /// Pen x in node-local space.
    pub x: f32,
    /// Baseline y in node-local space.
    pub y: f32,
}

/// Pre-shaped glyphs sharing a font, size and color.
#[derive(Clone)]
pub struct GlyphRun {
    /// Font the glyph ids refer to.
    pub font: vello_cpu::peniko::FontData,
    /// Font size in pixels.
    pub size: f32,
    /// Straight-alpha RGBA8 fill color.
    pub color: [u8; 4],
    /// Glyphs in draw order.
    pub glyphs: Vec<Glyph>,
}

impl fmt::Debug for GlyphRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphRun")
            .field("size", &self.size)
            .field("color", &self.color)
            .field("glyphs", &self.glyphs.len())
            .finish()
    }
}

/// Text content as glyph runs inside a box.
#[derive(Clone, Debug)]
pub struct TextNode {
    /// Left of the text box.
    pub x: f64,
    /// Top of the text box.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Runs in draw order.
    pub runs: Vec<GlyphRun>,
    pub(crate) raster: Option<BitmapData>,
}

impl TextNode {
    /// Text box with the given runs.
    pub fn new(bounds: Rect, runs: Vec<GlyphRun>) -> Self {
        Self {
            x: bounds.x0,
            y: bounds.y0,
            width: bounds.width(),
            height: bounds.height(),
            runs,
            raster: None,
        }
    }
}

/// How a path is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathPaint {
    /// Non-zero fill with a straight-alpha RGBA8 color.
    Fill {
        /// Fill color.
        color: [u8; 4],
    },
    /// Stroke with a straight-alpha RGBA8 color.
    Stroke {
        /// Stroke color.
        color: [u8; 4],
        /// Line width in local units.
        width: f64,
    },
}

/// One painted path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathCommand {
    /// Geometry in node-local space.
    pub path: BezPath,
    /// Fill or stroke.
    pub paint: PathPaint,
}

/// Vector content.
#[derive(Clone, Debug)]
pub struct GraphicsNode {
    /// Left of the content box.
    pub x: f64,
    /// Top of the content box.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Paths in draw order.
    pub commands: Vec<PathCommand>,
    pub(crate) raster: Option<BitmapData>,
}

impl GraphicsNode {
    /// Vector content whose box covers all commands (strokes included).
    pub fn new(commands: Vec<PathCommand>) -> Self {
        use kurbo::Shape;

        let mut bounds: Option<Rect> = None;
        for cmd in &commands {
            let mut r = cmd.path.bounding_box();
            if let PathPaint::Stroke { width, .. } = cmd.paint {
                r = r.inflate(width / 2.0, width / 2.0);
            }
            bounds = Some(match bounds {
                Some(b) => b.union(r),
                None => r,
            });
        }
        let b = bounds.unwrap_or(Rect::ZERO);
        Self {
            x: b.x0,
            y: b.y0,
            width: b.width(),
            height: b.height(),
            commands,
            raster: None,
        }
    }
}

/// Textured triangles.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    /// Texture.
    pub image: BitmapData,
    /// `[sx, sy, sw, sh, dx, dy, dw, dh]*` octets; the source rect is what `uvs` span and the
    /// destination origin offsets the vertices.
    pub draw_data: Vec<f32>,
    /// `x, y` pairs in node-local space.
    pub vertices: Vec<f32>,
    /// `u, v` pairs in `[0, 1]` over the source rect.
    pub uvs: Vec<f32>,
    /// Triangle list indices into the vertex pairs.
    pub indices: Vec<u16>,
    /// Extra local transform applied around the draw.
    pub matrix: Option<Matrix>,
    /// Local bounds of the vertices.
    pub bounds: Rect,
}

impl MeshNode {
    /// Mesh over the whole `image`.
    pub fn new(
        image: BitmapData,
        vertices: Vec<f32>,
        uvs: Vec<f32>,
        indices: Vec<u16>,
    ) -> StageResult<Self> {
        if !vertices.len().is_multiple_of(2) || vertices.len() != uvs.len() {
            return Err(StageError::validation(
                "mesh vertices and uvs must be matching x/y pairs",
            ));
        }
        if !indices.len().is_multiple_of(3) {
            return Err(StageError::validation("mesh indices must form triangles"));
        }
        let count = vertices.len() / 2;
        if indices.iter().any(|&i| usize::from(i) >= count) {
            return Err(StageError::validation("mesh index out of range"));
        }
        let mut bounds: Option<Rect> = None;
        for p in vertices.chunks_exact(2) {
            let (x, y) = (f64::from(p[0]), f64::from(p[1]));
            bounds = Some(match bounds {
                Some(b) => b.union_pt((x, y)),
                None => Rect::new(x, y, x, y),
            });
        }
        let (w, h) = (image.width() as f32, image.height() as f32);
        Ok(Self {
            image,
            draw_data: vec![0.0, 0.0, w, h, 0.0, 0.0, w, h],
            vertices,
            uvs,
            indices,
            matrix: None,
            bounds: bounds.unwrap_or(Rect::ZERO),
        })
    }
}

/// Payload of a render node.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Image blits.
    Bitmap(BitmapNode),
    /// Glyph runs.
    Text(TextNode),
    /// Vector paths.
    Graphics(GraphicsNode),
    /// Textured triangles.
    Mesh(MeshNode),
    /// Nested payloads drawn in order under the group's transform.
    Group(Vec<NodeKind>),
    /// Sets the buffer alpha for the payloads that follow; draws nothing.
    SetAlpha(f32),
}

impl NodeKind {
    /// Local-space bounds of the content.
    pub fn bounds(&self) -> Rect {
        match self {
            NodeKind::Bitmap(b) => {
                let local = decode_blits(&b.draw_data)
                    .ok()
                    .and_then(|blits| {
                        blits
                            .iter()
                            .map(|bl| bl.dst.abs())
                            .reduce(|acc, r| acc.union(r))
                    })
                    .unwrap_or(Rect::ZERO);
                match b.matrix {
                    Some(m) => m.transform_bounds(local),
                    None => local,
                }
            }
            NodeKind::Text(t) => Rect::new(t.x, t.y, t.x + t.width, t.y + t.height),
            NodeKind::Graphics(g) => Rect::new(g.x, g.y, g.x + g.width, g.y + g.height),
            NodeKind::Mesh(m) => match m.matrix {
                Some(mx) => mx.transform_bounds(m.bounds),
                None => m.bounds,
            },
            NodeKind::Group(children) => children
                .iter()
                .map(NodeKind::bounds)
                .filter(|r| r.width() > 0.0 && r.height() > 0.0)
                .reduce(|acc, r| acc.union(r))
                .unwrap_or(Rect::ZERO),
            NodeKind::SetAlpha(_) => Rect::ZERO,
        }
    }

    /// Short name for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Bitmap(_) => "bitmap",
            NodeKind::Text(_) => "text",
            NodeKind::Graphics(_) => "graphics",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Group(_) => "group",
            NodeKind::SetAlpha(_) => "set_alpha",
        }
    }
}

/// Drawable content of one display object plus its per-frame placement.
#[derive(Clone, Debug)]
pub struct RenderNode {
    /// What to draw.
    pub kind: NodeKind,
    /// Bounding box in buffer space for this frame.
    pub render_region: Region,
    /// Local-to-buffer transform for this frame.
    pub render_matrix: Matrix,
    /// Concatenated alpha for this frame.
    pub render_alpha: f32,
    /// Set when the node intersects a dirty region; cleared once drawn.
    pub need_redraw: bool,
}

impl RenderNode {
    /// Node with identity placement; the tree update fills in the frame data.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            render_region: Region::EMPTY,
            render_matrix: Matrix::IDENTITY,
            render_alpha: 1.0,
            need_redraw: false,
        }
    }

    /// Local-space bounds of the payload.
    pub fn local_bounds(&self) -> Rect {
        self.kind.bounds()
    }

    /// Recompute the frame data from a concatenated transform and alpha.
    pub fn place(&mut self, matrix: Matrix, alpha: f32) {
        self.render_matrix = matrix;
        self.render_alpha = alpha;
        let bounds = self.kind.bounds();
        self.render_region.update_region(bounds, &matrix);
    }
}

impl From<NodeKind> for RenderNode {
    fn from(kind: NodeKind) -> Self {
        RenderNode::new(kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
