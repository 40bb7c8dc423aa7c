//! Stagecraft is a retained-mode 2D scene-graph renderer.
//!
//! Applications build a [`DisplayTree`] of display objects, each optionally carrying a
//! [`RenderNode`] (bitmap blits, text, vector paths, meshes). Every frame:
//!
//! - [`DisplayTree::update`] places render nodes and reports the regions that changed
//! - [`Renderer::render`] walks the tree into a [`RenderBuffer`], redrawing only nodes that
//!   touch a dirty region, and applies scroll rects, masks, blend modes and filters
//!
//! [`CpuRenderBuffer`] is the in-memory implementation of the buffer capability.
#![forbid(unsafe_code)]

pub mod foundation;
pub mod geom;
pub mod render;
pub mod scene;

pub use crate::foundation::core::{
    Affine, BezPath, BitmapData, BlendMode, Point, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{StageError, StageResult};
pub use crate::foundation::pool::{Handle, Pool};
pub use crate::geom::dirty::DirtyRegion;
pub use crate::geom::matrix::{Matrix, MatrixPool};
pub use crate::geom::region::{Region, RegionPool};
pub use crate::render::buffer::{
    BlendScope, ClipScope, EncodeFormat, FilterScope, RenderBuffer, StateScope, SurfaceOrigin,
};
pub use crate::render::cpu::CpuRenderBuffer;
pub use crate::render::pool::{BufferPoolOpts, BufferPoolStats, RenderBufferPool};
pub use crate::render::renderer::{Renderer, RendererOpts};
pub use crate::scene::desc::SceneDesc;
pub use crate::scene::display::{DisplayList, DisplayObject, NodeId};
pub use crate::scene::filter::{ColorMatrix, Filter};
pub use crate::scene::node::{
    BitmapNode, Glyph, GlyphRun, GraphicsNode, MeshNode, NodeKind, PathCommand, PathPaint,
    RenderNode, TextNode,
};
pub use crate::scene::tree::DisplayTree;
