//! Scene traversal and compositing.
//!
//! [`Renderer::render`] walks a display tree into a [`RenderBuffer`]. Every child goes through
//! exactly one compositing path: filters first, then mask/blend, then scroll-rect clipping, then
//! a plain recursive draw. Filter and mask paths render into pooled off-screen buffers and
//! composite the result back; all of them return the number of draw calls issued.

use smallvec::SmallVec;

use crate::foundation::core::{BitmapData, BlendMode, Point, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::geom::dirty::DirtyRegion;
use crate::geom::matrix::Matrix;
use crate::geom::region::{Region, intersects_any};
use crate::render::buffer::{BlendScope, ClipScope, FilterScope, RenderBuffer, StateScope};
use crate::render::pool::{BufferPoolOpts, RenderBufferPool};
use crate::render::raster::{ScratchRasterizer, padded_dst};
use crate::scene::display::{DisplayObject, NodeId};
use crate::scene::filter::{Filter, chain_padding};
use crate::scene::node::{BitmapNode, MeshNode, NodeKind, RenderNode, decode_blits};
use crate::scene::tree::DisplayTree;

/// Renderer configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Idle off-screen buffers kept after the outermost pass.
    pub pool_capacity: usize,
    /// Resize retained buffers to 0x0 after the outermost pass.
    pub shrink_pooled_buffers: bool,
    /// Pending dirty regions before they are merged into one.
    pub max_dirty_regions: usize,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            pool_capacity: 6,
            shrink_pooled_buffers: true,
            max_dirty_regions: 10,
        }
    }
}

impl RendererOpts {
    /// Defaults overlaid with `STAGECRAFT_POOL_CAPACITY` and `STAGECRAFT_SHRINK_POOLED_BUFFERS`.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(n) = std::env::var("STAGECRAFT_POOL_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            opts.pool_capacity = n;
        }
        if let Some(b) = std::env::var("STAGECRAFT_SHRINK_POOLED_BUFFERS")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            opts.shrink_pooled_buffers = b;
        }
        opts
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.max_dirty_regions == 0 {
            return Err(StageError::validation("max_dirty_regions must be >= 1"));
        }
        Ok(())
    }

    /// Dirty-region tracker for a `width` x `height` stage using these options.
    pub fn dirty_region(&self, width: u32, height: u32) -> DirtyRegion {
        DirtyRegion::new(width, height, self.max_dirty_regions)
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Per-call traversal context.
#[derive(Clone, Copy, Debug)]
struct Pass<'d> {
    /// `None` redraws everything.
    dirty: Option<&'d [Region]>,
    /// Extra transform for this target. Only its translation applies outside isolated passes.
    accum: Matrix,
    /// Active clip in target space.
    clip: Option<Region>,
    /// Isolated root: matrices and alphas are recomputed relative to it.
    root: Option<NodeId>,
}

impl<'d> Pass<'d> {
    /// Local-to-target transform of `id`.
    fn matrix_for(&self, tree: &DisplayTree, id: NodeId) -> StageResult<Matrix> {
        Ok(match self.root {
            Some(root) => self
                .accum
                .pre_multiply(&tree.concatenated_matrix_at(id, root)?),
            None => tree
                .concatenated_matrix(id)?
                .translated(self.accum.tx, self.accum.ty),
        })
    }

    /// `true` when `region` is non-empty and survives the clip and dirty tests.
    fn admits(&self, region: &Region) -> bool {
        if region.is_empty() {
            return false;
        }
        if self.clip.is_some_and(|c| !c.intersects(region)) {
            return false;
        }
        self.dirty.is_none_or(|d| intersects_any(region, d))
    }

    fn narrowed(&self, region: Region) -> Pass<'d> {
        let clip = match self.clip {
            Some(c) => {
                let mut r = region;
                r.intersect(&c);
                r
            }
            None => region,
        };
        Pass {
            clip: Some(clip),
            ..*self
        }
    }

    /// Context for an off-screen buffer whose origin sits at `region`'s top-left.
    fn offscreen(&self, region: &Region) -> Pass<'d> {
        Pass {
            dirty: None,
            accum: Matrix::translation(-region.min_x, -region.min_y).pre_multiply(&self.accum),
            clip: None,
            root: self.root,
        }
    }
}

/// Mask that takes part in this pass: on stage, or anywhere during an isolated pass.
fn active_mask(tree: &DisplayTree, obj: &DisplayObject, pass: &Pass<'_>) -> Option<NodeId> {
    obj.mask()
        .filter(|&m| pass.root.is_some() || tree.is_on_stage(m))
}

/// Draws display trees into render buffers of type `B`.
pub struct Renderer<B: RenderBuffer> {
    opts: RendererOpts,
    pool: RenderBufferPool<B>,
    nest_level: u32,
    last_draw_calls: u32,
    raster: ScratchRasterizer,
}

impl<B: RenderBuffer> std::fmt::Debug for Renderer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("opts", &self.opts)
            .field("pooled", &self.pool.len())
            .field("nest_level", &self.nest_level)
            .field("last_draw_calls", &self.last_draw_calls)
            .field("raster", &self.raster)
            .finish()
    }
}

impl<B: RenderBuffer> Default for Renderer<B> {
    fn default() -> Self {
        Self::new(RendererOpts::default())
    }
}

impl<B: RenderBuffer> Renderer<B> {
    pub fn new(opts: RendererOpts) -> Self {
        let pool = RenderBufferPool::new(BufferPoolOpts {
            capacity: opts.pool_capacity,
            shrink_on_trim: opts.shrink_pooled_buffers,
        });
        Self {
            opts,
            pool,
            nest_level: 0,
            last_draw_calls: 0,
            raster: ScratchRasterizer::new(),
        }
    }

    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    /// Idle off-screen buffers.
    pub fn pool(&self) -> &RenderBufferPool<B> {
        &self.pool
    }

    /// Mutable pool access, e.g. to pre-warm it with buffers.
    pub fn pool_mut(&mut self) -> &mut RenderBufferPool<B> {
        &mut self.pool
    }

    /// Draw calls of the last completed outermost pass.
    pub fn last_draw_calls(&self) -> u32 {
        self.last_draw_calls
    }

    /// Depth of nested `render` calls currently running; 0 between passes.
    pub fn nest_level(&self) -> u32 {
        self.nest_level
    }

    /// Draw `root` and its subtree into `buffer` and return the draw calls issued.
    ///
    /// Outside isolated passes render nodes are already placed by [`DisplayTree::update`] and
    /// only the translation of `matrix` is applied on top. With `isolated`, `root` is treated as
    /// the top of its own coordinate space: transforms and alphas are recomputed relative to it
    /// and `matrix` is applied in full. `dirty: None` redraws every node.
    #[tracing::instrument(
        level = "debug",
        skip(self, tree, buffer, dirty),
        fields(nest_level = self.nest_level)
    )]
    pub fn render(
        &mut self,
        tree: &mut DisplayTree,
        root: NodeId,
        buffer: &mut B,
        matrix: &Matrix,
        dirty: Option<&[Region]>,
        isolated: bool,
    ) -> StageResult<u32> {
        self.nest_level += 1;
        let pass = Pass {
            dirty,
            accum: *matrix,
            clip: None,
            root: isolated.then_some(root),
        };
        let result = self.draw_display_object(tree, root, buffer, &pass);
        buffer.flush();
        self.nest_level -= 1;
        if self.nest_level == 0 {
            self.pool.trim();
            if let Ok(calls) = result {
                self.last_draw_calls = calls;
            }
        }
        result
    }

    /// Update `tree`, then repaint the stage where `dirty` says it changed.
    ///
    /// Pending regions are merged into one box, which is cleared, scissored and passed as the
    /// dirty list. Returns 0 without touching `buffer` when nothing changed.
    pub fn render_frame(
        &mut self,
        tree: &mut DisplayTree,
        buffer: &mut B,
        dirty: &mut DirtyRegion,
    ) -> StageResult<u32> {
        tree.update_into(dirty)?;
        let mut area = Region::EMPTY;
        for r in dirty.regions() {
            area.union(&r);
        }
        dirty.clear();
        if area.is_empty() {
            return Ok(0);
        }
        buffer.clear_rect(area.to_rect());
        let stage = tree.stage();
        let areas = [area];
        let mut clipped = ClipScope::push(buffer, area.to_rect(), &Matrix::IDENTITY);
        self.render(
            tree,
            stage,
            &mut clipped,
            &Matrix::IDENTITY,
            Some(&areas[..]),
            false,
        )
    }

    /// Draw a single render node with `matrix` and flush.
    pub fn draw_node_to_buffer(
        &mut self,
        node: &mut RenderNode,
        buffer: &mut B,
        matrix: &Matrix,
    ) -> StageResult<()> {
        buffer.set_matrix(*matrix);
        let result = self.render_node(&mut node.kind, buffer);
        buffer.flush();
        result.map(|_| ())
    }

    fn draw_display_object(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let mut calls = 0;
        let use_list = pass.root.is_none() && tree.get(id)?.display_list().is_some();
        if use_list
            && tree
                .get(id)?
                .display_list()
                .is_some_and(|l| l.is_dirty())
        {
            calls += self.redraw_display_list(tree, id, buffer)?;
        }

        if let Some((region, matrix, alpha)) = self.placement(tree, id, use_list, pass)? {
            let need = match pass.dirty {
                Some(dirty) => {
                    pass.clip.is_none_or(|c| c.intersects(&region))
                        && intersects_any(&region, dirty)
                }
                None => true,
            };
            let node = if use_list {
                tree.display_list_node_mut(id)?
            } else {
                tree.render_node_mut(id)?
            };
            if let Some(node) = node {
                node.need_redraw = need;
                if need {
                    buffer.set_matrix(matrix);
                    buffer.set_alpha(alpha);
                    calls += self.render_node(&mut node.kind, buffer)?;
                    node.need_redraw = false;
                }
            }
        }
        if use_list {
            return Ok(calls);
        }

        let children: SmallVec<[NodeId; 8]> = tree.children(id)?.iter().copied().collect();
        for child in children {
            calls += self.draw_child(tree, child, buffer, pass)?;
        }
        Ok(calls)
    }

    /// Target-space region, transform and alpha of the node drawn for `id`.
    fn placement(
        &self,
        tree: &DisplayTree,
        id: NodeId,
        use_list: bool,
        pass: &Pass<'_>,
    ) -> StageResult<Option<(Region, Matrix, f32)>> {
        let obj = tree.get(id)?;
        let node = if use_list {
            obj.display_list().and_then(|l| l.render_node())
        } else {
            obj.render_node()
        };
        let Some(node) = node else {
            return Ok(None);
        };
        Ok(Some(match pass.root {
            Some(root) => {
                let m = pass.matrix_for(tree, id)?;
                let alpha = tree.concatenated_alpha_at(id, root)?;
                (Region::from_bounds(node.local_bounds(), &m), m, alpha)
            }
            None => {
                let (tx, ty) = (pass.accum.tx, pass.accum.ty);
                (
                    node.render_region.offset(tx, ty),
                    node.render_matrix.translated(tx, ty),
                    node.render_alpha,
                )
            }
        }))
    }

    fn draw_child(
        &mut self,
        tree: &mut DisplayTree,
        child: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let obj = tree.get(child)?;
        if obj.is_skipped() {
            return Ok(0);
        }
        if !obj.filters().is_empty() {
            self.draw_with_filter(tree, child, buffer, pass)
        } else if obj.blend_mode().is_non_default() || active_mask(tree, obj, pass).is_some() {
            let blend = obj.blend_mode();
            self.draw_with_clip(tree, child, buffer, pass, blend)
        } else if obj.clip_rect().is_some() {
            self.draw_with_scroll_rect(tree, child, buffer, pass)
        } else {
            self.draw_display_object(tree, child, buffer, pass)
        }
    }

    /// Draw an object through its filter chain.
    ///
    /// A lone color matrix on a childless, unmasked object is applied while drawing; anything
    /// else is rendered off-screen and composited back through the filters.
    fn draw_with_filter(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let obj = tree.get(id)?;
        let filters = obj.filters().to_vec();
        let blend = obj.blend_mode();
        let direct = obj.children().is_empty() && active_mask(tree, obj, pass).is_none();

        if let [Filter::ColorMatrix(cm)] = filters.as_slice()
            && direct
        {
            let mut blended = BlendScope::new(buffer, blend);
            let mut filtered = FilterScope::new(&mut *blended, Some(*cm));
            return if tree.get(id)?.clip_rect().is_some() {
                self.draw_with_scroll_rect(tree, id, &mut filtered, pass)
            } else {
                self.draw_display_object(tree, id, &mut filtered, pass)
            };
        }

        let m = pass.matrix_for(tree, id)?;
        let pad = chain_padding(&filters);
        let mut region = Region::from_bounds(tree.original_bounds(id)?, &m);
        region.inflate(pad);
        // Content further than the filter reach outside the target cannot affect it.
        let edge = pad.ceil();
        let reach = Region::new(
            -edge,
            -edge,
            f64::from(buffer.width()) + edge,
            f64::from(buffer.height()) + edge,
        );
        region.intersect(&reach);
        if !pass.admits(&region) {
            tracing::trace!(?id, ?region, "filter region empty or clean");
            return Ok(0);
        }

        let mut offscreen = self
            .pool
            .acquire(buffer, region.pixel_width(), region.pixel_height());
        let inner = pass.offscreen(&region);
        let drawn = self.draw_filtered_content(tree, id, &mut offscreen, &inner);
        let result = match drawn {
            Ok(0) => Ok(0),
            Ok(calls) => {
                let mut blended = BlendScope::new(buffer, blend);
                blended.draw_buffer_with_filters(&offscreen, &filters, region.min_x, region.min_y);
                Ok(calls + 1)
            }
            Err(e) => Err(e),
        };
        self.pool.release(offscreen);
        result
    }

    /// The object's own content inside a filter buffer, still honoring its mask and clip rect.
    fn draw_filtered_content(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let obj = tree.get(id)?;
        if active_mask(tree, obj, pass).is_some() {
            self.draw_with_clip(tree, id, buffer, pass, BlendMode::Normal)
        } else if obj.clip_rect().is_some() {
            self.draw_with_scroll_rect(tree, id, buffer, pass)
        } else {
            self.draw_display_object(tree, id, buffer, pass)
        }
    }

    /// Draw an object with a blend mode, a mask, or both, clipped to its scroll rect.
    fn draw_with_clip(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
        blend: BlendMode,
    ) -> StageResult<u32> {
        let obj = tree.get(id)?;
        let clip_rect = obj.clip_rect();
        let mask = active_mask(tree, obj, pass);
        let has_children = !obj.children().is_empty();
        let m = pass.matrix_for(tree, id)?;

        let mask_region = match mask {
            Some(mask_id) => {
                let mm = pass.matrix_for(tree, mask_id)?;
                if mm.is_degenerate_scale() {
                    tracing::trace!(?id, ?mask_id, "mask scale is degenerate");
                    return Ok(0);
                }
                Some(Region::from_bounds(tree.original_bounds(mask_id)?, &mm))
            }
            None => None,
        };
        let scroll_region = clip_rect.map(|r| Region::from_bounds(r, &m));
        let region = match (scroll_region, mask_region) {
            (Some(mut s), Some(mr)) => {
                s.intersect(&mr);
                s
            }
            (Some(s), None) => s,
            (None, Some(mr)) => mr,
            (None, None) => Region::from_bounds(tree.original_bounds(id)?, &m),
        };
        if !pass.admits(&region) {
            tracing::trace!(?id, ?region, "clip region empty or clean");
            return Ok(0);
        }

        if mask.is_none() && !has_children {
            let inner = pass.narrowed(region);
            let mut blended = BlendScope::new(buffer, blend);
            return match clip_rect {
                Some(r) => {
                    let mut clipped = ClipScope::push(&mut *blended, r, &m);
                    self.draw_display_object(tree, id, &mut clipped, &inner)
                }
                None => self.draw_display_object(tree, id, &mut blended, &inner),
            };
        }

        let mut content = self
            .pool
            .acquire(buffer, region.pixel_width(), region.pixel_height());
        let result = self.composite_masked(
            tree,
            id,
            mask,
            buffer,
            &mut content,
            &Composite {
                region,
                clip_rect,
                matrix: m,
                blend,
            },
            pass,
        );
        self.pool.release(content);
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn composite_masked(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        mask: Option<NodeId>,
        buffer: &mut B,
        content: &mut B,
        target: &Composite,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let region = &target.region;
        let inner = pass.offscreen(region);
        let mut calls = self.draw_display_object(tree, id, content, &inner)?;
        if calls == 0 {
            return Ok(0);
        }

        if let Some(mask_id) = mask {
            let mut mask_buffer =
                self.pool
                    .acquire(buffer, region.pixel_width(), region.pixel_height());
            let drawn = self.draw_display_object(tree, mask_id, &mut mask_buffer, &inner);
            if let Ok(n) = drawn {
                calls += n;
                let mut stencil = BlendScope::new(&mut *content, BlendMode::DestinationIn);
                stencil.draw_buffer(&mask_buffer, 0.0, 0.0);
            }
            self.pool.release(mask_buffer);
            drawn?;
        }

        let mut blended = BlendScope::new(buffer, target.blend);
        match target.clip_rect {
            Some(r) => {
                let mut clipped = ClipScope::push(&mut *blended, r, &target.matrix);
                clipped.draw_buffer(content, region.min_x, region.min_y);
            }
            None => blended.draw_buffer(content, region.min_x, region.min_y),
        }
        Ok(calls + 1)
    }

    /// Draw an object clipped to its scroll rect (or mask rect).
    ///
    /// A clip region that misses the active clip or every dirty region skips the whole subtree.
    fn draw_with_scroll_rect(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        buffer: &mut B,
        pass: &Pass<'_>,
    ) -> StageResult<u32> {
        let Some(rect) = tree.get(id)?.clip_rect() else {
            return self.draw_display_object(tree, id, buffer, pass);
        };
        if rect.width() == 0.0 || rect.height() == 0.0 {
            tracing::trace!(?id, "scroll rect is empty");
            return Ok(0);
        }
        let m = pass.matrix_for(tree, id)?;
        let region = Region::from_bounds(rect, &m);
        if !pass.admits(&region) {
            tracing::trace!(?id, ?region, "scroll region empty or clean");
            return Ok(0);
        }
        let inner = pass.narrowed(region);
        let mut clipped = ClipScope::push(buffer, rect, &m);
        self.draw_display_object(tree, id, &mut clipped, &inner)
    }

    /// Re-rasterize `id`'s cached surface from its subtree.
    fn redraw_display_list(
        &mut self,
        tree: &mut DisplayTree,
        id: NodeId,
        like: &B,
    ) -> StageResult<u32> {
        let bounds = tree.original_bounds(id)?;
        let origin = Point::new(bounds.x0.floor(), bounds.y0.floor());
        let width = (bounds.x1.ceil() - origin.x).max(0.0) as u32;
        let height = (bounds.y1.ceil() - origin.y).max(0.0) as u32;
        if width == 0 || height == 0 {
            tree.store_display_list_surface(id, None, origin)?;
            return Ok(0);
        }

        let mut surface = self.pool.acquire(like, width, height);
        let offset = Matrix::translation(-origin.x, -origin.y);
        let result = self
            .render(tree, id, &mut surface, &offset, None, true)
            .and_then(|calls| {
                let pixels = surface.get_pixels(0, 0, width, height);
                let bitmap = BitmapData::from_premul(width, height, pixels)?;
                tree.store_display_list_surface(id, Some(bitmap), origin)?;
                tracing::debug!(?id, width, height, calls, "display list redrawn");
                Ok(calls)
            });
        self.pool.release(surface);
        result
    }

    /// Draw one payload and return how many draws actually reached the buffer.
    ///
    /// Each non-empty leaf counts once; `SetAlpha` and empty content count zero.
    fn render_node(&mut self, kind: &mut NodeKind, buffer: &mut B) -> StageResult<u32> {
        Ok(match kind {
            NodeKind::Bitmap(node) => draw_bitmap(node, buffer)?,
            NodeKind::Text(text) => {
                if text.raster.is_none() {
                    let raster = self.raster.rasterize_text(text)?;
                    text.raster = raster;
                }
                let bounds = Rect::new(text.x, text.y, text.x + text.width, text.y + text.height);
                match &text.raster {
                    Some(bitmap) => draw_raster(bitmap, bounds, buffer),
                    None => 0,
                }
            }
            NodeKind::Graphics(graphics) => {
                if graphics.raster.is_none() {
                    let raster = self.raster.rasterize_graphics(graphics)?;
                    graphics.raster = raster;
                }
                let bounds = Rect::new(
                    graphics.x,
                    graphics.y,
                    graphics.x + graphics.width,
                    graphics.y + graphics.height,
                );
                match &graphics.raster {
                    Some(bitmap) => draw_raster(bitmap, bounds, buffer),
                    None => 0,
                }
            }
            NodeKind::Mesh(mesh) => draw_mesh(mesh, buffer)?,
            NodeKind::Group(children) => {
                let mut calls = 0;
                for child in children.iter_mut() {
                    calls += self.render_node(child, buffer)?;
                }
                calls
            }
            NodeKind::SetAlpha(alpha) => {
                buffer.set_alpha(*alpha);
                0
            }
        })
    }
}

/// Where and how an off-screen content buffer goes back onto its target.
struct Composite {
    region: Region,
    clip_rect: Option<Rect>,
    matrix: Matrix,
    blend: BlendMode,
}

fn draw_bitmap<B: RenderBuffer>(node: &BitmapNode, buffer: &mut B) -> StageResult<u32> {
    let blits = decode_blits(&node.draw_data)?;
    if node.image.is_empty() || blits.is_empty() {
        return Ok(0);
    }
    let mut state = StateScope::new(buffer);
    if let Some(m) = &node.matrix {
        state.transform(m);
    }
    if let Some(mode) = node.blend_mode {
        state.set_blend_mode(mode);
    }
    if let Some(alpha) = node.alpha {
        let inherited = state.alpha();
        state.set_alpha(inherited * alpha);
    }
    if node.filter.is_some() {
        state.set_color_filter(node.filter);
    }
    state.set_smoothing(node.smoothing);
    for blit in blits {
        state.draw_image(&node.image, blit.src, blit.dst);
    }
    Ok(1)
}

fn draw_mesh<B: RenderBuffer>(node: &MeshNode, buffer: &mut B) -> StageResult<u32> {
    let blits = decode_blits(&node.draw_data)?;
    if node.image.is_empty() || blits.is_empty() || node.indices.is_empty() {
        return Ok(0);
    }
    let mut state = StateScope::new(buffer);
    if let Some(m) = &node.matrix {
        state.transform(m);
    }
    for blit in blits {
        state.draw_mesh(
            &node.image,
            blit.src,
            Point::new(blit.dst.x0, blit.dst.y0),
            &node.vertices,
            &node.uvs,
            &node.indices,
        );
    }
    Ok(1)
}

fn draw_raster<B: RenderBuffer>(bitmap: &BitmapData, bounds: Rect, buffer: &mut B) -> u32 {
    let src = Rect::new(
        0.0,
        0.0,
        f64::from(bitmap.width()),
        f64::from(bitmap.height()),
    );
    buffer.draw_image(bitmap, src, padded_dst(bounds, bitmap));
    1
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
