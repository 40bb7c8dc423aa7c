//! Arena-owned display-object hierarchy.
//!
//! Parent and mask links are [`NodeId`]s into one [`Pool`], so a mask may live anywhere in the
//! tree (or outside it) without an owning reference. Property setters record what changed;
//! [`DisplayTree::update`] then places every render node for the frame and reports the dirty
//! regions.

use smallvec::SmallVec;

use crate::foundation::core::{BitmapData, BlendMode, Point, Rect};
use crate::foundation::error::{StageError, StageResult};
use crate::foundation::pool::Pool;
use crate::geom::dirty::DirtyRegion;
use crate::geom::matrix::Matrix;
use crate::geom::region::Region;
use crate::scene::display::{DisplayList, DisplayObject, NodeId};
use crate::scene::filter::Filter;
use crate::scene::node::{BitmapNode, NodeKind, RenderNode};

/// Scene tree rooted at a stage object.
#[derive(Debug)]
pub struct DisplayTree {
    objects: Pool<DisplayObject>,
    stage: NodeId,
    stage_width: u32,
    stage_height: u32,
    pending_dirty: Vec<Region>,
}

fn has_area(r: &Rect) -> bool {
    r.width() > 0.0 && r.height() > 0.0
}

impl DisplayTree {
    /// Tree holding only a stage of the given pixel size.
    pub fn new(stage_width: u32, stage_height: u32) -> Self {
        let mut objects = Pool::new();
        let stage = objects.create(DisplayObject {
            name: Some("stage".to_owned()),
            ..DisplayObject::default()
        });
        Self {
            objects,
            stage,
            stage_width,
            stage_height,
            pending_dirty: Vec::new(),
        }
    }

    pub fn stage(&self) -> NodeId {
        self.stage
    }

    pub fn stage_size(&self) -> (u32, u32) {
        (self.stage_width, self.stage_height)
    }

    /// Resize the stage; the whole stage is reported dirty on the next update.
    pub fn set_stage_size(&mut self, width: u32, height: u32) {
        self.stage_width = width;
        self.stage_height = height;
        self.pending_dirty.push(Region::from_xywh(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));
    }

    /// Number of live objects, the stage included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.objects.contains(id)
    }

    pub fn get(&self, id: NodeId) -> StageResult<&DisplayObject> {
        self.objects.get(id)
    }

    fn get_mut(&mut self, id: NodeId) -> StageResult<&mut DisplayObject> {
        self.objects.get_mut(id)
    }

    /// New detached, empty container.
    pub fn create(&mut self) -> NodeId {
        self.objects.create(DisplayObject::default())
    }

    /// New detached container carrying a name for [`DisplayTree::find`].
    pub fn create_named(&mut self, name: impl Into<String>) -> NodeId {
        self.objects.create(DisplayObject {
            name: Some(name.into()),
            ..DisplayObject::default()
        })
    }

    /// New detached object drawing `kind`.
    pub fn create_with_content(&mut self, kind: NodeKind) -> NodeId {
        self.objects.create(DisplayObject {
            render_node: Some(RenderNode::new(kind)),
            ..DisplayObject::default()
        })
    }

    /// First object with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.objects
            .iter()
            .find(|(_, obj)| obj.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn children(&self, id: NodeId) -> StageResult<&[NodeId]> {
        Ok(&self.get(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> StageResult<Option<NodeId>> {
        Ok(self.get(id)?.parent)
    }

    /// `true` when `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> StageResult<bool> {
        let mut cur = self.get(id)?.parent;
        while let Some(p) = cur {
            if p == ancestor {
                return Ok(true);
            }
            cur = self.get(p)?.parent;
        }
        Ok(false)
    }

    /// `true` when `id` is the stage or hangs below it.
    pub fn is_on_stage(&self, id: NodeId) -> bool {
        id == self.stage || self.is_ancestor(self.stage, id).unwrap_or(false)
    }

    /// `id` followed by all of its descendants, parents before children.
    pub fn subtree(&self, id: NodeId) -> StageResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let obj = self.get(cur)?;
            out.push(cur);
            stack.extend(obj.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> StageResult<()> {
        let index = self.get(parent)?.children.len();
        self.add_child_at(parent, child, index)
    }

    /// Insert `child` at `index` among `parent`'s children (clamped to the end).
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> StageResult<()> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.stage {
            return Err(StageError::validation("the stage cannot be reparented"));
        }
        if child == parent || self.is_ancestor(child, parent)? {
            return Err(StageError::validation(
                "adding the child would create a cycle",
            ));
        }
        self.detach(child)?;

        let p = self.get_mut(parent)?;
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);

        self.mark_subtree_changed(child)?;
        self.invalidate_lists(Some(parent))
    }

    /// Detach `child` from its parent; the object stays alive.
    pub fn remove_child(&mut self, child: NodeId) -> StageResult<()> {
        self.detach(child)
    }

    fn detach(&mut self, child: NodeId) -> StageResult<()> {
        let Some(parent) = self.get(child)?.parent else {
            return Ok(());
        };
        self.report_subtree(child)?;
        self.get_mut(parent)?.children.retain(|c| *c != child);
        self.get_mut(child)?.parent = None;
        self.invalidate_lists(Some(parent))
    }

    /// Detach and free `id` and its whole subtree. Ids into it become stale.
    pub fn destroy(&mut self, id: NodeId) -> StageResult<()> {
        if id == self.stage {
            return Err(StageError::validation("the stage cannot be destroyed"));
        }
        self.detach(id)?;
        let ids = self.subtree(id)?;
        let mut released = Vec::with_capacity(ids.len());
        for x in ids {
            released.push(self.objects.release(x)?);
        }
        for obj in released {
            if let Some(m) = obj.mask
                && let Ok(mask) = self.get_mut(m)
            {
                mask.masked_object = None;
                mask.changed = true;
            }
            if let Some(o) = obj.masked_object
                && let Ok(masked) = self.get_mut(o)
            {
                masked.mask = None;
                masked.changed = true;
            }
        }
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> StageResult<()> {
        self.get_mut(id)?.name = Some(name.into());
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> StageResult<()> {
        if self.get(id)?.visible == visible {
            return Ok(());
        }
        if !visible {
            self.report_subtree(id)?;
        }
        let obj = self.get_mut(id)?;
        obj.visible = visible;
        let parent = obj.parent;
        if visible {
            self.mark_subtree_changed(id)?;
        }
        self.invalidate_lists(parent)
    }

    /// Set the object's own alpha, clamped to `0..=1`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) -> StageResult<()> {
        if !alpha.is_finite() {
            return Err(StageError::validation("alpha must be finite"));
        }
        self.get_mut(id)?.alpha = alpha.clamp(0.0, 1.0);
        self.touch(id)
    }

    pub fn set_blend_mode(&mut self, id: NodeId, mode: BlendMode) -> StageResult<()> {
        self.get_mut(id)?.blend_mode = mode;
        self.touch(id)
    }

    /// Replace the local transform.
    pub fn set_matrix(&mut self, id: NodeId, matrix: Matrix) -> StageResult<()> {
        self.get_mut(id)?.matrix = matrix;
        self.touch(id)
    }

    /// Move the object, keeping scale, rotation and skew.
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) -> StageResult<()> {
        let obj = self.get_mut(id)?;
        obj.matrix.tx = x;
        obj.matrix.ty = y;
        self.touch(id)
    }

    /// Clip the subtree to `rect` in the object's local space.
    pub fn set_scroll_rect(&mut self, id: NodeId, rect: Option<Rect>) -> StageResult<()> {
        self.get_mut(id)?.scroll_rect = rect.map(|r| r.abs());
        self.touch(id)
    }

    /// Rectangular mask; clips like a scroll rect.
    pub fn set_mask_rect(&mut self, id: NodeId, rect: Option<Rect>) -> StageResult<()> {
        self.get_mut(id)?.mask_rect = rect.map(|r| r.abs());
        self.touch(id)
    }

    pub fn set_filters(&mut self, id: NodeId, filters: Vec<Filter>) -> StageResult<()> {
        for f in &filters {
            f.validate()?;
        }
        self.get_mut(id)?.filters = filters;
        self.touch(id)
    }

    /// Mask `id` with the content of `mask`, or clear the mask.
    ///
    /// An object masks at most one other object; assigning it elsewhere unlinks the previous one.
    pub fn set_mask(&mut self, id: NodeId, mask: Option<NodeId>) -> StageResult<()> {
        let old = self.get(id)?.mask;
        if let Some(m) = mask {
            self.get(m)?;
            if m == id || m == self.stage {
                return Err(StageError::validation(
                    "an object cannot mask itself or the stage",
                ));
            }
        }
        if old == mask {
            return Ok(());
        }
        if let Some(o) = old
            && self.contains(o)
        {
            self.get_mut(o)?.masked_object = None;
            self.touch(o)?;
        }
        if let Some(m) = mask {
            if let Some(prev) = self.get(m)?.masked_object
                && prev != id
                && self.contains(prev)
            {
                self.get_mut(prev)?.mask = None;
                self.touch(prev)?;
            }
            self.report_subtree(m)?;
            self.get_mut(m)?.masked_object = Some(id);
        }
        self.get_mut(id)?.mask = mask;
        self.touch(id)
    }

    /// Replace the object's drawable content.
    pub fn set_content(&mut self, id: NodeId, kind: Option<NodeKind>) -> StageResult<()> {
        if let Some(old) = self.get_mut(id)?.render_node.take() {
            self.pending_dirty.push(old.render_region);
        }
        let obj = self.get_mut(id)?;
        obj.render_node = kind.map(RenderNode::new);
        obj.changed = true;
        self.invalidate_lists(Some(id))
    }

    /// Turn the cached surface on or off for `id`'s subtree.
    pub fn set_cache_as_bitmap(&mut self, id: NodeId, enabled: bool) -> StageResult<()> {
        let obj = self.get_mut(id)?;
        if enabled == obj.display_list.is_some() {
            return Ok(());
        }
        let removed = if enabled {
            obj.display_list = Some(DisplayList::new());
            None
        } else {
            obj.display_list.take()
        };
        if let Some(list) = removed {
            self.pending_dirty.push(list.region);
        }
        self.touch(id)
    }

    pub(crate) fn render_node_mut(&mut self, id: NodeId) -> StageResult<Option<&mut RenderNode>> {
        Ok(self.get_mut(id)?.render_node.as_mut())
    }

    pub(crate) fn display_list_node_mut(
        &mut self,
        id: NodeId,
    ) -> StageResult<Option<&mut RenderNode>> {
        Ok(self
            .get_mut(id)?
            .display_list
            .as_mut()
            .and_then(|l| l.render_node.as_mut()))
    }

    /// Install a freshly rasterized surface for `id`'s display list and mark it clean.
    pub(crate) fn store_display_list_surface(
        &mut self,
        id: NodeId,
        surface: Option<BitmapData>,
        offset: Point,
    ) -> StageResult<()> {
        let matrix = self.concatenated_matrix(id)?;
        let alpha = self.concatenated_alpha(id)?;
        let Some(list) = self.get_mut(id)?.display_list.as_mut() else {
            return Err(StageError::render("object has no display list"));
        };
        list.render_node = surface.as_ref().map(|bmp| {
            let mut node = RenderNode::new(NodeKind::Bitmap(BitmapNode::new(bmp.clone())));
            node.place(
                matrix.pre_multiply(&Matrix::translation(offset.x, offset.y)),
                alpha,
            );
            node
        });
        list.surface = surface;
        list.offset = offset;
        list.is_dirty = false;
        Ok(())
    }

    /// Transform from `id`'s local space to stage space.
    pub fn concatenated_matrix(&self, id: NodeId) -> StageResult<Matrix> {
        let mut obj = self.get(id)?;
        let mut m = obj.matrix;
        while let Some(p) = obj.parent {
            obj = self.get(p)?;
            m = obj.matrix.pre_multiply(&m);
        }
        Ok(m)
    }

    /// Transform from `id`'s local space to `root`'s local space.
    ///
    /// Walks the parent chain when `root` is an ancestor; otherwise goes through the inverse of
    /// `root`'s concatenated matrix, falling back to stage space when that is singular.
    pub fn concatenated_matrix_at(&self, id: NodeId, root: NodeId) -> StageResult<Matrix> {
        let mut m = Matrix::IDENTITY;
        let mut cur = id;
        loop {
            if cur == root {
                return Ok(m);
            }
            let obj = self.get(cur)?;
            m = obj.matrix.pre_multiply(&m);
            match obj.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        let root_concat = self.concatenated_matrix(root)?;
        Ok(match root_concat.invert() {
            Some(inv) => inv.pre_multiply(&m),
            None => m,
        })
    }

    /// Product of the alphas from `id` up to the stage.
    pub fn concatenated_alpha(&self, id: NodeId) -> StageResult<f32> {
        let mut obj = self.get(id)?;
        let mut a = obj.alpha;
        while let Some(p) = obj.parent {
            obj = self.get(p)?;
            a *= obj.alpha;
        }
        Ok(a)
    }

    /// Product of the alphas from `id` up to, but excluding, `root`.
    pub fn concatenated_alpha_at(&self, id: NodeId, root: NodeId) -> StageResult<f32> {
        let mut a = 1.0;
        let mut cur = id;
        loop {
            if cur == root {
                return Ok(a);
            }
            let obj = self.get(cur)?;
            a *= obj.alpha;
            match obj.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        let root_alpha = self.concatenated_alpha(root)?;
        Ok(if root_alpha > 0.0 {
            (a / root_alpha).min(1.0)
        } else {
            a
        })
    }

    /// Local-space bounds of the object's content and visible children.
    ///
    /// A scroll rect replaces the measured bounds; a mask rect narrows them.
    pub fn original_bounds(&self, id: NodeId) -> StageResult<Rect> {
        let obj = self.get(id)?;
        if let Some(r) = obj.scroll_rect {
            return Ok(r);
        }
        let mut bounds = obj
            .render_node
            .as_ref()
            .map(RenderNode::local_bounds)
            .filter(has_area);
        for &c in &obj.children {
            let child = self.get(c)?;
            if !child.visible || child.masked_object.is_some() {
                continue;
            }
            let cb = self.original_bounds(c)?;
            if !has_area(&cb) {
                continue;
            }
            let t = child.matrix.transform_bounds(cb);
            bounds = Some(match bounds {
                Some(b) => b.union(t),
                None => t,
            });
        }
        let mut b = bounds.unwrap_or(Rect::ZERO);
        if let Some(mr) = obj.mask_rect {
            b = b.intersect(mr);
            if !has_area(&b) {
                b = Rect::ZERO;
            }
        }
        Ok(b)
    }

    /// Place every render node for this frame and return the regions that need repainting.
    ///
    /// Changed nodes report both their previous and their new region.
    pub fn update(&mut self) -> StageResult<Vec<Region>> {
        let mut dirty = std::mem::take(&mut self.pending_dirty);
        self.update_object(self.stage, Matrix::IDENTITY, 1.0, false, &mut dirty)?;
        dirty.retain(|r| !r.is_empty());
        Ok(dirty)
    }

    /// [`DisplayTree::update`] feeding the regions into a [`DirtyRegion`].
    pub fn update_into(&mut self, dirty: &mut DirtyRegion) -> StageResult<()> {
        for r in self.update()? {
            dirty.add(r);
        }
        Ok(())
    }

    fn update_object(
        &mut self,
        id: NodeId,
        parent_matrix: Matrix,
        parent_alpha: f32,
        parent_changed: bool,
        dirty: &mut Vec<Region>,
    ) -> StageResult<()> {
        let list_bounds = match self.get(id)?.display_list {
            Some(_) => Some(self.original_bounds(id)?),
            None => None,
        };
        let obj = self.get_mut(id)?;
        if !obj.visible {
            return Ok(());
        }
        let matrix = parent_matrix.pre_multiply(&obj.matrix);
        let alpha = parent_alpha * obj.alpha;
        let changed = parent_changed || obj.changed;
        obj.changed = false;

        if let Some(node) = obj.render_node.as_mut() {
            let old = node.render_region;
            node.place(matrix, alpha);
            if changed || old != node.render_region {
                dirty.push(old);
                dirty.push(node.render_region);
            }
        }
        if let (Some(list), Some(bounds)) = (obj.display_list.as_mut(), list_bounds) {
            let old = list.region;
            list.region = Region::from_bounds(bounds, &matrix);
            let offset = list.offset;
            if let Some(node) = list.render_node.as_mut() {
                node.place(
                    matrix.pre_multiply(&Matrix::translation(offset.x, offset.y)),
                    alpha,
                );
            }
            if changed || list.is_dirty || old != list.region {
                dirty.push(old);
                dirty.push(list.region);
            }
        }

        let children: SmallVec<[NodeId; 8]> = obj.children.iter().copied().collect();
        for c in children {
            self.update_object(c, matrix, alpha, changed, dirty)?;
        }
        Ok(())
    }

    fn touch(&mut self, id: NodeId) -> StageResult<()> {
        self.mark_subtree_changed(id)?;
        let parent = self.get(id)?.parent;
        self.invalidate_lists(parent)
    }

    fn mark_subtree_changed(&mut self, id: NodeId) -> StageResult<()> {
        for x in self.subtree(id)? {
            self.get_mut(x)?.changed = true;
        }
        Ok(())
    }

    /// Queue the current regions of a subtree that is about to stop drawing.
    fn report_subtree(&mut self, id: NodeId) -> StageResult<()> {
        let mut regions = Vec::new();
        for x in self.subtree(id)? {
            let obj = self.get(x)?;
            if let Some(node) = &obj.render_node {
                regions.push(node.render_region);
            }
            if let Some(list) = &obj.display_list {
                regions.push(list.region);
            }
        }
        self.pending_dirty.extend(regions);
        Ok(())
    }

    /// Mark every display list at or above `start` dirty, following mask links to the
    /// objects they mask.
    fn invalidate_lists(&mut self, start: Option<NodeId>) -> StageResult<()> {
        let mut work: SmallVec<[NodeId; 8]> = start.into_iter().collect();
        let mut visits = 0usize;
        let limit = self.objects.len().saturating_mul(2);
        while let Some(id) = work.pop() {
            visits += 1;
            if visits > limit {
                break;
            }
            let obj = self.get_mut(id)?;
            if let Some(list) = obj.display_list.as_mut() {
                list.is_dirty = true;
            }
            if let Some(o) = obj.masked_object {
                work.push(o);
            }
            if let Some(p) = obj.parent {
                work.push(p);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
