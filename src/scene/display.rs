use smallvec::SmallVec;

use crate::foundation::core::{BitmapData, BlendMode, Point, Rect};
use crate::foundation::pool::Handle;
use crate::geom::matrix::Matrix;
use crate::geom::region::Region;
use crate::scene::filter::Filter;
use crate::scene::node::RenderNode;

/// Identifier of a display object inside a [`crate::DisplayTree`].
///
/// Ids are generation checked: an id kept after its object was destroyed is rejected.
pub type NodeId = Handle<DisplayObject>;

/// Cached rasterization of a subtree ("cache as bitmap").
///
/// While clean, the renderer draws the cached surface instead of visiting the subtree.
#[derive(Clone, Debug)]
pub struct DisplayList {
    pub(crate) is_dirty: bool,
    pub(crate) surface: Option<BitmapData>,
    /// Local-space origin of the cached surface.
    pub(crate) offset: Point,
    pub(crate) render_node: Option<RenderNode>,
    /// Buffer-space box last reported to dirty tracking.
    pub(crate) region: Region,
}

impl DisplayList {
    pub(crate) fn new() -> Self {
        Self {
            is_dirty: true,
            surface: None,
            offset: Point::ZERO,
            render_node: None,
            region: Region::EMPTY,
        }
    }

    /// `true` when the surface must be re-rasterized before use.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Last rasterized pixels.
    pub fn surface(&self) -> Option<&BitmapData> {
        self.surface.as_ref()
    }

    /// Node drawing the cached surface.
    pub fn render_node(&self) -> Option<&RenderNode> {
        self.render_node.as_ref()
    }
}

/// A node of the scene tree.
///
/// Fields are read through accessors; mutations go through [`crate::DisplayTree`] so that
/// dirty tracking and cached surfaces stay consistent.
#[derive(Clone, Debug)]
pub struct DisplayObject {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) visible: bool,
    pub(crate) alpha: f32,
    pub(crate) blend_mode: BlendMode,
    pub(crate) matrix: Matrix,
    pub(crate) scroll_rect: Option<Rect>,
    pub(crate) mask_rect: Option<Rect>,
    pub(crate) mask: Option<NodeId>,
    pub(crate) masked_object: Option<NodeId>,
    pub(crate) filters: Vec<Filter>,
    pub(crate) display_list: Option<DisplayList>,
    pub(crate) render_node: Option<RenderNode>,
    pub(crate) changed: bool,
}

impl Default for DisplayObject {
    fn default() -> Self {
        Self {
            name: None,
            parent: None,
            children: SmallVec::new(),
            visible: true,
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            matrix: Matrix::IDENTITY,
            scroll_rect: None,
            mask_rect: None,
            mask: None,
            masked_object: None,
            filters: Vec::new(),
            display_list: None,
            render_node: None,
            changed: true,
        }
    }
}

impl DisplayObject {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in paint order; later entries draw over earlier ones.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Local transform relative to the parent.
    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn scroll_rect(&self) -> Option<Rect> {
        self.scroll_rect
    }

    pub fn mask_rect(&self) -> Option<Rect> {
        self.mask_rect
    }

    /// The scroll rect, or the mask rect when no scroll rect is set.
    pub fn clip_rect(&self) -> Option<Rect> {
        self.scroll_rect.or(self.mask_rect)
    }

    /// Object whose content masks this one.
    pub fn mask(&self) -> Option<NodeId> {
        self.mask
    }

    /// Set when this object is acting as another object's mask.
    pub fn masked_object(&self) -> Option<NodeId> {
        self.masked_object
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn display_list(&self) -> Option<&DisplayList> {
        self.display_list.as_ref()
    }

    pub fn render_node(&self) -> Option<&RenderNode> {
        self.render_node.as_ref()
    }

    /// Skipped by traversal: hidden, fully transparent, or serving as a mask.
    pub fn is_skipped(&self) -> bool {
        !self.visible || self.alpha <= 0.0 || self.masked_object.is_some()
    }
}
