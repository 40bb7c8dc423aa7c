//! JSON scene descriptions.
//!
//! A [`SceneDesc`] is a plain serde tree that builds a [`DisplayTree`]. Content is limited to
//! what can be described without external assets: solid-color bitmaps and filled rectangles.

use std::collections::HashMap;

use crate::foundation::core::{BezPath, BitmapData, BlendMode, Rect, Rgba8Premul};
use crate::foundation::error::{StageError, StageResult};
use crate::geom::matrix::Matrix;
use crate::scene::display::NodeId;
use crate::scene::filter::Filter;
use crate::scene::node::{BitmapNode, GraphicsNode, NodeKind, PathCommand, PathPaint};
use crate::scene::tree::DisplayTree;

fn one() -> f64 {
    1.0
}

fn one_f32() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SceneDesc {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub children: Vec<ObjectDesc>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectDesc {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<RectDesc> for Rect {
    fn from(r: RectDesc) -> Self {
        Rect::new(r.x, r.y, r.x + r.width, r.y + r.height)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ObjectDesc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "one_f32")]
    pub alpha: f32,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub scroll_rect: Option<RectDesc>,
    #[serde(default)]
    pub mask_rect: Option<RectDesc>,
    /// Name of the object used as this object's mask.
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub cache_as_bitmap: bool,
    #[serde(default)]
    pub content: Option<ContentDesc>,
    #[serde(default)]
    pub children: Vec<ObjectDesc>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDesc {
    /// Solid-color bitmap of `width` x `height` pixels at the origin.
    Bitmap {
        width: u32,
        height: u32,
        /// `0xRRGGBB`.
        color: u32,
        #[serde(default = "one_f32")]
        alpha: f32,
    },
    /// Vector rectangle fill.
    Fill {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
        width: f64,
        height: f64,
        color: u32,
        #[serde(default = "one_f32")]
        alpha: f32,
    },
}

impl ContentDesc {
    pub fn validate(&self) -> StageResult<()> {
        match *self {
            ContentDesc::Bitmap {
                width,
                height,
                alpha,
                ..
            } => {
                if width == 0 || height == 0 {
                    return Err(StageError::validation("bitmap width/height must be > 0"));
                }
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(StageError::validation("bitmap alpha must be in 0..=1"));
                }
            }
            ContentDesc::Fill {
                width,
                height,
                alpha,
                ..
            } => {
                if !(width > 0.0 && height > 0.0) {
                    return Err(StageError::validation("fill width/height must be > 0"));
                }
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(StageError::validation("fill alpha must be in 0..=1"));
                }
            }
        }
        Ok(())
    }

    fn to_node(&self) -> NodeKind {
        match *self {
            ContentDesc::Bitmap {
                width,
                height,
                color,
                alpha,
            } => NodeKind::Bitmap(BitmapNode::new(BitmapData::solid(
                width,
                height,
                Rgba8Premul::from_rgb_u32(color, alpha),
            ))),
            ContentDesc::Fill {
                x,
                y,
                width,
                height,
                color,
                alpha,
            } => {
                let mut path = BezPath::new();
                path.move_to((x, y));
                path.line_to((x + width, y));
                path.line_to((x + width, y + height));
                path.line_to((x, y + height));
                path.close_path();
                let [r, g, b] = [(color >> 16) as u8, (color >> 8) as u8, color as u8];
                let a = (alpha * 255.0).round() as u8;
                NodeKind::Graphics(GraphicsNode::new(vec![PathCommand {
                    path,
                    paint: PathPaint::Fill {
                        color: [r, g, b, a],
                    },
                }]))
            }
        }
    }
}

impl ObjectDesc {
    fn matrix(&self) -> Matrix {
        Matrix::rotation(self.rotation.to_radians())
            .pre_multiply(&Matrix::scale(self.scale_x, self.scale_y))
            .translated(self.x, self.y)
    }

    pub fn validate(&self) -> StageResult<()> {
        let finite = [self.x, self.y, self.scale_x, self.scale_y, self.rotation];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(StageError::validation(format!(
                "object '{}' has a non-finite transform",
                self.name.as_deref().unwrap_or("<unnamed>")
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(StageError::validation("object alpha must be in 0..=1"));
        }
        if let Some(c) = &self.content {
            c.validate()?;
        }
        for f in &self.filters {
            f.validate()?;
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}

impl SceneDesc {
    pub fn from_json(json: &str) -> StageResult<Self> {
        let desc: SceneDesc = serde_json::from_str(json)
            .map_err(|e| StageError::validation(format!("scene json: {e}")))?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> StageResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StageError::validation("stage width/height must be > 0"));
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }

    /// Build the described tree. Mask names resolve against every named object.
    pub fn build(&self) -> StageResult<DisplayTree> {
        self.validate()?;
        let mut tree = DisplayTree::new(self.width, self.height);
        let stage = tree.stage();
        let mut masks = Vec::new();
        let mut names = HashMap::new();
        for child in &self.children {
            build_object(&mut tree, stage, child, &mut names, &mut masks)?;
        }
        for (id, mask_name) in masks {
            let mask = names.get(&mask_name).copied().ok_or_else(|| {
                StageError::validation(format!("mask '{mask_name}' does not name an object"))
            })?;
            tree.set_mask(id, Some(mask))?;
        }
        Ok(tree)
    }
}

fn build_object(
    tree: &mut DisplayTree,
    parent: NodeId,
    desc: &ObjectDesc,
    names: &mut HashMap<String, NodeId>,
    masks: &mut Vec<(NodeId, String)>,
) -> StageResult<()> {
    let id = match &desc.content {
        Some(c) => tree.create_with_content(c.to_node()),
        None => tree.create(),
    };
    if let Some(name) = &desc.name {
        tree.set_name(id, name.clone())?;
        if names.insert(name.clone(), id).is_some() {
            return Err(StageError::validation(format!(
                "object name '{name}' is used twice"
            )));
        }
    }
    tree.add_child(parent, id)?;
    tree.set_matrix(id, desc.matrix())?;
    tree.set_alpha(id, desc.alpha)?;
    tree.set_visible(id, desc.visible)?;
    tree.set_blend_mode(id, desc.blend_mode)?;
    tree.set_scroll_rect(id, desc.scroll_rect.map(Rect::from))?;
    tree.set_mask_rect(id, desc.mask_rect.map(Rect::from))?;
    tree.set_filters(id, desc.filters.clone())?;
    tree.set_cache_as_bitmap(id, desc.cache_as_bitmap)?;
    if let Some(mask) = &desc.mask {
        masks.push((id, mask.clone()));
    }
    for child in &desc.children {
        build_object(tree, id, child, names, masks)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/desc.rs"]
mod tests;
