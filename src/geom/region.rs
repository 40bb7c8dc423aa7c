use crate::foundation::core::Rect;
use crate::foundation::pool::Pool;
use crate::geom::matrix::Matrix;

/// Axis-aligned pixel box in buffer space.
///
/// Bounds are whole pixels: [`Region::update_region`] snaps outward so anything the transformed
/// rectangle touches is covered.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge (inclusive).
    pub min_x: f64,
    /// Top edge (inclusive).
    pub min_y: f64,
    /// Right edge (exclusive).
    pub max_x: f64,
    /// Bottom edge (exclusive).
    pub max_y: f64,
}

impl Region {
    /// The empty region at the origin.
    pub const EMPTY: Region = Region {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Region from its four edges.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Region from origin and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Covered area, zero when empty.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// `true` iff the region has non-positive extent on either axis.
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Collapse to [`Region::EMPTY`].
    pub fn set_empty(&mut self) {
        *self = Region::EMPTY;
    }

    /// Recompute as the pixel-snapped bounding box of `bounds` mapped through `matrix`.
    pub fn update_region(&mut self, bounds: Rect, matrix: &Matrix) {
        let w = bounds.width();
        let h = bounds.height();
        if !(w > 0.0 && h > 0.0) {
            self.set_empty();
            return;
        }
        let r = matrix.transform_bounds(bounds);
        if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
            self.set_empty();
            return;
        }
        self.min_x = r.x0.floor();
        self.min_y = r.y0.floor();
        self.max_x = r.x1.ceil();
        self.max_y = r.y1.ceil();
    }

    /// Shorthand for a fresh region built with [`Region::update_region`].
    pub fn from_bounds(bounds: Rect, matrix: &Matrix) -> Self {
        let mut r = Region::EMPTY;
        r.update_region(bounds, matrix);
        r
    }

    /// `true` when the two regions share positive area.
    ///
    /// Regions that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min_x.max(other.min_x) < self.max_x.min(other.max_x)
            && self.min_y.max(other.min_y) < self.max_y.min(other.max_y)
    }

    /// Shrink to the intersection with `other`; becomes empty when they do not overlap.
    pub fn intersect(&mut self, other: &Region) {
        if !self.intersects(other) {
            self.set_empty();
            return;
        }
        self.min_x = self.min_x.max(other.min_x);
        self.min_y = self.min_y.max(other.min_y);
        self.max_x = self.max_x.min(other.max_x);
        self.max_y = self.max_y.min(other.max_y);
    }

    /// Grow to cover `other` as well. Empty inputs are ignored.
    pub fn union(&mut self, other: &Region) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Grow every edge outward by `pad` pixels.
    pub fn inflate(&mut self, pad: f64) {
        if self.is_empty() || pad <= 0.0 {
            return;
        }
        let pad = pad.ceil();
        self.min_x -= pad;
        self.min_y -= pad;
        self.max_x += pad;
        self.max_y += pad;
    }

    /// Same box moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Region {
        if self.is_empty() {
            return *self;
        }
        Region::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// `true` when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Region) -> bool {
        !other.is_empty()
            && other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Same box as a [`Rect`].
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Width rounded up to whole pixels, clamped at zero.
    pub fn pixel_width(&self) -> u32 {
        self.width().max(0.0).ceil() as u32
    }

    /// Height rounded up to whole pixels, clamped at zero.
    pub fn pixel_height(&self) -> u32 {
        self.height().max(0.0).ceil() as u32
    }
}

/// `true` when `region` intersects any entry of `dirty`.
pub fn intersects_any(region: &Region, dirty: &[Region]) -> bool {
    dirty.iter().any(|d| region.intersects(d))
}

/// Arena of regions addressed by generation-checked handles.
pub type RegionPool = Pool<Region>;

#[cfg(test)]
#[path = "../../tests/unit/geom/region.rs"]
mod tests;
