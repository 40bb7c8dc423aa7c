use crate::foundation::pool::Handle;
use crate::geom::region::{Region, RegionPool};

/// Accumulates screen-space regions that need repainting before the next frame.
///
/// Regions are clipped to the stage bounds on insertion. Once more than `max_regions` are
/// pending they are merged into a single bounding box, which bounds the per-node intersection
/// cost of the next pass.
#[derive(Debug)]
pub struct DirtyRegion {
    stage: Region,
    max_regions: usize,
    regions: RegionPool,
    order: Vec<Handle<Region>>,
}

impl DirtyRegion {
    /// Tracker for a stage of `width` x `height` pixels.
    pub fn new(width: u32, height: u32, max_regions: usize) -> Self {
        Self {
            stage: Region::from_xywh(0.0, 0.0, f64::from(width), f64::from(height)),
            max_regions: max_regions.max(1),
            regions: RegionPool::new(),
            order: Vec::new(),
        }
    }

    /// Resize the stage; pending regions outside the new bounds are kept as is.
    pub fn set_stage_size(&mut self, width: u32, height: u32) {
        self.stage = Region::from_xywh(0.0, 0.0, f64::from(width), f64::from(height));
    }

    /// Mark the whole stage dirty.
    pub fn mark_all(&mut self) {
        self.clear();
        let stage = self.stage;
        self.push(stage);
    }

    /// Add a region. Returns `false` when it was empty after clipping.
    pub fn add(&mut self, region: Region) -> bool {
        let mut r = region;
        r.intersect(&self.stage);
        if r.is_empty() {
            return false;
        }
        if self
            .order
            .iter()
            .filter_map(|&h| self.regions.get(h).ok())
            .any(|existing| existing.contains(&r))
        {
            return true;
        }
        self.push(r);
        if self.order.len() > self.max_regions {
            self.merge_all();
        }
        true
    }

    /// Pending regions in insertion order.
    pub fn regions(&self) -> Vec<Region> {
        self.order
            .iter()
            .filter_map(|&h| self.regions.get(h).ok().copied())
            .collect()
    }

    /// Number of pending regions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every pending region.
    pub fn clear(&mut self) {
        for h in self.order.drain(..) {
            // Handles in `order` are only ever released here or in `merge_all`.
            let _ = self.regions.release(h);
        }
    }

    fn push(&mut self, r: Region) {
        let h = self.regions.create(r);
        self.order.push(h);
    }

    fn merge_all(&mut self) {
        let mut merged = Region::EMPTY;
        for h in self.order.drain(..) {
            if let Ok(r) = self.regions.release(h) {
                merged.union(&r);
            }
        }
        tracing::trace!(?merged, "dirty regions merged");
        self.push(merged);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geom/dirty.rs"]
mod tests;
