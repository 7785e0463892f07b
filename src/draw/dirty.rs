//! Dirty region tracking for raster diffs.
//!
//! Accumulates the area touched by a stroke's raster ops so only that patch is
//! copied before and after the batch is replayed.

use super::ops::RasterOp;
use crate::util::Rect;

/// Tracks the union of dirty rectangles accumulated during one stroke.
#[derive(Debug, Default, Clone)]
pub struct DirtyTracker {
    bounds: Option<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire surface as dirty.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.bounds = None;
    }

    /// Grows the dirty area to include `rect` unless the tracker is already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(rect),
            None => rect,
        });
    }

    /// Adds the bounding box of `op`, or full damage if it has none.
    pub fn mark_op(&mut self, op: &RasterOp) {
        match op.bounding_box() {
            Some(rect) => self.mark_rect(rect),
            None => self.mark_full(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.force_full && self.bounds.is_none()
    }

    /// Drains the tracked area, scaled into raster space and clamped to it.
    ///
    /// Full damage yields the whole `width x height` raster.
    pub fn take_bounds(&mut self, scale: (f64, f64), width: i32, height: i32) -> Option<Rect> {
        let full = std::mem::take(&mut self.force_full);
        let bounds = self.bounds.take();
        if full {
            return Rect::new(0, 0, width, height);
        }
        bounds
            .and_then(|rect| rect.scaled(scale.0, scale.1))
            .map(|rect| rect.inflate(1))
            .and_then(|rect| rect.clamp_to_bounds(width, height))
    }
}
