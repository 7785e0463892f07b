//! Bounded undo/redo history.
//!
//! Two entry kinds exist:
//! - [`StrokeRecord::Itemized`]: overlay handles of a committed stroke plus a
//!   before/after patch of the raster area it touched
//! - [`StrokeRecord::Snapshot`]: a full raster and background colour, swapped
//!   with the page on both undo and redo
//!
//! Both kinds carry enough state to replay in either direction, so the overlay
//! and the raster agree after any sequence of undos and redos.

use crate::draw::{
    Color, Layer, OverlayHandle, Page, Primitive, RasterError, RasterImage, RasterPatch,
    StrokeGroup,
};
use crate::renderer::Renderer;
use log::{debug, warn};
use std::collections::VecDeque;

/// Default depth of each history stack.
pub const DEFAULT_CAPACITY: usize = 200;

/// Raster pixels under a stroke before and after it was committed.
#[derive(Debug, Clone)]
pub struct RasterDiff {
    pub before: RasterPatch,
    pub after: RasterPatch,
}

/// Overlay primitives and raster diff for one committed stroke.
#[derive(Debug, Default)]
pub struct ItemizedStroke {
    /// Live handles while the stroke is applied
    handles: Vec<OverlayHandle>,
    /// Primitive data held while the stroke is undone
    stashed: Vec<Primitive>,
    /// Opacity group the primitives are composited in
    group: Option<StrokeGroup>,
    diff: Option<RasterDiff>,
}

impl ItemizedStroke {
    pub fn handles(&self) -> &[OverlayHandle] {
        &self.handles
    }

    pub fn diff(&self) -> Option<&RasterDiff> {
        self.diff.as_ref()
    }
}

/// Full page state held by a snapshot entry.
#[derive(Debug)]
pub struct SnapshotState {
    pub raster: RasterImage,
    pub background: Color,
}

/// A single history entry.
#[derive(Debug)]
pub enum StrokeRecord {
    Itemized(ItemizedStroke),
    Snapshot(SnapshotState),
}

impl StrokeRecord {
    pub fn is_snapshot(&self) -> bool {
        matches!(self, StrokeRecord::Snapshot(_))
    }
}

/// Result of an undo or redo request.
#[derive(Debug)]
pub enum HistoryOutcome {
    /// The stack was empty
    Empty,
    Applied,
    /// The entry moved stacks but the page could not be restored
    Failed(RasterError),
}

/// Undo and redo stacks with FIFO eviction at capacity.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<StrokeRecord>,
    redo: VecDeque<StrokeRecord>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent undo entry, if any.
    pub fn last_undo(&self) -> Option<&StrokeRecord> {
        self.undo.back()
    }

    /// Records a committed stroke and clears redo.
    pub fn record_itemized(&mut self, handles: Vec<OverlayHandle>, diff: Option<RasterDiff>) {
        self.commit(StrokeRecord::Itemized(ItemizedStroke {
            handles,
            stashed: Vec::new(),
            group: None,
            diff,
        }));
    }

    /// Records the page state preceding a destructive edit and clears redo.
    pub fn record_snapshot(&mut self, raster: RasterImage, background: Color) {
        self.commit(StrokeRecord::Snapshot(SnapshotState { raster, background }));
    }

    fn commit(&mut self, record: StrokeRecord) {
        self.redo.clear();
        push_bounded(&mut self.undo, record, self.capacity);
    }

    /// Drops both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Reverts the most recent entry and moves it to the redo stack.
    pub fn undo(&mut self, page: &mut Page, renderer: &mut Renderer) -> HistoryOutcome {
        let Some(mut record) = self.undo.pop_back() else {
            return HistoryOutcome::Empty;
        };
        self.redo.clear();
        let result = revert(&mut record, page, renderer);
        push_bounded(&mut self.redo, record, self.capacity);
        finish("undo", result, page, renderer)
    }

    /// Re-applies the most recently undone entry and moves it back to the undo stack.
    pub fn redo(&mut self, page: &mut Page, renderer: &mut Renderer) -> HistoryOutcome {
        let Some(mut record) = self.redo.pop_back() else {
            return HistoryOutcome::Empty;
        };
        self.redo.clear();
        let result = reapply(&mut record, page, renderer);
        push_bounded(&mut self.undo, record, self.capacity);
        finish("redo", result, page, renderer)
    }
}

fn push_bounded(stack: &mut VecDeque<StrokeRecord>, record: StrokeRecord, capacity: usize) {
    while stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(record);
}

/// Re-renders the backdrop after a restore and converts the result.
fn finish(
    action: &str,
    result: Result<bool, RasterError>,
    page: &Page,
    renderer: &mut Renderer,
) -> HistoryOutcome {
    let rerender = match result {
        Ok(snapshot) => snapshot || renderer.has_backdrop(),
        Err(err) => {
            warn!("History {action} could not restore page: {err}");
            return HistoryOutcome::Failed(err);
        }
    };
    if rerender && let Err(err) = renderer.render_backdrop(page) {
        warn!("Backdrop re-render after {action} failed: {err}");
        return HistoryOutcome::Failed(err);
    }
    debug!("History {action} applied");
    HistoryOutcome::Applied
}

/// Undoes `record` in place. Returns whether it was a snapshot.
fn revert(
    record: &mut StrokeRecord,
    page: &mut Page,
    renderer: &mut Renderer,
) -> Result<bool, RasterError> {
    match record {
        StrokeRecord::Itemized(stroke) => {
            let overlay = renderer.overlay_mut();
            stroke.group = stroke
                .handles
                .first()
                .and_then(|handle| overlay.group_of(*handle));
            stroke.stashed = stroke
                .handles
                .drain(..)
                .filter_map(|handle| overlay.remove(handle))
                .collect();
            if let Some(diff) = &stroke.diff {
                page.pen().blit(&diff.before)?;
            }
            Ok(false)
        }
        StrokeRecord::Snapshot(state) => {
            swap_snapshot(state, page)?;
            Ok(true)
        }
    }
}

/// Redoes `record` in place. Returns whether it was a snapshot.
fn reapply(
    record: &mut StrokeRecord,
    page: &mut Page,
    renderer: &mut Renderer,
) -> Result<bool, RasterError> {
    match record {
        StrokeRecord::Itemized(stroke) => {
            let overlay = renderer.overlay_mut();
            let group = stroke.group;
            stroke.handles = stroke
                .stashed
                .drain(..)
                .map(|primitive| match group {
                    Some(group) => overlay.insert_grouped(Layer::Drawing, group, primitive),
                    None => overlay.insert(Layer::Drawing, primitive),
                })
                .collect();
            if let Some(diff) = &stroke.diff {
                page.pen().blit(&diff.after)?;
            }
            Ok(false)
        }
        StrokeRecord::Snapshot(state) => {
            swap_snapshot(state, page)?;
            Ok(true)
        }
    }
}

/// Exchanges the stored raster and background with the page's current ones.
fn swap_snapshot(state: &mut SnapshotState, page: &mut Page) -> Result<(), RasterError> {
    let stored = state.raster.try_clone()?;
    let (raster, background) = page.swap_contents(stored, state.background)?;
    state.raster = raster;
    state.background = background;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLACK, RED, StrokeStyle, WHITE};
    use crate::renderer::GridSettings;
    use crate::util::Rect;

    fn setup() -> (Page, Renderer) {
        (
            Page::new(32, 32, BLACK).unwrap(),
            Renderer::new(32, 32, GridSettings::default()),
        )
    }

    fn line() -> Primitive {
        Primitive::Line {
            from: (0.0, 0.0),
            to: (10.0, 0.0),
            style: StrokeStyle::new(RED, 2.0),
            arrow: None,
        }
    }

    /// Paints a red square through the page pen and records it as an itemized stroke.
    fn draw_square(history: &mut History, page: &Page, renderer: &mut Renderer) {
        let area = Rect::new(4, 4, 8, 8).unwrap();
        let before = page.raster().crop(area).unwrap().unwrap();
        let ctx = page.pen().context();
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.rectangle(4.0, 4.0, 8.0, 8.0);
        ctx.fill().unwrap();
        let after = page.raster().crop(area).unwrap().unwrap();

        let handle = renderer.overlay_mut().insert(Layer::Drawing, line());
        history.record_itemized(vec![handle], Some(RasterDiff { before, after }));
    }

    #[test]
    fn itemized_undo_and_redo_restore_both_buffers() {
        let (mut page, mut renderer) = setup();
        let mut history = History::default();
        draw_square(&mut history, &page, &mut renderer);
        assert_eq!(page.raster().pixel(6, 6), Some(RED));

        assert!(matches!(
            history.undo(&mut page, &mut renderer),
            HistoryOutcome::Applied
        ));
        assert_eq!(page.raster().pixel(6, 6), Some(BLACK));
        assert_eq!(renderer.overlay().count_layer(Layer::Drawing), 0);

        assert!(matches!(
            history.redo(&mut page, &mut renderer),
            HistoryOutcome::Applied
        ));
        assert_eq!(page.raster().pixel(6, 6), Some(RED));
        assert_eq!(renderer.overlay().count_layer(Layer::Drawing), 1);
        match history.last_undo() {
            Some(StrokeRecord::Itemized(stroke)) => {
                assert!(renderer.overlay().contains(stroke.handles()[0]))
            }
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[test]
    fn snapshot_undo_restores_prior_raster_and_redo_swaps_back() {
        let (mut page, mut renderer) = setup();
        let mut history = History::default();
        let before = page.raster().try_clone().unwrap();

        let (old, old_bg) = page.reset(WHITE).unwrap();
        history.record_snapshot(old, old_bg);

        history.undo(&mut page, &mut renderer);
        assert!(page.raster().same_pixels(&before));
        assert_eq!(page.background(), BLACK);
        assert!(renderer.has_backdrop());

        history.redo(&mut page, &mut renderer);
        assert_eq!(page.raster().pixel(0, 0), Some(WHITE));
        assert_eq!(page.background(), WHITE);
    }

    #[test]
    fn commits_clear_redo() {
        let (mut page, mut renderer) = setup();
        let mut history = History::default();
        history.record_itemized(Vec::new(), None);
        history.undo(&mut page, &mut renderer);
        assert_eq!(history.redo_len(), 1);

        history.record_itemized(Vec::new(), None);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn three_strokes_undo_twice_redo_once() {
        let (mut page, mut renderer) = setup();
        let mut history = History::default();
        for _ in 0..3 {
            let handle = renderer.overlay_mut().insert(Layer::Drawing, line());
            history.record_itemized(vec![handle], None);
        }

        history.undo(&mut page, &mut renderer);
        history.undo(&mut page, &mut renderer);
        history.redo(&mut page, &mut renderer);

        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 0);
        assert_eq!(renderer.overlay().count_layer(Layer::Drawing), 2);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let (mut page, mut renderer) = setup();
        let mut history = History::new(3);
        let handles: Vec<_> = (0..5)
            .map(|_| renderer.overlay_mut().insert(Layer::Drawing, line()))
            .collect();
        for handle in &handles {
            history.record_itemized(vec![*handle], None);
        }
        assert_eq!(history.undo_len(), 3);

        for _ in 0..3 {
            history.undo(&mut page, &mut renderer);
        }
        // the two oldest strokes were evicted and stay on the overlay
        assert!(renderer.overlay().contains(handles[0]));
        assert!(renderer.overlay().contains(handles[1]));
        assert!(!renderer.overlay().contains(handles[2]));
        assert!(matches!(
            history.undo(&mut page, &mut renderer),
            HistoryOutcome::Empty
        ));
    }

    #[test]
    fn default_capacity_is_two_hundred() {
        let mut history = History::default();
        for _ in 0..250 {
            history.record_itemized(Vec::new(), None);
        }
        assert_eq!(history.undo_len(), DEFAULT_CAPACITY);
        assert_eq!(history.capacity(), 200);
    }
}
