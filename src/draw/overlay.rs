//! Arena of overlay primitives addressed by generation-checked handles.
//!
//! Removing a primitive frees its slot; reusing the slot bumps the generation,
//! so handles kept by history entries or trails stop resolving instead of
//! pointing at an unrelated primitive. The stacking order drops dead handles
//! lazily and is compacted once they outnumber the live ones.

use super::primitive::Primitive;

/// Opaque reference to a primitive stored in an [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle {
    index: u32,
    generation: u32,
}

/// Logical layer a primitive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Resampled raster image, always lowest in the stack
    Backdrop,
    /// Committed stroke and shape primitives
    Drawing,
    /// Grid lines
    Grid,
    /// Rubber-band shape preview
    Preview,
    /// Transient laser trail
    Laser,
}

/// Primitives composited together at one opacity.
///
/// A stroke's segments overlap at every joint; drawing them opaque into a
/// group and painting the group once keeps the joints from darkening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeGroup {
    id: u32,
    pub alpha: f64,
}

#[derive(Debug)]
struct Entry {
    layer: Layer,
    group: Option<StrokeGroup>,
    primitive: Primitive,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Z-ordered collection of overlay primitives.
#[derive(Debug, Default)]
pub struct Overlay {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Bottom-to-top stacking order; may hold stale handles
    order: Vec<OverlayHandle>,
    live: usize,
    next_group: u32,
}

/// Below this many order entries compaction is not worth it.
const COMPACT_MIN: usize = 64;

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive on top of the stack.
    pub fn insert(&mut self, layer: Layer, primitive: Primitive) -> OverlayHandle {
        let handle = self.allocate(layer, None, primitive);
        self.order.push(handle);
        handle
    }

    /// Adds a primitive on top of the stack as a member of `group`.
    pub fn insert_grouped(
        &mut self,
        layer: Layer,
        group: StrokeGroup,
        primitive: Primitive,
    ) -> OverlayHandle {
        let handle = self.allocate(layer, Some(group), primitive);
        self.order.push(handle);
        handle
    }

    /// Adds a primitive below everything else.
    pub fn insert_bottom(&mut self, layer: Layer, primitive: Primitive) -> OverlayHandle {
        let handle = self.allocate(layer, None, primitive);
        self.order.insert(0, handle);
        handle
    }

    /// Starts a new group painted at `alpha`.
    pub fn new_group(&mut self, alpha: f64) -> StrokeGroup {
        let id = self.next_group;
        self.next_group = self.next_group.wrapping_add(1);
        StrokeGroup {
            id,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    fn allocate(
        &mut self,
        layer: Layer,
        group: Option<StrokeGroup>,
        primitive: Primitive,
    ) -> OverlayHandle {
        self.live += 1;
        let entry = Some(Entry {
            layer,
            group,
            primitive,
        });
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = entry;
                OverlayHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry,
                });
                OverlayHandle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn slot(&self, handle: OverlayHandle) -> Option<&Entry> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    /// Removes the primitive behind `handle`; stale handles return `None`.
    pub fn remove(&mut self, handle: OverlayHandle) -> Option<Primitive> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        self.free.push(handle.index);
        self.live -= 1;
        self.compact_if_sparse();
        Some(entry.primitive)
    }

    /// Drops dead handles from the stacking order once they dominate it.
    fn compact_if_sparse(&mut self) {
        if self.order.len() < COMPACT_MIN || self.order.len() < self.live * 2 {
            return;
        }
        let slots = &self.slots;
        self.order.retain(|handle| is_live(slots, *handle));
    }

    pub fn get(&self, handle: OverlayHandle) -> Option<&Primitive> {
        self.slot(handle).map(|entry| &entry.primitive)
    }

    pub fn contains(&self, handle: OverlayHandle) -> bool {
        self.slot(handle).is_some()
    }

    pub fn layer_of(&self, handle: OverlayHandle) -> Option<Layer> {
        self.slot(handle).map(|entry| entry.layer)
    }

    pub fn group_of(&self, handle: OverlayHandle) -> Option<StrokeGroup> {
        self.slot(handle).and_then(|entry| entry.group)
    }

    /// Number of live primitives.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of live primitives in `layer`.
    pub fn count_layer(&self, layer: Layer) -> usize {
        self.iter().filter(|(_, l, _)| *l == layer).count()
    }

    /// Removes every primitive in `layer` in a single pass over the stacking order.
    pub fn clear_layer(&mut self, layer: Layer) {
        let slots = &mut self.slots;
        let free = &mut self.free;
        let mut removed = 0;
        self.order.retain(|handle| {
            let Some(slot) = slots
                .get_mut(handle.index as usize)
                .filter(|slot| slot.generation == handle.generation)
            else {
                return false;
            };
            match slot.entry.as_ref().map(|entry| entry.layer == layer) {
                Some(true) => {
                    slot.entry = None;
                    free.push(handle.index);
                    removed += 1;
                    false
                }
                Some(false) => true,
                None => false,
            }
        });
        self.live -= removed;
    }

    /// Removes everything. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for handle in std::mem::take(&mut self.order) {
            if let Some(slot) = self
                .slots
                .get_mut(handle.index as usize)
                .filter(|slot| slot.generation == handle.generation && slot.entry.is_some())
            {
                slot.entry = None;
                self.free.push(handle.index);
            }
        }
        self.live = 0;
    }

    /// Iterates live primitives bottom-to-top.
    pub fn iter(&self) -> impl Iterator<Item = (OverlayHandle, Layer, &Primitive)> + '_ {
        self.order.iter().filter_map(move |handle| {
            self.slot(*handle)
                .map(|entry| (*handle, entry.layer, &entry.primitive))
        })
    }

    /// Position of `handle` among live primitives (0 = bottom).
    pub fn z_index(&self, handle: OverlayHandle) -> Option<usize> {
        self.iter().position(|(h, _, _)| h == handle)
    }

    /// Renders every primitive bottom-to-top.
    ///
    /// Consecutive members of a translucent group are drawn into one cairo
    /// group that is painted at the group's alpha.
    pub fn render(&self, ctx: &cairo::Context) {
        let mut open: Option<StrokeGroup> = None;
        for handle in &self.order {
            let Some(entry) = self.slot(*handle) else {
                continue;
            };
            let group = entry.group.filter(|group| group.alpha < 1.0);
            if group.map(|g| g.id) != open.map(|g| g.id) {
                if let Some(done) = open.take() {
                    paint_group(ctx, done.alpha);
                }
                if group.is_some() {
                    ctx.push_group();
                    open = group;
                }
            }
            super::render::render_primitive(ctx, &entry.primitive);
        }
        if let Some(done) = open {
            paint_group(ctx, done.alpha);
        }
    }
}

fn is_live(slots: &[Slot], handle: OverlayHandle) -> bool {
    slots
        .get(handle.index as usize)
        .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
}

fn paint_group(ctx: &cairo::Context, alpha: f64) {
    if let Err(err) = ctx
        .pop_group_to_source()
        .and_then(|_| ctx.paint_with_alpha(alpha))
    {
        log::warn!("Failed to composite stroke group: {err}");
    }
}
