//! Windowed Rendering
//!
//! Computes which slice of a long, fixed-extent list intersects the viewport
//! (plus an overscan margin) and where each materialized item sits, so a host
//! only ever lays out a few dozen items regardless of list length.

use serde::Serialize;

/// Default number of extra items rendered on each side of the viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

// == Window Range ==
/// Half-open index range `[start, end)` of items to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
}

impl WindowRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Computes the window for `item_count` items of `item_extent` each, seen
/// through a viewport of `viewport_extent` scrolled to `scroll_offset`.
///
/// Negative or non-finite offsets and extents are treated as zero; a
/// non-positive item extent yields an empty window.
pub fn compute_window(
    item_count: usize,
    item_extent: f64,
    viewport_extent: f64,
    scroll_offset: f64,
    overscan: usize,
) -> WindowRange {
    if item_count == 0 || !item_extent.is_finite() || item_extent <= 0.0 {
        return WindowRange::default();
    }

    let offset = sanitize(scroll_offset);
    let viewport = sanitize(viewport_extent);

    let first_visible = (offset / item_extent).floor() as usize;
    let start = first_visible.saturating_sub(overscan).min(item_count);
    let visible_count =
        ((viewport / item_extent).ceil() as usize).saturating_add(overscan.saturating_mul(2));
    let end = start.saturating_add(visible_count).min(item_count);

    WindowRange { start, end }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// == Scroll Event ==
/// Change reported by the hosting scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollEvent {
    Scrolled { offset: f64 },
    Resized { viewport_extent: f64 },
}

// == Positioned Item ==
/// An item to render and its absolute offset from the container top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedItem<'a, T> {
    pub index: usize,
    pub offset: f64,
    pub item: &'a T,
}

// == Virtual Window Renderer ==
/// Tracks scroll state for one list and keeps its window current.
#[derive(Debug, Clone)]
pub struct VirtualWindowRenderer {
    item_count: usize,
    item_extent: f64,
    viewport_extent: f64,
    scroll_offset: f64,
    overscan: usize,
    range: WindowRange,
}

impl VirtualWindowRenderer {
    pub fn new(item_extent: f64, viewport_extent: f64, overscan: usize) -> Self {
        let mut renderer = Self {
            item_count: 0,
            item_extent,
            viewport_extent,
            scroll_offset: 0.0,
            overscan,
            range: WindowRange::default(),
        };
        renderer.recompute();
        renderer
    }

    /// Applies a container event and returns the updated window.
    pub fn handle(&mut self, event: ScrollEvent) -> WindowRange {
        match event {
            ScrollEvent::Scrolled { offset } => self.scroll_offset = offset,
            ScrollEvent::Resized { viewport_extent } => self.viewport_extent = viewport_extent,
        }
        self.recompute()
    }

    /// Replaces the list length, e.g. when new results arrive.
    pub fn set_item_count(&mut self, item_count: usize) -> WindowRange {
        self.item_count = item_count;
        self.recompute()
    }

    pub fn range(&self) -> WindowRange {
        self.range
    }

    /// Full scrollable extent of the container (`N * H`).
    pub fn total_extent(&self) -> f64 {
        self.item_count as f64 * self.item_extent.max(0.0)
    }

    /// Furthest meaningful scroll offset.
    pub fn max_scroll_offset(&self) -> f64 {
        (self.total_extent() - sanitize(self.viewport_extent)).max(0.0)
    }

    /// Absolute offset of the item at `index`.
    pub fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.item_extent
    }

    /// Items in the current window with their absolute offsets.
    ///
    /// `items` should have `item_count` elements; a shorter slice is clipped.
    pub fn materialize<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = PositionedItem<'a, T>> + 'a {
        let extent = self.item_extent;
        let end = self.range.end.min(items.len());
        let start = self.range.start.min(end);

        items[start..end]
            .iter()
            .enumerate()
            .map(move |(i, item)| PositionedItem {
                index: start + i,
                offset: (start + i) as f64 * extent,
                item,
            })
    }

    fn recompute(&mut self) -> WindowRange {
        self.range = compute_window(
            self.item_count,
            self.item_extent,
            self.viewport_extent,
            self.scroll_offset,
            self.overscan,
        );
        self.range
    }
}
