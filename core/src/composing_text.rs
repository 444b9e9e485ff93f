//! Three-layer composing buffer.
//!
//! - `LAYER0` holds keystrokes ("k", "a", ...)
//! - `LAYER1` holds letters made from them ("か")
//! - `LAYER2` holds conversion clauses ("私", "は")
//!
//! Every segment on layer *i+1* spans a closed range of segments on layer
//! *i*, and the segments of a layer partition the layer below it. Each layer
//! has a cursor (a gap index in `0..=len`); moving one cursor recomputes the
//! other two. Edits on a layer are propagated upward before returning, so the
//! partition holds between operations.

use thiserror::Error;
use tracing::{trace, warn};

use crate::segment::StrSegment;

pub const LAYER0: usize = 0;
pub const LAYER1: usize = 1;
pub const LAYER2: usize = 2;
pub const MAX_LAYER: usize = 3;

/// A violated layer invariant, found by [`ComposingText::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layer {layer} segment {index}: {reason}")]
pub struct Inconsistency {
    pub layer: usize,
    pub index: usize,
    pub reason: &'static str,
}

/// Layered composing text with synchronized cursors.
#[derive(Debug, Clone, Default)]
pub struct ComposingText {
    layers: [Vec<StrSegment>; MAX_LAYER],
    cursor: [usize; MAX_LAYER],
}

fn valid(layer: usize) -> bool {
    layer < MAX_LAYER
}

fn shift(index: usize, diff: isize) -> usize {
    (index as isize + diff).max(0) as usize
}

fn widen(range: Option<(usize, usize)>, index: usize) -> (usize, usize) {
    match range {
        Some((lo, hi)) => (lo.min(index), hi.max(index)),
        None => (index, index),
    }
}

impl ComposingText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments on `layer` (0 for an invalid layer).
    pub fn size(&self, layer: usize) -> usize {
        if valid(layer) {
            self.layers[layer].len()
        } else {
            0
        }
    }

    /// Cursor of `layer` (0 for an invalid layer).
    pub fn cursor(&self, layer: usize) -> usize {
        if valid(layer) {
            self.cursor[layer]
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers[LAYER0].is_empty()
    }

    pub fn segments(&self, layer: usize) -> &[StrSegment] {
        if valid(layer) {
            &self.layers[layer]
        } else {
            &[]
        }
    }

    /// Segment at `pos`, or the sentinel when out of range.
    pub fn segment(&self, layer: usize, pos: usize) -> &StrSegment {
        self.segments(layer).get(pos).unwrap_or(StrSegment::empty())
    }

    /// Text of a whole layer.
    pub fn to_string(&self, layer: usize) -> String {
        self.segments(layer).iter().map(|s| s.text.as_str()).collect()
    }

    /// Text of segments `[from, to]` of a layer (clamped; empty when inverted).
    pub fn to_string_range(&self, layer: usize, from: usize, to: usize) -> String {
        let segs = self.segments(layer);
        if segs.is_empty() || from > to || from >= segs.len() {
            return String::new();
        }
        let to = to.min(segs.len() - 1);
        segs[from..=to].iter().map(|s| s.text.as_str()).collect()
    }

    pub fn clear(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.clear();
        }
        self.cursor = [0; MAX_LAYER];
    }

    // ========== Editing ==========

    /// Insert `segment` at the cursor of `layer` and advance the cursor.
    pub fn insert(&mut self, layer: usize, segment: StrSegment) {
        if !valid(layer) {
            return;
        }
        let at = self.cursor[layer];
        self.layers[layer].insert(at, segment);
        self.modify_upper(layer, at, 1, 0);
        self.set_cursor(layer, at + 1);
        self.settle();
    }

    /// Insert `segment` on `layer1` together with one derived segment on every
    /// layer up to `layer2`, each spanning just the element inserted below.
    ///
    /// Used for keystrokes that immediately show as letters: a keystroke typed
    /// with `(LAYER0, LAYER1)` gets its own letter segment instead of being
    /// merged into the preceding one.
    pub fn insert_spanning(&mut self, layer1: usize, layer2: usize, segment: StrSegment) {
        if !valid(layer1) || !valid(layer2) || layer1 > layer2 {
            return;
        }
        if layer1 == layer2 {
            self.insert(layer1, segment);
            return;
        }

        let text = segment.text.clone();
        let at = self.cursor[layer1];
        self.layers[layer1].insert(at, segment);
        self.cursor[layer1] = at + 1;

        for upper in layer1 + 1..=layer2 {
            let pos = self.cursor[upper - 1] - 1;
            let at = self.cursor[upper];
            let on_boundary = at == 0 || self.layers[upper][at - 1].to < pos;
            if !on_boundary {
                // The cursor sits inside a segment; merge the new element into it.
                self.modify_upper(upper - 1, pos, 1, 0);
                let cursor = self.cursor[upper - 1];
                self.set_cursor(upper - 1, cursor);
                self.settle();
                return;
            }
            for seg in self.layers[upper][at..].iter_mut() {
                seg.from += 1;
                seg.to += 1;
            }
            self.layers[upper].insert(at, StrSegment::new(text.clone(), pos, pos));
            self.cursor[upper] = at + 1;
        }

        let cursor = self.cursor[layer2];
        self.modify_upper(layer2, cursor - 1, 1, 0);
        self.set_cursor(layer2, cursor);
        self.settle();
    }

    /// Replace the `count` segments before the cursor of `layer` with
    /// `segments`. The cursor ends up after the new segments.
    pub fn replace(&mut self, layer: usize, segments: Vec<StrSegment>, count: usize) {
        if !valid(layer) {
            return;
        }
        let cursor = self.cursor[layer];
        let count = count.min(cursor);
        let from = cursor - count;
        let added = segments.len();
        self.layers[layer].splice(from..cursor, segments);
        self.modify_upper(layer, from, added, count);
        self.set_cursor(layer, from + added);
        self.settle();
    }

    /// Delete segments `[from, to]` of `layer`.
    ///
    /// Lower layers lose the segments the range covers; upper layers lose the
    /// segments wholly inside it and re-derive the ones it partially covers.
    /// Returns the new size of `layer`.
    pub fn delete(&mut self, layer: usize, from: usize, to: usize) -> usize {
        if !valid(layer) {
            return 0;
        }
        let len = self.layers[layer].len();
        if len == 0 || from > to || from >= len {
            return len;
        }
        let to = to.min(len - 1);

        // The range as seen on this layer and every layer below it.
        let mut ranges = [(0usize, 0usize); MAX_LAYER];
        ranges[layer] = (from, to);
        for lower in (0..layer).rev() {
            let (f, t) = ranges[lower + 1];
            ranges[lower] = (self.layers[lower + 1][f].from, self.layers[lower + 1][t].to);
        }

        for lower in 0..=layer {
            let (f, t) = ranges[lower];
            let count = t - f + 1;
            self.layers[lower].drain(f..=t);
            if lower < layer {
                let (_, upper_to) = ranges[lower + 1];
                for seg in self.layers[lower + 1][upper_to + 1..].iter_mut() {
                    seg.from -= count;
                    seg.to -= count;
                }
            }
        }

        let count = to - from + 1;
        self.delete_upper(layer, from, count, None);

        let cursor = self.cursor[layer];
        let cursor = if cursor > to {
            cursor - count
        } else if cursor > from {
            from
        } else {
            cursor
        };
        self.set_cursor(layer, cursor);
        self.settle();
        self.layers[layer].len()
    }

    /// Delete one segment next to the cursor: the one before it (backspace)
    /// or, with `right_side`, the one after it. Returns the new size.
    pub fn delete_at(&mut self, layer: usize, right_side: bool) -> usize {
        if !valid(layer) {
            return 0;
        }
        let cursor = self.cursor[layer];
        if right_side {
            if cursor < self.layers[layer].len() {
                self.delete(layer, cursor, cursor);
            }
        } else if cursor > 0 {
            self.delete(layer, cursor - 1, cursor - 1);
        }
        self.layers[layer].len()
    }

    // ========== Cursors ==========

    /// Move the cursor of `layer` to `pos` (clamped) and recompute the other
    /// layers' cursors. Returns the new cursor.
    pub fn set_cursor(&mut self, layer: usize, pos: usize) -> usize {
        if !valid(layer) {
            return 0;
        }
        let pos = pos.min(self.layers[layer].len());
        match layer {
            LAYER0 => {
                self.cursor[LAYER0] = pos;
                self.cursor[LAYER1] = self.included(LAYER0, pos);
                self.cursor[LAYER2] = self.included(LAYER1, self.cursor[LAYER1]);
            }
            LAYER1 => {
                self.cursor[LAYER1] = pos;
                self.cursor[LAYER2] = self.included(LAYER1, pos);
                self.cursor[LAYER0] = self.below(LAYER1, pos);
            }
            _ => {
                self.cursor[LAYER2] = pos;
                self.cursor[LAYER1] = self.below(LAYER2, pos);
                self.cursor[LAYER0] = self.below(LAYER1, self.cursor[LAYER1]);
            }
        }
        pos
    }

    /// Move the cursor of `layer` by `diff` (clamped). Returns the new cursor.
    pub fn move_cursor(&mut self, layer: usize, diff: isize) -> usize {
        if !valid(layer) {
            return 0;
        }
        let pos = shift(self.cursor[layer], diff);
        self.set_cursor(layer, pos)
    }

    /// Cursor on `layer + 1` for cursor `pos` on `layer`: just after the upper
    /// segment containing `pos - 1`.
    fn included(&self, layer: usize, pos: usize) -> usize {
        if pos == 0 || layer >= LAYER2 {
            return 0;
        }
        self.layers[layer + 1].partition_point(|seg| seg.from < pos)
    }

    /// Cursor on `layer - 1` for cursor `pos` on `layer`.
    fn below(&self, layer: usize, pos: usize) -> usize {
        if pos == 0 || layer == LAYER0 {
            return 0;
        }
        let lower_len = self.layers[layer - 1].len();
        self.layers[layer]
            .get(pos - 1)
            .map_or(0, |seg| (seg.to + 1).min(lower_len))
    }

    // ========== Propagation ==========

    /// Reflect a change of `layer` into `layer + 1`.
    ///
    /// `org_len` segments starting at `mod_from` were replaced by `mod_len`
    /// segments. The overlapped upper segments collapse into one segment whose
    /// text is re-derived; later upper segments shift by the size difference.
    fn modify_upper(&mut self, layer: usize, mod_from: usize, mod_len: usize, org_len: usize) {
        if layer >= LAYER2 || (mod_len == 0 && org_len == 0) {
            return;
        }
        let upper = layer + 1;
        let lower_len = self.layers[layer].len();

        if self.layers[upper].is_empty() {
            if lower_len == 0 {
                return;
            }
            let text = self.to_string(layer);
            self.layers[upper].push(StrSegment::new(text, 0, lower_len - 1));
            self.modify_upper(upper, 0, 1, 0);
            return;
        }

        let diff = mod_len as isize - org_len as isize;
        let mod_to = mod_from + mod_len.saturating_sub(1);
        let org_to = mod_from + org_len.saturating_sub(1);

        let last = self.layers[upper].len() - 1;
        if self.layers[upper][last].to < mod_from {
            if mod_len == 0 {
                return;
            }
            self.layers[upper][last].to = mod_to;
            self.restring(layer, last);
            trace!(layer, upper_index = last, "extended last upper segment");
            self.modify_upper(upper, last, 1, 1);
            return;
        }

        let hit = |seg: &StrSegment| {
            if org_len == 0 {
                seg.spans(mod_from)
            } else {
                seg.from <= org_to && mod_from <= seg.to
            }
        };
        let segs = &self.layers[upper];
        let Some(upper_from) = segs.iter().position(hit) else {
            // Nothing overlapped: the change lies before the first upper segment.
            if mod_len == 0 {
                return;
            }
            let text = self.to_string_range(layer, mod_from, mod_to);
            for seg in self.layers[upper].iter_mut() {
                seg.from = shift(seg.from, diff);
                seg.to = shift(seg.to, diff);
            }
            self.layers[upper].insert(0, StrSegment::new(text, mod_from, mod_to));
            self.modify_upper(upper, 0, 1, 0);
            return;
        };
        let upper_to = segs.iter().rposition(hit).unwrap_or(upper_from);
        let merged = upper_to - upper_from + 1;
        let new_from = segs[upper_from].from.min(mod_from);
        let new_to = segs[upper_to].to as isize + diff;

        for seg in self.layers[upper][upper_to + 1..].iter_mut() {
            seg.from = shift(seg.from, diff);
            seg.to = shift(seg.to, diff);
        }

        if new_to < new_from as isize {
            // Everything the collapsed segment spanned is gone.
            self.layers[upper].drain(upper_from..=upper_to);
            trace!(layer, upper_from, merged, "removed emptied upper segments");
            self.modify_upper(upper, upper_from, 0, merged);
            return;
        }

        self.layers[upper].drain(upper_from + 1..=upper_to);
        let seg = &mut self.layers[upper][upper_from];
        seg.from = new_from;
        seg.to = new_to as usize;
        self.restring(layer, upper_from);
        trace!(layer, upper_from, merged, diff, "updated upper segment");
        self.modify_upper(upper, upper_from, 1, merged);
    }

    /// Propagate a deletion of `count` segments at `from` on `layer` into the
    /// layers above. `dirty` marks segments of `layer` (post-deletion indices)
    /// whose text changed.
    fn delete_upper(&mut self, layer: usize, from: usize, count: usize, dirty: Option<(usize, usize)>) {
        if layer >= LAYER2 {
            return;
        }
        let upper = layer + 1;
        let end = from + count;

        let mut removed: Option<(usize, usize)> = None;
        let mut touched: Option<(usize, usize)> = None;
        let old = std::mem::take(&mut self.layers[upper]);
        let mut kept = Vec::with_capacity(old.len());
        for (index, mut seg) in old.into_iter().enumerate() {
            let mut changed = false;
            if count > 0 {
                if seg.from >= from && seg.to < end {
                    removed = Some(widen(removed, index));
                    continue;
                }
                if seg.from >= end {
                    seg.from -= count;
                    seg.to -= count;
                } else if seg.to >= from {
                    seg.from = seg.from.min(from);
                    seg.to = if seg.to >= end { seg.to - count } else { from - 1 };
                    changed = true;
                }
            }
            if let Some((lo, hi)) = dirty {
                if seg.from <= hi && lo <= seg.to {
                    changed = true;
                }
            }
            if changed {
                touched = Some(widen(touched, kept.len()));
            }
            kept.push(seg);
        }
        self.layers[upper] = kept;

        if let Some((lo, hi)) = touched {
            for index in lo..=hi {
                self.restring(layer, index);
            }
        }
        let (removed_from, removed_count) = removed.map_or((0, 0), |(lo, hi)| (lo, hi - lo + 1));
        if removed_count == 0 && touched.is_none() {
            return;
        }
        trace!(layer, removed_from, removed_count, ?touched, "propagated deletion");
        self.delete_upper(upper, removed_from, removed_count, touched);
    }

    /// Re-derive the text of segment `index` on `layer + 1` from `layer`.
    fn restring(&mut self, layer: usize, index: usize) {
        let seg = &self.layers[layer + 1][index];
        let text = self.to_string_range(layer, seg.from, seg.to);
        let seg = &mut self.layers[layer + 1][index];
        seg.text = text;
        seg.clause = None;
    }

    // ========== Invariants ==========

    /// Verify that every layer partitions the one below and that the cursors
    /// are in range.
    pub fn check_consistency(&self) -> Result<(), Inconsistency> {
        for layer in 0..MAX_LAYER {
            if self.cursor[layer] > self.layers[layer].len() {
                return Err(Inconsistency {
                    layer,
                    index: self.cursor[layer],
                    reason: "cursor out of range",
                });
            }
        }
        for upper in LAYER1..MAX_LAYER {
            let lower_len = self.layers[upper - 1].len();
            let mut expected = 0;
            for (index, seg) in self.layers[upper].iter().enumerate() {
                let reason = if seg.from != expected {
                    Some("gap or overlap")
                } else if seg.to < seg.from {
                    Some("inverted span")
                } else if seg.to >= lower_len {
                    Some("span past end of lower layer")
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(Inconsistency { layer: upper, index, reason });
                }
                expected = seg.to + 1;
            }
            if expected != lower_len {
                return Err(Inconsistency {
                    layer: upper,
                    index: self.layers[upper].len(),
                    reason: "lower layer not covered",
                });
            }
        }
        Ok(())
    }

    fn settle(&mut self) {
        if let Err(err) = self.check_consistency() {
            if cfg!(debug_assertions) {
                panic!("composing text inconsistent: {err}");
            }
            warn!(%err, "composing text inconsistent; rebuilding upper layers");
            self.rebuild(err.layer.max(LAYER1));
        }
    }

    /// Replace `from_layer` and everything above it with one whole-layer segment each.
    fn rebuild(&mut self, from_layer: usize) {
        for upper in from_layer..MAX_LAYER {
            let lower_len = self.layers[upper - 1].len();
            let text = self.to_string(upper - 1);
            self.layers[upper].clear();
            if lower_len > 0 {
                self.layers[upper].push(StrSegment::new(text, 0, lower_len - 1));
            }
        }
        let cursor = self.cursor[LAYER0];
        self.set_cursor(LAYER0, cursor);
    }

    /// Log all layers at trace level.
    pub fn dump(&self) {
        for (layer, segs) in self.layers.iter().enumerate() {
            let rendered: Vec<String> = segs
                .iter()
                .map(|s| format!("{}[{}-{}]", s.text, s.from, s.to))
                .collect();
            trace!(layer, cursor = self.cursor[layer], segments = %rendered.join(" "), "composing text");
        }
    }
}
