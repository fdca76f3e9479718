use serde::{Deserialize, Serialize};

/// Bounds and tolerances of a compound search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundParams {
    /// Extra pixels around the reference box when gathering candidates, on
    /// top of `adjacency_gap`.
    pub box_margin: i32,
    /// Two glyphs closer than this (bounds to bounds, in pixels) are adjacent.
    /// Also how close a glyph must get to the reference box.
    pub adjacency_gap: i32,
    /// Keep at most this many candidates, closest to the reference box first.
    /// Capped at 64.
    pub max_candidates: usize,
    /// Largest aggregate built by incremental growth. Whole connected
    /// components are always tried regardless.
    pub max_members: usize,
    /// Upper bound on the number of aggregates classified in one search.
    pub max_subsets: usize,
    /// Let glyphs with a manually assigned shape take part.
    pub include_manual_shapes: bool,
}

impl Default for CompoundParams {
    fn default() -> Self {
        Self {
            box_margin: 0,
            adjacency_gap: 3,
            max_candidates: 16,
            max_members: 4,
            max_subsets: 256,
            include_manual_shapes: false,
        }
    }
}
