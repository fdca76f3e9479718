use std::collections::BTreeMap;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Evaluation, PixelRect};

/// Stable identifier of a glyph inside its [`GlyphPool`](crate::GlyphPool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphId(pub u32);

/// Horizontal run of foreground pixels: `x..x + len` on row `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelRun {
    pub y: i32,
    pub x: i32,
    pub len: u32,
}

impl PixelRun {
    pub const fn new(y: i32, x: i32, len: u32) -> Self {
        Self { y, x, len }
    }

    #[inline]
    pub fn end(&self) -> i32 {
        self.x + self.len as i32
    }
}

/// Geometry view shared by primitive and compound glyphs.
///
/// This is what the shape classifier gets to look at.
pub trait GlyphGeometry {
    fn runs(&self) -> &[PixelRun];

    fn bounds(&self) -> PixelRect;

    /// Ids of the primitive glyphs whose pixels make up this one.
    fn members(&self) -> &[GlyphId];

    /// Number of foreground pixels.
    fn weight(&self) -> u64 {
        self.runs().iter().map(|r| r.len as u64).sum()
    }

    /// Mass center of the foreground pixels, or the bounds center when empty.
    fn centroid(&self) -> Point2<f32> {
        mass_center(self.runs()).unwrap_or_else(|| self.bounds().center())
    }
}

fn bounds_of(runs: &[PixelRun]) -> PixelRect {
    let mut it = runs.iter().filter(|r| r.len > 0);
    let Some(first) = it.next() else {
        return PixelRect::default();
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.end(), first.y + 1);
    for r in it {
        x0 = x0.min(r.x);
        y0 = y0.min(r.y);
        x1 = x1.max(r.end());
        y1 = y1.max(r.y + 1);
    }
    PixelRect::new(x0, y0, x1 - x0, y1 - y0)
}

fn mass_center(runs: &[PixelRun]) -> Option<Point2<f32>> {
    let mut sx = 0.0f64;
    let mut sy = 0.0f64;
    let mut n = 0.0f64;
    for r in runs {
        let w = r.len as f64;
        sx += w * (r.x as f64 + 0.5 * w);
        sy += w * (r.y as f64 + 0.5);
        n += w;
    }
    if n == 0.0 {
        return None;
    }
    Some(Point2::new((sx / n) as f32, (sy / n) as f32))
}

/// Runs covering every pixel of `rect`.
pub(crate) fn filled_runs(rect: PixelRect) -> Vec<PixelRun> {
    if rect.is_empty() {
        return Vec::new();
    }
    (rect.y..rect.bottom())
        .map(|y| PixelRun::new(y, rect.x, rect.width as u32))
        .collect()
}

/// A glyph registered in a pool: primitive, or a committed compound.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Glyph {
    id: GlyphId,
    runs: Vec<PixelRun>,
    bounds: PixelRect,
    /// Constituents for committed compounds, `[id]` for primitives.
    members: Vec<GlyphId>,
    evaluation: Option<Evaluation>,
    /// Compound this glyph has been merged into, if any.
    #[serde(default)]
    part_of: Option<GlyphId>,
    manual_value: Option<String>,
    #[serde(default)]
    attachments: BTreeMap<String, PixelRect>,
}

impl Glyph {
    pub(crate) fn primitive(id: GlyphId, mut runs: Vec<PixelRun>) -> Self {
        runs.sort_unstable();
        let bounds = bounds_of(&runs);
        Self {
            id,
            runs,
            bounds,
            members: vec![id],
            evaluation: None,
            part_of: None,
            manual_value: None,
            attachments: BTreeMap::new(),
        }
    }

    pub(crate) fn from_compound(id: GlyphId, compound: CompoundGlyph) -> Self {
        Self {
            id,
            runs: compound.runs,
            bounds: compound.bounds,
            members: compound.members,
            evaluation: compound.evaluation,
            part_of: None,
            manual_value: None,
            attachments: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> GlyphId {
        self.id
    }

    /// Whether this glyph was assembled from several primitives.
    pub fn is_compound(&self) -> bool {
        self.members.len() > 1 || self.members.first() != Some(&self.id)
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn set_evaluation(&mut self, evaluation: Option<Evaluation>) {
        self.evaluation = evaluation;
    }

    pub fn part_of(&self) -> Option<GlyphId> {
        self.part_of
    }

    /// Not yet absorbed by a committed compound.
    pub fn is_active(&self) -> bool {
        self.part_of.is_none()
    }

    pub(crate) fn set_part_of(&mut self, compound: GlyphId) {
        self.part_of = Some(compound);
    }

    /// Assign a user-confirmed shape.
    pub fn set_manual_shape(&mut self, shape: crate::Shape) {
        self.evaluation = Some(Evaluation::manual(shape));
    }

    /// Whether the current shape was assigned manually.
    pub fn is_manual_shape(&self) -> bool {
        self.evaluation.is_some_and(|e| e.is_manual())
    }

    /// Manually assigned text, if any.
    pub fn manual_value(&self) -> Option<&str> {
        self.manual_value.as_deref()
    }

    pub fn set_manual_value(&mut self, value: Option<String>) {
        self.manual_value = value;
    }

    pub fn has_manual_value(&self) -> bool {
        self.manual_value.is_some()
    }

    /// Text meaning of the glyph. Only manual values are known here.
    pub fn text_value(&self) -> Option<&str> {
        self.manual_value()
    }

    /// Debug boxes attached for visual inspection.
    pub fn attachments(&self) -> &BTreeMap<String, PixelRect> {
        &self.attachments
    }

    pub(crate) fn add_attachment(&mut self, name: String, rect: PixelRect) {
        self.attachments.insert(name, rect);
    }
}

impl GlyphGeometry for Glyph {
    fn runs(&self) -> &[PixelRun] {
        &self.runs
    }

    fn bounds(&self) -> PixelRect {
        self.bounds
    }

    fn members(&self) -> &[GlyphId] {
        &self.members
    }
}

/// Candidate glyph merged from primitives during a recovery search.
///
/// It owns a copy of the merged pixels and only refers to its constituents by
/// id, so dropping it leaves the pool untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompoundGlyph {
    runs: Vec<PixelRun>,
    bounds: PixelRect,
    members: Vec<GlyphId>,
    evaluation: Option<Evaluation>,
}

impl CompoundGlyph {
    /// Merge the pixels of `parts`. Returns `None` for an empty slice.
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a Glyph>) -> Option<Self> {
        let mut runs = Vec::new();
        let mut members = Vec::new();
        for glyph in parts {
            runs.extend_from_slice(&glyph.runs);
            members.extend_from_slice(&glyph.members);
        }
        if members.is_empty() {
            return None;
        }
        runs.sort_unstable();
        members.sort_unstable();
        members.dedup();
        let bounds = bounds_of(&runs);
        Some(Self {
            runs,
            bounds,
            members,
            evaluation: None,
        })
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn set_evaluation(&mut self, evaluation: Option<Evaluation>) {
        self.evaluation = evaluation;
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }
}

impl GlyphGeometry for CompoundGlyph {
    fn runs(&self) -> &[PixelRun] {
        &self.runs
    }

    fn bounds(&self) -> PixelRect {
        self.bounds
    }

    fn members(&self) -> &[GlyphId] {
        &self.members
    }
}
