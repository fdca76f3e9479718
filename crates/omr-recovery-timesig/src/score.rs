//! The slice of the score model the time-signature retriever reads and writes.
//!
//! A page holds systems; a system holds parts, the glyph pool and its
//! horizontal extent; a part holds staves and measures; a measure holds the
//! per-staff landmarks (clefs, key signatures, chords) and time signatures.

use log::debug;
use nalgebra::Point2;
use omr_recovery_core::{
    CompoundGlyph, GlyphGeometry, GlyphId, GlyphPool, PixelRect, Scale, Shape,
};
use serde::{Deserialize, Serialize};

use crate::ScoreError;

/// Staff identifier, unique within its system.
pub type StaffId = u32;

/// First line of a staff, as a straight segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffLine {
    pub start: Point2<f32>,
    pub stop: Point2<f32>,
}

impl StaffLine {
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Self {
            start: Point2::new(x0, y),
            stop: Point2::new(x1, y),
        }
    }

    /// Ordinate at abscissa `x`, extrapolated beyond the ends.
    ///
    /// `None` for a vertical or zero-length segment.
    pub fn y_at(&self, x: i32) -> Option<i32> {
        let dx = self.stop.x - self.start.x;
        if dx.abs() < f32::EPSILON {
            return None;
        }
        let t = (x as f32 - self.start.x) / dx;
        Some((self.start.y + t * (self.stop.y - self.start.y)).round() as i32)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    #[serde(default)]
    pub dummy: bool,
    pub first_line: StaffLine,
    /// Distance from the first to the last line, in pixels.
    pub height: i32,
}

impl Staff {
    pub fn new(id: StaffId, first_line: StaffLine, height: i32) -> Self {
        Self {
            id,
            dummy: false,
            first_line,
            height,
        }
    }

    pub fn first_line_y_at(&self, x: i32) -> Result<i32, ScoreError> {
        self.first_line
            .y_at(x)
            .ok_or(ScoreError::DegenerateStaffLine { staff: self.id })
    }

    fn vertical_distance(&self, y: f32) -> f32 {
        let top = self.first_line.start.y.min(self.first_line.stop.y);
        let bottom = self.first_line.start.y.max(self.first_line.stop.y) + self.height as f32;
        if y < top {
            top - y
        } else if y > bottom {
            y - bottom
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clef {
    pub staff: StaffId,
    pub shape: Shape,
    pub bounds: PixelRect,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeySignature {
    pub staff: StaffId,
    /// Positive for sharps, negative for flats.
    pub fifths: i32,
    pub bounds: PixelRect,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub bounds: PixelRect,
    /// Bounds of the accidental glyph in front of the note, if any.
    #[serde(default)]
    pub accidental: Option<PixelRect>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chord {
    pub staff: StaffId,
    pub notes: Vec<Note>,
}

impl Chord {
    pub fn bounds(&self) -> Option<PixelRect> {
        self.notes.iter().map(|n| n.bounds).reduce(|a, b| a.union(&b))
    }

    pub fn center(&self) -> Option<Point2<f32>> {
        self.bounds().map(|b| b.center())
    }
}

/// Numerator over denominator, e.g. 6/8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRational {
    pub num: u32,
    pub den: u32,
}

impl TimeRational {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Value carried by a single-glyph time signature shape.
    pub fn from_full_shape(shape: Shape) -> Option<Self> {
        let (num, den) = match shape {
            Shape::TimeFourFour | Shape::CommonTime => (4, 4),
            Shape::TimeTwoTwo | Shape::CutTime => (2, 2),
            Shape::TimeTwoFour => (2, 4),
            Shape::TimeThreeFour => (3, 4),
            Shape::TimeSixEight => (6, 8),
            _ => return None,
        };
        Some(Self::new(num, den))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeSignature {
    pub staff: StaffId,
    pub bounds: PixelRect,
    pub shape: Shape,
    pub rational: TimeRational,
    /// Glyph this signature was built from, when known.
    #[serde(default)]
    pub glyph: Option<GlyphId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Barline {
    pub bounds: PixelRect,
    pub glyphs: Vec<GlyphId>,
}

impl Barline {
    /// First glyph of the barline recognized as a bar line.
    pub fn line_glyph(&self, pool: &GlyphPool) -> Option<GlyphId> {
        self.glyphs.iter().copied().find(|&id| {
            pool.get(id)
                .and_then(|g| g.evaluation())
                .is_some_and(|e| matches!(e.shape, Shape::ThinBarline | Shape::ThickBarline))
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Measure {
    pub id: u32,
    /// Abscissa of the ending barline, when known.
    pub right_x: Option<i32>,
    pub clefs: Vec<Clef>,
    pub keys: Vec<KeySignature>,
    pub chords: Vec<Chord>,
    pub time_signatures: Vec<TimeSignature>,
}

impl Measure {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Leftmost clef of the staff in this measure.
    pub fn first_measure_clef(&self, staff: StaffId) -> Option<&Clef> {
        self.clefs
            .iter()
            .filter(|c| c.staff == staff)
            .min_by_key(|c| c.bounds.x)
    }

    /// Leftmost key signature of the staff in this measure.
    pub fn first_measure_key(&self, staff: StaffId) -> Option<&KeySignature> {
        self.keys
            .iter()
            .filter(|k| k.staff == staff)
            .min_by_key(|k| k.bounds.x)
    }

    /// Chord of the staff whose center abscissa is closest to `x`.
    pub fn closest_chord(&self, staff: StaffId, x: i32) -> Option<&Chord> {
        self.chords
            .iter()
            .filter(|c| c.staff == staff)
            .filter_map(|c| Some((c, (c.center()?.x - x as f32).abs())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(c, _)| c)
    }

    pub fn time_signature(&self, staff: StaffId) -> Option<&TimeSignature> {
        self.time_signatures.iter().find(|t| t.staff == staff)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SystemPart {
    pub id: u32,
    /// Placeholder part keeping parts aligned across systems.
    #[serde(default)]
    pub dummy: bool,
    pub staves: Vec<Staff>,
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub starting_barline: Option<Barline>,
}

impl SystemPart {
    pub fn new(id: u32, staves: Vec<Staff>, measures: Vec<Measure>) -> Self {
        Self {
            id,
            dummy: false,
            staves,
            measures,
            starting_barline: None,
        }
    }

    fn vertical_distance(&self, y: f32) -> f32 {
        self.staves
            .iter()
            .map(|s| s.vertical_distance(y))
            .fold(f32::INFINITY, f32::min)
    }
}

/// One staff of a structural slot: where to find it and its measure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotStaff {
    pub part: usize,
    pub measure: usize,
    pub staff: StaffId,
    /// Set for dummy staves and for every staff of a dummy part.
    pub dummy: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScoreSystem {
    pub id: u32,
    /// Left abscissa of the system.
    pub left: i32,
    pub width: i32,
    pub parts: Vec<SystemPart>,
    #[serde(default)]
    pub glyphs: GlyphPool,
}

impl ScoreSystem {
    pub fn new(id: u32, left: i32, width: i32) -> Self {
        Self {
            id,
            left,
            width,
            ..Self::default()
        }
    }

    /// Rightmost abscissa of the system.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn glyphs(&self) -> &GlyphPool {
        &self.glyphs
    }

    /// First part that is not a placeholder.
    pub fn first_real_part(&self) -> Option<(usize, &SystemPart)> {
        self.parts.iter().enumerate().find(|(_, p)| !p.dummy)
    }

    /// Every staff of the system, paired with its part's measure at
    /// `measure_index`. Fails if some part lacks that measure.
    pub fn slot_staves(&self, measure_index: usize) -> Result<Vec<SlotStaff>, ScoreError> {
        let mut out = Vec::new();
        for (part_index, part) in self.parts.iter().enumerate() {
            if part.measures.get(measure_index).is_none() {
                return Err(ScoreError::MissingMeasure {
                    part: part.id,
                    index: measure_index,
                });
            }
            out.extend(part.staves.iter().map(|s| SlotStaff {
                part: part_index,
                measure: measure_index,
                staff: s.id,
                dummy: part.dummy || s.dummy,
            }));
        }
        Ok(out)
    }

    pub fn measure(&self, slot: &SlotStaff) -> Result<&Measure, ScoreError> {
        self.parts
            .get(slot.part)
            .and_then(|p| p.measures.get(slot.measure))
            .ok_or(ScoreError::MissingMeasure {
                part: slot.part as u32,
                index: slot.measure,
            })
    }

    pub fn staff(&self, slot: &SlotStaff) -> Result<&Staff, ScoreError> {
        self.parts
            .get(slot.part)
            .and_then(|p| p.staves.iter().find(|s| s.id == slot.staff))
            .ok_or(ScoreError::UnknownStaff { staff: slot.staff })
    }

    /// Explicit time signature on any staff of the slot, dummies included.
    pub fn time_signature_in_slot(
        &self,
        measure_index: usize,
    ) -> Result<Option<&TimeSignature>, ScoreError> {
        for slot in self.slot_staves(measure_index)? {
            if let Some(ts) = self.measure(&slot)?.time_signature(slot.staff) {
                return Ok(Some(ts));
            }
        }
        Ok(None)
    }

    /// Part whose staves are vertically closest to `y`.
    pub fn part_at(&self, y: f32) -> Option<&SystemPart> {
        self.parts
            .iter()
            .filter(|p| !p.staves.is_empty())
            .min_by(|a, b| a.vertical_distance(y).total_cmp(&b.vertical_distance(y)))
    }

    /// Insert a time signature built from an evaluated full-time compound.
    ///
    /// Returns `Ok(None)` without touching anything when the slot already
    /// holds a time signature. Otherwise the compound is committed to the pool
    /// and the new signature is linked to it.
    pub fn populate_full_time(
        &mut self,
        compound: CompoundGlyph,
        slot: &SlotStaff,
    ) -> Result<Option<GlyphId>, ScoreError> {
        let shape = compound
            .evaluation()
            .map(|e| e.shape)
            .ok_or(ScoreError::UnevaluatedCompound)?;
        let rational =
            TimeRational::from_full_shape(shape).ok_or(ScoreError::NotAFullTime { shape })?;

        if self.measure(slot)?.time_signature(slot.staff).is_some() {
            debug!("staff {} already has a time signature", slot.staff);
            return Ok(None);
        }

        let bounds = compound.bounds();
        let glyph = self.glyphs.commit(compound);
        let measure = self
            .parts
            .get_mut(slot.part)
            .and_then(|p| p.measures.get_mut(slot.measure))
            .ok_or(ScoreError::MissingMeasure {
                part: slot.part as u32,
                index: slot.measure,
            })?;
        measure.time_signatures.push(TimeSignature {
            staff: slot.staff,
            bounds,
            shape,
            rational,
            glyph: Some(glyph),
        });
        Ok(Some(glyph))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    pub id: u32,
    pub scale: Scale,
    pub systems: Vec<ScoreSystem>,
}

impl Page {
    pub fn new(id: u32, scale: Scale) -> Self {
        Self {
            id,
            scale,
            systems: Vec::new(),
        }
    }

    pub fn first_system(&self) -> Option<&ScoreSystem> {
        self.systems.first()
    }

    pub fn first_system_mut(&mut self) -> Option<&mut ScoreSystem> {
        self.systems.first_mut()
    }
}
