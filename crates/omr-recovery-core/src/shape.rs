use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol category a glyph can be assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    // Single-glyph full time signatures.
    TimeFourFour,
    TimeTwoTwo,
    TimeTwoFour,
    TimeThreeFour,
    TimeSixEight,
    CommonTime,
    CutTime,
    // Isolated time signature digits.
    TimeZero,
    TimeOne,
    TimeTwo,
    TimeThree,
    TimeFour,
    TimeFive,
    TimeSix,
    TimeSeven,
    TimeEight,
    TimeNine,
    TimeTwelve,
    TimeSixteen,
    // Clefs.
    GClef,
    FClef,
    CClef,
    PercussionClef,
    // Accidentals.
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
    DoubleFlat,
    // Noteheads.
    NoteheadBlack,
    NoteheadVoid,
    WholeNote,
    // Bar lines.
    ThinBarline,
    ThickBarline,
    // Anything the classifier could not make sense of.
    Clutter,
    Noise,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A named, immutable set of shapes admissible for one recognition task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeSet {
    name: &'static str,
    shapes: &'static [Shape],
}

impl ShapeSet {
    /// Time signatures drawn as a single glyph (both numbers, or a symbol).
    pub const FULL_TIMES: ShapeSet = ShapeSet::new(
        "FullTimes",
        &[
            Shape::TimeFourFour,
            Shape::TimeTwoTwo,
            Shape::TimeTwoFour,
            Shape::TimeThreeFour,
            Shape::TimeSixEight,
            Shape::CommonTime,
            Shape::CutTime,
        ],
    );

    /// Time signature digits, one number at a time.
    pub const PARTIAL_TIMES: ShapeSet = ShapeSet::new(
        "PartialTimes",
        &[
            Shape::TimeZero,
            Shape::TimeOne,
            Shape::TimeTwo,
            Shape::TimeThree,
            Shape::TimeFour,
            Shape::TimeFive,
            Shape::TimeSix,
            Shape::TimeSeven,
            Shape::TimeEight,
            Shape::TimeNine,
            Shape::TimeTwelve,
            Shape::TimeSixteen,
        ],
    );

    pub const CLEFS: ShapeSet = ShapeSet::new(
        "Clefs",
        &[
            Shape::GClef,
            Shape::FClef,
            Shape::CClef,
            Shape::PercussionClef,
        ],
    );

    pub const ACCIDENTALS: ShapeSet = ShapeSet::new(
        "Accidentals",
        &[
            Shape::Flat,
            Shape::Natural,
            Shape::Sharp,
            Shape::DoubleSharp,
            Shape::DoubleFlat,
        ],
    );

    const ALL: [ShapeSet; 4] = [
        Self::FULL_TIMES,
        Self::PARTIAL_TIMES,
        Self::CLEFS,
        Self::ACCIDENTALS,
    ];

    pub const fn new(name: &'static str, shapes: &'static [Shape]) -> Self {
        Self { name, shapes }
    }

    /// Look up one of the predefined sets by its name.
    pub fn by_name(name: &str) -> Option<ShapeSet> {
        Self::ALL.into_iter().find(|set| set.name == name)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn shapes(&self) -> &'static [Shape] {
        self.shapes
    }

    #[inline]
    pub fn contains(&self, shape: Shape) -> bool {
        self.shapes.contains(&shape)
    }
}
