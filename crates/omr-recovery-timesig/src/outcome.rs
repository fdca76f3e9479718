use omr_recovery_core::{GlyphId, Shape};
use serde::{Deserialize, Serialize};

use crate::roi::Roi;
use crate::score::{StaffId, TimeRational};

/// What the pass did on one staff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaffResult {
    Recovered {
        glyph: GlyphId,
        shape: Shape,
        grade: f64,
        rational: TimeRational,
    },
    NoQualifyingCandidate,
    /// Another path already filled the staff's slot.
    SlotOccupied,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffOutcome {
    pub staff: StaffId,
    pub result: StaffResult,
}

/// What the pass did on one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageOutcome {
    /// The first measure already has a time signature.
    Satisfied,
    /// The free band is narrower than a time signature.
    InsufficientSpace { roi: Roi, required: i32 },
    Processed {
        roi: Roi,
        staves: Vec<StaffOutcome>,
    },
    /// The pass stopped on a fault. Staves listed were handled before it.
    UnexpectedFailure {
        cause: String,
        staves: Vec<StaffOutcome>,
    },
}

impl PageOutcome {
    pub fn staves(&self) -> &[StaffOutcome] {
        match self {
            Self::Processed { staves, .. } | Self::UnexpectedFailure { staves, .. } => staves,
            Self::Satisfied | Self::InsufficientSpace { .. } => &[],
        }
    }

    /// Number of staves that received a new time signature.
    pub fn recovered_count(&self) -> usize {
        self.staves()
            .iter()
            .filter(|s| matches!(s.result, StaffResult::Recovered { .. }))
            .count()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::UnexpectedFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_recovered_staves() {
        let outcome = PageOutcome::Processed {
            roi: Roi {
                left: 200,
                right: 360,
            },
            staves: vec![
                StaffOutcome {
                    staff: 1,
                    result: StaffResult::Recovered {
                        glyph: GlyphId(2),
                        shape: Shape::TimeFourFour,
                        grade: 0.9,
                        rational: TimeRational::new(4, 4),
                    },
                },
                StaffOutcome {
                    staff: 2,
                    result: StaffResult::NoQualifyingCandidate,
                },
            ],
        };
        assert_eq!(outcome.recovered_count(), 1);
        assert_eq!(PageOutcome::Satisfied.recovered_count(), 0);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(PageOutcome::InsufficientSpace {
            roi: Roi {
                left: 200,
                right: 230,
            },
            required: 60,
        })
        .unwrap();
        assert_eq!(json["kind"], "insufficient_space");
        assert_eq!(json["required"], 60);
    }
}
