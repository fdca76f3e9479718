use omr_recovery_compound::CompoundError;
use omr_recovery_core::Shape;

use crate::score::StaffId;

/// Inconsistencies met while reading or updating the score model.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("page has no system")]
    NoSystem,
    #[error("system {system} has no real part")]
    NoRealPart { system: u32 },
    #[error("part {part} has no measure")]
    NoMeasure { part: u32 },
    #[error("part {part} has no measure at index {index}")]
    MissingMeasure { part: u32, index: usize },
    #[error("staff {staff} not found in its part")]
    UnknownStaff { staff: StaffId },
    #[error("first line of staff {staff} is degenerate")]
    DegenerateStaffLine { staff: StaffId },
    #[error("compound glyph carries no evaluation")]
    UnevaluatedCompound,
    #[error("shape {shape} is not a full time signature")]
    NotAFullTime { shape: Shape },
}

/// Faults that abort the recovery pass of one page.
#[derive(thiserror::Error, Debug)]
pub enum RecoveryError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Compound(#[from] CompoundError),
}

/// Errors reading or writing JSON configuration and reports.
#[derive(thiserror::Error, Debug)]
pub enum RecoveryIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
