use omr_recovery_compound::{RecoveryAdapter, TopShapePolicy};
use omr_recovery_core::{Evaluation, EvaluationSource, Glyph, PixelRect, ShapeSet};

use crate::score::{Staff, StaffId};
use crate::ScoreError;

/// Box where a full time signature of `width` pixels is expected on `staff`,
/// horizontally centered on `center`.
///
/// Vertically it spans the staff height minus `y_offset` at top and bottom.
pub fn time_sig_reference_box(
    staff: &Staff,
    center: i32,
    width: i32,
    y_offset: i32,
) -> Result<PixelRect, ScoreError> {
    let mid_y = staff.first_line_y_at(center)? + staff.height / 2;
    Ok(PixelRect::from_center(
        center,
        mid_y,
        width / 2,
        staff.height / 2 - y_offset,
    ))
}

/// Looks for a full time signature on one staff.
#[derive(Clone, Debug)]
pub struct TimeSigAdapter {
    staff: StaffId,
    reference: PixelRect,
    policy: TopShapePolicy,
}

impl TimeSigAdapter {
    pub fn new(staff: StaffId, reference: PixelRect, min_grade: f64) -> Self {
        Self {
            staff,
            reference,
            policy: TopShapePolicy::new(ShapeSet::FULL_TIMES, min_grade),
        }
    }

    pub fn staff(&self) -> StaffId {
        self.staff
    }
}

impl RecoveryAdapter for TimeSigAdapter {
    fn reference_box(&self) -> PixelRect {
        self.reference
    }

    fn is_candidate_suitable(&self, glyph: &Glyph) -> bool {
        !glyph.is_manual_shape()
    }

    fn admissible_shapes(&self) -> &ShapeSet {
        &self.policy.shapes
    }

    fn minimum_grade(&self) -> f64 {
        self.policy.min_grade
    }

    fn chosen_evaluation(&self, raw: Evaluation) -> Evaluation {
        raw.with_source(EvaluationSource::Algorithm)
    }
}
