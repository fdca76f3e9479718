use omr_recovery_core::{Evaluation, Glyph, PixelRect, ShapeSet};

/// Per-task policy driving a compound search.
pub trait RecoveryAdapter {
    /// Region around which candidates are gathered and compounds are judged.
    fn reference_box(&self) -> PixelRect;

    /// Whether `glyph` may take part in a compound.
    fn is_candidate_suitable(&self, glyph: &Glyph) -> bool;

    /// Shapes a compound may be recognized as.
    fn admissible_shapes(&self) -> &ShapeSet;

    /// Grades below this are no match at all.
    fn minimum_grade(&self) -> f64;

    /// Final form of the evaluation retained for the winning compound.
    fn chosen_evaluation(&self, raw: Evaluation) -> Evaluation {
        raw
    }
}

/// Acceptance policy of adapters looking for the top shape of a set.
///
/// Adapters hold one of these and forward `admissible_shapes` and
/// `minimum_grade` to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopShapePolicy {
    pub shapes: ShapeSet,
    pub min_grade: f64,
}

impl TopShapePolicy {
    pub fn new(shapes: ShapeSet, min_grade: f64) -> Self {
        Self { shapes, min_grade }
    }

    /// Whether an evaluation satisfies this policy.
    pub fn accepts(&self, evaluation: &Evaluation) -> bool {
        self.shapes.contains(evaluation.shape) && evaluation.meets(self.min_grade)
    }
}
