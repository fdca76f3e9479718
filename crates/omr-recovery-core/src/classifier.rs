use crate::{Evaluation, GlyphGeometry, ShapeSet};

/// Fault raised by a shape classifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("classifier failed: {0}")]
    Failed(String),
    #[error("glyph geometry not usable by the classifier ({weight} px)")]
    UnusableGeometry { weight: u64 },
}

/// Shape classifier collaborator.
///
/// Returns its best guess among `admissible` for the given glyph geometry, or
/// `None` when nothing in the set fits. Grades are in `[0, 1]`.
pub trait ShapeClassifier {
    fn evaluate(
        &self,
        glyph: &dyn GlyphGeometry,
        admissible: &ShapeSet,
    ) -> Result<Option<Evaluation>, ClassifierError>;
}

impl<F> ShapeClassifier for F
where
    F: Fn(&dyn GlyphGeometry, &ShapeSet) -> Result<Option<Evaluation>, ClassifierError>,
{
    fn evaluate(
        &self,
        glyph: &dyn GlyphGeometry,
        admissible: &ShapeSet,
    ) -> Result<Option<Evaluation>, ClassifierError> {
        self(glyph, admissible)
    }
}

/// Classify `glyph`, keeping only admissible shapes that reach `min_grade`.
pub fn classify(
    classifier: &dyn ShapeClassifier,
    glyph: &dyn GlyphGeometry,
    admissible: &ShapeSet,
    min_grade: f64,
) -> Result<Option<Evaluation>, ClassifierError> {
    let evaluation = classifier.evaluate(glyph, admissible)?;
    Ok(evaluation.filter(|e| admissible.contains(e.shape) && e.meets(min_grade)))
}
