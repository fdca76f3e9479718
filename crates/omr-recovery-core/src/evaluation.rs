use serde::{Deserialize, Serialize};

use crate::Shape;

/// Who produced an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationSource {
    /// Trained shape classifier.
    Classifier,
    /// Recovery or other rule-based logic.
    Algorithm,
    /// Confirmed by a user; automated steps must leave it alone.
    Manual,
}

/// A shape guess with its confidence grade in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub shape: Shape,
    pub grade: f64,
    pub source: EvaluationSource,
}

impl Evaluation {
    pub fn new(shape: Shape, grade: f64, source: EvaluationSource) -> Self {
        Self {
            shape,
            grade: grade.clamp(0.0, 1.0),
            source,
        }
    }

    /// Manual assignments are certain by definition.
    pub fn manual(shape: Shape) -> Self {
        Self::new(shape, 1.0, EvaluationSource::Manual)
    }

    /// Same shape and grade, attributed to `source`.
    pub fn with_source(self, source: EvaluationSource) -> Self {
        Self { source, ..self }
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        self.source == EvaluationSource::Manual
    }

    /// Whether the grade clears `min_grade`. Equality counts as a match.
    #[inline]
    pub fn meets(&self, min_grade: f64) -> bool {
        self.grade >= min_grade
    }
}
