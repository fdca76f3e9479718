//! Core types for score symbol recovery.
//!
//! This crate holds the pixel geometry, the interline scale, the glyph arena
//! and the shape/evaluation vocabulary shared by the recovery engines. It does
//! *not* know about any concrete score model or classifier implementation.

mod classifier;
mod evaluation;
mod geom;
mod glyph;
mod logger;
mod pool;
mod scale;
mod shape;

pub use classifier::{classify, ClassifierError, ShapeClassifier};
pub use evaluation::{Evaluation, EvaluationSource};
pub use geom::PixelRect;
pub use glyph::{CompoundGlyph, Glyph, GlyphGeometry, GlyphId, PixelRun};
pub use pool::GlyphPool;
pub use scale::{InterlineFraction, Scale};
pub use shape::{Shape, ShapeSet};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};
