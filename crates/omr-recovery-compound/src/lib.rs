//! Compound glyph synthesis.
//!
//! Given a glyph pool and a [`RecoveryAdapter`] describing one recognition
//! task, the [`CompoundBuilder`]:
//! - gathers the suitable glyphs around the adapter's reference box,
//! - enumerates connected aggregates of them, smallest first,
//! - classifies each merged aggregate against the admissible shapes,
//! - returns the best aggregate that clears the minimum grade.
//!
//! The pool is only read. Committing the winner is up to the caller.

mod adapter;
mod builder;
mod error;
mod params;
mod subsets;

pub use adapter::{RecoveryAdapter, TopShapePolicy};
pub use builder::CompoundBuilder;
pub use error::CompoundError;
pub use params::CompoundParams;
