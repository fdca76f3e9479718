//! Recovery of a missing initial time signature.
//!
//! When recognition left the first measure of a page without a time
//! signature, [`TimeSignatureRetriever`] looks for one in the free band between
//! the clef/key area and the first notes. On each staff it aggregates nearby
//! glyphs into compounds and keeps the one a [`ShapeClassifier`] recognizes as
//! a full time signature (4/4, 3/4, common time, ...) with enough confidence.
//!
//! ```no_run
//! use omr_recovery_core::{ClassifierError, Evaluation, GlyphGeometry, ShapeSet};
//! use omr_recovery_timesig::{Page, TimeSignatureRetriever};
//! # fn load_page() -> Page { unimplemented!() }
//!
//! fn classifier(
//!     _glyph: &dyn GlyphGeometry,
//!     _admissible: &ShapeSet,
//! ) -> Result<Option<Evaluation>, ClassifierError> {
//!     Ok(None)
//! }
//!
//! let mut page = load_page();
//! let outcome = TimeSignatureRetriever::default().recover_page(&mut page, &classifier);
//! println!("{outcome:?}");
//! ```
//!
//! [`ShapeClassifier`]: omr_recovery_core::ShapeClassifier

mod adapter;
mod error;
mod io;
mod outcome;
mod params;
mod retriever;
mod roi;
mod score;

pub use adapter::{time_sig_reference_box, TimeSigAdapter};
pub use error::{RecoveryError, RecoveryIoError, ScoreError};
pub use io::{PageReport, RecoveryConfig, RecoveryReport};
pub use outcome::{PageOutcome, StaffOutcome, StaffResult};
pub use params::TimeSigParams;
pub use retriever::TimeSignatureRetriever;
pub use roi::{compute_roi, Roi};
pub use score::{
    Barline, Chord, Clef, KeySignature, Measure, Note, Page, ScoreSystem, SlotStaff, Staff,
    StaffId, StaffLine, SystemPart, TimeRational, TimeSignature,
};
