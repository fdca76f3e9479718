//! High-level facade crate for the `omr-recovery-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the underlying crates
//! - [`recover_pages`], which runs the time-signature pass over a whole score
//!   one page at a time
//!
//! ## Quickstart
//!
//! ```no_run
//! use omr_recovery::core::{ClassifierError, Evaluation, GlyphGeometry, ShapeSet};
//! use omr_recovery::{recover_with_config, Page, RecoveryConfig};
//!
//! # fn load_pages() -> Vec<Page> { Vec::new() }
//! fn classifier(
//!     _glyph: &dyn GlyphGeometry,
//!     _admissible: &ShapeSet,
//! ) -> Result<Option<Evaluation>, ClassifierError> {
//!     Ok(None)
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RecoveryConfig::load_json("recovery.json")?;
//! let mut pages = load_pages();
//! let report = recover_with_config(&mut pages, &config, &classifier);
//! report.write_json("report.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `omr_recovery::core`: geometry, scale, shapes, glyph pool, classifier seam.
//! - `omr_recovery::compound`: compound glyph synthesis driven by an adapter.
//! - `omr_recovery::timesig`: score model slice and the time-signature pass.

pub use omr_recovery_compound as compound;
pub use omr_recovery_core as core;
pub use omr_recovery_timesig as timesig;

pub use omr_recovery_core::{init_from_env, init_with_level, ShapeClassifier};
pub use omr_recovery_timesig::{
    Page, PageOutcome, RecoveryConfig, RecoveryReport, TimeSigParams, TimeSignatureRetriever,
};

use log::info;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Run `retriever` on every page, in order.
///
/// Pages are independent: a failure on one is reported in its outcome and
/// does not keep the following pages from being processed.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(pages = pages.len()))
)]
pub fn recover_pages(
    pages: &mut [Page],
    retriever: &TimeSignatureRetriever,
    classifier: &dyn ShapeClassifier,
) -> Vec<PageOutcome> {
    let outcomes: Vec<_> = pages
        .iter_mut()
        .map(|page| retriever.recover_page(page, classifier))
        .collect();
    let recovered: usize = outcomes.iter().map(PageOutcome::recovered_count).sum();
    info!(
        "{} page(s) processed, {} time signature(s) recovered",
        outcomes.len(),
        recovered
    );
    outcomes
}

/// [`recover_pages`] with a retriever built from `config`, collecting the
/// outcomes into a report keyed by page id.
pub fn recover_with_config(
    pages: &mut [Page],
    config: &RecoveryConfig,
    classifier: &dyn ShapeClassifier,
) -> RecoveryReport {
    let retriever = config.build_retriever();
    let outcomes = recover_pages(pages, &retriever, classifier);
    let mut report = RecoveryReport::default();
    for (page, outcome) in pages.iter().zip(outcomes) {
        report.push(page.id, outcome);
    }
    report
}
