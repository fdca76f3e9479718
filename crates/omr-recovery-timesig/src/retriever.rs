use log::{debug, info, warn};
use omr_recovery_compound::{CompoundBuilder, RecoveryAdapter};
use omr_recovery_core::{GlyphGeometry, ShapeClassifier};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::adapter::{time_sig_reference_box, TimeSigAdapter};
use crate::outcome::{PageOutcome, StaffOutcome, StaffResult};
use crate::roi::{compute_roi, Roi};
use crate::score::{Page, ScoreSystem, SlotStaff, TimeRational};
use crate::{RecoveryError, ScoreError, TimeSigParams};

/// Index of the measure inspected on the first system.
const FIRST_MEASURE: usize = 0;

/// Recovers the initial time signature of a page when recognition missed it.
///
/// Only the first measure of the first system is considered. Each real staff
/// of that measure is searched for a compound recognized as a full time
/// signature, inside the free band left by clefs, keys and notes.
#[derive(Clone, Debug, Default)]
pub struct TimeSignatureRetriever {
    params: TimeSigParams,
    builder: CompoundBuilder,
}

enum Progress {
    Done(PageOutcome),
    Failed(RecoveryError, Vec<StaffOutcome>),
}

impl TimeSignatureRetriever {
    pub fn new(params: TimeSigParams) -> Self {
        let builder = CompoundBuilder::new(params.compound.clone());
        Self { params, builder }
    }

    #[inline]
    pub fn params(&self) -> &TimeSigParams {
        &self.params
    }

    /// Run the pass on `page`.
    ///
    /// Never fails: faults are logged and reported as
    /// [`PageOutcome::UnexpectedFailure`], keeping whatever was inserted
    /// before the fault.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(page = page.id))
    )]
    pub fn recover_page(&self, page: &mut Page, classifier: &dyn ShapeClassifier) -> PageOutcome {
        match self.process(page, classifier) {
            Progress::Done(outcome) => outcome,
            Progress::Failed(err, staves) => {
                warn!("Page#{} error retrieving time signature: {}", page.id, err);
                PageOutcome::UnexpectedFailure {
                    cause: err.to_string(),
                    staves,
                }
            }
        }
    }

    fn process(&self, page: &mut Page, classifier: &dyn ShapeClassifier) -> Progress {
        let scale = page.scale;
        let Some(system) = page.first_system_mut() else {
            return Progress::Failed(ScoreError::NoSystem.into(), Vec::new());
        };

        let roi = match Self::check_and_locate(system) {
            Ok(Some(roi)) => roi,
            Ok(None) => return Progress::Done(PageOutcome::Satisfied),
            Err(err) => return Progress::Failed(err.into(), Vec::new()),
        };

        let required = scale.to_pixels(self.params.time_sig_width);
        if roi.width() < required {
            debug!("roi {:?} too narrow, {} required", roi, required);
            return Progress::Done(PageOutcome::InsufficientSpace { roi, required });
        }

        let y_offset = scale.to_pixels(self.params.y_offset);
        let slots = match system.slot_staves(FIRST_MEASURE) {
            Ok(slots) => slots,
            Err(err) => return Progress::Failed(err.into(), Vec::new()),
        };

        let mut staves = Vec::new();
        for slot in slots.iter().filter(|s| !s.dummy) {
            match self.process_staff(system, slot, &roi, required, y_offset, classifier) {
                Ok(result) => staves.push(StaffOutcome {
                    staff: slot.staff,
                    result,
                }),
                Err(err) => return Progress::Failed(err, staves),
            }
        }

        Progress::Done(PageOutcome::Processed { roi, staves })
    }

    /// `Ok(None)` when a time signature is already there.
    fn check_and_locate(system: &ScoreSystem) -> Result<Option<Roi>, ScoreError> {
        let (_, part) = system
            .first_real_part()
            .ok_or(ScoreError::NoRealPart { system: system.id })?;
        if part.measures.is_empty() {
            return Err(ScoreError::NoMeasure { part: part.id });
        }
        if let Some(ts) = system.time_signature_in_slot(FIRST_MEASURE)? {
            debug!("staff {} already has {}", ts.staff, ts.shape);
            return Ok(None);
        }
        compute_roi(system, FIRST_MEASURE).map(Some)
    }

    fn process_staff(
        &self,
        system: &mut ScoreSystem,
        slot: &SlotStaff,
        roi: &Roi,
        width: i32,
        y_offset: i32,
        classifier: &dyn ShapeClassifier,
    ) -> Result<StaffResult, RecoveryError> {
        let staff = system.staff(slot)?;
        let reference = time_sig_reference_box(staff, roi.center(), width, y_offset)?;
        let adapter = TimeSigAdapter::new(slot.staff, reference, self.params.min_grade);

        if self.params.attach_debug_boxes {
            attach_debug_box(system, &adapter);
        }

        let Some(compound) = self
            .builder
            .build_compound(system.glyphs(), &adapter, classifier)?
        else {
            debug!("staff {}: no time signature found", slot.staff);
            return Ok(StaffResult::NoQualifyingCandidate);
        };

        let Some(evaluation) = compound.evaluation().copied() else {
            return Err(ScoreError::UnevaluatedCompound.into());
        };
        let bounds = compound.bounds();
        let rational = TimeRational::from_full_shape(evaluation.shape)
            .ok_or(ScoreError::NotAFullTime {
                shape: evaluation.shape,
            })?;

        match system.populate_full_time(compound, slot)? {
            Some(glyph) => {
                info!(
                    "staff {}: recovered {} ({:.3}) at {:?}",
                    slot.staff, evaluation.shape, evaluation.grade, bounds
                );
                Ok(StaffResult::Recovered {
                    glyph,
                    shape: evaluation.shape,
                    grade: evaluation.grade,
                    rational,
                })
            }
            None => Ok(StaffResult::SlotOccupied),
        }
    }
}

/// Attach the staff's reference box to the line glyph of the starting
/// barline of the part facing it, when there is one.
fn attach_debug_box(system: &mut ScoreSystem, adapter: &TimeSigAdapter) {
    let reference = adapter.reference_box();
    let glyph = system
        .part_at(reference.center().y)
        .and_then(|p| p.starting_barline.as_ref())
        .and_then(|b| b.line_glyph(system.glyphs()));
    if let Some(id) = glyph {
        system
            .glyphs
            .attach(id, format!("ti{}", adapter.staff()), reference);
    }
}
