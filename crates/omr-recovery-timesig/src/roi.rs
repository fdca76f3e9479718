use log::debug;
use omr_recovery_core::PixelRect;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::score::ScoreSystem;
use crate::ScoreError;

/// Horizontal band `[left, right)` where a missing symbol may sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub left: i32,
    pub right: i32,
}

impl Roi {
    /// May be zero or negative when landmarks overlap.
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn center(&self) -> i32 {
        self.left + self.width() / 2
    }

    /// Degenerate rectangle carrying the bounds only.
    pub fn as_rect(&self) -> PixelRect {
        PixelRect::horizontal_band(self.left, self.right)
    }
}

/// Free space at the start of the measure at `measure_index`, shared by all
/// staves of the system.
///
/// Starts from `[0, system right)` and, staff after staff, moves the left
/// bound past the key signature (or the clef when there is no key) and the
/// right bound before the closest chord's notes or their accidentals, and
/// before the ending barline. Bounds are not reset between staves.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(system), fields(system = system.id))
)]
pub fn compute_roi(system: &ScoreSystem, measure_index: usize) -> Result<Roi, ScoreError> {
    let mut left = 0;
    let mut right = system.right();

    for slot in system.slot_staves(measure_index)? {
        if slot.dummy {
            continue;
        }
        let measure = system.measure(&slot)?;

        if let Some(key) = measure.first_measure_key(slot.staff) {
            left = left.max(key.bounds.right());
        } else if let Some(clef) = measure.first_measure_clef(slot.staff) {
            left = left.max(clef.bounds.right());
        }

        if let Some(chord) = measure.closest_chord(slot.staff, 0) {
            for note in &chord.notes {
                let x = note.accidental.map_or(note.bounds.x, |acc| acc.x);
                right = right.min(x);
            }
        }

        if let Some(x) = measure.right_x {
            right = right.min(x);
        }

        debug!("Staff:{} left:{} right:{}", slot.staff, left, right);
    }

    Ok(Roi { left, right })
}
