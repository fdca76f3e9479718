use omr_recovery_compound::CompoundParams;
use omr_recovery_core::InterlineFraction;
use serde::{Deserialize, Serialize};

/// Tuning of the time-signature recovery pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSigParams {
    /// Typical width of a full time signature.
    pub time_sig_width: InterlineFraction,
    /// Vertical margin trimmed from the staff height, top and bottom.
    pub y_offset: InterlineFraction,
    /// Grades below this are rejected.
    pub min_grade: f64,
    /// Attach the reference box of each staff to the starting barline glyph.
    pub attach_debug_boxes: bool,
    pub compound: CompoundParams,
}

impl Default for TimeSigParams {
    fn default() -> Self {
        Self {
            time_sig_width: InterlineFraction::new(2.0),
            y_offset: InterlineFraction::new(0.5),
            min_grade: 0.80,
            attach_debug_boxes: false,
            compound: CompoundParams::default(),
        }
    }
}
