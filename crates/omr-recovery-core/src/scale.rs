use serde::{Deserialize, Serialize};

/// A distance expressed as a multiple of the staff interline.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterlineFraction(pub f64);

impl InterlineFraction {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Page-level scale: the measured interline, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    interline: u32,
}

impl Scale {
    pub const fn new(interline: u32) -> Self {
        Self { interline }
    }

    /// Interline in pixels.
    #[inline]
    pub fn interline(&self) -> u32 {
        self.interline
    }

    /// Convert an interline fraction into a pixel distance, rounded to nearest.
    #[inline]
    pub fn to_pixels(&self, fraction: InterlineFraction) -> i32 {
        self.to_pixels_f64(fraction).round() as i32
    }

    #[inline]
    pub fn to_pixels_f64(&self, fraction: InterlineFraction) -> f64 {
        fraction.0 * self.interline as f64
    }
}
