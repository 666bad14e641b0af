/// Volume override for replacement clips
///
/// Percentages map onto a decibel gain rather than a linear amplitude:
/// `gain_db = percent / 2 - 45`, so 100% is +5 dB and 0% is -45 dB.

/// Volume percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Volume {
    percent: u8,
}

impl Volume {
    /// Default custom volume for both categories
    pub const DEFAULT_PERCENT: u8 = 65;

    /// Create a volume, clamping to 0-100
    pub fn new(percent: i64) -> Self {
        Self {
            percent: percent.clamp(0, 100) as u8,
        }
    }

    /// Get the percentage
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Gain in decibels
    pub fn gain_db(&self) -> f32 {
        self.percent as f32 / 2.0 - 45.0
    }

    /// Linear amplitude multiplier for the output sink
    pub fn amplitude(&self) -> f32 {
        10f32.powf(self.gain_db() / 20.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            percent: Self::DEFAULT_PERCENT,
        }
    }
}
