//! Hysteresis slicer
//!
//! Converts a voltage into a logic level. Each channel has a
//! low and a high cut-off:
//!
//! ```txt
//!   volts
//!    /\
//!     |   ........ high  → forced to 1 above this
//!     |   (hold)
//!     |   ........ low   → forced to 0 at or below this
//!     |
//! ```
//!
//! Inside the band, the slicer holds its previous decision.
//! A channel whose low and high cut-offs are equal has no
//! band at all.

/// Hysteresis slicer for one channel
#[derive(Clone, Debug)]
pub struct Slicer {
    // at or below this → low decision
    low: f64,

    // strictly above this → high decision
    high: f64,

    // if true, the low voltage is logical 1
    inverted: bool,

    // last decision, in logical sense
    state: bool,
}

impl Slicer {
    /// New slicer with a hysteresis band
    ///
    /// The `high` cut-off is raised to `low` if necessary.
    /// The initial decision is logical 0.
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high: f64::max(low, high),
            inverted: false,
            state: false,
        }
    }

    /// New slicer with a single cut-off and no band
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self::new(cutoff, cutoff)
    }

    /// Invert the logical sense
    ///
    /// An inverted slicer reports logical 1 for voltages at or
    /// below the low cut-off.
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Reset to zero initial conditions
    pub fn reset(&mut self) {
        self.state = false;
    }

    /// Classify one voltage
    ///
    /// Returns the new logical level.
    #[inline]
    pub fn input(&mut self, volts: f64) -> bool {
        if volts <= self.low {
            self.state = self.inverted;
        } else if volts > self.high {
            self.state = !self.inverted;
        }
        self.state
    }

    /// Last decision
    pub fn state(&self) -> bool {
        self.state
    }

    /// Cut-offs, as `(low, high)`
    pub fn cutoffs(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slicer_band() {
        let mut uut = Slicer::new(1.9, 2.0);
        assert!(!uut.input(1.95));
        assert!(!uut.input(2.0));
        assert!(uut.input(2.01));

        // oscillation inside the band never flips the decision
        for v in [1.91, 1.99, 2.0, 1.95, 1.9001] {
            assert!(uut.input(v));
        }

        assert!(!uut.input(1.9));
        for v in [1.91, 1.99, 2.0, 1.95] {
            assert!(!uut.input(v));
        }
    }

    #[test]
    fn test_slicer_inverted() {
        let mut uut = Slicer::with_cutoff(1.0).inverted();
        assert!(!uut.state());
        assert!(uut.input(1.0));
        assert!(uut.input(-0.5));
        assert!(!uut.input(1.0001));
        assert!(!uut.input(4.0));
        assert!(uut.input(0.2));

        uut.reset();
        assert!(!uut.state());
    }

    #[test]
    fn test_slicer_cutoffs() {
        let uut = Slicer::new(2.0, 1.0);
        assert_eq!((2.0, 2.0), uut.cutoffs());
    }
}
