//! Bit cell navigation
//!
//! A bit cell begins just after a falling edge of the
//! master clock:
//!
//! ```txt
//!            cell n-1        cell n          cell n+1
//!         |<---------->|<------------>|<-------------
//!  Z1  ---+      +-----+       +------+       +------
//!         +------+     +-------+      +-------+
//!                      ^
//!                      start of cell n
//! ```
//!
//! The [`Cursor`] walks forward and backward over a fully
//! digitized capture by sample index. Every seek reports
//! [`EndOfData`] if it would leave the capture.

use crate::sample::DigitalSample;

/// A seek ran past either end of the capture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EndOfData;

/// Result of a seek: a sample index
pub type Seek = Result<usize, EndOfData>;

/// Random-access reader over digitized samples
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'s> {
    samples: &'s [DigitalSample],
}

impl<'s> Cursor<'s> {
    /// Read `samples`
    pub fn new(samples: &'s [DigitalSample]) -> Self {
        Self { samples }
    }

    /// Sample at `posn`
    #[inline]
    pub fn get(&self, posn: usize) -> Result<&'s DigitalSample, EndOfData> {
        self.samples.get(posn).ok_or(EndOfData)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Find the first trustworthy sector pulse
    ///
    /// Counts runs of T39 from the start of the capture and
    /// returns the index where run number `skip + 1` begins.
    /// If there are not that many runs, returns the number
    /// of runs that were found as the error.
    pub fn find_sync(&self, skip: usize) -> Result<usize, usize> {
        let mut count = 0;
        let mut posn = 0;
        while posn < self.samples.len() {
            if self.samples[posn].t39 {
                count += 1;
                if count > skip {
                    return Ok(posn);
                }
                while posn + 1 < self.samples.len() && self.samples[posn + 1].t39 {
                    posn += 1;
                }
            }
            posn += 1;
        }
        Err(count)
    }

    /// Find the next sector pulse
    ///
    /// `posn` must be on the current pulse. Skips the rest
    /// of it, then the gap which follows, and returns the
    /// start of the next pulse.
    pub fn next_sync(&self, mut posn: usize) -> Seek {
        while self.get(posn)?.t39 {
            posn += 1;
        }
        while !self.get(posn)?.t39 {
            posn += 1;
        }
        Ok(posn)
    }

    /// Start of the previous bit cell
    ///
    /// `posn` must be at the start of a bit cell. Walks back
    /// over the high half of the previous cell's clock, then
    /// its low half, and returns the first sample of the
    /// previous cell.
    pub fn prev_bit(&self, posn: usize) -> Seek {
        let mut posn = posn.checked_sub(1).ok_or(EndOfData)?;
        while self.get(posn)?.z1 {
            posn = posn.checked_sub(1).ok_or(EndOfData)?;
        }
        while !self.get(posn)?.z1 {
            posn = posn.checked_sub(1).ok_or(EndOfData)?;
        }
        Ok(posn + 1)
    }

    /// Start of the next bit cell
    ///
    /// Walks forward over the low half of the clock, then
    /// the high half, and returns the first sample after the
    /// falling edge.
    pub fn next_bit(&self, mut posn: usize) -> Seek {
        while !self.get(posn)?.z1 {
            posn += 1;
        }
        while self.get(posn)?.z1 {
            posn += 1;
        }
        Ok(posn)
    }
}
