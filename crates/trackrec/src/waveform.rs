//! Track geometry
//!
//! A drum has 32 tracks of 128 sectors. Each sector holds
//! one 40-bit word. The sector number of each word is
//! recorded on the Z3 timing track, just ahead of the T39
//! pulse which opens the sector.

/// Number of tracks
pub const TRACK_COUNT: u8 = 32;

/// Sectors in each track
pub const SECTORS_PER_TRACK: u16 = 128;

/// Bits in a sector number, as read from Z3
pub const SECTOR_BITS: u32 = 7;

/// Bits in a data word
pub const WORD_BITS: u32 = 40;

/// Mask for a data word
pub const WORD_MASK: u64 = (1u64 << WORD_BITS) - 1;

/// Logic-high voltage used by synthetic captures
#[cfg(test)]
pub const SYNTH_HIGH_VOLTS: f64 = 5.0;

/// Logic-low voltage used by synthetic captures
#[cfg(test)]
pub const SYNTH_LOW_VOLTS: f64 = 0.0;

/// Timing of a synthetic capture
///
/// This struct is designed for use in tests. Every bit cell
/// is `cell_samples` long. The master clock is low for the
/// first `clock_low_samples` of the cell and high for the
/// rest, so every cell begins on a falling edge of Z1.
///
/// Within each frame of `frame_cells` cells:
///
/// ```txt
///  cell:  sync-6 … sync   sync+1   sync+2 … sync+41
///  Z3:    sector bit 0…6
///  T39:          [ sync ]
///  Track:                          word bit 0 … 39
///  Z2:    high on cells sync-3 and sync-1
/// ```
#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthLayout {
    pub cell_samples: usize,
    pub clock_low_samples: usize,
    pub frame_cells: usize,
    pub sync_cell: usize,
}

#[cfg(test)]
impl Default for SynthLayout {
    fn default() -> Self {
        Self {
            cell_samples: 10,
            clock_low_samples: 5,
            frame_cells: 56,
            sync_cell: 8,
        }
    }
}

#[cfg(test)]
impl SynthLayout {
    /// Sample index of the start of `cell` in `frame`
    pub fn cell_start(&self, frame: usize, cell: usize) -> usize {
        (frame * self.frame_cells + cell) * self.cell_samples
    }

    /// Sample index where the T39 pulse of `frame` rises
    pub fn sync_position(&self, frame: usize) -> usize {
        self.cell_start(frame, self.sync_cell)
    }

    /// Samples in `frames` whole frames
    pub fn frame_samples(&self, frames: usize) -> usize {
        frames * self.frame_cells * self.cell_samples
    }

    // channel levels for one cell, as (z2, z3, track, t39)
    fn cell_levels(&self, frames: &[SynthFrame], cell: usize) -> (bool, bool, bool, bool) {
        let frame = match frames.get(cell / self.frame_cells) {
            Some(frame) => frame,
            None => return (false, false, false, false),
        };
        let cell = cell % self.frame_cells;
        let sync = self.sync_cell;

        let z2 = cell + 3 == sync || cell + 1 == sync;
        let z3 = match (cell + SECTOR_BITS as usize - 1).checked_sub(sync) {
            Some(bit) if cell <= sync => (frame.sector >> bit) & 0x01 == 1,
            _ => false,
        };
        let track = match cell.checked_sub(sync + 2) {
            Some(bit) if bit < WORD_BITS as usize => (frame.word >> bit) & 0x01 == 1,
            _ => false,
        };
        (z2, z3, track, cell == sync)
    }
}

/// Contents of one synthetic sector frame
#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthFrame {
    pub sector: u8,
    pub word: u64,
}

#[cfg(test)]
impl SynthFrame {
    pub fn new(sector: u8, word: u64) -> Self {
        Self {
            sector: sector & 0x7f,
            word: word & WORD_MASK,
        }
    }
}

/// Synthesize an analog capture
///
/// This method is designed for use in tests. Produces
/// analog samples which digitize to the given `frames`,
/// followed by `trailing_cells` empty bit cells. The data
/// track is shifted one sample early to match the latch
/// delay of [`SampleRateMode::Rate100k`](crate::SampleRateMode).
#[cfg(test)]
pub fn synthesize_capture(
    layout: &SynthLayout,
    frames: &[SynthFrame],
    trailing_cells: usize,
) -> Vec<crate::AnalogSample> {
    let volts = |level: bool| {
        if level {
            SYNTH_HIGH_VOLTS
        } else {
            SYNTH_LOW_VOLTS
        }
    };

    let len = layout.frame_samples(frames.len()) + trailing_cells * layout.cell_samples;
    (0..len)
        .map(|i| {
            let cell = i / layout.cell_samples;
            let z1 = i % layout.cell_samples >= layout.clock_low_samples;
            let (z2, z3, _, _) = layout.cell_levels(frames, cell);
            let (_, _, track, _) = layout.cell_levels(frames, (i + 1) / layout.cell_samples);
            // the data track is inverted
            crate::AnalogSample::new(volts(z1), volts(z2), volts(z3), volts(!track))
        })
        .collect()
}

/// Synthesize a digitized capture
///
/// This method is designed for use in tests. Produces the
/// digital samples which a
/// [`Digitizer`](crate::Digitizer) would output for the
/// given `frames`, without going through analog samples.
#[cfg(test)]
pub fn synthesize_digital(
    layout: &SynthLayout,
    frames: &[SynthFrame],
    trailing_cells: usize,
) -> Vec<crate::DigitalSample> {
    let len = layout.frame_samples(frames.len()) + trailing_cells * layout.cell_samples;
    (0..len)
        .map(|i| {
            let cell = i / layout.cell_samples;
            let (_, z3, track, t39) = layout.cell_levels(frames, cell);
            crate::DigitalSample {
                z1: i % layout.cell_samples >= layout.clock_low_samples,
                z3,
                track,
                t39,
                t4: t39,
                ..Default::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_mask() {
        assert_eq!(0xff_ffff_ffff, WORD_MASK);
        assert_eq!(
            4096,
            TRACK_COUNT as u32 * SECTORS_PER_TRACK as u32
        );
    }

    #[test]
    fn test_cell_levels() {
        let layout = SynthLayout::default();
        let frames = [SynthFrame::new(0b1000001, 0b101)];

        // sector bits, least significant first, end on the sync cell
        let z3: Vec<bool> = (2..=8).map(|c| layout.cell_levels(&frames, c).1).collect();
        assert_eq!(z3, vec![true, false, false, false, false, false, true]);
        assert!(!layout.cell_levels(&frames, 1).1);
        assert!(!layout.cell_levels(&frames, 9).1);

        let track: Vec<bool> = (9..14).map(|c| layout.cell_levels(&frames, c).2).collect();
        assert_eq!(track, vec![false, true, false, true, false]);

        let t39: Vec<usize> = (0..56)
            .filter(|c| layout.cell_levels(&frames, *c).3)
            .collect();
        assert_eq!(t39, vec![8]);

        let z2: Vec<usize> = (0..56)
            .filter(|c| layout.cell_levels(&frames, *c).0)
            .collect();
        assert_eq!(z2, vec![5, 7]);

        // past the last frame, everything is low
        assert_eq!(
            (false, false, false, false),
            layout.cell_levels(&frames, 60)
        );
    }

    #[test]
    fn test_synthesize_lengths() {
        let layout = SynthLayout::default();
        let frames = [SynthFrame::new(1, 1), SynthFrame::new(2, 2)];
        assert_eq!(
            2 * 560 + 30,
            synthesize_capture(&layout, &frames, 3).len()
        );
        assert_eq!(2 * 560, synthesize_digital(&layout, &frames, 0).len());
        assert_eq!(560 + 80, layout.sync_position(1));
    }
}
