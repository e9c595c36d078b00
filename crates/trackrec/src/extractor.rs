//! Digital logic levels → sector words
//!
//! The [`Extractor`] walks a digitized capture one sector
//! frame at a time. Each frame is anchored on the rising edge
//! of a T39 sector pulse:
//!
//! * The sector number is recorded on Z3 in the seven bit
//!   cells which end with the sync cell. It is read
//!   backwards from the sync cell, most significant bit
//!   first.
//!
//! * The data word follows on the data track. After
//!   the cell that follows the sync cell come forty cells,
//!   least significant bit first.
//!
//! Every bit is sampled a few samples past the start of its
//! cell. A frame which runs off either end of the capture is
//! discarded. Decoding stops when no further sector pulse
//! begins before the end of the capture.

use thiserror::Error;

#[cfg(not(test))]
use log::info;

#[cfg(test)]
use std::println as info;

use crate::builder::ExtractorBuilder;
use crate::sample::DigitalSample;
use crate::sector::{SectorAddress, SectorWord, TrackNumber};
use crate::waveform::{SECTOR_BITS, WORD_BITS};

mod cursor;
mod report;
mod table;

pub use report::{MissingWord, SectorEntry, TrackReport};
pub use table::{Mismatch, Observation, WordTable};

use cursor::{Cursor, EndOfData};

/// Extraction failed
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// Too few sector pulses to start decoding
    ///
    /// The capture contained `found` T39 pulses, but at least
    /// `needed` are required: the leading pulses which are
    /// skipped, plus one to decode.
    #[error("no usable sector pulse: found {found} of the {needed} required")]
    NoSync {
        /// Number of T39 pulses in the capture
        found: usize,

        /// Number of T39 pulses required
        needed: usize,
    },
}

/// Recovers sector words from a digitized capture
///
/// Create with an [`ExtractorBuilder`].
///
/// ```
/// use trackrec::{ExtractorBuilder, ExtractError, TrackNumber};
///
/// let extractor = ExtractorBuilder::new().build();
/// let track = TrackNumber::new(3).unwrap();
/// assert_eq!(
///     Err(ExtractError::NoSync { found: 0, needed: 4 }),
///     extractor.extract(&[], track)
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extractor {
    sync_skip_pulses: usize,
    mid_cell_offset: usize,
}

impl Extractor {
    /// Extract every sector frame of `track`
    ///
    /// Decoding begins at the T39 pulse after the first
    /// `sync_skip_pulses` pulses and continues to the end of
    /// the `samples`. Words which are read more than once are
    /// checked against the first read; disagreements appear
    /// in the report's
    /// [`mismatches()`](TrackReport::mismatches).
    ///
    /// Fails only if the capture has too few sector pulses.
    /// A partial frame at either end of the capture is not
    /// an error.
    pub fn extract(
        &self,
        samples: &[DigitalSample],
        track: TrackNumber,
    ) -> Result<TrackReport, ExtractError> {
        let cursor = Cursor::new(samples);
        let mut report = TrackReport::new(track);

        let mut posn =
            cursor
                .find_sync(self.sync_skip_pulses)
                .map_err(|found| ExtractError::NoSync {
                    found,
                    needed: self.sync_skip_pulses.saturating_add(1),
                })?;

        info!(
            "extractor: [{:<10}]: first sector pulse after skipping {}",
            posn, self.sync_skip_pulses
        );

        loop {
            match self.read_frame(&cursor, posn, track) {
                Ok((address, word)) => report.record(address, word, posn),
                Err(EndOfData) => report.discard_partial(posn),
            }

            posn = match cursor.next_sync(posn) {
                Ok(next) => next,
                Err(EndOfData) => break,
            };
        }

        info!(
            "extractor: track {}: {} frames ({} repeated, {} discarded), {} words, {} mismatches",
            track,
            report.frames_decoded(),
            report.frames_repeated(),
            report.frames_discarded(),
            report.table().len(),
            report.mismatches().len()
        );

        Ok(report)
    }

    /// Leading T39 pulses to ignore
    pub fn sync_skip_pulses(&self) -> usize {
        self.sync_skip_pulses
    }

    /// Samples past a bit cell boundary to sample a bit
    pub fn mid_cell_offset(&self) -> usize {
        self.mid_cell_offset
    }

    // Read the frame which begins at sync posn
    fn read_frame(
        &self,
        cursor: &Cursor,
        posn: usize,
        track: TrackNumber,
    ) -> Result<(SectorAddress, SectorWord), EndOfData> {
        let sector = self.read_sector(cursor, posn)?;
        let word = self.read_word(cursor, posn)?;
        Ok((SectorAddress::new(track, sector), word))
    }

    // Sampling point of the bit cell which begins at posn
    fn sample<'s>(&self, cursor: &Cursor<'s>, posn: usize) -> Result<&'s DigitalSample, EndOfData> {
        let posn = posn.checked_add(self.mid_cell_offset).ok_or(EndOfData)?;
        cursor.get(posn)
    }

    // Sector number, read backwards from the sync cell at posn
    fn read_sector(&self, cursor: &Cursor, mut posn: usize) -> Result<u8, EndOfData> {
        let mut sector = 0u8;
        for bit in 0..SECTOR_BITS {
            if bit > 0 {
                posn = cursor.prev_bit(posn)?;
            }
            sector = (sector << 1) | self.sample(cursor, posn)?.z3 as u8;
        }
        Ok(sector)
    }

    // Data word, read forwards from the sync cell at posn
    fn read_word(&self, cursor: &Cursor, posn: usize) -> Result<SectorWord, EndOfData> {
        // skip the cell after the sync cell
        let mut posn = cursor.next_bit(posn)?;

        let mut word = 0u64;
        for bit in 0..WORD_BITS {
            posn = cursor.next_bit(posn)?;
            if self.sample(cursor, posn)?.track {
                word |= 1 << bit;
            }
        }
        Ok(SectorWord::new(word))
    }
}

impl From<&ExtractorBuilder> for Extractor {
    fn from(cfg: &ExtractorBuilder) -> Self {
        Self {
            sync_skip_pulses: cfg.sync_skip_pulses(),
            mid_cell_offset: cfg.mid_cell_offset(),
        }
    }
}
