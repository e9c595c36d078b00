//! Extraction results

use std::fmt;

#[cfg(not(test))]
use log::debug;

#[cfg(test)]
use std::println as debug;

use super::table::{Mismatch, Observation, WordTable};
use crate::sector::{SectorAddress, SectorWord, TrackNumber};

/// No word was read for an address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MissingWord(pub SectorAddress);

impl fmt::Display for MissingWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "word for address {} is missing", self.0)
    }
}

/// One line of the sector table: `AAA:WWWWWWWWWW`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SectorEntry {
    /// Address
    pub address: SectorAddress,

    /// Word
    pub word: SectorWord,
}

impl fmt::Display for SectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.word)
    }
}

/// Everything recovered from one track
///
/// Contains the [`WordTable`], every disagreement between
/// repeated reads of a sector, and some statistics about
/// the scan. The report is read-only once the
/// [`Extractor`](crate::Extractor) returns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackReport {
    track: TrackNumber,
    table: WordTable,
    mismatches: Vec<Mismatch>,
    frames: usize,
    repeats: usize,
    discarded: usize,
}

impl TrackReport {
    /// Empty report for `track`
    pub(crate) fn new(track: TrackNumber) -> Self {
        Self {
            track,
            table: WordTable::new(),
            mismatches: Vec::new(),
            frames: 0,
            repeats: 0,
            discarded: 0,
        }
    }

    /// Record one decoded sector frame
    pub(crate) fn record(&mut self, address: SectorAddress, word: SectorWord, posn: usize) {
        self.frames += 1;
        match self.table.insert(address, word) {
            Observation::New => {
                debug!(
                    "extractor: [{:<10}]: new sector {}:{}",
                    posn, address, word
                );
            }
            Observation::Repeat => {
                self.repeats += 1;
            }
            Observation::Mismatch { was, now } => {
                let mismatch = Mismatch { address, was, now };
                debug!("extractor: [{:<10}]: {}", posn, mismatch);
                self.mismatches.push(mismatch);
            }
        }
    }

    /// Record a frame cut off by either end of the capture
    pub(crate) fn discard_partial(&mut self, posn: usize) {
        debug!(
            "extractor: [{:<10}]: partial frame at capture boundary discarded",
            posn
        );
        self.discarded += 1;
    }

    /// Track number
    pub fn track(&self) -> TrackNumber {
        self.track
    }

    /// Words recovered
    pub fn table(&self) -> &WordTable {
        &self.table
    }

    /// Consume the report, returning its table
    pub fn into_table(self) -> WordTable {
        self.table
    }

    /// Sector table entries, in ascending address order
    pub fn entries(&self) -> impl Iterator<Item = SectorEntry> + '_ {
        self.table
            .iter()
            .map(|(address, word)| SectorEntry { address, word })
    }

    /// Disagreements between repeated reads, in scan order
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Addresses on this track with no word, ascending
    pub fn missing(&self) -> impl Iterator<Item = MissingWord> + '_ {
        self.table.missing(self.track).map(MissingWord)
    }

    /// True if every sector of the track was read
    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }

    /// Number of complete frames decoded
    pub fn frames_decoded(&self) -> usize {
        self.frames
    }

    /// Number of frames which agreed with an earlier read
    pub fn frames_repeated(&self) -> usize {
        self.repeats
    }

    /// Number of partial frames discarded at a capture boundary
    ///
    /// A frame is partial if it runs past the last sample, or
    /// if its sector number begins before the first sample.
    pub fn frames_discarded(&self) -> usize {
        self.discarded
    }
}

impl fmt::Display for TrackReport {
    /// Writes the sector table, one entry per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_record() {
        let track = TrackNumber::new(3).unwrap();
        let mut report = TrackReport::new(track);
        report.record(SectorAddress::new(track, 1), SectorWord::new(1), 100);
        report.record(SectorAddress::new(track, 0), SectorWord::new(0), 200);
        report.record(SectorAddress::new(track, 1), SectorWord::new(1), 300);
        report.record(SectorAddress::new(track, 1), SectorWord::new(0xf), 400);
        report.discard_partial(500);

        assert_eq!(4, report.frames_decoded());
        assert_eq!(1, report.frames_repeated());
        assert_eq!(1, report.frames_discarded());
        assert_eq!(1, report.mismatches().len());
        assert_eq!(
            "mismatch at address 181, was 0000000001, now 000000000F",
            report.mismatches()[0].to_string()
        );
        assert_eq!("180:0000000000\n181:0000000001\n", report.to_string());

        let missing: Vec<String> = report.missing().map(|m| m.to_string()).collect();
        assert_eq!(126, missing.len());
        assert_eq!("word for address 182 is missing", missing[0]);
        assert_eq!("word for address 1FF is missing", missing[125]);
        assert!(!report.is_complete());
    }
}
