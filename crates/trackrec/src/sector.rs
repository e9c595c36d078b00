//! Track numbers, sector addresses and sector words

use std::convert::TryFrom;
use std::fmt;

use thiserror::Error;

use crate::waveform::{SECTORS_PER_TRACK, TRACK_COUNT, WORD_MASK};

/// A track number was out of range
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[error("invalid track number {0}: must be between 0 and 31")]
pub struct InvalidTrackNumber(pub u8);

/// Drum track, from 0 to 31
///
/// ```
/// use std::convert::TryFrom;
/// use trackrec::TrackNumber;
///
/// let track = TrackNumber::try_from(3).unwrap();
/// assert_eq!(3, track.value());
/// assert_eq!(384, track.first_address().value());
/// assert!(TrackNumber::try_from(32).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackNumber(u8);

impl TrackNumber {
    /// Validate a track number
    pub fn new(track: u8) -> Result<Self, InvalidTrackNumber> {
        if track < TRACK_COUNT {
            Ok(Self(track))
        } else {
            Err(InvalidTrackNumber(track))
        }
    }

    /// Track number
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Lowest sector address on this track
    pub fn first_address(&self) -> SectorAddress {
        SectorAddress::new(*self, 0)
    }

    /// Every sector address on this track, ascending
    pub fn addresses(&self) -> impl Iterator<Item = SectorAddress> {
        let track = *self;
        (0..SECTORS_PER_TRACK).map(move |sector| SectorAddress::new(track, sector as u8))
    }
}

impl TryFrom<u8> for TrackNumber {
    type Error = InvalidTrackNumber;

    fn try_from(track: u8) -> Result<Self, Self::Error> {
        Self::new(track)
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sector address, from `0x000` to `0xFFF`
///
/// The low seven bits are the sector number within the
/// track. The high five bits are the track number. Displays
/// as three hexadecimal digits.
///
/// ```
/// use trackrec::{SectorAddress, TrackNumber};
///
/// let track = TrackNumber::new(3).unwrap();
/// let addr = SectorAddress::new(track, 5);
/// assert_eq!(0x185, addr.value());
/// assert_eq!("185", &format!("{}", addr));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorAddress(u16);

impl SectorAddress {
    /// Address of `sector` on `track`
    ///
    /// Only the low seven bits of `sector` are used.
    pub fn new(track: TrackNumber, sector: u8) -> Self {
        Self((sector & 0x7f) as u16 + track.value() as u16 * SECTORS_PER_TRACK)
    }

    /// Numeric address
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Sector within the track
    pub fn sector(&self) -> u8 {
        (self.0 % SECTORS_PER_TRACK) as u8
    }

    /// Track number
    pub fn track(&self) -> TrackNumber {
        TrackNumber((self.0 / SECTORS_PER_TRACK) as u8)
    }
}

impl fmt::Display for SectorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}", self.0)
    }
}

/// A 40-bit data word
///
/// Displays as ten hexadecimal digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorWord(u64);

impl SectorWord {
    /// New word from its bits
    ///
    /// Bits above the fortieth are discarded.
    pub fn new(bits: u64) -> Self {
        Self(bits & WORD_MASK)
    }

    /// Numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<SectorWord> for u64 {
    fn from(word: SectorWord) -> u64 {
        word.0
    }
}

impl fmt::Display for SectorWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_number() {
        assert_eq!(Ok(TrackNumber(31)), TrackNumber::new(31));
        assert_eq!(Err(InvalidTrackNumber(32)), TrackNumber::new(32));
        assert_eq!(
            "invalid track number 200: must be between 0 and 31",
            InvalidTrackNumber(200).to_string()
        );

        let addrs: Vec<SectorAddress> = TrackNumber(1).addresses().collect();
        assert_eq!(128, addrs.len());
        assert_eq!(128, addrs[0].value());
        assert_eq!(255, addrs[127].value());
    }

    #[test]
    fn test_sector_address() {
        let addr = SectorAddress::new(TrackNumber(31), 0xff);
        assert_eq!(0xfff, addr.value());
        assert_eq!(127, addr.sector());
        assert_eq!(TrackNumber(31), addr.track());
        assert_eq!("FFF", addr.to_string());
        assert_eq!("000", SectorAddress::new(TrackNumber(0), 0).to_string());
        assert_eq!("180", SectorAddress::new(TrackNumber(3), 0).to_string());
    }

    #[test]
    fn test_sector_word() {
        assert_eq!("0000000009", SectorWord::new(9).to_string());
        assert_eq!("FFFFFFFFFF", SectorWord::new(u64::MAX).to_string());
        assert_eq!(0x12_3456_789a, u64::from(SectorWord::new(0x12_3456_789a)));
    }
}
