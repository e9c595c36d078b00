//! Address → word table
//!
//! A capture usually spans more than one revolution of the
//! drum, so most sectors are read several times. The
//! [`WordTable`] keeps the *first* word read for every
//! address. Later reads are compared against it.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::sector::{SectorAddress, SectorWord, TrackNumber};

/// Outcome of adding a word to the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observation {
    /// First word seen for this address
    New,

    /// Same word as before
    Repeat,

    /// A different word than before
    ///
    /// The table still holds `was`.
    Mismatch {
        /// The word in the table
        was: SectorWord,

        /// The word just read
        now: SectorWord,
    },
}

/// Two reads of one address disagreed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mismatch {
    /// Address
    pub address: SectorAddress,

    /// First word read, which is the one retained
    pub was: SectorWord,

    /// Disagreeing word
    pub now: SectorWord,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mismatch at address {}, was {}, now {}",
            self.address, self.was, self.now
        )
    }
}

/// Sector words by address
///
/// At most one word is retained per address. The first
/// word inserted for an address wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordTable {
    words: BTreeMap<SectorAddress, SectorWord>,
}

impl WordTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a word read from `address`
    ///
    /// If the address is new, the word is stored. Otherwise
    /// the table is unchanged and the result reports whether
    /// the new word agrees with the stored one.
    pub fn insert(&mut self, address: SectorAddress, word: SectorWord) -> Observation {
        match self.words.entry(address) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(word);
                Observation::New
            }
            btree_map::Entry::Occupied(entry) => {
                let was = *entry.get();
                if was == word {
                    Observation::Repeat
                } else {
                    Observation::Mismatch { was, now: word }
                }
            }
        }
    }

    /// Combine with another table
    ///
    /// Every entry of `other` is inserted in address order
    /// with the same first-wins policy as
    /// [`insert()`](#method.insert). Entries already in
    /// `self` count as the earlier reads. Returns the
    /// disagreements.
    pub fn merge(&mut self, other: &WordTable) -> Vec<Mismatch> {
        other
            .iter()
            .filter_map(|(address, word)| match self.insert(address, word) {
                Observation::Mismatch { was, now } => Some(Mismatch { address, was, now }),
                _ => None,
            })
            .collect()
    }

    /// Word stored for `address`, if any
    pub fn get(&self, address: SectorAddress) -> Option<SectorWord> {
        self.words.get(&address).copied()
    }

    /// True if a word is stored for `address`
    pub fn contains(&self, address: SectorAddress) -> bool {
        self.words.contains_key(&address)
    }

    /// Number of addresses with a word
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if no words are stored
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Stored words in ascending address order
    pub fn iter(&self) -> impl Iterator<Item = (SectorAddress, SectorWord)> + '_ {
        self.words.iter().map(|(a, w)| (*a, *w))
    }

    /// Addresses of `track` with no stored word, ascending
    pub fn missing(&self, track: TrackNumber) -> impl Iterator<Item = SectorAddress> + '_ {
        track.addresses().filter(move |addr| !self.contains(*addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(track: u8, sector: u8) -> SectorAddress {
        SectorAddress::new(TrackNumber::new(track).unwrap(), sector)
    }

    #[test]
    fn test_first_word_wins() {
        let mut table = WordTable::new();
        assert_eq!(Observation::New, table.insert(addr(3, 1), SectorWord::new(7)));
        assert_eq!(
            Observation::Repeat,
            table.insert(addr(3, 1), SectorWord::new(7))
        );
        assert_eq!(
            Observation::Mismatch {
                was: SectorWord::new(7),
                now: SectorWord::new(8)
            },
            table.insert(addr(3, 1), SectorWord::new(8))
        );
        assert_eq!(Some(SectorWord::new(7)), table.get(addr(3, 1)));
        assert_eq!(1, table.len());
    }

    #[test]
    fn test_missing() {
        let track = TrackNumber::new(2).unwrap();
        let mut table = WordTable::new();
        for sector in 0..128 {
            if sector != 77 {
                table.insert(addr(2, sector), SectorWord::new(sector as u64));
            }
        }
        let missing: Vec<SectorAddress> = table.missing(track).collect();
        assert_eq!(vec![addr(2, 77)], missing);

        // another track is entirely missing
        assert_eq!(128, table.missing(TrackNumber::new(3).unwrap()).count());
    }

    #[test]
    fn test_iter_ascending() {
        let mut table = WordTable::new();
        table.insert(addr(0, 9), SectorWord::new(9));
        table.insert(addr(0, 2), SectorWord::new(2));
        table.insert(addr(0, 5), SectorWord::new(5));
        let order: Vec<u16> = table.iter().map(|(a, _)| a.value()).collect();
        assert_eq!(vec![2, 5, 9], order);
    }

    #[test]
    fn test_merge() {
        let mut left = WordTable::new();
        left.insert(addr(1, 0), SectorWord::new(1));
        left.insert(addr(1, 1), SectorWord::new(2));

        let mut right = WordTable::new();
        right.insert(addr(1, 1), SectorWord::new(3));
        right.insert(addr(1, 2), SectorWord::new(4));

        let mismatches = left.merge(&right);
        assert_eq!(
            vec![Mismatch {
                address: addr(1, 1),
                was: SectorWord::new(2),
                now: SectorWord::new(3)
            }],
            mismatches
        );
        assert_eq!(3, left.len());
        assert_eq!(Some(SectorWord::new(2)), left.get(addr(1, 1)));
        assert_eq!(Some(SectorWord::new(4)), left.get(addr(1, 2)));
        assert_eq!(
            "mismatch at address 081, was 0000000002, now 0000000003",
            mismatches[0].to_string()
        );
    }
}
