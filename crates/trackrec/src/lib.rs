//! # trackrec: Drum Track Recovery
//!
//! This crate recovers data words from oscilloscope captures
//! of a magnetic drum memory. Each capture records four
//! channels from the drum's read amplifiers:
//!
//! * **Z1**, the master bit clock;
//! * **Z2**, a timing track which marks the start of each sector;
//! * **Z3**, the sector address track; and
//! * the **data track** itself.
//!
//! A drum holds 32 tracks of 128 sectors, and every sector
//! holds one 40-bit word. A capture covers some portion of a
//! single track.
//!
//! ## Pipeline
//!
//! Recovery happens in two stages, which may be run
//! together or through an intermediate CSV file.
//!
//! 1. The [`Digitizer`] slices the analog voltages into
//!    logic levels, latches them on the falling edge of the
//!    master clock, and reproduces the controller's timing
//!    latches to find the T39 sector pulse.
//!
//! 2. The [`Extractor`] walks the digitized capture one
//!    sector at a time. It reads the sector number from Z3
//!    and the data word from the data track, then collects
//!    everything into a [`TrackReport`].
//!
//! Both stages carry instrument-specific calibration. The
//! defaults in [`DigitizerBuilder`] and [`ExtractorBuilder`]
//! match the original captures.
//!
//! ## Example
//!
//! ```
//! use trackrec::{read_capture, DigitizerBuilder, ExtractorBuilder, TrackNumber};
//!
//! # let capture_file = "Time,Z1,Z2,Z3,Track\n0.0,0.0,0.0,0.0,5.0\n".as_bytes();
//! #
//! // read voltages from any io::Read, like a File
//! let capture = read_capture(capture_file).expect("unreadable capture");
//!
//! // convert to logic levels
//! let digitizer = DigitizerBuilder::new()
//!     .with_clock_thresholds(1.9, 2.0) // hysteresis band for Z1-Z3 (V)
//!     .with_track_threshold(1.0)       // data track cut-off (V)
//!     .build();
//! let digital = digitizer.digitize(&capture);
//! assert_eq!(capture.len(), digital.len());
//!
//! // decode sectors of track 3
//! let extractor = ExtractorBuilder::new()
//!     .with_sync_skip_pulses(3)  // ignore pulses at the start of capture
//!     .build();
//! let track = TrackNumber::new(3).expect("bad track");
//! match extractor.extract(&digital, track) {
//!     Ok(report) => {
//!         for entry in report.entries() {
//!             println!("{}", entry);
//!         }
//!         for missing in report.missing() {
//!             eprintln!("{}", missing);
//!         }
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```
//!
//! ## Interchange formats
//!
//! The [`read_capture()`], [`read_digitized()`] and
//! [`write_digitized()`] functions handle the CSV files
//! produced by the oscilloscope and by the `decode-track`
//! tool. Malformed rows are logged and skipped.
//!
//! ## Crate features
//!
//! This crate logs through the
//! [log](https://crates.io/crates/log) facade. Install a
//! logger of your choice to see the decoder at work.

#![allow(dead_code)]

mod builder;
mod csvio;
mod digitizer;
mod extractor;
mod sample;
mod sector;
mod threshold;
mod timing;
mod waveform;

pub use builder::{DigitizerBuilder, ExtractorBuilder};
pub use csvio::{
    read_capture, read_digitized, write_diagnostics, write_digitized, write_table, LoadError,
    DIGITIZED_HEADER,
};
pub use digitizer::Digitizer;
pub use extractor::{
    ExtractError, Extractor, Mismatch, MissingWord, Observation, SectorEntry, TrackReport,
    WordTable,
};
pub use sample::{AnalogSample, DigitalSample, SampleRateMode};
pub use sector::{InvalidTrackNumber, SectorAddress, SectorWord, TrackNumber};
pub use waveform::{SECTORS_PER_TRACK, TRACK_COUNT, WORD_BITS};
