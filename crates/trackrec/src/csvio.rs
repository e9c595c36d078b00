//! Interchange formats
//!
//! Captures and digitized samples are exchanged as CSV. The
//! readers are forgiving: a row which does not parse is
//! skipped with a warning, and a header row is skipped
//! quietly. Only I/O failures are fatal.
//!
//! | Format    | Columns                                  |
//! |-----------|------------------------------------------|
//! | capture   | `timestamp, Z1, Z2, Z3, track` (volts)   |
//! | digitized | `Index,Z1,Z2,T7,T4,T39,Z3,Track` (0/1)   |
//!
//! The sector table and its diagnostics are plain text,
//! one item per line.

use std::io;

use thiserror::Error;

#[cfg(not(test))]
use log::{debug, warn};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as warn;

use crate::extractor::TrackReport;
use crate::sample::{AnalogSample, DigitalSample};

/// Header of the digitized format
pub const DIGITIZED_HEADER: [&str; 8] = ["Index", "Z1", "Z2", "T7", "T4", "T39", "Z3", "Track"];

/// Failed to read or write an interchange file
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The CSV stream could not be framed
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

// Why a single row was rejected
#[derive(Error, Clone, Debug, PartialEq)]
enum RowError {
    #[error("expected at least {needed} fields, found {found}")]
    TooFewFields { needed: usize, found: usize },

    #[error("column {column}: \"{text}\" is not a number")]
    NotANumber { column: usize, text: String },
}

/// Read an oscilloscope capture
///
/// Each row holds a timestamp followed by the Z1, Z2, Z3 and
/// data track voltages. The timestamp and any extra columns
/// are ignored. Rows which do not parse are skipped.
pub fn read_capture<R: io::Read>(rdr: R) -> Result<Vec<AnalogSample>, LoadError> {
    read_rows(rdr, "capture", |record| {
        let volts = parse_fields(record, 1, 4)?;
        Ok(AnalogSample::new(volts[0], volts[1], volts[2], volts[3]))
    })
}

/// Read a digitized capture
///
/// Expects the columns of [`DIGITIZED_HEADER`]. The index
/// column is ignored: samples are taken in file order. Any
/// non-zero value is logic 1. Rows which do not parse,
/// including the header, are skipped.
pub fn read_digitized<R: io::Read>(rdr: R) -> Result<Vec<DigitalSample>, LoadError> {
    read_rows(rdr, "digitized", |record| {
        let v = parse_fields(record, 1, 7)?;
        let level = |x: f64| x != 0.0;
        Ok(DigitalSample {
            z1: level(v[0]),
            z2: level(v[1]),
            t7: level(v[2]),
            t4: level(v[3]),
            t39: level(v[4]),
            z3: level(v[5]),
            track: level(v[6]),
        })
    })
}

/// Write digitized samples
///
/// Writes [`DIGITIZED_HEADER`] and then one row per sample,
/// numbered from zero.
pub fn write_digitized<W: io::Write>(wtr: W, samples: &[DigitalSample]) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(DIGITIZED_HEADER)?;

    let bit = |level: bool| if level { "1" } else { "0" };
    for (index, sa) in samples.iter().enumerate() {
        wtr.write_field(index.to_string())?;
        for level in [sa.z1, sa.z2, sa.t7, sa.t4, sa.t39, sa.z3, sa.track] {
            wtr.write_field(bit(level))?;
        }
        wtr.write_record(None::<&[u8]>)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the sector table
///
/// One `AAA:WWWWWWWWWW` line per address, ascending.
pub fn write_table<W: io::Write>(mut out: W, report: &TrackReport) -> io::Result<()> {
    for entry in report.entries() {
        writeln!(out, "{}", entry)?;
    }
    out.flush()
}

/// Write the diagnostics for a report
///
/// Writes every mismatch, in the order it was observed,
/// followed by every missing address in ascending order.
pub fn write_diagnostics<W: io::Write>(mut out: W, report: &TrackReport) -> io::Result<()> {
    for mismatch in report.mismatches() {
        writeln!(out, "{}", mismatch)?;
    }
    for missing in report.missing() {
        writeln!(out, "{}", missing)?;
    }
    out.flush()
}

// Read every parseable row of a CSV stream
fn read_rows<R, T, F>(rdr: R, what: &str, parse: F) -> Result<Vec<T>, LoadError>
where
    R: io::Read,
    F: Fn(&csv::StringRecord) -> Result<T, RowError>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for (num, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!("{}: skipping unreadable row: {}", what, err);
                skipped += 1;
                continue;
            }
        };
        let line = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(num as u64 + 1);

        match parse(&record) {
            Ok(row) => out.push(row),
            Err(err) if num == 0 => {
                debug!("{}: line {}: skipping header: {}", what, line, err);
            }
            Err(err) => {
                warn!("{}: line {}: skipping malformed row: {}", what, line, err);
                skipped += 1;
            }
        }
    }

    debug!(
        "{}: read {} rows, skipped {} malformed",
        what,
        out.len(),
        skipped
    );
    Ok(out)
}

// Parse `count` numeric fields starting at column `first`
fn parse_fields(
    record: &csv::StringRecord,
    first: usize,
    count: usize,
) -> Result<Vec<f64>, RowError> {
    if record.len() < first + count {
        return Err(RowError::TooFewFields {
            needed: first + count,
            found: record.len(),
        });
    }

    (first..first + count)
        .map(|column| {
            let text = &record[column];
            text.parse::<f64>().map_err(|_| RowError::NotANumber {
                column: column + 1,
                text: text.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;

    use crate::sector::{SectorAddress, SectorWord, TrackNumber};

    #[test]
    fn test_read_capture() {
        const CAPTURE: &str = "Time,Z1,Z2,Z3,Track
-0.0100,0.01, 4.9 ,0.02,3.3
-0.0099,5.0,bogus,0.0,0.0

-0.0098,5.0,0.0,5.0
-0.0097,1.95,0.0,5.0,0.5,extra,columns
";
        let samples = read_capture(CAPTURE.as_bytes()).expect("read");
        assert_eq!(2, samples.len());
        assert_approx_eq!(0.01, samples[0].z1);
        assert_approx_eq!(4.9, samples[0].z2);
        assert_approx_eq!(0.02, samples[0].z3);
        assert_approx_eq!(3.3, samples[0].track);
        assert_approx_eq!(1.95, samples[1].z1);
        assert_approx_eq!(0.5, samples[1].track);
    }

    #[test]
    fn test_read_capture_no_header() {
        let samples = read_capture("0,1,2,3,4\n1,5,6,7,8\n".as_bytes()).expect("read");
        assert_eq!(
            vec![
                AnalogSample::new(1.0, 2.0, 3.0, 4.0),
                AnalogSample::new(5.0, 6.0, 7.0, 8.0)
            ],
            samples
        );
    }

    #[test]
    fn test_digitized_roundtrip() {
        let samples = vec![
            DigitalSample::default(),
            DigitalSample {
                z1: true,
                z3: true,
                ..Default::default()
            },
            DigitalSample {
                t4: true,
                t39: true,
                track: true,
                ..Default::default()
            },
            DigitalSample {
                z2: true,
                t7: true,
                ..Default::default()
            },
        ];

        let mut buf = Vec::new();
        write_digitized(&mut buf, &samples).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            vec![
                "Index,Z1,Z2,T7,T4,T39,Z3,Track",
                "0,0,0,0,0,0,0,0",
                "1,1,0,0,0,0,1,0",
                "2,0,0,0,1,1,0,1",
                "3,0,1,1,0,0,0,0",
            ],
            lines
        );

        let back = read_digitized(text.as_bytes()).expect("read");
        assert_eq!(samples, back);
    }

    #[test]
    fn test_read_digitized_nonzero() {
        const DIGITIZED: &str = "Index,Z1,Z2,T7,T4,T39,Z3,Track
0,2,0,0,0,0,0,-1
1,0,0,0,0,1,0
2,0,0,0,0,x,0,0
";
        let samples = read_digitized(DIGITIZED.as_bytes()).expect("read");
        assert_eq!(1, samples.len());
        assert!(samples[0].z1);
        assert!(samples[0].track);
        assert!(!samples[0].t39);
    }

    #[test]
    fn test_row_errors() {
        let record = csv::StringRecord::from(vec!["0", "1.0", "nope"]);
        assert_eq!(
            Err(RowError::TooFewFields {
                needed: 5,
                found: 3
            }),
            parse_fields(&record, 1, 4)
        );
        assert_eq!(
            "column 3: \"nope\" is not a number",
            parse_fields(&record, 1, 2).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_write_table() {
        let track = TrackNumber::new(0).unwrap();
        let mut report = TrackReport::new(track);
        for sector in 0..128u8 {
            if sector != 2 {
                report.record(
                    SectorAddress::new(track, sector),
                    SectorWord::new(sector as u64),
                    0,
                );
            }
        }
        report.record(SectorAddress::new(track, 1), SectorWord::new(0xabc), 0);

        let mut table = Vec::new();
        write_table(&mut table, &report).expect("write");
        let table = String::from_utf8(table).expect("utf8");
        assert_eq!(127, table.lines().count());
        assert!(table.starts_with("000:0000000000\n001:0000000001\n003:0000000003\n"));
        assert!(table.ends_with("07F:000000007F\n"));

        let mut diag = Vec::new();
        write_diagnostics(&mut diag, &report).expect("write");
        assert_eq!(
            "mismatch at address 001, was 0000000001, now 0000000ABC\n\
             word for address 002 is missing\n",
            String::from_utf8(diag).expect("utf8")
        );
    }
}
