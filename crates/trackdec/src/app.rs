//! Subcommand logic
//!
//! Each subcommand reads one input stream and writes its
//! results to `output`. Diagnostics, like mismatched or
//! missing sectors, go to `diag` once decoding is complete.
//!
//! ```txt
//!   capture.csv ──► Digitizer ──► digitized.csv ──► Extractor ──► table
//!               \_________ decode-track ________/\___ extract-data ___/
//!               \______________________ recover ______________________/
//! ```

use std::fs::File;
use std::io;

use anyhow::Context;
use log::info;

use trackrec::{
    read_capture, read_digitized, write_diagnostics, write_digitized, write_table, DigitalSample,
    TrackNumber, TrackReport,
};

use crate::cli::{DecodeArgs, ExtractArgs, ExtractorOptions, RecoverArgs};

/// Run `decode-track`
///
/// Reads a capture from `input` and writes the digitized
/// capture to `output`.
pub fn decode_track<R, W>(args: &DecodeArgs, input: R, output: W) -> Result<(), anyhow::Error>
where
    R: io::Read,
    W: io::Write,
{
    let capture = read_capture(input).context("Unable to read capture")?;
    let digital = args.digitizer.builder().build().digitize(&capture);
    write_digitized(output, &digital).context("Unable to write digitized capture")?;
    Ok(())
}

/// Run `extract-data`
///
/// Reads a digitized capture from `input` and writes the
/// sector table to `output`.
pub fn extract_data<R, W, D>(
    args: &ExtractArgs,
    input: R,
    output: W,
    diag: D,
) -> Result<TrackReport, anyhow::Error>
where
    R: io::Read,
    W: io::Write,
    D: io::Write,
{
    let track = TrackNumber::new(args.track)?;
    let digital = read_digitized(input).context("Unable to read digitized capture")?;
    extract(&args.extractor, &digital, track, output, diag)
}

/// Run `recover`
///
/// Reads a capture from `input`, optionally saves the
/// digitized capture, and writes the sector table to
/// `output`.
pub fn recover<R, W, D>(
    args: &RecoverArgs,
    input: R,
    output: W,
    diag: D,
) -> Result<TrackReport, anyhow::Error>
where
    R: io::Read,
    W: io::Write,
    D: io::Write,
{
    let track = TrackNumber::new(args.track)?;
    let capture = read_capture(input).context("Unable to read capture")?;
    let digital = args.digitizer.builder().build().digitize(&capture);

    if let Some(path) = &args.digitized {
        let file = File::create(path).with_context(|| format!("Unable to create \"{}\"", path))?;
        write_digitized(io::BufWriter::new(file), &digital)
            .with_context(|| format!("Unable to write \"{}\"", path))?;
        info!("wrote digitized capture: \"{}\"", path);
    }

    extract(&args.extractor, &digital, track, output, diag)
}

// Extract, then write the table and diagnostics
fn extract<W, D>(
    opts: &ExtractorOptions,
    digital: &[DigitalSample],
    track: TrackNumber,
    output: W,
    diag: D,
) -> Result<TrackReport, anyhow::Error>
where
    W: io::Write,
    D: io::Write,
{
    let report = opts
        .builder()
        .build()
        .extract(digital, track)
        .with_context(|| format!("Unable to decode track {}", track))?;

    write_table(output, &report).context("Unable to write sector table")?;
    write_diagnostics(diag, &report).context("Unable to write diagnostics")?;
    Ok(report)
}
