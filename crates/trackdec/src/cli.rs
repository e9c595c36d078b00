use std::fmt::Display;

use clap::{error::ErrorKind, value_parser, CommandFactory, Parser, Subcommand};

use trackrec::{DigitizerBuilder, ExtractorBuilder, SampleRateMode};

/// Standard input filename
const STDIN_FILE: &str = "-";

const USAGE_SHORT: &str = r#"
Recovers the 40-bit words stored on one drum track from an oscilloscope capture of the Z1, Z2, Z3 and data tracks.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
Recovers the 40-bit words stored on one drum track from an oscilloscope capture of the Z1, Z2, Z3 and data tracks.

Captures are CSV files with one row per sample:

    timestamp, Z1, Z2, Z3, track

in volts. Rows which are not numeric, like headers, are skipped.

Decoding happens in two stages. You can run them separately and keep the digitized capture for inspection

    trackdec decode-track capture.csv > digitized.csv
    trackdec extract-data digitized.csv 3 > track03.txt

or together

    trackdec recover capture.csv 3 > track03.txt

The sector table is written to standard output, one AAA:WWWWWWWWWW line per address. Disagreements between repeated reads and addresses which were never read are reported on standard error.
"#;

const CALIBRATION: &str = "Calibration Options";

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, global = true, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// No logging and no diagnostics; print only output data
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Digitize a capture and print the digitized CSV
    DecodeTrack(DecodeArgs),

    /// Extract sector words from a digitized CSV
    ExtractData(ExtractArgs),

    /// Digitize a capture and extract its sector words
    Recover(RecoverArgs),
}

/// Arguments for `decode-track`
#[derive(clap::Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Oscilloscope capture (or "-" for stdin)
    pub capture: String,

    #[command(flatten)]
    pub digitizer: DigitizerOptions,
}

/// Arguments for `extract-data`
#[derive(clap::Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Digitized capture (or "-" for stdin)
    pub digitized: String,

    /// Track number (0 to 31)
    #[arg(value_parser = value_parser!(u8).range(0..=31))]
    pub track: u8,

    #[command(flatten)]
    pub extractor: ExtractorOptions,
}

/// Arguments for `recover`
#[derive(clap::Args, Clone, Debug)]
pub struct RecoverArgs {
    /// Oscilloscope capture (or "-" for stdin)
    pub capture: String,

    /// Track number (0 to 31)
    #[arg(value_parser = value_parser!(u8).range(0..=31))]
    pub track: u8,

    /// Also write the digitized capture to this file
    #[arg(long, value_name = "FILE")]
    pub digitized: Option<String>,

    #[command(flatten)]
    pub digitizer: DigitizerOptions,

    #[command(flatten)]
    pub extractor: ExtractorOptions,
}

/// Digitizer calibration
#[derive(clap::Args, Clone, Debug)]
pub struct DigitizerOptions {
    /// Z1-Z3: at or below is logic 0 (V)
    #[arg(long, default_value_t = DigitizerBuilder::DEFAULT_CLOCK_THRESHOLDS.0)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub clock_low: f64,

    /// Z1-Z3: above is logic 1 (V)
    #[arg(long, default_value_t = DigitizerBuilder::DEFAULT_CLOCK_THRESHOLDS.1)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub clock_high: f64,

    /// Data track: at or below is logic 1 (V)
    #[arg(long, default_value_t = DigitizerBuilder::DEFAULT_TRACK_THRESHOLD)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub track_threshold: f64,

    /// Captures longer than this are 200k (samples)
    #[arg(long, default_value_t = SampleRateMode::DEFAULT_THRESHOLD)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub rate_threshold: usize,

    /// Force the capture rate (100k or 200k)
    ///
    /// By default, the rate is chosen from the length of the
    /// capture.
    #[arg(long)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub rate_mode: Option<SampleRateMode>,
}

impl DigitizerOptions {
    /// Builder with these settings
    pub fn builder(&self) -> DigitizerBuilder {
        let mut builder = DigitizerBuilder::new();
        builder
            .with_clock_thresholds(self.clock_low, self.clock_high)
            .with_track_threshold(self.track_threshold)
            .with_rate_threshold(self.rate_threshold)
            .with_sample_rate_mode(self.rate_mode);
        builder
    }
}

/// Extractor calibration
#[derive(clap::Args, Clone, Debug)]
pub struct ExtractorOptions {
    /// Sector pulses to ignore at start of capture
    #[arg(long, default_value_t = ExtractorBuilder::DEFAULT_SYNC_SKIP_PULSES)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub sync_skip: usize,

    /// Sample each bit this far into its cell (samples)
    #[arg(long, default_value_t = ExtractorBuilder::DEFAULT_MID_CELL_OFFSET)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = CALIBRATION)]
    pub mid_cell_offset: usize,
}

impl ExtractorOptions {
    /// Builder with these settings
    pub fn builder(&self) -> ExtractorBuilder {
        let mut builder = ExtractorBuilder::new();
        builder
            .with_sync_skip_pulses(self.sync_skip)
            .with_mid_cell_offset(self.mid_cell_offset);
        builder
    }
}

/// Return true if `file` names standard input
pub fn is_stdin(file: &str) -> bool {
    file == STDIN_FILE
}

/// A program-level error with exit code
#[derive(Debug)]
pub struct CliError {
    error: anyhow::Error,
    exit_code: i32,
}

impl CliError {
    /// Create new error with a custom exit code
    pub fn new(error: anyhow::Error, code: i32) -> CliError {
        CliError {
            error,
            exit_code: code,
        }
    }

    /// Print this error to the terminal
    ///
    /// Errors from clap are printed verbatim. Other types of errors
    /// are printed indirectly via clap's fancy formatter.
    pub fn print(&self) -> std::io::Result<()> {
        if let Some(e) = self.error.downcast_ref::<clap::Error>() {
            e.print()
        } else {
            Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print()
        }
    }

    /// Print this error to the terminal and exit
    pub fn exit(&self) -> ! {
        drop(self.print());
        std::process::exit(self.exit_code());
    }

    /// Process exit code
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl Display for CliError {
    /// The error and its context chain, on one line
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> CliError {
        CliError::new(err, 1)
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> CliError {
        let code = if err.use_stderr() { 1 } else { 0 };
        CliError::new(err.into(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_clap() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_track_range() {
        let args = Args::try_parse_from(["trackdec", "extract-data", "-", "31"]).unwrap();
        match args.command {
            Command::ExtractData(extract) => {
                assert_eq!(31, extract.track);
                assert!(is_stdin(&extract.digitized));
                assert_eq!(3, extract.extractor.sync_skip);
                assert_eq!(2, extract.extractor.mid_cell_offset);
            }
            _ => unreachable!(),
        }

        let err = Args::try_parse_from(["trackdec", "extract-data", "-", "32"]).unwrap_err();
        assert_eq!(ErrorKind::ValueValidation, err.kind());
        assert_eq!(1, CliError::from(err).exit_code());

        let err = Args::try_parse_from(["trackdec", "--help"]).unwrap_err();
        assert_eq!(0, CliError::from(err).exit_code());
    }

    #[test]
    fn test_error_display() {
        let err = anyhow::anyhow!("no usable sector pulse").context("Unable to decode track 3");
        let err = CliError::from(err);
        assert_eq!(1, err.exit_code());
        assert_eq!(
            "Unable to decode track 3: no usable sector pulse",
            err.to_string()
        );
    }

    #[test]
    fn test_calibration() {
        let args = Args::try_parse_from([
            "trackdec",
            "-vv",
            "recover",
            "capture.csv",
            "7",
            "--clock-low",
            "2.2",
            "--clock-high",
            "2.6",
            "--rate-mode",
            "200k",
            "--sync-skip",
            "1",
            "--digitized",
            "out.csv",
        ])
        .unwrap();
        assert_eq!(2, args.verbose);
        assert!(!args.quiet);

        match args.command {
            Command::Recover(recover) => {
                assert_eq!(7, recover.track);
                assert_eq!(Some("out.csv"), recover.digitized.as_deref());

                let digitizer = recover.digitizer.builder();
                let (low, high) = digitizer.clock_thresholds();
                assert_approx_eq!(2.2, low);
                assert_approx_eq!(2.6, high);
                assert_approx_eq!(1.0, digitizer.track_threshold());
                assert_eq!(Some(SampleRateMode::Rate200k), digitizer.sample_rate_mode());

                let extractor = recover.extractor.builder();
                assert_eq!(1, extractor.sync_skip_pulses());
                assert_eq!(2, extractor.mid_cell_offset());
            }
            _ => unreachable!(),
        }

        assert!(Args::try_parse_from([
            "trackdec",
            "decode-track",
            "-",
            "--rate-mode",
            "300k"
        ])
        .is_err());
    }
}
