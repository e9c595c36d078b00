use crate::digitizer::Digitizer;
use crate::extractor::Extractor;
use crate::sample::SampleRateMode;

/// Builds a [`Digitizer`]
///
/// The builder comes with the calibration used for the
/// original drum captures. All you really need to do is
/// [`build()`](#method.build) it.
///
/// The cut-offs and the rate threshold are instrument
/// specific. They were tuned against one oscilloscope and
/// one set of probes, and they are subject to change for
/// other captures. If you care very strongly about a
/// setting, be sure to configure it here.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct DigitizerBuilder {
    clock_low: f64,
    clock_high: f64,
    track_threshold: f64,
    rate_threshold: usize,
    sample_rate_mode: Option<SampleRateMode>,
}

impl DigitizerBuilder {
    /// Default cut-offs for the Z1, Z2 and Z3 timing tracks (V)
    pub const DEFAULT_CLOCK_THRESHOLDS: (f64, f64) = (1.9, 2.0);

    /// Default cut-off for the data track (V)
    pub const DEFAULT_TRACK_THRESHOLD: f64 = 1.0;

    /// New digitizer with default calibration
    pub fn new() -> Self {
        Self {
            clock_low: Self::DEFAULT_CLOCK_THRESHOLDS.0,
            clock_high: Self::DEFAULT_CLOCK_THRESHOLDS.1,
            track_threshold: Self::DEFAULT_TRACK_THRESHOLD,
            rate_threshold: SampleRateMode::DEFAULT_THRESHOLD,
            sample_rate_mode: None,
        }
    }

    /// Build a digitizer
    pub fn build(&self) -> Digitizer {
        Digitizer::from(self)
    }

    /// Timing track cut-offs (V)
    ///
    /// Z1, Z2 and Z3 are classified as 0 at or below `low` and
    /// as 1 above `high`. Voltages in between hold the previous
    /// level. `high` is raised to `low` if it is smaller.
    pub fn with_clock_thresholds(&mut self, low: f64, high: f64) -> &mut Self {
        self.clock_low = low;
        self.clock_high = f64::max(low, high);
        self
    }

    /// Data track cut-off (V)
    ///
    /// The data track has no hysteresis. It is inverted: at or
    /// below `volts` is logical 1.
    pub fn with_track_threshold(&mut self, volts: f64) -> &mut Self {
        self.track_threshold = volts;
        self
    }

    /// Sample count which separates the capture rates
    ///
    /// Captures with more than `samples` samples are treated as
    /// [`SampleRateMode::Rate200k`].
    pub fn with_rate_threshold(&mut self, samples: usize) -> &mut Self {
        self.rate_threshold = samples;
        self
    }

    /// Force the capture rate
    ///
    /// `None` chooses the mode from the capture length.
    pub fn with_sample_rate_mode(&mut self, mode: Option<SampleRateMode>) -> &mut Self {
        self.sample_rate_mode = mode;
        self
    }

    /// Timing track cut-offs, as `(low, high)`
    pub fn clock_thresholds(&self) -> (f64, f64) {
        (self.clock_low, self.clock_high)
    }

    /// Data track cut-off
    pub fn track_threshold(&self) -> f64 {
        self.track_threshold
    }

    /// Rate threshold, in samples
    pub fn rate_threshold(&self) -> usize {
        self.rate_threshold
    }

    /// Forced capture rate, if any
    pub fn sample_rate_mode(&self) -> Option<SampleRateMode> {
        self.sample_rate_mode
    }
}

impl std::default::Default for DigitizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an [`Extractor`]
///
/// Both settings are empirical. They hold for the captures
/// this decoder was developed against and may need to
/// change for a different capture setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtractorBuilder {
    sync_skip_pulses: usize,
    mid_cell_offset: usize,
}

impl ExtractorBuilder {
    /// Default number of leading T39 pulses to ignore
    pub const DEFAULT_SYNC_SKIP_PULSES: usize = 3;

    /// Default offset from a bit cell boundary to its sampling point
    pub const DEFAULT_MID_CELL_OFFSET: usize = 2;

    /// New extractor with default calibration
    pub fn new() -> Self {
        Self {
            sync_skip_pulses: Self::DEFAULT_SYNC_SKIP_PULSES,
            mid_cell_offset: Self::DEFAULT_MID_CELL_OFFSET,
        }
    }

    /// Build an extractor
    pub fn build(&self) -> Extractor {
        Extractor::from(self)
    }

    /// Leading T39 pulses to ignore
    ///
    /// A capture may begin in the middle of a sector, and the
    /// first few pulses are not trustworthy. Decoding starts at
    /// the pulse which follows the first `count` pulses.
    pub fn with_sync_skip_pulses(&mut self, count: usize) -> &mut Self {
        self.sync_skip_pulses = count;
        self
    }

    /// Samples past a bit cell boundary to sample a bit
    ///
    /// Sampling exactly on the boundary is unreliable. This
    /// moves the sampling point toward the middle of the cell.
    pub fn with_mid_cell_offset(&mut self, samples: usize) -> &mut Self {
        self.mid_cell_offset = samples;
        self
    }

    /// Leading T39 pulses to ignore
    pub fn sync_skip_pulses(&self) -> usize {
        self.sync_skip_pulses
    }

    /// Samples past a bit cell boundary to sample a bit
    pub fn mid_cell_offset(&self) -> usize {
        self.mid_cell_offset
    }
}

impl std::default::Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
