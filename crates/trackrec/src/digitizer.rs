//! Analog capture → digital logic levels
//!
//! The [`Digitizer`] reproduces the front end of the drum
//! controller. For every input sample it
//!
//! 1. slices all four channels into logic levels, with
//!    hysteresis on the timing tracks;
//! 2. finds edges on the master clock, Z1;
//! 3. latches Z2, Z3 and the data track on the falling
//!    edge of Z1. The data track is latched from one or two
//!    samples earlier to match the propagation delay of the
//!    hardware; and
//! 4. clocks the T4/T7 [timing latches](crate::timing) and
//!    derives the T39 sector pulse.
//!
//! The output has exactly one [`DigitalSample`] per input
//! sample.

use arraydeque::ArrayDeque;

#[cfg(not(test))]
use log::{debug, info, trace};

#[cfg(test)]
use std::println as debug;
#[cfg(test)]
use std::println as info;
#[cfg(test)]
use std::println as trace;

use crate::builder::DigitizerBuilder;
use crate::sample::{AnalogSample, DigitalSample, SampleRateMode};
use crate::threshold::Slicer;
use crate::timing::{ClockEdge, EdgeDetector, TimingLatch};

/// Converts analog captures to logic levels
///
/// Create with a [`DigitizerBuilder`]. The `Digitizer` holds
/// only its calibration; every call to
/// [`digitize()`](#method.digitize) starts from zero initial
/// conditions.
#[derive(Clone, Debug)]
pub struct Digitizer {
    clock_thresholds: (f64, f64),
    track_threshold: f64,
    rate_threshold: usize,
    sample_rate_mode: Option<SampleRateMode>,
}

impl Digitizer {
    /// Capture rate which will be used for `count` samples
    pub fn sample_rate_mode(&self, count: usize) -> SampleRateMode {
        self.sample_rate_mode
            .unwrap_or_else(|| SampleRateMode::for_sample_count(count, self.rate_threshold))
    }

    /// Digitize an entire capture
    ///
    /// Returns one [`DigitalSample`] for each of the `samples`,
    /// in the same order.
    pub fn digitize(&self, samples: &[AnalogSample]) -> Vec<DigitalSample> {
        let mode = self.sample_rate_mode(samples.len());
        info!(
            "digitizer: {} samples, capture rate {} ({})",
            samples.len(),
            mode,
            mode.as_display_str()
        );

        let mut state = DigitizerState::new(self, mode);
        let out: Vec<DigitalSample> = samples.iter().map(|sa| state.input(sa)).collect();

        debug!(
            "digitizer: {} falling clock edges, {} sector pulses",
            state.falling_edges, state.sync_pulses
        );
        out
    }
}

impl From<&DigitizerBuilder> for Digitizer {
    fn from(cfg: &DigitizerBuilder) -> Self {
        Self {
            clock_thresholds: cfg.clock_thresholds(),
            track_threshold: cfg.track_threshold(),
            rate_threshold: cfg.rate_threshold(),
            sample_rate_mode: cfg.sample_rate_mode(),
        }
    }
}

// Per-capture state of the digitizer
#[derive(Clone, Debug)]
struct DigitizerState {
    z1: Slicer,
    z2: Slicer,
    z3: Slicer,
    track: Slicer,
    clock: EdgeDetector,
    timing: TimingLatch,
    track_delay: DelayLine,

    // latched outputs
    z2_latched: bool,
    z3_latched: bool,
    track_latched: bool,

    // statistics
    falling_edges: usize,
    sync_pulses: usize,
    last_t39: bool,
}

impl DigitizerState {
    fn new(cfg: &Digitizer, mode: SampleRateMode) -> Self {
        let (low, high) = cfg.clock_thresholds;
        Self {
            z1: Slicer::new(low, high),
            z2: Slicer::new(low, high),
            z3: Slicer::new(low, high),
            track: Slicer::with_cutoff(cfg.track_threshold).inverted(),
            clock: EdgeDetector::new(),
            timing: TimingLatch::new(),
            track_delay: DelayLine::new(mode.track_delay()),
            z2_latched: false,
            z3_latched: false,
            track_latched: false,
            falling_edges: 0,
            sync_pulses: 0,
            last_t39: false,
        }
    }

    fn input(&mut self, sa: &AnalogSample) -> DigitalSample {
        // 1. slice
        let z1 = self.z1.input(sa.z1);
        let z2 = self.z2.input(sa.z2);
        let z3 = self.z3.input(sa.z3);
        let track = self.track.input(sa.track);

        // 2. clock edges
        let edge = self.clock.input(z1);

        // 3. latch on the falling edge. The track delay line
        //    does not yet contain this sample.
        if edge == Some(ClockEdge::Falling) {
            self.z2_latched = z2;
            self.z3_latched = z3;
            self.track_latched = self.track_delay.delayed();
            self.falling_edges += 1;
        }
        self.track_delay.push(track);

        // 4. timing latches, with the unlatched Z2
        self.timing = self.timing.clocked(edge, z2);
        let t39 = self.timing.t39();
        if t39 && !self.last_t39 {
            self.sync_pulses += 1;
            trace!(
                "digitizer: sector pulse {} at falling clock edge {}",
                self.sync_pulses,
                self.falling_edges
            );
        }
        self.last_t39 = t39;

        DigitalSample {
            z1,
            z2: self.z2_latched,
            z3: self.z3_latched,
            track: self.track_latched,
            t4: self.timing.t4(),
            t7: self.timing.t7(),
            t39,
        }
    }
}

// Fixed delay for the sliced data track
//
// Holds the last `MAX_TRACK_DELAY` levels. The most
// recent level is at the back.
#[derive(Clone, Debug)]
struct DelayLine {
    history: ArrayDeque<bool, { SampleRateMode::MAX_TRACK_DELAY }, arraydeque::Wrapping>,
    delay: usize,
}

impl DelayLine {
    // `delay` must be between 1 and MAX_TRACK_DELAY
    fn new(delay: usize) -> Self {
        let mut history: ArrayDeque<bool, { SampleRateMode::MAX_TRACK_DELAY }, arraydeque::Wrapping> =
            ArrayDeque::default();
        for _i in 0..SampleRateMode::MAX_TRACK_DELAY {
            history.push_back(false);
        }
        Self {
            history,
            delay: usize::clamp(delay, 1, SampleRateMode::MAX_TRACK_DELAY),
        }
    }

    // level from `delay` samples ago
    fn delayed(&self) -> bool {
        self.history[self.history.len() - self.delay]
    }

    fn push(&mut self, level: bool) {
        self.history.push_back(level);
    }
}
