//! Spectral beat detection
//!
//! The audio source hands us a magnitude spectrum every tick. Three bands
//! (kick drums, mid toms, hi-hats) are tracked separately: each keeps a one
//! second log of its mean power, and a beat is flagged when the current power
//! jumps far enough above the logged mean relative to the logged spread.

use serde::{Deserialize, Serialize};

use crate::consts::SPECTRUM_LEN;
use crate::error::{Error, Result};
use crate::settings::{Settings, StaleBeatPolicy};

/// Samples kept per band (one second at 60 ticks per second)
pub const LOG_LEN: usize = 60;

/// Roughly 20-180 Hz: bass and kick drums
pub const LOW_BAND: BandRange = BandRange::new(0, 81);
/// Roughly 300-600 Hz: mid toms
pub const MID_BAND: BandRange = BandRange::new(119, 126);
/// Roughly 8-10 kHz: hi-hats and cymbals
pub const HIGH_BAND: BandRange = BandRange::new(222, 230);

/// Playback state of the audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Playback {
    Playing,
    Paused,
    /// The track ended or was stopped (distinct from paused)
    #[default]
    Stopped,
}

/// Audio snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct AudioInput {
    pub playback: Playback,
    /// Magnitude spectrum; only meaningful while playing
    pub spectrum: Vec<f32>,
}

impl AudioInput {
    pub fn playing(spectrum: Vec<f32>) -> Self {
        Self {
            playback: Playback::Playing,
            spectrum,
        }
    }

    pub fn paused() -> Self {
        Self {
            playback: Playback::Paused,
            spectrum: Vec::new(),
        }
    }

    pub fn stopped() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.playback == Playback::Stopped
    }
}

/// Inclusive range of spectrum indices treated as one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRange {
    pub first: usize,
    pub last: usize,
}

impl BandRange {
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    /// Mean magnitude across the band
    pub fn power(&self, spectrum: &[f32]) -> f32 {
        let bins = &spectrum[self.first..=self.last];
        bins.iter().sum::<f32>() / bins.len() as f32
    }

    fn check(&self, name: &'static str, spectrum_len: usize) -> Result<()> {
        if self.is_empty() || self.last >= spectrum_len {
            return Err(Error::InvalidBand {
                name,
                first: self.first,
                last: self.last,
                len: spectrum_len,
            });
        }
        Ok(())
    }
}

/// Rolling statistics over a band's log
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandStats {
    pub mean: f32,
    pub variance: f32,
    pub std_dev: f32,
}

impl BandStats {
    pub fn from_samples(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f32;
        let mean = samples.iter().sum::<f32>() / n;
        let variance = samples
            .iter()
            .map(|s| {
                let d = s - mean;
                d * d
            })
            .sum::<f32>()
            / n;
        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
        }
    }

    /// Does `current` stand out from these statistics?
    #[inline]
    pub fn is_beat(&self, current: f32, multiplier: f32) -> bool {
        current - self.mean > self.std_dev * multiplier
    }
}

/// One band's ring buffer and derived statistics
#[derive(Debug, Clone)]
struct BandLog {
    name: &'static str,
    range: BandRange,
    samples: [f32; LOG_LEN],
    current: f32,
    stats: BandStats,
}

impl BandLog {
    fn new(name: &'static str, range: BandRange) -> Self {
        Self {
            name,
            range,
            samples: [0.0; LOG_LEN],
            current: 0.0,
            stats: BandStats::default(),
        }
    }
}

/// Per-band beat flags for the latest tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatBands {
    pub low: bool,
    pub mid: bool,
    pub high: bool,
}

impl BeatBands {
    #[inline]
    pub fn any(&self) -> bool {
        self.low || self.mid || self.high
    }
}

/// Adaptive three-band beat detector
#[derive(Debug, Clone)]
pub struct BeatDetector {
    bands: [BandLog; 3],
    log_index: usize,
    /// Latches once the log has wrapped; never cleared
    ready: bool,
    multiplier: f32,
    stale_beats: StaleBeatPolicy,
    /// Whether the most recent update saw the source playing
    playing: bool,
    spectrum_len: usize,
}

impl BeatDetector {
    /// Detector with the standard bands over a `SPECTRUM_LEN` spectrum
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_bands([LOW_BAND, MID_BAND, HIGH_BAND], SPECTRUM_LEN, settings)
    }

    /// Detector over custom low/mid/high bands. Every band must fit inside
    /// `spectrum_len`.
    pub fn with_bands(
        ranges: [BandRange; 3],
        spectrum_len: usize,
        settings: &Settings,
    ) -> Result<Self> {
        let [low, mid, high] = ranges;
        low.check("low", spectrum_len)?;
        mid.check("mid", spectrum_len)?;
        high.check("high", spectrum_len)?;

        Ok(Self {
            bands: [
                BandLog::new("low", low),
                BandLog::new("mid", mid),
                BandLog::new("high", high),
            ],
            log_index: 0,
            ready: false,
            multiplier: settings.beat_multiplier,
            stale_beats: settings.stale_beats,
            playing: false,
            spectrum_len,
        })
    }

    /// Log this tick's band powers. No-op unless the source is playing.
    pub fn update(&mut self, audio: &AudioInput) {
        self.playing = audio.is_playing();
        if !self.playing {
            return;
        }
        if audio.spectrum.len() < self.spectrum_len {
            log::trace!(
                "Ignoring short spectrum ({} < {} bins)",
                audio.spectrum.len(),
                self.spectrum_len
            );
            return;
        }

        for band in &mut self.bands {
            band.current = band.range.power(&audio.spectrum);
            band.samples[self.log_index] = band.current;
        }

        if !self.ready && self.log_index == LOG_LEN - 1 {
            self.ready = true;
            log::debug!("Beat detector primed after {} samples", LOG_LEN);
        }

        if self.ready {
            for band in &mut self.bands {
                band.stats = BandStats::from_samples(&band.samples);
            }
        }

        self.log_index = (self.log_index + 1) % LOG_LEN;
    }

    /// True once a full log of samples has been collected
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Which bands flag a beat right now
    pub fn beat_bands(&self) -> BeatBands {
        if !self.ready || (self.stale_beats == StaleBeatPolicy::Suppress && !self.playing) {
            return BeatBands::default();
        }
        let [low, mid, high] =
            [0, 1, 2].map(|i| self.bands[i].stats.is_beat(self.bands[i].current, self.multiplier));
        BeatBands { low, mid, high }
    }

    /// Is there a beat in any band right now?
    #[inline]
    pub fn is_beat(&self) -> bool {
        self.beat_bands().any()
    }

    /// Statistics for low, mid and high bands (zeroed until ready)
    pub fn stats(&self) -> [BandStats; 3] {
        [0, 1, 2].map(|i| self.bands[i].stats)
    }

    /// Latest power for low, mid and high bands
    pub fn current_power(&self) -> [f32; 3] {
        [0, 1, 2].map(|i| self.bands[i].current)
    }

    pub fn band_names(&self) -> [&'static str; 3] {
        [0, 1, 2].map(|i| self.bands[i].name)
    }
}
