//! Configuration for sigfilt filter jobs.
//!
//! Filter parameters can come from three places, in increasing precedence:
//! built-in defaults, a TOML job file, and command line flags.
//!
//! ```toml
//! [filter]
//! kind = "band_pass"
//! cutoffs = [200.0, 3000.0]
//! taps = 50
//! window = "hamming"
//!
//! [output]
//! dir = "out"
//! save_wav = true
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::DEFAULT_TAP_COUNT;
use crate::error::{FilterError, Result};

/// Frequency response shape of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterKind {
    /// Passes frequencies below the cut-off
    LowPass,
    /// Passes frequencies above the cut-off
    HighPass,
    /// Passes frequencies between two cut-offs
    BandPass,
    /// Rejects frequencies between two cut-offs
    BandStop,
}

impl FilterKind {
    /// Number of cut-off frequencies this kind is designed from
    pub fn cutoff_count(&self) -> usize {
        match self {
            FilterKind::LowPass | FilterKind::HighPass => 1,
            FilterKind::BandPass | FilterKind::BandStop => 2,
        }
    }

    /// Two letter prefix used when naming exported files
    pub fn initials(&self) -> &'static str {
        match self {
            FilterKind::LowPass => "LP",
            FilterKind::HighPass => "HP",
            FilterKind::BandPass => "BP",
            FilterKind::BandStop => "BS",
        }
    }

    /// Check only that `cutoffs` has as many entries as this kind needs
    pub fn check_cutoff_count(&self, cutoffs: &[f64]) -> Result<()> {
        if cutoffs.len() != self.cutoff_count() {
            return Err(FilterError::InvalidCutoffCount {
                kind: *self,
                expected: self.cutoff_count(),
                actual: cutoffs.len(),
            });
        }
        Ok(())
    }

    /// Check a cut-off list against this kind and the sampling frequency.
    ///
    /// The count check runs first so a low pass given two cut-offs is always
    /// reported as a count problem, never silently truncated.
    pub fn check_cutoffs(&self, cutoffs: &[f64], sampling_frequency: f64) -> Result<()> {
        self.check_cutoff_count(cutoffs)?;

        let nyquist = sampling_frequency / 2.0;
        for &cutoff in cutoffs {
            if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= nyquist {
                return Err(FilterError::InvalidCutoffFrequency { cutoff, nyquist });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::LowPass => "low_pass",
            FilterKind::HighPass => "high_pass",
            FilterKind::BandPass => "band_pass",
            FilterKind::BandStop => "band_stop",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = normalize_tag(s);
        match tag.as_str() {
            "lowpass" | "lp" => Ok(FilterKind::LowPass),
            "highpass" | "hp" => Ok(FilterKind::HighPass),
            "bandpass" | "bp" => Ok(FilterKind::BandPass),
            "bandstop" | "bs" | "notch" => Ok(FilterKind::BandStop),
            _ => Err(FilterError::InvalidFilterType(s.trim().to_string())),
        }
    }
}

/// Window applied to FIR coefficients after design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WindowKind {
    /// No reshaping
    #[default]
    Rectangular,
    Hanning,
    Hamming,
    Blackman,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hanning => "hanning",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
        };
        f.write_str(name)
    }
}

impl FromStr for WindowKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = normalize_tag(s);
        match tag.as_str() {
            "rectangular" | "rect" | "none" => Ok(WindowKind::Rectangular),
            "hanning" | "hann" => Ok(WindowKind::Hanning),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            _ => Err(FilterError::InvalidWindowFunction(s.trim().to_string())),
        }
    }
}

/// Filter structure used to realise a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterDesign {
    /// Finite impulse response, windowed-sinc coefficients
    #[default]
    Fir,
    /// Infinite impulse response recurrence (coefficient design unavailable)
    Iir,
}

impl FromStr for FilterDesign {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_tag(s).as_str() {
            "fir" => Ok(FilterDesign::Fir),
            "iir" => Ok(FilterDesign::Iir),
            _ => Err(FilterError::Config(format!(
                "invalid filter design: {} (valid designs: fir, iir)",
                s.trim()
            ))),
        }
    }
}

fn normalize_tag(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Everything needed to design one filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    /// Cut-off frequencies in Hz (one for low/high pass, two for band pass/stop)
    pub cutoffs: Vec<f64>,
    /// Sampling frequency of the signal in Hz
    pub sampling_frequency: f64,
    /// Half-width N; the designed filter has 2N + 1 coefficients
    pub tap_count: usize,
}

impl FilterSpec {
    pub fn new(
        kind: FilterKind,
        cutoffs: impl Into<Vec<f64>>,
        sampling_frequency: f64,
        tap_count: usize,
    ) -> Self {
        Self {
            kind,
            cutoffs: cutoffs.into(),
            sampling_frequency,
            tap_count,
        }
    }

    /// Total number of coefficients (2N + 1)
    pub fn total_taps(&self) -> usize {
        2 * self.tap_count + 1
    }

    pub fn validate(&self) -> Result<()> {
        check_design_parameters(self.sampling_frequency, self.tap_count)?;
        self.kind
            .check_cutoffs(&self.cutoffs, self.sampling_frequency)
    }
}

pub(crate) fn check_design_parameters(sampling_frequency: f64, tap_count: usize) -> Result<()> {
    if !sampling_frequency.is_finite() || sampling_frequency <= 0.0 {
        return Err(FilterError::InvalidSamplingFrequency(sampling_frequency));
    }
    if tap_count == 0 {
        return Err(FilterError::InvalidTapCount(tap_count));
    }
    Ok(())
}

/// Job file contents, as read from TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    pub filter: FilterSection,
    pub output: OutputSection,
}

/// `[filter]` table of a job file
///
/// Tags are kept as strings so that bad values are reported with the same
/// errors as command line input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSection {
    pub kind: Option<String>,
    pub cutoffs: Option<Vec<f64>>,
    pub taps: Option<usize>,
    pub window: Option<String>,
    pub design: Option<String>,
}

/// `[output]` table of a job file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub save_wav: Option<bool>,
}

impl JobConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| FilterError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn kind(&self) -> Result<Option<FilterKind>> {
        self.filter.kind.as_deref().map(str::parse).transpose()
    }

    pub fn window(&self) -> Result<Option<WindowKind>> {
        self.filter.window.as_deref().map(str::parse).transpose()
    }

    pub fn design(&self) -> Result<Option<FilterDesign>> {
        self.filter.design.as_deref().map(str::parse).transpose()
    }

    pub fn taps(&self) -> usize {
        self.filter.taps.unwrap_or(DEFAULT_TAP_COUNT)
    }
}
