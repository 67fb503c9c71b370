use std::path::PathBuf;

use thiserror::Error;

use crate::config::FilterKind;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error(
        "Invalid filter type: {0} (valid filter types: low_pass, high_pass, band_pass, band_stop)"
    )]
    InvalidFilterType(String),

    #[error("{kind} filter needs {expected} cut-off frequencies, got {actual}")]
    InvalidCutoffCount {
        kind: FilterKind,
        expected: usize,
        actual: usize,
    },

    #[error("Cut-off frequency {cutoff} Hz must lie strictly between 0 and {nyquist} Hz")]
    InvalidCutoffFrequency { cutoff: f64, nyquist: f64 },

    #[error("Sampling frequency must be positive and finite, got {0}")]
    InvalidSamplingFrequency(f64),

    #[error("Tap count must be at least 1, got {0}")]
    InvalidTapCount(usize),

    #[error(
        "Invalid window function: {0} (valid window functions: rectangular, hanning, hamming, blackman)"
    )]
    InvalidWindowFunction(String),

    #[error("Number of coefficients is not equal to number of taps: {actual} != {expected}")]
    CoefficientCountMismatch { expected: usize, actual: usize },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Unable to read file {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write file {}: {source}", path.display())]
    FileUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed WAV container: {0}")]
    MalformedContainer(String),

    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    #[error("Channel length mismatch: expected {expected} samples, got {actual}")]
    ChannelLengthMismatch { expected: usize, actual: usize },

    #[error(
        "Number of frequencies ({frequencies}), amplitudes ({amplitudes}) and phase offsets ({phase_offsets}) are not equal"
    )]
    SignalParameterMismatch {
        frequencies: usize,
        amplitudes: usize,
        phase_offsets: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
