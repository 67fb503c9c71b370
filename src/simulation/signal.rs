use std::f64::consts::PI;

use crate::error::{FilterError, Result};

/// Synthetic multi-tone signal
#[derive(Debug, Clone)]
pub struct SineSignal {
    /// Domain grid (radians, where a 1 Hz tone completes a cycle every 2π)
    pub x: Vec<f64>,
    pub samples: Vec<f64>,
    /// Equivalent sample rate, treating `sin(x)` as a 1 Hz tone
    pub sample_rate: f64,
}

/// Sum `amplitude·sin(frequency·x − phase)` over an evenly spaced grid.
///
/// The grid has `signal_length` points starting at `begin` with spacing
/// `(end − begin) / signal_length`, so `end` itself is excluded.
///
/// # Errors
/// `SignalParameterMismatch` if the three tone lists differ in length;
/// `Config` for an empty or reversed domain.
pub fn generate_sine_signal(
    frequencies: &[f64],
    amplitudes: &[f64],
    phase_offsets: &[f64],
    signal_length: usize,
    begin: f64,
    end: f64,
) -> Result<SineSignal> {
    if frequencies.len() != amplitudes.len() || amplitudes.len() != phase_offsets.len() {
        return Err(FilterError::SignalParameterMismatch {
            frequencies: frequencies.len(),
            amplitudes: amplitudes.len(),
            phase_offsets: phase_offsets.len(),
        });
    }
    if signal_length == 0 {
        return Err(FilterError::Config("signal length must be positive".to_string()));
    }
    if !begin.is_finite() || !end.is_finite() || end <= begin {
        return Err(FilterError::Config(format!(
            "invalid signal domain [{}, {})",
            begin, end
        )));
    }

    let span = end - begin;
    let step = span / signal_length as f64;
    let x: Vec<f64> = (0..signal_length).map(|j| begin + j as f64 * step).collect();

    let samples: Vec<f64> = x
        .iter()
        .map(|&xj| {
            frequencies
                .iter()
                .zip(amplitudes)
                .zip(phase_offsets)
                .map(|((f, a), phase)| a * (f * xj - phase).sin())
                .sum::<f64>()
        })
        .collect();

    let sample_rate = signal_length as f64 / (span / (2.0 * PI));

    Ok(SineSignal {
        x,
        samples,
        sample_rate,
    })
}
