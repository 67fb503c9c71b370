//! Windowed-sinc coefficient design for linear-phase FIR filters.
//!
//! A design with half-width N yields 2N + 1 coefficients, symmetric about the
//! centre index. Cut-offs are normalized as `cutoff / sampling_frequency`, so
//! the ideal low-pass response is `h(i) = 2·ωc·sinc(2π·i·ωc)`.

use std::f64::consts::PI;

use crate::config::{FilterKind, check_design_parameters};
use crate::error::{FilterError, Result};

/// Design the raw (unwindowed) coefficients for a filter.
///
/// # Arguments
/// * `kind` - Response shape
/// * `cutoffs` - One cut-off in Hz for low/high pass, two for band pass/stop
/// * `sampling_frequency` - Sample rate of the signal in Hz
/// * `tap_count` - Half-width N of the filter
///
/// # Errors
/// Returns `InvalidCutoffCount` when the cut-off list does not match `kind`,
/// and `InvalidCutoffFrequency`, `InvalidSamplingFrequency` or
/// `InvalidTapCount` for out-of-range parameters.
pub fn design_coefficients(
    kind: FilterKind,
    cutoffs: &[f64],
    sampling_frequency: f64,
    tap_count: usize,
) -> Result<Vec<f64>> {
    check_design_parameters(sampling_frequency, tap_count)?;
    kind.check_cutoffs(cutoffs, sampling_frequency)?;

    let normalized: Vec<f64> = cutoffs.iter().map(|c| c / sampling_frequency).collect();
    log::debug!(
        "Designing {} FIR: cutoffs={:?} Hz, fs={} Hz, N={}",
        kind,
        cutoffs,
        sampling_frequency,
        tap_count
    );

    let (taps, center): (Vec<f64>, f64) = match kind {
        FilterKind::LowPass => {
            let wc = normalized[0];
            let taps = (1..=tap_count).map(|i| lowpass_tap(i, wc)).collect();
            (taps, 2.0 * wc)
        }
        FilterKind::HighPass => {
            let wc = normalized[0];
            let taps = (1..=tap_count).map(|i| -lowpass_tap(i, wc)).collect();
            (taps, 1.0 - 2.0 * wc)
        }
        FilterKind::BandPass => {
            let (wc1, wc2) = (normalized[0], normalized[1]);
            let taps = (1..=tap_count)
                .map(|i| bandpass_tap(i, wc1, wc2))
                .collect();
            (taps, 2.0 * wc2 - 2.0 * wc1)
        }
        FilterKind::BandStop => {
            let (wc1, wc2) = (normalized[0], normalized[1]);
            let taps = (1..=tap_count)
                .map(|i| 1.0 - bandpass_tap(i, wc1, wc2))
                .collect();
            (taps, 1.0 - (2.0 * wc2 - 2.0 * wc1))
        }
    };

    let coefficients = mirror_taps(&taps, center);

    let expected = 2 * tap_count + 1;
    if coefficients.len() != expected {
        return Err(FilterError::CoefficientCountMismatch {
            expected,
            actual: coefficients.len(),
        });
    }

    Ok(coefficients)
}

/// Ideal low-pass impulse response at tap `i >= 1`
fn lowpass_tap(i: usize, wc: f64) -> f64 {
    let x = 2.0 * PI * i as f64 * wc;
    2.0 * wc * x.sin() / x
}

fn bandpass_tap(i: usize, wc1: f64, wc2: f64) -> f64 {
    lowpass_tap(i, wc2) - lowpass_tap(i, wc1)
}

/// Lay out `[h(N) .. h(1), center, h(1) .. h(N)]`
fn mirror_taps(taps: &[f64], center: f64) -> Vec<f64> {
    let mut coefficients = Vec::with_capacity(2 * taps.len() + 1);
    coefficients.extend(taps.iter().rev());
    coefficients.push(center);
    coefficients.extend_from_slice(taps);
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL_KINDS: [(FilterKind, &[f64]); 4] = [
        (FilterKind::LowPass, &[5.0]),
        (FilterKind::HighPass, &[15.0]),
        (FilterKind::BandPass, &[5.0, 15.0]),
        (FilterKind::BandStop, &[5.0, 15.0]),
    ];

    #[test]
    fn test_coefficient_count() {
        for (kind, cutoffs) in ALL_KINDS {
            for n in [1, 2, 7, 50] {
                let coeffs = design_coefficients(kind, cutoffs, 200.0, n).unwrap();
                assert_eq!(coeffs.len(), 2 * n + 1, "{} with N={}", kind, n);
            }
        }
    }

    #[test]
    fn test_coefficients_symmetric() {
        for (kind, cutoffs) in ALL_KINDS {
            let coeffs = design_coefficients(kind, cutoffs, 200.0, 25).unwrap();
            let last = coeffs.len() - 1;
            for i in 0..coeffs.len() {
                assert_abs_diff_eq!(coeffs[i], coeffs[last - i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_lowpass_concrete_values() {
        // fs = 100 Hz, fc = 5 Hz, N = 2
        let coeffs = design_coefficients(FilterKind::LowPass, &[5.0], 100.0, 2).unwrap();
        let wc: f64 = 0.05;
        let h1 = 2.0 * wc * (2.0 * PI * wc).sin() / (2.0 * PI * wc);
        let h2 = 2.0 * wc * (4.0 * PI * wc).sin() / (4.0 * PI * wc);

        let expected = [h2, h1, 2.0 * wc, h1, h2];
        assert_eq!(coeffs.len(), 5);
        for (got, want) in coeffs.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }

        // sin(0.1π)/π and sin(0.2π)/2π
        assert_abs_diff_eq!(coeffs[1], 0.098363164, epsilon = 1e-8);
        assert_abs_diff_eq!(coeffs[0], 0.093548928, epsilon = 1e-8);
        assert_abs_diff_eq!(coeffs[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_highpass_is_negated_lowpass_off_center() {
        let lp = design_coefficients(FilterKind::LowPass, &[20.0], 200.0, 10).unwrap();
        let hp = design_coefficients(FilterKind::HighPass, &[20.0], 200.0, 10).unwrap();
        for i in 0..lp.len() {
            if i == 10 {
                assert_abs_diff_eq!(hp[i], 1.0 - lp[i], epsilon = 1e-12);
            } else {
                assert_abs_diff_eq!(hp[i], -lp[i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_bandpass_is_lowpass_difference() {
        let lp1 = design_coefficients(FilterKind::LowPass, &[5.0], 200.0, 12).unwrap();
        let lp2 = design_coefficients(FilterKind::LowPass, &[15.0], 200.0, 12).unwrap();
        let bp = design_coefficients(FilterKind::BandPass, &[5.0, 15.0], 200.0, 12).unwrap();
        for i in 0..bp.len() {
            assert_abs_diff_eq!(bp[i], lp2[i] - lp1[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bandstop_taps() {
        let bp = design_coefficients(FilterKind::BandPass, &[5.0, 15.0], 200.0, 4).unwrap();
        let bs = design_coefficients(FilterKind::BandStop, &[5.0, 15.0], 200.0, 4).unwrap();
        for i in 0..bs.len() {
            assert_abs_diff_eq!(bs[i], 1.0 - bp[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_band_edges_order_not_enforced() {
        let forward = design_coefficients(FilterKind::BandPass, &[5.0, 15.0], 200.0, 3).unwrap();
        let swapped = design_coefficients(FilterKind::BandPass, &[15.0, 5.0], 200.0, 3).unwrap();
        for (a, b) in forward.iter().zip(&swapped) {
            assert_abs_diff_eq!(*a, -*b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_wrong_cutoff_count() {
        let err = design_coefficients(FilterKind::LowPass, &[5.0, 10.0], 100.0, 2).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidCutoffCount {
                kind: FilterKind::LowPass,
                expected: 1,
                actual: 2
            }
        ));

        let err = design_coefficients(FilterKind::BandPass, &[], 100.0, 2).unwrap_err();
        assert!(matches!(err, FilterError::InvalidCutoffCount { .. }));
    }

    #[test]
    fn test_zero_cutoff_rejected() {
        let err = design_coefficients(FilterKind::LowPass, &[0.0], 100.0, 2).unwrap_err();
        assert!(matches!(err, FilterError::InvalidCutoffFrequency { .. }));
    }
}
