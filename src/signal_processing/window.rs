use std::f64::consts::PI;

use crate::config::WindowKind;

/// Weight of window `kind` at index `i` of a `len`-point window
///
/// Uses the symmetric form with angle `2πi / (len - 1)`, so the window is
/// mirrored about its centre like the coefficients it shapes.
pub fn window_weight(kind: WindowKind, i: usize, len: usize) -> f64 {
    if len < 2 {
        return 1.0;
    }
    let theta = 2.0 * PI * i as f64 / (len - 1) as f64;
    match kind {
        WindowKind::Rectangular => 1.0,
        WindowKind::Hanning => 0.5 - 0.5 * theta.cos(),
        WindowKind::Hamming => 0.54 - 0.46 * theta.cos(),
        WindowKind::Blackman => 0.42 - 0.5 * theta.cos() + 0.08 * (2.0 * theta).cos(),
    }
}

/// Multiply each coefficient by its window weight, in place
pub fn apply_window(coefficients: &mut [f64], kind: WindowKind) {
    if kind == WindowKind::Rectangular {
        return;
    }
    let len = coefficients.len();
    for (i, c) in coefficients.iter_mut().enumerate() {
        *c *= window_weight(kind, i, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rectangular_is_noop() {
        let mut coeffs = vec![0.3, -0.2, 0.9, -0.2, 0.3];
        let original = coeffs.clone();
        apply_window(&mut coeffs, WindowKind::Rectangular);
        assert_eq!(coeffs, original);
    }

    #[test]
    fn test_window_endpoints_and_peak() {
        let len = 11;
        assert_abs_diff_eq!(window_weight(WindowKind::Hanning, 0, len), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(window_weight(WindowKind::Hanning, 5, len), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(window_weight(WindowKind::Hamming, 0, len), 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(window_weight(WindowKind::Hamming, 5, len), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(window_weight(WindowKind::Blackman, 0, len), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(window_weight(WindowKind::Blackman, 5, len), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_windows_symmetric() {
        let len = 21;
        for kind in [WindowKind::Hanning, WindowKind::Hamming, WindowKind::Blackman] {
            for i in 0..len {
                assert_abs_diff_eq!(
                    window_weight(kind, i, len),
                    window_weight(kind, len - 1 - i, len),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_blackman_quarter_point() {
        // θ = π/2: 0.42 - 0.5·0 + 0.08·cos(π) = 0.34
        assert_abs_diff_eq!(
            window_weight(WindowKind::Blackman, 5, 21),
            0.34,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_apply_window_scales_elementwise() {
        let mut coeffs = vec![2.0; 5];
        apply_window(&mut coeffs, WindowKind::Hanning);
        assert_abs_diff_eq!(coeffs[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coeffs[1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(coeffs[2], 2.0, epsilon = 1e-12);
    }
}
