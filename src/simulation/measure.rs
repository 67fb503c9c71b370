use std::f64::consts::PI;

/// Root-mean-square level of a signal (0 for an empty slice)
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Amplitude of the `freq` Hz component of `signal`, by single-bin
/// correlation against a complex tone.
///
/// Exact for a tone that completes a whole number of cycles over the slice.
pub fn tone_amplitude(signal: &[f64], freq: f64, sample_rate: f64) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let omega = 2.0 * PI * freq / sample_rate;
    let (i_sum, q_sum) = signal
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(i_acc, q_acc), (n, &x)| {
            let phase = omega * n as f64;
            (i_acc + x * phase.cos(), q_acc + x * phase.sin())
        });
    2.0 * (i_sum * i_sum + q_sum * q_sum).sqrt() / signal.len() as f64
}
