use std::f64::consts::PI;

/// Sum of `amplitude·sin(2π·f·t)` tones sampled at `sample_rate`
pub fn multi_tone(tones: &[(f64, f64)], num_samples: usize, sample_rate: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            tones
                .iter()
                .map(|&(freq, amplitude)| amplitude * (2.0 * PI * freq * t).sin())
                .sum::<f64>()
        })
        .collect()
}

/// Last `seconds` worth of samples, past the filter's start-up transient
pub fn settled_tail(signal: &[f64], sample_rate: f64, seconds: f64) -> &[f64] {
    let len = (sample_rate * seconds).round() as usize;
    &signal[signal.len().saturating_sub(len)..]
}
