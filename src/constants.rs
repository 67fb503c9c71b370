//! Numeric constants shared by the filter designer and the signal codecs.

/// Default tap half-width; designs then carry 2 * 50 + 1 = 101 coefficients.
pub const DEFAULT_TAP_COUNT: usize = 50;

/// Full-scale magnitude of a 16-bit PCM sample.
/// Decoding divides by this value, so -32768 maps slightly below -1.0.
pub const PCM16_FULL_SCALE: f64 = 32767.0;

/// Bit depth written by the WAV encoder.
pub const PCM16_BITS: u16 = 16;
