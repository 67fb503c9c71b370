mod measure;
mod signal;

pub use measure::{rms, tone_amplitude};
pub use signal::{SineSignal, generate_sine_signal};
