use crate::config::{FilterDesign, FilterKind, FilterSpec, WindowKind};
use crate::error::Result;
use crate::signal_processing::{FirFilter, IirFilter};

/// Common trait for streaming filters
///
/// Implemented by FirFilter and IirFilter. Samples must be fed in signal
/// order; there is no way for a filter to detect reordering.
pub trait Filter {
    /// Recompute the coefficient set(s) for a new kind and cut-off list.
    ///
    /// On error the previous coefficients are kept untouched.
    fn generate_coefficients(&mut self, kind: FilterKind, cutoffs: &[f64]) -> Result<()>;

    /// Process a single sample through the filter
    fn apply_filter(&mut self, sample: f64) -> f64;

    /// Feedforward coefficients, in convolution order
    fn coefficients(&self) -> &[f64];

    /// Zero the sample history so the next sample starts a fresh stream
    fn reset(&mut self);

    /// Process a buffer of samples in-place
    fn process_buffer(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.apply_filter(*sample);
        }
    }
}

/// Build a filter for `spec` using the requested structure.
///
/// The window only applies to FIR designs.
pub fn build_filter(
    spec: &FilterSpec,
    design: FilterDesign,
    window: WindowKind,
) -> Result<Box<dyn Filter>> {
    match design {
        FilterDesign::Fir => {
            let mut filter = FirFilter::new(spec)?;
            filter.apply_window(window);
            Ok(Box::new(filter))
        }
        FilterDesign::Iir => {
            if window != WindowKind::Rectangular {
                log::warn!("Window {} ignored for IIR design", window);
            }
            Ok(Box::new(IirFilter::new(spec)?))
        }
    }
}
