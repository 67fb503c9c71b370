use crate::config::{FilterKind, FilterSpec, WindowKind};
use crate::error::Result;
use crate::signal_processing::{Filter, SampleHistory, apply_window, design_coefficients};

/// Linear-phase FIR filter
///
/// Holds a symmetric set of 2N + 1 windowed-sinc coefficients and a ring
/// buffer of the last 2N + 1 inputs. Each output is the direct convolution
/// `Σ b[k]·x[n-k]`, so `b[0]` weights the newest sample.
///
/// The window is part of the filter's state: regenerating coefficients
/// reshapes the new design with the same window.
#[derive(Debug, Clone)]
pub struct FirFilter {
    /// Unwindowed design
    prototype: Vec<f64>,
    coefficients: Vec<f64>,
    window: WindowKind,
    history: SampleHistory,
    sampling_frequency: f64,
    tap_count: usize,
}

impl FirFilter {
    /// Create a new FIR filter from a filter specification
    ///
    /// # Errors
    /// Fails with the designer's configuration errors; no filter is
    /// produced if the specification is invalid.
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        let prototype = design_coefficients(
            spec.kind,
            &spec.cutoffs,
            spec.sampling_frequency,
            spec.tap_count,
        )?;

        Ok(Self {
            history: SampleHistory::new(prototype.len()),
            coefficients: prototype.clone(),
            prototype,
            window: WindowKind::Rectangular,
            sampling_frequency: spec.sampling_frequency,
            tap_count: spec.tap_count,
        })
    }

    /// Reshape the coefficients with a window function, replacing any
    /// window applied earlier
    pub fn apply_window(&mut self, window: WindowKind) {
        self.window = window;
        self.coefficients.clone_from(&self.prototype);
        apply_window(&mut self.coefficients, window);
    }

    pub fn window(&self) -> WindowKind {
        self.window
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.coefficients.len()
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        self.tap_count
    }

    /// Snapshot of the input history, oldest first
    pub fn history(&self) -> Vec<f64> {
        self.history.to_vec()
    }
}

impl Filter for FirFilter {
    fn generate_coefficients(&mut self, kind: FilterKind, cutoffs: &[f64]) -> Result<()> {
        self.prototype =
            design_coefficients(kind, cutoffs, self.sampling_frequency, self.tap_count)?;
        self.apply_window(self.window);
        Ok(())
    }

    fn apply_filter(&mut self, sample: f64) -> f64 {
        self.history.push(sample);
        self.history.weighted_sum(&self.coefficients)
    }

    fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}
