use crate::config::{FilterKind, FilterSpec};
use crate::error::{FilterError, Result};
use crate::signal_processing::{Filter, SampleHistory};

/// Direct-form IIR recurrence
///
/// Computes `y[n] = Σ b[k]·x[n-k] - Σ a[k]·y[n-1-k]`. Feedback coefficient
/// `a[0]` therefore weights the previous output; the output produced by a
/// call only enters the feedback sum from the next call on.
///
/// Coefficient design from a `FilterSpec` is not available yet; build the
/// engine from known coefficients with [`IirFilter::from_coefficients`].
#[derive(Debug, Clone)]
pub struct IirFilter {
    b_coefficients: Vec<f64>,
    a_coefficients: Vec<f64>,
    input_history: SampleHistory,
    output_history: SampleHistory,
}

impl IirFilter {
    /// Design an IIR filter from a specification.
    ///
    /// # Errors
    /// Configuration errors are reported first; a valid specification then
    /// fails with `NotImplemented`.
    pub fn new(spec: &FilterSpec) -> Result<Self> {
        spec.validate()?;
        let mut filter = Self::from_coefficients(Vec::new(), Vec::new());
        filter.generate_coefficients(spec.kind, &spec.cutoffs)?;
        Ok(filter)
    }

    /// Build the recurrence engine from feedforward `b` and feedback `a`
    /// coefficients. Each history is sized to its coefficient set.
    pub fn from_coefficients(b_coefficients: Vec<f64>, a_coefficients: Vec<f64>) -> Self {
        Self {
            input_history: SampleHistory::new(b_coefficients.len()),
            output_history: SampleHistory::new(a_coefficients.len()),
            b_coefficients,
            a_coefficients,
        }
    }

    pub fn feedback_coefficients(&self) -> &[f64] {
        &self.a_coefficients
    }
}

impl Filter for IirFilter {
    fn generate_coefficients(&mut self, kind: FilterKind, cutoffs: &[f64]) -> Result<()> {
        kind.check_cutoff_count(cutoffs)?;
        Err(FilterError::NotImplemented(match kind {
            FilterKind::LowPass => "IIR low pass coefficient design",
            FilterKind::HighPass => "IIR high pass coefficient design",
            FilterKind::BandPass => "IIR band pass coefficient design",
            FilterKind::BandStop => "IIR band stop coefficient design",
        }))
    }

    fn apply_filter(&mut self, sample: f64) -> f64 {
        self.input_history.push(sample);

        let feedforward = self.input_history.weighted_sum(&self.b_coefficients);
        let feedback = self.output_history.weighted_sum(&self.a_coefficients);
        let output = feedforward - feedback;

        self.output_history.push(output);
        output
    }

    fn coefficients(&self) -> &[f64] {
        &self.b_coefficients
    }

    fn reset(&mut self) {
        self.input_history.clear();
        self.output_history.clear();
    }
}
