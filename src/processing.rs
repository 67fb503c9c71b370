use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{FilterDesign, FilterKind, FilterSpec, WindowKind};
use crate::csv::{read_csv, write_csv};
use crate::error::{FilterError, Result};
use crate::paths::base_name;
use crate::signal_processing::build_filter;
use crate::wav::{read_wav, write_wav};

/// Where a signal was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    Wav,
    Csv,
    Synthetic,
}

/// Multi-channel signal ready for filtering
#[derive(Debug, Clone)]
pub struct LoadedSignal {
    /// Base name used for exported files
    pub name: String,
    /// Independent variable (seconds for WAV input)
    pub x: Vec<f64>,
    pub channels: Vec<Vec<f64>>,
    pub sample_rate: f64,
    pub source: SignalSource,
}

impl LoadedSignal {
    /// Load a `.wav` or `.csv` file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("wav") => Self::from_wav(path),
            Some("csv") => Self::from_csv(path),
            _ => Err(FilterError::Config(format!(
                "unsupported input file {} (expected .wav or .csv)",
                path.display()
            ))),
        }
    }

    pub fn from_wav<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let wav = read_wav(path)?;
        let sample_rate = wav.sample_rate as f64;
        let mut signal = Self::from_channels(base_name(path), wav.channels, sample_rate)?;
        signal.source = SignalSource::Wav;
        Ok(signal)
    }

    /// Load a CSV whose first column is time in seconds.
    ///
    /// The sample rate is taken from the spacing of the first two rows.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut columns = read_csv(path)?;
        if columns.len() < 2 {
            return Err(FilterError::MalformedCsv {
                line: 1,
                reason: "need a time column and at least one channel".to_string(),
            });
        }

        let x = columns.remove(0);
        if x.len() < 2 {
            return Err(FilterError::MalformedCsv {
                line: 1,
                reason: "need at least two rows to infer the sample rate".to_string(),
            });
        }
        let sample_rate = 1.0 / (x[1] - x[0]);
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FilterError::InvalidSamplingFrequency(sample_rate));
        }

        Ok(Self {
            name: base_name(path),
            x,
            channels: columns,
            sample_rate,
            source: SignalSource::Csv,
        })
    }

    /// Wrap in-memory channels, generating a time axis at `sample_rate`
    pub fn from_channels(
        name: impl Into<String>,
        channels: Vec<Vec<f64>>,
        sample_rate: f64,
    ) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FilterError::InvalidSamplingFrequency(sample_rate));
        }
        let frames = channels.first().map_or(0, Vec::len);
        if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
            return Err(FilterError::ChannelLengthMismatch {
                expected: frames,
                actual: bad.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            x: time_axis(frames, sample_rate),
            channels,
            sample_rate,
            source: SignalSource::Synthetic,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.x.len()
    }
}

/// `len` sample instants, `1 / sample_rate` apart, starting at 0
pub fn time_axis(len: usize, sample_rate: f64) -> Vec<f64> {
    (0..len).map(|i| i as f64 / sample_rate).collect()
}

/// Result of streaming a signal through one filter design
#[derive(Debug, Clone)]
pub struct FilterRun {
    pub spec: FilterSpec,
    pub window: WindowKind,
    pub coefficients: Vec<f64>,
    pub channels: Vec<Vec<f64>>,
    pub design_time: Duration,
    pub filter_time: Duration,
}

/// Design a filter and stream every channel through it.
///
/// Each channel starts from a zeroed history so channels never bleed into
/// each other.
pub fn run_filter(
    spec: &FilterSpec,
    design: FilterDesign,
    window: WindowKind,
    channels: &[Vec<f64>],
) -> Result<FilterRun> {
    log::info!("Calculating coefficients...");
    let start = Instant::now();
    let mut filter = build_filter(spec, design, window)?;
    let design_time = start.elapsed();
    log::info!("Took {:.3} ms", design_time.as_secs_f64() * 1000.0);

    log::info!("Filtering signal...");
    let start = Instant::now();
    let filtered: Vec<Vec<f64>> = channels
        .iter()
        .map(|channel| {
            filter.reset();
            let mut output = channel.clone();
            filter.process_buffer(&mut output);
            output
        })
        .collect();
    let filter_time = start.elapsed();
    log::info!("Took {:.3} ms", filter_time.as_secs_f64() * 1000.0);

    Ok(FilterRun {
        spec: spec.clone(),
        window,
        coefficients: filter.coefficients().to_vec(),
        channels: filtered,
        design_time,
        filter_time,
    })
}

/// Files written by [`export_results`]
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub coefficients: PathBuf,
    pub filtered_csv: PathBuf,
    pub filtered_wav: Option<PathBuf>,
}

/// Write coefficients and filtered channels next to each other in `out_dir`.
///
/// Files are named `"<LP|HP|BP|BS> coefficients for <name>.csv"` and
/// `"<LP|HP|BP|BS> <name>.csv"` (plus `.wav` when requested).
pub fn export_results(
    run: &FilterRun,
    signal: &LoadedSignal,
    out_dir: &Path,
    save_wav: bool,
) -> Result<ExportedFiles> {
    fs::create_dir_all(out_dir).map_err(|source| FilterError::FileUnwritable {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let prefix = run.spec.kind.initials();
    let index: Vec<f64> = (0..run.coefficients.len()).map(|i| i as f64).collect();
    let coefficients = write_csv(
        out_dir.join(format!("{} coefficients for {}.csv", prefix, signal.name)),
        &index,
        std::slice::from_ref(&run.coefficients),
    )?;

    let filtered_name = format!("{} {}", prefix, signal.name);
    let filtered_csv = write_csv(
        out_dir.join(format!("{}.csv", filtered_name)),
        &signal.x,
        &run.channels,
    )?;

    let filtered_wav = if save_wav {
        Some(write_wav(
            out_dir.join(format!("{}.wav", filtered_name)),
            &run.channels,
            signal.sample_rate,
        )?)
    } else {
        None
    };

    Ok(ExportedFiles {
        coefficients,
        filtered_csv,
        filtered_wav,
    })
}

/// One filter kind and its cut-offs, as run by [`run_experiments`]
pub type Experiment<'a> = (FilterKind, &'a [f64]);

/// Run and export several designs over the same signal.
///
/// Every experiment shares the tap count and window. The first failing
/// design stops the batch.
pub fn run_experiments(
    signal: &LoadedSignal,
    experiments: &[Experiment<'_>],
    tap_count: usize,
    window: WindowKind,
    out_dir: &Path,
    save_wav: bool,
) -> Result<Vec<(FilterRun, ExportedFiles)>> {
    experiments
        .iter()
        .map(|&(kind, cutoffs)| {
            log::info!("Running {} {:?} Hz on {}", kind, cutoffs, signal.name);
            let spec = FilterSpec::new(kind, cutoffs, signal.sample_rate, tap_count);
            let run = run_filter(&spec, FilterDesign::Fir, window, &signal.channels)?;
            let files = export_results(&run, signal, out_dir, save_wav)?;
            Ok((run, files))
        })
        .collect()
}

/// Serializable description of a designed filter
#[derive(Debug, Clone, Serialize)]
pub struct CoefficientReport {
    pub kind: String,
    pub cutoffs: Vec<f64>,
    pub sampling_frequency: f64,
    pub tap_count: usize,
    pub window: String,
    pub coefficients: Vec<f64>,
}

impl CoefficientReport {
    pub fn new(spec: &FilterSpec, window: WindowKind, coefficients: &[f64]) -> Self {
        Self {
            kind: spec.kind.to_string(),
            cutoffs: spec.cutoffs.clone(),
            sampling_frequency: spec.sampling_frequency,
            tap_count: spec.tap_count,
            window: window.to_string(),
            coefficients: coefficients.to_vec(),
        }
    }
}

impl From<&FilterRun> for CoefficientReport {
    fn from(run: &FilterRun) -> Self {
        Self::new(&run.spec, run.window, &run.coefficients)
    }
}
