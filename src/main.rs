use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};

use sigfilt::config::{FilterDesign, FilterKind, FilterSpec, JobConfig, WindowKind};
use sigfilt::constants::DEFAULT_TAP_COUNT;
use sigfilt::csv::write_csv;
use sigfilt::processing::{
    CoefficientReport, Experiment, ExportedFiles, LoadedSignal, export_results, run_experiments,
    run_filter, time_axis,
};
use sigfilt::signal_processing::build_filter;
use sigfilt::simulation::{generate_sine_signal, rms, tone_amplitude};
use sigfilt::wav::read_wav;

#[derive(Parser, Debug)]
#[command(name = "sigfilt")]
#[command(about = "Design windowed-sinc FIR filters and apply them to WAV or CSV signals", long_about = None)]
struct Cli {
    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter every channel of a WAV or CSV file
    Filter {
        /// Input file (.wav or .csv with a leading time column)
        input: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Also write the filtered signal as a 16-bit WAV file
        #[arg(long)]
        save_wav: bool,

        /// Directory for exported files (default: next to the input)
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,
    },

    /// Convert a WAV file to CSV (time column plus one column per channel)
    Convert {
        /// WAV file to convert
        input: PathBuf,

        /// Output CSV path (default: input with a .csv extension)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the coefficients of a filter design
    Coefficients {
        #[command(flatten)]
        filter: FilterArgs,

        /// Sampling frequency in Hz
        #[arg(short = 's', long)]
        sample_rate: f64,

        /// Output format: text, csv, json
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Filter a synthetic 1/10/50 Hz tone mix with low-, high- and band-pass designs,
    /// and optionally a WAV recording with audio-band designs
    Demo {
        /// Directory for exported files
        #[arg(short = 'o', long, default_value = "demo_output")]
        output_dir: PathBuf,

        /// Number of taps on each side of the centre tap
        #[arg(short = 't', long, default_value_t = DEFAULT_TAP_COUNT)]
        taps: usize,

        /// Window applied to each design
        #[arg(short = 'w', long, value_enum, default_value = "rectangular")]
        window: WindowKind,

        /// Also write the filtered signals as WAV files
        #[arg(long)]
        save_wav: bool,

        /// WAV recording to run the LP 150 / HP 3500 / BP 200-3000 Hz designs on
        #[arg(long)]
        wav: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// TOML job file; command line options take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Filter type: low-pass, high-pass, band-pass, band-stop
    #[arg(short = 'k', long, value_enum)]
    kind: Option<FilterKind>,

    /// Cut-off frequency in Hz (give two, low then high, for band filters)
    #[arg(long = "cutoff", num_args = 1..=2)]
    cutoffs: Vec<f64>,

    /// Number of taps on each side of the centre tap
    #[arg(short = 't', long)]
    taps: Option<usize>,

    /// Window function: rectangular, hanning, hamming, blackman
    #[arg(short = 'w', long, value_enum)]
    window: Option<WindowKind>,

    /// Filter structure: fir, iir
    #[arg(long, value_enum)]
    design: Option<FilterDesign>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

/// Filter settings after merging the job file with command line options
#[derive(Debug)]
struct FilterJob {
    kind: FilterKind,
    cutoffs: Vec<f64>,
    taps: usize,
    window: WindowKind,
    design: FilterDesign,
    output_dir: Option<PathBuf>,
    save_wav: bool,
}

impl FilterJob {
    fn spec(&self, sampling_frequency: f64) -> FilterSpec {
        FilterSpec::new(self.kind, self.cutoffs.clone(), sampling_frequency, self.taps)
    }
}

impl FilterArgs {
    fn resolve(&self) -> anyhow::Result<FilterJob> {
        let job = match &self.config {
            Some(path) => JobConfig::load(path)
                .with_context(|| format!("Failed to load job file {}", path.display()))?,
            None => JobConfig::default(),
        };

        let kind = match self.kind {
            Some(kind) => kind,
            None => match job.kind()? {
                Some(kind) => kind,
                None => bail!("No filter type given (use --kind or [filter] kind)"),
            },
        };

        let cutoffs = if self.cutoffs.is_empty() {
            job.filter.cutoffs.clone().unwrap_or_default()
        } else {
            self.cutoffs.clone()
        };
        if cutoffs.is_empty() {
            bail!("No cut-off frequency given (use --cutoff or [filter] cutoffs)");
        }

        let window = match self.window {
            Some(window) => window,
            None => job.window()?.unwrap_or_default(),
        };
        let design = match self.design {
            Some(design) => design,
            None => job.design()?.unwrap_or_default(),
        };

        Ok(FilterJob {
            kind,
            cutoffs,
            taps: self.taps.unwrap_or_else(|| job.taps()),
            window,
            design,
            output_dir: job.output.dir.clone(),
            save_wav: job.output.save_wav.unwrap_or(false),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Command::Filter {
            input,
            filter,
            save_wav,
            output_dir,
        } => filter_file(&input, &filter, save_wav, output_dir),
        Command::Convert { input, output } => convert_wav(&input, output),
        Command::Coefficients {
            filter,
            sample_rate,
            format,
        } => print_coefficients(&filter, sample_rate, format),
        Command::Demo {
            output_dir,
            taps,
            window,
            save_wav,
            wav,
        } => run_demo(&output_dir, taps, window, save_wav, wav.as_deref()),
    }
}

fn filter_file(
    input: &Path,
    args: &FilterArgs,
    save_wav: bool,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let job = args.resolve()?;
    let signal = LoadedSignal::load(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    println!("=== {} ===", input.display());
    println!(
        "{} channel(s), {} samples at {:.3} Hz",
        signal.channels.len(),
        signal.num_frames(),
        signal.sample_rate
    );
    println!(
        "{} {:?} Hz, {} taps per side, {} window, {:?}",
        job.kind, job.cutoffs, job.taps, job.window, job.design
    );

    let spec = job.spec(signal.sample_rate);
    let run = run_filter(&spec, job.design, job.window, &signal.channels)?;
    println!(
        "Designed {} coefficients in {:.3} ms, filtered in {:.3} ms",
        run.coefficients.len(),
        run.design_time.as_secs_f64() * 1000.0,
        run.filter_time.as_secs_f64() * 1000.0
    );

    let out_dir = output_dir
        .or(job.output_dir.clone())
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let files = export_results(&run, &signal, &out_dir, save_wav || job.save_wav)?;
    print_exported(&files);

    Ok(())
}

fn convert_wav(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let wav = read_wav(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let x = time_axis(wav.num_frames(), wav.sample_rate as f64);
    let output = output.unwrap_or_else(|| input.with_extension("csv"));
    let written = write_csv(&output, &x, &wav.channels)?;

    println!(
        "Converted {} ({} channel(s), {} samples at {} Hz, {}-bit) to {}",
        input.display(),
        wav.num_channels(),
        wav.num_frames(),
        wav.sample_rate,
        wav.bits_per_sample,
        written.display()
    );
    Ok(())
}

fn print_coefficients(
    args: &FilterArgs,
    sample_rate: f64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let job = args.resolve()?;
    let spec = job.spec(sample_rate);
    let filter = build_filter(&spec, job.design, job.window)?;
    let coefficients = filter.coefficients();

    match format {
        OutputFormat::Text => {
            println!(
                "{} {:?} Hz at {} Hz, {} window, {} taps",
                spec.kind,
                spec.cutoffs,
                spec.sampling_frequency,
                job.window,
                coefficients.len()
            );
            for (i, c) in coefficients.iter().enumerate() {
                println!("{:>5}  {:+.12e}", i, c);
            }
        }
        OutputFormat::Csv => {
            println!("index,coefficient");
            for (i, c) in coefficients.iter().enumerate() {
                println!("{},{}", i, c);
            }
        }
        OutputFormat::Json => {
            let report = CoefficientReport::new(&spec, job.window, coefficients);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

const DEMO_FREQUENCIES: [f64; 3] = [1.0, 10.0, 50.0];
const DEMO_AMPLITUDES: [f64; 3] = [1.0, 0.1, 0.01];
const DEMO_LENGTH: usize = 400;

const SINE_EXPERIMENTS: [Experiment<'static>; 3] = [
    (FilterKind::LowPass, &[5.0]),
    (FilterKind::HighPass, &[15.0]),
    (FilterKind::BandPass, &[5.0, 15.0]),
];

const WAV_EXPERIMENTS: [Experiment<'static>; 3] = [
    (FilterKind::LowPass, &[150.0]),
    (FilterKind::HighPass, &[3500.0]),
    (FilterKind::BandPass, &[200.0, 3000.0]),
];

fn run_demo(
    output_dir: &Path,
    taps: usize,
    window: WindowKind,
    save_wav: bool,
    wav: Option<&Path>,
) -> anyhow::Result<()> {
    let sine = generate_sine_signal(
        &DEMO_FREQUENCIES,
        &DEMO_AMPLITUDES,
        &[0.0; 3],
        DEMO_LENGTH,
        0.0,
        4.0 * PI,
    )?;
    let signal = LoadedSignal::from_channels("noisy_sine", vec![sine.samples], sine.sample_rate)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let source = write_csv(
        output_dir.join(format!("{}.csv", signal.name)),
        &signal.x,
        &signal.channels,
    )?;

    println!("=== Synthetic signal ===");
    println!(
        "{} samples at {:.1} Hz, RMS {:.4}, written to {}",
        signal.num_frames(),
        signal.sample_rate,
        rms(&signal.channels[0]),
        source.display()
    );
    print_tone_levels("input", &signal.channels[0], signal.sample_rate);

    let results = run_experiments(&signal, &SINE_EXPERIMENTS, taps, window, output_dir, save_wav)?;
    for (run, files) in &results {
        println!();
        println!("=== {} {:?} Hz ===", run.spec.kind, run.spec.cutoffs);
        print_tone_levels("output", &run.channels[0], signal.sample_rate);
        print_exported(files);
    }

    if let Some(path) = wav {
        let recording = LoadedSignal::from_wav(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        println!();
        println!("=== {} ===", path.display());
        println!(
            "{} channel(s), {} samples at {:.0} Hz",
            recording.channels.len(),
            recording.num_frames(),
            recording.sample_rate
        );

        let results =
            run_experiments(&recording, &WAV_EXPERIMENTS, taps, window, output_dir, save_wav)?;
        for (run, files) in &results {
            println!();
            println!("=== {} {:?} Hz ===", run.spec.kind, run.spec.cutoffs);
            for (i, channel) in run.channels.iter().enumerate() {
                println!("  channel {} RMS: {:.5}", i, rms(channel));
            }
            print_exported(files);
        }
    }

    Ok(())
}

/// Print the level of each demo tone over the last second of `channel`
fn print_tone_levels(label: &str, channel: &[f64], sample_rate: f64) {
    let second = sample_rate.round() as usize;
    let settled = &channel[channel.len().saturating_sub(second)..];
    for freq in DEMO_FREQUENCIES {
        println!(
            "  {} {:>5.1} Hz: {:.5}",
            label,
            freq,
            tone_amplitude(settled, freq, sample_rate)
        );
    }
}

fn print_exported(files: &ExportedFiles) {
    println!("Coefficients: {}", files.coefficients.display());
    println!("Filtered:     {}", files.filtered_csv.display());
    if let Some(wav) = &files.filtered_wav {
        println!("WAV:          {}", wav.display());
    }
}
