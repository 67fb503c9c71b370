pub mod config;
pub mod constants;
pub mod csv;
pub mod error;
pub mod paths;
pub mod processing;
pub mod signal_processing;
pub mod simulation;
pub mod wav;

pub use config::{FilterDesign, FilterKind, FilterSpec, JobConfig, WindowKind};
pub use error::{FilterError, Result};
pub use signal_processing::{Filter, FirFilter, IirFilter, build_filter};
pub use wav::{read_wav, write_wav};
