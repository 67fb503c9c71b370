pub mod filter;
pub mod fir;
pub mod fir_design;
pub mod history;
pub mod iir;
pub mod window;

pub use filter::{Filter, build_filter};
pub use fir::FirFilter;
pub use fir_design::design_coefficients;
pub use history::SampleHistory;
pub use iir::IirFilter;
pub use window::{apply_window, window_weight};
