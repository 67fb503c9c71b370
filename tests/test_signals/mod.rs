pub mod generate;

pub use generate::{multi_tone, settled_tail};
