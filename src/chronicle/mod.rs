//! Time-series analysis engine for daily hydrological chronicles.

pub mod analysis;
pub mod calendar;
pub mod loader;
pub mod resample;
pub mod rolling;
pub mod series;
pub mod stats;

pub use analysis::{run_analysis, AnalysisMode, AnalysisOutput, AnalysisRequest};
pub use loader::DateFormat;
pub use resample::Frequency;
