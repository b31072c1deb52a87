//! Output of simulation results
//!
//! Saturation curves and dose profiles leave the crate as plain CSV,
//! readable by Excel, pandas, MATLAB, or Origin without any adapter.
//! Plotting is left to the demo programs, which draw with `plotters`
//! directly from the curve containers.

pub mod csv;

pub use csv::{CsvConfig, CsvMetadata, export_profile_csv, export_saturation_csv};
