//! CSV export for saturation curves and dose profiles
//!
//! Two-column output for a [`SaturationCurve`] (time, coverage), three
//! columns for a [`DoseProfile`] (time, coverage, unreacted fraction).
//! An optional comment header records the model and its derived
//! parameters so a curve stays interpretable after it leaves the
//! simulation.
//!
//! ```csv
//! # ALD Saturation Curve
//! # Generated: 2026-08-30T10:12:00+00:00
//! # Model: well-stirred
//! # Da: 12.5
//! #
//! Time (s),Coverage
//! 0.000000,0.000000
//! 0.010000,0.117503
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{AldError, Result};
use crate::nondim::{DoseProfile, SaturationCurve};

/// Formatting options for CSV export
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default ',')
    pub delimiter: char,
    /// Decimal places per value (default 6)
    pub precision: usize,
    /// Comment header with model parameters, written when present
    pub metadata: Option<CsvMetadata>,
    /// Header of the time column (default "Time (s)")
    pub time_header: String,
    /// Header of the coverage column (default "Coverage")
    pub coverage_header: String,
    /// Header of the unreacted-fraction column (default "Unreacted")
    pub unreacted_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            metadata: None,
            time_header: "Time (s)".to_string(),
            coverage_header: "Coverage".to_string(),
            unreacted_header: "Unreacted".to_string(),
        }
    }
}

impl CsvConfig {
    /// High-precision variant (12 decimal places) for solver
    /// cross-checks.
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Attach a metadata header.
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Model parameters recorded in the CSV comment header
///
/// Only the fields that are set appear in the output.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Model name as reported by the model itself
    pub model_name: Option<String>,
    /// Damköhler number the curve was generated with
    pub damkohler: Option<f64>,
    /// Characteristic timescale t0 (s), for dimensional curves
    pub timescale: Option<f64>,
    /// Additional key/value pairs
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata for a nondimensional model run.
    pub fn for_model(name: &str, damkohler: f64) -> Self {
        Self {
            model_name: Some(name.to_string()),
            damkohler: Some(damkohler),
            ..Default::default()
        }
    }

    /// Append a custom key/value pair.
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

/// Export a saturation curve as two-column CSV.
///
/// # Errors
///
/// [`AldError::Domain`] for an empty or non-finite curve,
/// [`AldError::Io`] when the file cannot be written.
pub fn export_saturation_csv(
    curve: &SaturationCurve,
    path: impl AsRef<Path>,
    config: Option<&CsvConfig>,
) -> Result<()> {
    if curve.is_empty() {
        return Err(AldError::domain("curve length", 0.0, "non-empty"));
    }
    validate_finite("time", curve.time.iter())?;
    validate_finite("coverage", curve.coverage.iter())?;

    let default_config = CsvConfig::default();
    let config = config.unwrap_or(&default_config);

    let mut file = BufWriter::new(File::create(path)?);
    if let Some(metadata) = &config.metadata {
        write_metadata_header(&mut file, metadata)?;
    }
    writeln!(
        file,
        "{}{}{}",
        config.time_header, config.delimiter, config.coverage_header
    )?;
    for i in 0..curve.len() {
        writeln!(
            file,
            "{:.prec$}{}{:.prec$}",
            curve.time[i],
            config.delimiter,
            curve.coverage[i],
            prec = config.precision
        )?;
    }
    file.flush()?;
    Ok(())
}

/// Export a dose profile as three-column CSV.
///
/// # Errors
///
/// [`AldError::Domain`] for an empty or non-finite profile,
/// [`AldError::Io`] when the file cannot be written.
pub fn export_profile_csv(
    profile: &DoseProfile,
    path: impl AsRef<Path>,
    config: Option<&CsvConfig>,
) -> Result<()> {
    if profile.is_empty() {
        return Err(AldError::domain("profile length", 0.0, "non-empty"));
    }
    validate_finite("time", profile.time.iter())?;
    validate_finite("coverage", profile.coverage.iter())?;
    validate_finite("unreacted", profile.unreacted.iter())?;

    let default_config = CsvConfig::default();
    let config = config.unwrap_or(&default_config);

    let mut file = BufWriter::new(File::create(path)?);
    if let Some(metadata) = &config.metadata {
        write_metadata_header(&mut file, metadata)?;
    }
    writeln!(
        file,
        "{}{}{}{}{}",
        config.time_header,
        config.delimiter,
        config.coverage_header,
        config.delimiter,
        config.unreacted_header
    )?;
    for i in 0..profile.len() {
        writeln!(
            file,
            "{:.prec$}{}{:.prec$}{}{:.prec$}",
            profile.time[i],
            config.delimiter,
            profile.coverage[i],
            config.delimiter,
            profile.unreacted[i],
            prec = config.precision
        )?;
    }
    file.flush()?;
    Ok(())
}

fn write_metadata_header<W: Write>(file: &mut W, metadata: &CsvMetadata) -> Result<()> {
    writeln!(file, "# ALD Saturation Curve")?;
    writeln!(file, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;
    if let Some(name) = &metadata.model_name {
        writeln!(file, "# Model: {name}")?;
    }
    if let Some(da) = metadata.damkohler {
        writeln!(file, "# Da: {da}")?;
    }
    if let Some(t0) = metadata.timescale {
        writeln!(file, "# t0: {t0} s")?;
    }
    for (key, value) in &metadata.custom {
        writeln!(file, "# {key}: {value}")?;
    }
    writeln!(file, "#")?;
    Ok(())
}

fn validate_finite<'a>(name: &'static str, values: impl Iterator<Item = &'a f64>) -> Result<()> {
    for &v in values {
        if !v.is_finite() {
            return Err(AldError::domain(name, v, "finite"));
        }
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
