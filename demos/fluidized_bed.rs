//! Example: Fluidized-Bed Particle Coating
//!
//! Precursor crosses an agitated particle bed in plug flow while the
//! particles themselves stay well mixed. The bed's large surface area
//! pushes the Damköhler number high: nearly every molecule is consumed
//! until the bed saturates, so the dose time is set by precursor supply
//! rather than by kinetics.
//!
//! **Physical System**:
//! - Precursor: generic 150 amu molecule, β₀ = 10⁻³
//! - Bed area: 10 m² of particle surface
//! - Carrier flow: 60 sccm at 100 Pa working pressure
//! - Precursor partial pressure: 0.1 Torr at 500 K
//!
//! Compares the transport-limited bed against the transport-free
//! zero-dimensional curve for the same chemistry, and plots both.

use ald_rs::chem::{IdealKinetics, Precursor};
use ald_rs::dose::{DoseModel, ParticlePlugFlow, ReactorConditions, ZeroD};
use ald_rs::nondim::SaturationCurve;
use ald_rs::output::{CsvConfig, CsvMetadata, export_profile_csv};

use plotters::prelude::*;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    println!("═══════════════════════════════════════════════════════");
    println!("  Fluidized-Bed Particle Coating");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Chemistry and reactor ======

    let pressure = 0.1 * 1e5 / 760.0; // 0.1 Torr in Pa
    let conditions = ReactorConditions {
        pressure,
        base_pressure: 1e2,
        temperature: 500.0,
        surface_area: 1e1,
        flow_sccm: 60.0,
    };

    println!("Reactor:");
    println!("  Precursor pressure : {:.2} Pa", conditions.pressure);
    println!("  Working pressure   : {} Pa", conditions.base_pressure);
    println!("  Temperature        : {} K", conditions.temperature);
    println!("  Bed surface area   : {} m²", conditions.surface_area);
    println!("  Carrier flow       : {} sccm\n", conditions.flow_sccm);

    let precursor = Precursor::new("generic", 150.0)?;
    let kinetics = IdealKinetics::new(precursor, 1e19, 1e-3)?;

    let bed = ParticlePlugFlow::new(kinetics.clone().into(), conditions)?;
    let zero_d = ZeroD::new(kinetics.into(), 500.0, pressure)?;

    // ====== Derived quantities ======

    println!("Derived quantities:");
    println!("  Damköhler number Da : {:.1}", bed.damkohler());
    println!("  Bed timescale t₀    : {:.2} s", bed.timescale());
    println!("  Zero-D timescale    : {:.4} s", zero_d.timescale());
    println!(
        "  Transport slowdown  : {:.0}×\n",
        bed.timescale() / zero_d.timescale()
    );

    // ====== Dose curves ======

    let bed_profile = bed.run()?;
    let zero_curve = zero_d.saturation_curve()?;
    let bed_curve = bed_profile.clone().into_curve();

    // Breakthrough: the first time more than half the feed passes
    // through unreacted.
    if let Some(t) = bed_profile
        .time
        .iter()
        .zip(bed_profile.unreacted.iter())
        .find(|&(_, &x)| x > 0.5)
        .map(|(&t, _)| t)
    {
        println!("Breakthrough (50% passthrough) : {:.2} s ({:.2} t₀)", t, t / bed.timescale());
    }
    println!(
        "Final bed coverage             : {:.4}\n",
        bed_curve.final_coverage().unwrap_or(0.0)
    );

    // ====== Export ======

    let tmp_dir = std::env::temp_dir();

    let csv_path = tmp_dir.join("fluidized_bed.csv");
    let metadata = CsvMetadata {
        model_name: Some(bed.name().to_string()),
        damkohler: Some(bed.damkohler()),
        timescale: Some(bed.timescale()),
        ..Default::default()
    };
    let config = CsvConfig::default().with_metadata(metadata);
    export_profile_csv(&bed_profile, &csv_path, Some(&config))?;
    println!("CSV exported : {:?}", csv_path);

    let png_path = tmp_dir.join("fluidized_bed.png");
    plot_comparison(
        &[("Fluidized bed", &bed_curve), ("Zero-D (no transport)", &zero_curve)],
        png_path.to_str().ok_or("bad path")?,
    )?;
    println!("Plot written : {:?}", png_path);

    Ok(())
}

/// Overlay several saturation curves on shared axes.
fn plot_comparison(
    curves: &[(&str, &SaturationCurve)],
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = curves
        .iter()
        .map(|(_, c)| c.time[c.len() - 1])
        .fold(0.0_f64, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Bed vs Zero-D Saturation", ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_time, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Dose time (s)")
        .y_desc("Coverage")
        .draw()?;

    let palette = [BLUE, RED];
    for (idx, (label, curve)) in curves.iter().enumerate() {
        let color = palette[idx % palette.len()];
        chart
            .draw_series(LineSeries::new(
                curve
                    .time
                    .iter()
                    .zip(curve.coverage.iter())
                    .map(|(&t, &c)| (t, c)),
                &color,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
