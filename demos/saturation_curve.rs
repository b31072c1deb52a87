//! Example: Zero-Dimensional Saturation Curve
//!
//! The simplest dose calculation: a surface directly exposed to a
//! constant precursor pressure, with no transport limitation. Coverage
//! follows the first-order law θ(t) = 1 − exp(−t/t₀).
//!
//! **Physical System**:
//! - Precursor: generic 150 amu molecule
//! - Surface: 10¹⁹ reactive sites per m²
//! - Sticking probability: β₀ = 10⁻³
//! - Conditions: 0.1 Torr partial pressure at 500 K
//!
//! Prints the derived dose timescale, exports the curve to CSV, and
//! renders a PNG of coverage vs time.

use ald_rs::chem::{IdealKinetics, Precursor};
use ald_rs::dose::{DoseModel, ZeroD};
use ald_rs::output::{CsvConfig, CsvMetadata, export_saturation_csv};
use ald_rs::nondim::SaturationCurve;

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
    println!("  Zero-Dimensional Saturation Curve");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Chemistry ======

    let mass = 150.0; // amu
    let nsites = 1e19; // sites/m²
    let beta0 = 1e-3; // sticking probability
    let pressure = 0.1 * 1e5 / 760.0; // 0.1 Torr in Pa
    let temperature = 500.0; // K

    println!("Chemistry:");
    println!("  Precursor mass : {} amu", mass);
    println!("  Site density   : {:e} /m²", nsites);
    println!("  β₀             : {:e}", beta0);
    println!("  Pressure       : {:.2} Pa (0.1 Torr)", pressure);
    println!("  Temperature    : {} K\n", temperature);

    let precursor = Precursor::new("generic", mass)?;
    let kinetics = IdealKinetics::new(precursor, nsites, beta0)?;
    let model = ZeroD::new(kinetics.into(), temperature, pressure)?;

    // ====== Dose curve ======

    let t0 = model.timescale();
    let curve = model.saturation_curve()?;

    println!("Derived quantities:");
    println!("  Dose timescale t₀ : {:.4} s", t0);
    println!("  Curve points      : {}", curve.len());
    println!(
        "  Final coverage    : {:.4}\n",
        curve.final_coverage().unwrap_or(0.0)
    );

    // Time to reach 90% and 99% coverage
    for target in [0.9, 0.99] {
        if let Some(t) = curve
            .time
            .iter()
            .zip(curve.coverage.iter())
            .find(|&(_, &c)| c >= target)
            .map(|(&t, _)| t)
        {
            println!("  t({:.0}%) = {:.4} s ({:.2} t₀)", target * 100.0, t, t / t0);
        }
    }

    // ====== Export ======

    let tmp_dir = std::env::temp_dir();

    let csv_path = tmp_dir.join("zerod_saturation.csv");
    let metadata = CsvMetadata {
        model_name: Some(model.name().to_string()),
        timescale: Some(t0),
        ..Default::default()
    };
    let config = CsvConfig::default().with_metadata(metadata);
    export_saturation_csv(&curve, &csv_path, Some(&config))?;
    println!("\nCSV exported : {:?}", csv_path);

    let png_path = tmp_dir.join("zerod_saturation.png");
    plot_curve(&curve, t0, png_path.to_str().ok_or("bad path")?)?;
    println!("Plot written : {:?}", png_path);

    Ok(())
}

/// Render coverage vs time with a marker at one timescale.
fn plot_curve(
    curve: &SaturationCurve,
    t0: f64,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = curve.time[curve.len() - 1];
    let mut chart = ChartBuilder::on(&root)
        .caption("Zero-D Saturation Curve", ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_time, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Dose time (s)")
        .y_desc("Coverage")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            curve
                .time
                .iter()
                .zip(curve.coverage.iter())
                .map(|(&t, &c)| (t, c)),
            &BLUE,
        ))?
        .label("θ(t)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    // Vertical marker at t = t0 (θ = 1 − 1/e there)
    chart.draw_series(LineSeries::new(
        vec![(t0, 0.0), (t0, 1.0)],
        &RED.mix(0.5),
    ))?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
