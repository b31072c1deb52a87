//! Example: Soft-Saturating Chemistry
//!
//! Some ALD chemistries never switch off cleanly: a fast pathway fills
//! most of the surface quickly, but a second, slower pathway keeps a
//! residual uptake running long after. The saturation curve shows the
//! signature slow tail instead of a sharp plateau.
//!
//! **Physical System** (TMA-like):
//! - Fast pathway: β₁ = 10⁻², 80% of the sites
//! - Slow pathway: β₂ = 10⁻³, 20% of the sites
//! - Site density: 10¹⁹ /m²
//! - Conditions: 0.1 Torr partial pressure at 500 K
//!
//! Compares the soft curve against a purely fast single-pathway surface
//! and shows the per-pathway coverages from the nondimensional model.

use ald_rs::chem::{IdealKinetics, Precursor, SoftSaturating};
use ald_rs::dose::{DoseModel, ZeroD};
use ald_rs::nondim::{SaturationCurve, SoftSatWellStirred};

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
    println!("  Soft-Saturating Chemistry");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Chemistry ======

    let (beta1, beta2, f1) = (1e-2, 1e-3, 0.8);
    let nsites = 1e19;
    let pressure = 0.1 * 1e5 / 760.0; // 0.1 Torr in Pa
    let temperature = 500.0;

    println!("Chemistry (TMA):");
    println!("  Fast pathway : β₁ = {:e}, f₁ = {}", beta1, f1);
    println!("  Slow pathway : β₂ = {:e}, f₂ = {}", beta2, 1.0 - f1);
    println!("  Site density : {:e} /m²\n", nsites);

    let soft_kin = SoftSaturating::new(Precursor::from_table("TMA")?, nsites, beta1, beta2, f1)?;
    let fast_kin = IdealKinetics::new(Precursor::from_table("TMA")?, nsites, beta1)?;

    let soft = ZeroD::new(soft_kin.into(), temperature, pressure)?;
    let fast = ZeroD::new(fast_kin.into(), temperature, pressure)?;

    println!("Timescales:");
    println!("  Soft (slow pathway) : {:.4} s", soft.timescale());
    println!("  Fast-only surface   : {:.4} s\n", fast.timescale());

    // ====== Dose curves ======

    let soft_curve = soft.saturation_curve()?;
    let fast_curve = fast.saturation_curve()?;

    // Where the fast-only surface is done, the soft surface still has
    // its slow tail open.
    let i_fast_done = fast_curve.len() - 1;
    let t_fast_done = fast_curve.time[i_fast_done];
    let soft_at = soft_curve
        .time
        .iter()
        .zip(soft_curve.coverage.iter())
        .find(|&(&t, _)| t >= t_fast_done)
        .map(|(_, &c)| c)
        .unwrap_or(1.0);
    println!(
        "At t = {:.3} s: fast-only coverage {:.4}, soft coverage {:.4}",
        t_fast_done,
        fast_curve.coverage[i_fast_done],
        soft_at
    );

    // ====== Per-pathway coverages (nondimensional) ======

    // Same pathway contrast in normalized variables: Da₂/Da₁ = β₂/β₁.
    let model = SoftSatWellStirred::new(10.0, 10.0 * beta2 / beta1, f1, 1.0 - f1)?;
    let (profile, cov_fast, cov_slow) = model.run_split(5.0, 0.01)?;

    println!("\nNormalized well-stirred run (Da₁ = 10, Da₂ = 1):");
    for &i in &[50usize, 150, 499] {
        println!(
            "  t = {:.2}: total {:.4}, fast {:.4}, slow {:.4}",
            profile.time[i], profile.coverage[i], cov_fast[i], cov_slow[i]
        );
    }

    // ====== Plot ======

    let tmp_dir = std::env::temp_dir();
    let png_path = tmp_dir.join("soft_saturation.png");
    plot_soft(
        &soft_curve,
        &fast_curve,
        png_path.to_str().ok_or("bad path")?,
    )?;
    println!("\nPlot written : {:?}", png_path);

    Ok(())
}

/// Soft vs fast-only saturation curves on shared axes.
fn plot_soft(
    soft: &SaturationCurve,
    fast: &SaturationCurve,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_time = soft.time[soft.len() - 1];
    let mut chart = ChartBuilder::on(&root)
        .caption("Soft Saturation Tail", ("sans-serif", 40).into_font())
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
            soft.time
                .iter()
                .zip(soft.coverage.iter())
                .map(|(&t, &c)| (t, c)),
            &BLUE,
        ))?
        .label("Two-pathway (soft)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            fast.time
                .iter()
                .zip(fast.coverage.iter())
                .map(|(&t, &c)| (t, c)),
            &RED,
        ))?
        .label("Fast pathway only")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
