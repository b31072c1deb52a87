//! ald-rs: ALD Saturation-Kinetics Engine
//!
//! A library for simulating the self-limited surface kinetics of atomic
//! layer deposition: how fast a surface saturates for a given chemistry,
//! reactor, and dose.
//!
//! # Architecture
//!
//! The crate is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Coverage and dose models define the equations (what to solve)
//!    - The solver module provides the methods (how to solve)
//!
//! 2. **Nondimensional core, dimensional shell**
//!    - [`nondim`] models depend on a single Damköhler number and work
//!      in normalized time; this is where all the dynamics live
//!    - [`dose`] models fold real reactor conditions (pressure,
//!      temperature, flow, area) into that Damköhler number and a
//!      timescale, then delegate
//!
//! # Quick Start
//!
//! ```rust
//! use ald_rs::chem::{IdealKinetics, Precursor};
//! use ald_rs::dose::{DoseModel, ParticlePlugFlow, ReactorConditions};
//!
//! # fn main() -> ald_rs::Result<()> {
//! // 1. Chemistry: TMA on 1e19 sites/m² with sticking probability 1e-3
//! let tma = Precursor::from_table("TMA")?;
//! let kinetics = IdealKinetics::new(tma, 1e19, 1e-3)?;
//!
//! // 2. Reactor: fluidized particle bed
//! let model = ParticlePlugFlow::new(
//!     kinetics.into(),
//!     ReactorConditions {
//!         pressure: 13.0,       // Pa of precursor
//!         base_pressure: 100.0, // Pa total
//!         temperature: 473.15,  // K
//!         surface_area: 10.0,   // m² of particles
//!         flow_sccm: 60.0,
//!     },
//! )?;
//!
//! // 3. Saturation curve in real seconds
//! let curve = model.saturation_curve()?;
//! println!("saturation after ~{:.1} s", model.timescale());
//! assert!(curve.final_coverage().unwrap() > 0.99);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`chem`]: Precursors and surface kinetics (rate laws)
//! - [`nondim`]: Nondimensional coverage models
//! - [`dose`]: Dimensional dose models for real reactors
//! - [`solver`]: Stiff ODE integrator and bounded Newton root-finder
//! - [`units`]: Unit conversions and site-area estimators
//! - [`output`]: CSV export of curves and profiles

pub mod chem;
pub mod constants;
pub mod dose;
pub mod error;
pub mod nondim;
pub mod output;
pub mod solver;
pub mod units;

pub use error::{AldError, Result};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use ald_rs::prelude::*;
    //! ```
    pub use crate::chem::{IdealKinetics, KineticsModel, Precursor, SoftSaturating, SurfaceKinetics};
    pub use crate::dose::{DoseModel, ParticlePlugFlow, ReactorConditions, WellStirredReactor, ZeroD};
    pub use crate::error::{AldError, Result};
    pub use crate::nondim::{
        CoverageModel, DoseProfile, PlugFlowMixed, PlugFlowSpatial, SaturationCurve,
        SoftSatPlugFlow, SoftSatWellStirred, WellMixedSpatial, WellStirred,
    };
    pub use crate::solver::{BoundedNewton, StiffOde};
}
