//! Precursors and surface kinetics
//!
//! This module holds the chemistry side of the engine: what the precursor
//! molecule is ([`Precursor`]) and how fast it reacts with the surface
//! ([`IdealKinetics`], [`SoftSaturating`]).
//!
//! Kinetics types are stateless rate laws: they evaluate a reaction
//! probability for a given coverage and keep the reactive-site
//! bookkeeping, but carry no time dependence. Time evolution lives in
//! [`crate::nondim`] and [`crate::dose`].
//!
//! The two rate laws are wrapped in the [`KineticsModel`] tagged variant
//! so that dose models can dispatch on pathway arity (single vs. two
//! reaction pathways) without any subclass coupling.

mod kinetics;
mod precursor;

pub use kinetics::{IdealKinetics, KineticsModel, SoftSaturating, SurfaceKinetics};
pub use precursor::{Precursor, thermal_velocity};
