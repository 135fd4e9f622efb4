//! Night-sky airglow emission for ground-based observatories.
//!
//! Implements the airglow component of the Cerro Paranal sky model of
//! Noll et al. (2012): effective airmass of the emitting layer, net
//! scattering of the extended source, and the continuum/line flux pipeline on
//! top of a reference atmosphere table.

pub mod airglow;
pub mod atmosphere;
pub mod broadcast;
pub mod config;
pub mod grid;
pub mod resample;
pub mod transmission;

pub use airglow::{AirglowError, AirglowFlux, AirglowOptions, get_airglow};
pub use atmosphere::{AtmosphereProvider, AtmosphereTable, DataCache};
