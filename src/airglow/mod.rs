//! Airglow emission model of Noll et al. (2012), Section 4.
//!
//! The airglow layer sits at roughly 90 km, so its airmass differs from the
//! usual plane-parallel value and scattering acts on an extended source
//! rather than on a point source.

pub mod airmass;
pub mod dedup;
pub mod error;
pub mod flux;
pub mod scattering;

pub use airmass::{airmass, airmass_ag};
pub use dedup::UniqueKeys;
pub use error::AirglowError;
pub use flux::{ATMOSPHERE_TABLE, AirglowFlux, AirglowOptions, atleast_1d, get_airglow};
pub use scattering::{ScatteringFactors, airglow_scattering, scattering_factors};
