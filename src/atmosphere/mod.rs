//! Reference atmosphere tables and the providers that serve them.

pub mod error;
pub mod provider;
pub mod table;

pub use error::LookupError;
pub use provider::{AtmosphereProvider, DataCache};
pub use table::AtmosphereTable;
