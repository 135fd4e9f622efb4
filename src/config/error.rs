use thiserror::Error;

use crate::grid::GridError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pressure_hpa must be positive and finite, got {0}")]
    Pressure(f64),
    #[error("elevation_km must be finite, got {0}")]
    Elevation(f64),
    #[error("wavelength grid needs count >= 1 and start < stop, got {start}..{stop} x {count}")]
    WavelengthGrid { start: f64, stop: f64, count: usize },
    #[error("Invalid sky grid: {0}")]
    Grid(#[from] GridError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
