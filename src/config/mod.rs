use ndarray::Array1;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::airglow::AirglowOptions;
use crate::grid::ZenithGrid;
use crate::transmission::{PARANAL_ELEVATION_KM, PARANAL_PRESSURE_HPA};

pub mod error;
pub use error::ConfigError;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct WavelengthGrid {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

impl WavelengthGrid {
    fn validate(self) -> Result<Self, ConfigError> {
        let ordered = self.count == 1 || self.start < self.stop;
        if self.count == 0 || !ordered || !self.start.is_finite() || !self.stop.is_finite() {
            return Err(ConfigError::WavelengthGrid {
                start: self.start,
                stop: self.stop,
                count: self.count,
            });
        }
        Ok(self)
    }

    /// Evenly spaced wavelengths in nm, endpoints included.
    pub fn values(&self) -> Array1<f64> {
        if self.count == 1 {
            return Array1::from_elem(1, self.start);
        }
        Array1::linspace(self.start, self.stop, self.count)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    data_dir: PathBuf,
    pressure_hpa: f64,
    elevation_km: f64,
    rayleigh: bool,
    mie: bool,
    absorption: bool,
    wavelength: WavelengthGrid,
    grid: Option<ZenithGrid>,
}

// Deserializes a Config, checking the site conditions and grids while parsing
// so that an invalid file never yields a Config.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        fn default_pressure() -> f64 {
            PARANAL_PRESSURE_HPA
        }

        fn default_elevation() -> f64 {
            PARANAL_ELEVATION_KM
        }

        fn enabled() -> bool {
            true
        }

        #[derive(Deserialize)]
        struct ConfigHelper {
            data_dir: PathBuf,
            #[serde(default = "default_pressure")]
            pressure_hpa: f64,
            #[serde(default = "default_elevation")]
            elevation_km: f64,
            #[serde(default = "enabled")]
            rayleigh: bool,
            #[serde(default = "enabled")]
            mie: bool,
            #[serde(default = "enabled")]
            absorption: bool,
            wavelength: WavelengthGrid,
            sky: Option<SkyHelper>,
        }

        #[derive(Deserialize)]
        struct SkyHelper {
            altitudes: Vec<f64>,
            n_azimuth: usize,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        if !(helper.pressure_hpa > 0.0 && helper.pressure_hpa.is_finite()) {
            return Err(D::Error::custom(ConfigError::Pressure(helper.pressure_hpa)));
        }

        if !helper.elevation_km.is_finite() {
            return Err(D::Error::custom(ConfigError::Elevation(
                helper.elevation_km,
            )));
        }

        let wavelength = helper.wavelength.validate().map_err(D::Error::custom)?;

        let grid = if let Some(sky) = helper.sky {
            Some(
                ZenithGrid::new(sky.altitudes, sky.n_azimuth)
                    .map_err(|e| D::Error::custom(ConfigError::Grid(e)))?,
            )
        } else {
            None
        };

        Ok(Config {
            data_dir: helper.data_dir,
            pressure_hpa: helper.pressure_hpa,
            elevation_km: helper.elevation_km,
            rayleigh: helper.rayleigh,
            mie: helper.mie,
            absorption: helper.absorption,
            wavelength,
            grid,
        })
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn grid(&self) -> Option<&ZenithGrid> {
        self.grid.as_ref()
    }

    pub fn wavelength_grid(&self) -> Array1<f64> {
        self.wavelength.values()
    }

    pub fn options(&self) -> AirglowOptions {
        AirglowOptions::default()
            .with_pressure(self.pressure_hpa)
            .with_elevation(self.elevation_km)
            .with_rayleigh(self.rayleigh)
            .with_mie(self.mie)
            .with_absorption(self.absorption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr0;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn parse(json: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("site.json");
        let mut file = File::create(&file_path).unwrap();

        let config_data = r#"
    {
        "data_dir": "./data",
        "pressure_hpa": 780.0,
        "elevation_km": 2.1,
        "mie": false,
        "wavelength": {"start": 300.0, "stop": 1100.0, "count": 5},
        "sky": {"altitudes": [30.0, 60.0, 90.0], "n_azimuth": 12}
    }
    "#;

        file.write_all(config_data.as_bytes()).unwrap();

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.data_dir(), Path::new("./data"));
        assert_eq!(
            config.wavelength_grid().to_vec(),
            vec![300.0, 500.0, 700.0, 900.0, 1100.0]
        );
        assert_eq!(config.grid().unwrap().zenith().shape(), &[3, 12, 1]);

        let options = config.options();
        assert_eq!(options.pressure, arr0(780.0).into_dyn());
        assert_eq!(options.elevation, arr0(2.1).into_dyn());
        assert!(options.rayleigh);
        assert!(!options.mie);
        assert!(options.absorption);
    }

    #[test]
    fn test_defaults() {
        let config = parse(
            r#"{"data_dir": "d", "wavelength": {"start": 500.0, "stop": 500.0, "count": 1}}"#,
        )
        .unwrap();

        assert_eq!(config.options(), AirglowOptions::default());
        assert_eq!(config.wavelength_grid().to_vec(), vec![500.0]);
        assert!(config.grid().is_none());
    }

    #[test]
    fn test_invalid_values() {
        let wavelength = r#""wavelength": {"start": 300.0, "stop": 1100.0, "count": 5}"#;

        let bad_pressure = format!(r#"{{"data_dir": "d", "pressure_hpa": -1.0, {}}}"#, wavelength);
        let err = parse(&bad_pressure).unwrap_err();
        assert!(err.to_string().contains("pressure_hpa"), "{}", err);

        let bad_grid = r#"{"data_dir": "d", "wavelength": {"start": 900.0, "stop": 300.0, "count": 5}}"#;
        assert!(parse(bad_grid).is_err());

        let no_samples = r#"{"data_dir": "d", "wavelength": {"start": 300.0, "stop": 900.0, "count": 0}}"#;
        assert!(parse(no_samples).is_err());

        let bad_sky = format!(
            r#"{{"data_dir": "d", {}, "sky": {{"altitudes": [-5.0], "n_azimuth": 4}}}}"#,
            wavelength
        );
        let err = parse(&bad_sky).unwrap_err();
        assert!(err.to_string().contains("sky grid"), "{}", err);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/site.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
