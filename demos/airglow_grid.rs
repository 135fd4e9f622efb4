use ndarray::{Array1, Axis};
use skyglow::grid::ZenithGrid;
use skyglow::{AirglowOptions, DataCache, get_airglow};

fn main() {
    let cache = DataCache::new("./data");
    let grid = ZenithGrid::new(vec![20.0, 40.0, 60.0, 90.0], 36).unwrap();
    let lam = Array1::linspace(300.0, 1100.0, 81).into_dyn();

    let flux = match get_airglow(&cache, &lam, &grid.zenith(), &AirglowOptions::default()) {
        Ok(flux) => flux,
        Err(e) => {
            eprintln!("Failed to compute airglow: {}", e);
            return;
        }
    };

    for (alt, row) in grid
        .altitudes()
        .iter()
        .zip(flux.line.axis_iter(Axis(0)))
    {
        // Every azimuth shares the same spectrum
        let spectrum = row.index_axis(Axis(0), 0);
        println!(
            "Altitude {:>4.1}°: total line flux {:.3} ph / (s cm2)",
            alt,
            spectrum.sum() * 10.0
        );
    }
}
