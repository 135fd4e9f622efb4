use ndarray::{ArrayD, arr0};
use skyglow::config::Config;
use skyglow::{DataCache, get_airglow};

fn summarize(name: &str, values: &ArrayD<f64>) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    if finite.is_empty() {
        println!("  {}: no finite values", name);
        return;
    }

    println!(
        "  {}: min {:.4}, max {:.4}, mean {:.4} ph / (s cm2 nm)",
        name,
        finite.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
        finite.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
        finite.iter().sum::<f64>() / finite.len() as f64
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./data/config/site.json".to_string());
    let config = Config::from_file(&path)?;
    log::info!("Loaded {}", path);

    let cache = DataCache::new(config.data_dir());
    let lam = config.wavelength_grid().into_dyn();
    let z = config
        .grid()
        .map(|grid| grid.zenith())
        .unwrap_or_else(|| arr0(0.0).into_dyn());

    println!(
        "Computing airglow for {} zenith angles on {} wavelengths...",
        z.len(),
        lam.len()
    );

    let flux = get_airglow(&cache, &lam, &z, &config.options())?;

    println!("Output shape: {:?}", flux.continuum.shape());
    summarize("continuum", &flux.continuum);
    summarize("line", &flux.line);

    Ok(())
}
