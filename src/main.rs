use basket_splitter::utils::init_catalog::{load_basket, load_catalog, load_config};
use basket_splitter::{BasketSplitter, SplitterConfig};
use log::{error, info};
use std::error::Error;
use std::process;

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (catalog_path, basket_path) = match args {
        [catalog, basket] | [catalog, basket, _] => (catalog, basket),
        _ => {
            return Err(
                "usage: basket_splitter <catalog.json> <basket.json> [config.json]".into(),
            )
        }
    };

    let config = match args.get(2) {
        Some(path) => load_config(path)?,
        None => SplitterConfig::default(),
    };
    let catalog = load_catalog(catalog_path)?;
    let basket = load_basket(basket_path)?;

    let splitter = BasketSplitter::with_config(catalog, config);
    let start_time = std::time::Instant::now();
    let (split, stats) = splitter.split_with_stats(&basket)?;
    info!(
        "Split {} items into {} deliveries in {:.2?} ({} configurations)",
        split.len(),
        split.deliveries().len(),
        start_time.elapsed(),
        stats.configurations
    );

    println!("{}", serde_json::to_string_pretty(&split)?);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
