use log::info;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::config::SplitterConfig;
use crate::error::CatalogError;
use crate::models::{DeliveryCatalog, ItemId};

// Read a whole JSON file and deserialize it
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// Loads the item -> eligible deliveries catalog from a JSON object file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<DeliveryCatalog, CatalogError> {
    let path = path.as_ref();
    let catalog: DeliveryCatalog = read_json(path)?;
    info!("Loaded {} catalog items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Loads a basket from a JSON array of item identifiers
pub fn load_basket<P: AsRef<Path>>(path: P) -> Result<Vec<ItemId>, CatalogError> {
    let path = path.as_ref();
    let basket: Vec<ItemId> = read_json(path)?;
    info!("Loaded basket of {} items from {}", basket.len(), path.display());
    Ok(basket)
}

/// Loads a splitter configuration; missing fields keep their defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SplitterConfig, CatalogError> {
    read_json(path.as_ref())
}
