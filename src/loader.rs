//! Product loader
//!
//! Reads product JSON files (Open Food Facts exports or flat records) and
//! prepares them for analysis.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analyzer::build_product_info;
use crate::scoring::AdditiveSets;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Product data must be a JSON object: {}", .0.display())]
    NotAnObject(PathBuf),

    #[error("No sample product found in {}", .0.display())]
    NoSampleFound(PathBuf),
}

/// Load a product file and fill in what the analyzer needs
///
/// With an Open Food Facts envelope, only `product` and the top-level
/// `code`/`id` are kept. Reference lists missing from the file are taken
/// from `defaults`. A missing `nutrition` block is derived from
/// `product.nutriments`, and missing `additives` from
/// `product.additives_tags`.
pub fn load_product(path: impl AsRef<Path>, defaults: &AdditiveSets) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = match raw {
        Value::Object(map) => map,
        _ => return Err(LoadError::NotAnObject(path.to_path_buf())),
    };

    let has_envelope = data.get("product").map_or(false, Value::is_object);
    if has_envelope {
        data = keep_envelope(data);
    }

    insert_default_list(&mut data, "safe_additives", &defaults.safe);
    insert_default_list(&mut data, "suspicious_additives", &defaults.suspicious);
    insert_default_list(&mut data, "harmful_additives", &defaults.harmful);

    if has_envelope {
        let derived = build_product_info(&Value::Object(data.clone()), None);
        let source = data.get("product").and_then(Value::as_object);
        let has_nutriments = source.map_or(false, |p| p.contains_key("nutriments"));
        let has_tags = source.map_or(false, |p| p.contains_key("additives_tags"));

        if has_nutriments && !data.contains_key("nutrition") {
            if let Ok(nutrition) = serde_json::to_value(derived.nutrition) {
                data.insert("nutrition".to_string(), nutrition);
            }
        }
        if has_tags && !data.contains_key("additives") {
            data.insert("additives".to_string(), Value::from(derived.additives));
        }
    }

    tracing::debug!("Loaded product from {}", path.display());
    Ok(Value::Object(data))
}

/// Find a sample product file in a directory
///
/// Picks the first `*.json` file (by name) whose name starts with a digit,
/// as barcode-named exports do.
pub fn find_sample_product(dir: impl AsRef<Path>) -> Result<PathBuf, LoadError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().map_or(false, |ext| ext == "json")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.chars().next())
                    .map_or(false, |c| c.is_ascii_digit())
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::NoSampleFound(dir.to_path_buf()))
}

fn keep_envelope(mut data: Map<String, Value>) -> Map<String, Value> {
    let mut kept = Map::new();
    for key in ["product", "code", "id"] {
        if let Some(value) = data.remove(key) {
            kept.insert(key.to_string(), value);
        }
    }
    for key in ["safe_additives", "suspicious_additives", "harmful_additives"] {
        if let Some(value) = data.remove(key) {
            kept.insert(key.to_string(), value);
        }
    }
    kept
}

fn insert_default_list(
    data: &mut Map<String, Value>,
    key: &str,
    codes: &BTreeSet<String>,
) {
    if !data.contains_key(key) {
        data.insert(
            key.to_string(),
            Value::from(codes.iter().cloned().collect::<Vec<_>>()),
        );
    }
}
