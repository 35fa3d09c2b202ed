//! Additive scorer
//!
//! Scores a product's effective additive set against safe, suspicious and
//! harmful reference lists. A product without additives scores a neutral 50.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{ScoringError, ScoringResult};
use super::nutrition::{FULL_POINTS, HALF_POINTS};

/// Prefix that marks an ingredient name as an additive code
pub const ADDITIVE_CODE_PREFIX: &str = "E";

const SAFE_WEIGHT: f64 = 0.4;
const SUSPICIOUS_WEIGHT: f64 = 0.3;
const HARMFUL_WEIGHT: f64 = 0.3;

/// Reference sets of additive codes, supplied per call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdditiveSets {
    pub safe: BTreeSet<String>,
    pub suspicious: BTreeSet<String>,
    pub harmful: BTreeSet<String>,
}

impl AdditiveSets {
    pub fn new<S, I>(safe: I, suspicious: I, harmful: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            safe: safe.into_iter().map(Into::into).collect(),
            suspicious: suspicious.into_iter().map(Into::into).collect(),
            harmful: harmful.into_iter().map(Into::into).collect(),
        }
    }
}

/// Sub-scores (0-10 each) and the unrounded 0-100 additives score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditiveBreakdown {
    pub additives: BTreeSet<String>,
    pub safe_points: f64,
    pub suspicious_points: f64,
    pub harmful_points: f64,
    pub score: f64,
}

/// Score an effective additive set against the reference sets
pub fn score_additives(additives: &BTreeSet<String>, sets: &AdditiveSets) -> AdditiveBreakdown {
    let safe_points = safe_points(additives, &sets.safe);
    let suspicious_points = absence_points(additives, &sets.suspicious);
    let harmful_points = absence_points(additives, &sets.harmful);

    let weighted = safe_points * SAFE_WEIGHT
        + suspicious_points * SUSPICIOUS_WEIGHT
        + harmful_points * HARMFUL_WEIGHT;

    AdditiveBreakdown {
        additives: additives.clone(),
        safe_points,
        suspicious_points,
        harmful_points,
        score: weighted * FULL_POINTS,
    }
}

fn safe_points(additives: &BTreeSet<String>, safe: &BTreeSet<String>) -> f64 {
    if additives.is_empty() {
        HALF_POINTS
    } else if additives.is_subset(safe) {
        FULL_POINTS
    } else if !additives.is_disjoint(safe) {
        HALF_POINTS
    } else {
        0.0
    }
}

/// Full points when none of the additives are in `listed`
fn absence_points(additives: &BTreeSet<String>, listed: &BTreeSet<String>) -> f64 {
    if additives.is_empty() {
        HALF_POINTS
    } else if additives.is_disjoint(listed) {
        FULL_POINTS
    } else {
        0.0
    }
}

/// Read the effective additive set and the reference sets from raw product data
///
/// The effective set is the union of explicit `additives` codes and every
/// ingredient name that starts with the additive code prefix.
pub fn read_additives(
    product: &Map<String, Value>,
) -> ScoringResult<(BTreeSet<String>, AdditiveSets)> {
    let additives = present(product, "additives");
    let ingredients = present(product, "ingredients");
    if additives.is_none() && ingredients.is_none() {
        return Err(ScoringError::MissingAdditiveData);
    }

    let sets = AdditiveSets {
        safe: reference_list(product, "safe_additives", "Safe")?,
        suspicious: reference_list(product, "suspicious_additives", "Suspicious")?,
        harmful: reference_list(product, "harmful_additives", "Harmful")?,
    };

    let mut effective = match additives {
        Some(value) => string_set(value, "Additives list")?,
        None => BTreeSet::new(),
    };

    if let Some(value) = ingredients {
        let entries = value
            .as_array()
            .ok_or(ScoringError::MalformedList("Ingredients list"))?;
        for entry in entries {
            let name = ingredient_name(entry)?;
            if name.starts_with(ADDITIVE_CODE_PREFIX) {
                effective.insert(name.to_string());
            }
        }
    }

    Ok((effective, sets))
}

fn present<'a>(product: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    product.get(key).filter(|v| !v.is_null())
}

fn reference_list(
    product: &Map<String, Value>,
    key: &str,
    label: &'static str,
) -> ScoringResult<BTreeSet<String>> {
    let value = present(product, key).ok_or(ScoringError::MissingReferenceList(label))?;
    string_set(value, "Additives reference list")
}

fn string_set(value: &Value, label: &'static str) -> ScoringResult<BTreeSet<String>> {
    value
        .as_array()
        .ok_or(ScoringError::MalformedList(label))?
        .iter()
        .map(|code| {
            code.as_str()
                .map(str::to_string)
                .ok_or(ScoringError::MalformedList(label))
        })
        .collect()
}

fn ingredient_name(entry: &Value) -> ScoringResult<&str> {
    let entry = entry.as_object().ok_or(ScoringError::MalformedIngredient)?;
    match entry.get("name") {
        None | Some(Value::Null) => Err(ScoringError::MissingIngredientName),
        Some(name) => name.as_str().ok_or(ScoringError::MalformedIngredient),
    }
}
