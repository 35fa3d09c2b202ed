//! Utility to print the local scoring breakdown for a product file

use std::path::PathBuf;

use wecare::config::default_additive_sets;
use wecare::loader::load_product;
use wecare::scoring;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: score_product <product.json>")?;

    let product = load_product(&path, &default_additive_sets())?;
    let breakdown = scoring::breakdown(&product)?;

    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    eprintln!(
        "Total: {}/100 - {} (nutrition {:.1}, additives {:.1})",
        breakdown.score.total,
        breakdown.score.category,
        breakdown.nutrition.score,
        breakdown.additives.score
    );

    Ok(())
}
