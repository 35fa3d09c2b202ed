//! WeCare Product Analyzer
//!
//! Analyzes one food product for the user's allergens and diets and prints
//! the scored analysis as JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wecare::ai::{GptClient, OfflineAssistant, ProductAssistant};
use wecare::analyzer::{external_score, ProductAnalyzer};
use wecare::build_info;
use wecare::config::{default_additive_sets, Settings};
use wecare::loader::{find_sample_product, load_product};

/// Scoring method requested on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ScoringMode {
    /// Ask the AI collaborator for a score
    Ai,
    /// Always use the local scoring engine
    Local,
    /// Use the score carried by the product, else score locally
    External,
    /// Best available: external, then AI, then local
    Auto,
}

impl ScoringMode {
    fn use_ai_scoring(self, scoring_enabled: bool) -> bool {
        scoring_enabled && matches!(self, ScoringMode::Ai | ScoringMode::Auto)
    }
}

#[derive(Parser, Debug)]
#[command(name = "wecare")]
#[command(about = "WeCare product analysis tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Product JSON file (defaults to the first barcode-named file in --data-dir)
    product_file: Option<PathBuf>,

    /// Directory searched for a sample product when no file is given
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Scoring method
    #[arg(long, value_enum, default_value = "auto")]
    scoring: ScoringMode,

    /// Allergens to check for
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        default_values = ["Peanuts", "Shellfish", "Gluten"]
    )]
    allergens: Vec<String>,

    /// Dietary preferences to check against
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        default_values = ["Vegetarian", "Low-Sugar"]
    )]
    diets: Vec<String>,

    /// API key for the LLM endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(api_key) = cli.api_key {
        settings.api_key = api_key;
    }
    if let Some(model) = cli.model.filter(|m| !m.trim().is_empty()) {
        settings.model = model;
    }

    // Logs go to stderr so stdout carries only the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("wecare={}", settings.log_level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let product_file = match cli.product_file {
        Some(path) => path,
        None => {
            let path = find_sample_product(&cli.data_dir)?;
            tracing::info!("Using sample product: {}", path.display());
            path
        }
    };

    let product = load_product(&product_file, &default_additive_sets())?;
    tracing::info!("Loaded product from {}", product_file.display());

    if cli.scoring == ScoringMode::External && external_score(&product)?.is_none() {
        tracing::warn!(
            "External score requested but not available. Using local scoring instead."
        );
    }

    let assistant: Box<dyn ProductAssistant> = match GptClient::from_settings(&settings) {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!("AI collaborator unavailable: {}", e);
            Box::new(OfflineAssistant)
        }
    };
    let analyzer = ProductAnalyzer::new(assistant);

    let analysis = analyzer.analyze_product(
        &product,
        &cli.allergens,
        &cli.diets,
        cli.scoring.use_ai_scoring(settings.scoring_enabled),
    )?;
    tracing::info!(
        "Product analysis completed using {}",
        analysis.scoring_source.describe()
    );
    if analysis.allergens_analysis.has_user_allergens() {
        tracing::warn!(
            "Product contains allergens you're sensitive to: {}",
            analysis.allergens_analysis.user_allergens_present.join(", ")
        );
    }

    println!("{}", serde_json::to_string_pretty(&analysis)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_mode_ai_request() {
        assert!(ScoringMode::Ai.use_ai_scoring(true));
        assert!(ScoringMode::Auto.use_ai_scoring(true));
        assert!(!ScoringMode::Local.use_ai_scoring(true));
        assert!(!ScoringMode::External.use_ai_scoring(true));
        assert!(!ScoringMode::Ai.use_ai_scoring(false));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wecare"]);
        assert!(cli.product_file.is_none());
        assert_eq!(cli.scoring, ScoringMode::Auto);
        assert_eq!(cli.allergens, vec!["Peanuts", "Shellfish", "Gluten"]);
        assert_eq!(cli.diets, vec!["Vegetarian", "Low-Sugar"]);
    }

    #[test]
    fn test_cli_lists() {
        let cli = Cli::parse_from([
            "wecare",
            "product.json",
            "--scoring",
            "local",
            "--allergens",
            "Milk,Eggs",
            "--diets",
            "Vegan",
        ]);
        assert_eq!(cli.product_file, Some(PathBuf::from("product.json")));
        assert_eq!(cli.scoring, ScoringMode::Local);
        assert_eq!(cli.allergens, vec!["Milk", "Eggs"]);
        assert_eq!(cli.diets, vec!["Vegan"]);
    }

    #[test]
    fn test_cli_ai_overrides() {
        let cli = Cli::parse_from(["wecare", "--api-key", "sk-test", "--model", "gpt-4o"]);
        assert_eq!(cli.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }
}
