//! Offline model trainer
//!
//! Fabricates the synthetic dataset, fits the classifier, and writes the
//! serving artifacts next to each other:
//!
//! - `rockfall_model.json`  full bundle the API serves from `MODEL_PATH`
//! - `model_info.json`      weight-free metadata mirror
//! - `sample_data.json`     labeled sample records for inspection
//!
//! Usage: `train-model [output-dir]` (defaults to the current directory).

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use rockfall_api::model::{train, RockfallPredictor, TrainingOptions};
use rockfall_api::simulation::TelemetrySimulator;

fn main() -> Result<()> {
    println!("🚀 Training Rockfall Prediction Model");
    println!("{}", "=".repeat(50));

    let output_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let options = TrainingOptions::default();
    println!(
        "🏗️  Generating {} synthetic training samples...",
        options.n_samples
    );

    let outcome = train(&options).context("training failed")?;

    println!(
        "✅ Model trained - held-out accuracy {:.3} ({} train / {} test)",
        outcome.report.accuracy, outcome.report.n_train, outcome.report.n_test
    );

    println!("\n📈 Classification report:");
    println!(
        "   {:<10} {:>9} {:>9} {:>9} {:>8}",
        "class", "precision", "recall", "f1", "support"
    );
    for class in &outcome.report.classes {
        println!(
            "   {:<10} {:>9.3} {:>9.3} {:>9.3} {:>8}",
            class.category.as_str(),
            class.precision,
            class.recall,
            class.f1,
            class.support
        );
    }

    let model_path = output_dir.join("rockfall_model.json");
    outcome
        .artifact
        .save(&model_path)
        .with_context(|| format!("writing {}", model_path.display()))?;

    let info_path = output_dir.join("model_info.json");
    outcome
        .artifact
        .info()
        .save(&info_path)
        .with_context(|| format!("writing {}", info_path.display()))?;

    let samples_path = output_dir.join("sample_data.json");
    let samples = serde_json::to_string_pretty(&outcome.samples)?;
    std::fs::write(&samples_path, samples)
        .with_context(|| format!("writing {}", samples_path.display()))?;

    println!("\n💾 Artifacts written to {}", output_dir.display());
    println!("   {}", model_path.display());
    println!("   {}", info_path.display());
    println!("   {}", samples_path.display());

    // Self-test: push one simulated reading through the freshly trained model.
    let predictor = RockfallPredictor::from_artifact(outcome.artifact)?;
    let reading = TelemetrySimulator::new(Some(options.seed)).generate();
    let assessment = predictor.predict(&reading.to_features())?;
    println!(
        "\n🎯 Self-test prediction: {} ({}%, confidence {}%)",
        assessment.risk_category, assessment.risk_probability, assessment.confidence
    );

    println!("\n🔍 Top feature weights:");
    for (name, importance) in predictor.feature_importance().into_iter().take(5) {
        println!("   {name:<24} {importance:.3}");
    }

    Ok(())
}
