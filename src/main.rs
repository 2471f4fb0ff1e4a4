// CLI driver: entity record JSON in → assembled IRS form field sets out.
// The summarizer is offline by default; set SUMMARIZER_URL to enable the
// advisory HTTP path (failures still fall back deterministically).

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;

use filing_engine::{
    assemble_forms, AssembledForm, EntityRecord, FormBundle, HttpSummarizer, NoopSummarizer,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(record_path) = args.get(1) else {
        eprintln!("Usage: filing-engine <record.json> [ss4|2848|8821|all]");
        std::process::exit(2);
    };
    let form = args.get(2).map(String::as_str).unwrap_or("all");

    // 1. Load the raw record
    let raw = fs::read_to_string(record_path)
        .with_context(|| format!("Failed to read record file: {record_path}"))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Record file is not valid JSON")?;
    let record = EntityRecord::from_json(&value)?;

    println!("📂 Loaded record for {:?} ({})", record.company_name, record.entity_type.as_str());

    // 2. Resolve + assemble
    let bundle = generate(&record).await?;

    println!(
        "✓ Responsible party: {} ({})",
        bundle.responsible_party.name, bundle.responsible_party.ssn
    );
    println!("✓ Quality: {}", bundle.quality.summary());

    // 3. Emit the requested field set(s)
    let output = match form {
        "ss4" => form_json(&bundle.ss4)?,
        "2848" => form_json(&bundle.f2848)?,
        "8821" => form_json(&bundle.f8821)?,
        "all" => serde_json::to_string_pretty(&bundle)?,
        other => bail!("unknown form {other:?}, expected ss4|2848|8821|all"),
    };
    println!("{output}");

    Ok(())
}

async fn generate(record: &EntityRecord) -> Result<FormBundle> {
    let bundle = match env::var("SUMMARIZER_URL") {
        Ok(url) if !url.trim().is_empty() => {
            println!("🌐 Using summarizer at {url}");
            assemble_forms(record, &HttpSummarizer::new(url)).await?
        }
        _ => assemble_forms(record, &NoopSummarizer).await?,
    };
    Ok(bundle)
}

fn form_json(form: &AssembledForm) -> Result<String> {
    Ok(serde_json::to_string_pretty(form)?)
}
