// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;

use term_categorizer::config::{init_tracing, AppConfig};
use term_categorizer::db::{count_records, insert_records, open_database};
use term_categorizer::{flatten, Classifier, TaxonomyDefinition, TaxonomySnapshot, TaxonomySource};

const USAGE: &str = "Usage:
  categorizer classify <text...>      Classify text against the taxonomy
  categorizer tokenize <text...>      Show tokens after stop-word removal
  categorizer model                   Print the taxonomy as JSON
  categorizer import <source> <db>    Copy a taxonomy (.json/.csv/.db) into SQLite
  categorizer ui                      Interactive explorer (tui feature)";

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let args: Vec<String> = env::args().collect();

    // Log lines would draw over the TUI, so keep it to warnings there
    match args.get(1).map(String::as_str) {
        Some("ui") | None => init_tracing("warn"),
        _ => init_tracing(&config.log_filter),
    }

    match args.get(1).map(String::as_str) {
        Some("classify") => run_classify(&config, &args[2..]),
        Some("tokenize") => run_tokenize(&config, &args[2..]),
        Some("model") => run_model(&config),
        Some("import") => match (args.get(2), args.get(3)) {
            (Some(source), Some(db)) => run_import(Path::new(source), Path::new(db)),
            _ => bail!("import needs <source> and <db>\n\n{}", USAGE),
        },
        Some("ui") | None => run_ui_mode(&config),
        Some(other) => bail!("Unknown command {:?}\n\n{}", other, USAGE),
    }
}

fn load_snapshot(config: &AppConfig) -> Result<TaxonomySnapshot> {
    let source = config.taxonomy_source()?;
    let root = source
        .load()
        .with_context(|| format!("Failed to load taxonomy from {}", source))?;
    Ok(TaxonomySnapshot::new(&root, config.case_mode, source.to_string()))
}

fn run_classify(config: &AppConfig, words: &[String]) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let classifier = Classifier::new(config.case_mode);

    let matches = classifier.classify(&words.join(" "), &snapshot)?;
    println!("{}", serde_json::to_string_pretty(&matches)?);

    Ok(())
}

fn run_tokenize(config: &AppConfig, words: &[String]) -> Result<()> {
    let classifier = Classifier::new(config.case_mode);
    let tokens = classifier.tokenize(&words.join(" "));
    println!("{}", serde_json::to_string_pretty(&tokens)?);

    Ok(())
}

fn run_model(config: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let definition = TaxonomyDefinition::from_node(snapshot.root());
    println!("{}", serde_json::to_string_pretty(&definition)?);

    Ok(())
}

fn run_import(source_path: &Path, db_path: &Path) -> Result<()> {
    println!("🗄️  Taxonomy Import → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load and validate source
    println!("\n📂 Loading {}...", source_path.display());
    let source = TaxonomySource::from_path(source_path)?;
    let root = source.load()?;
    let records = flatten(&root);
    println!("✓ Loaded {} categories", records.len());

    // 2. Setup database
    println!("\n🔧 Setting up database...");
    let mut conn = open_database(db_path)?;
    println!("✓ Database initialized with WAL mode");

    // 3. Insert records
    println!("\n💾 Writing categories...");
    insert_records(&mut conn, &records)?;

    // 4. Verify count
    let count = count_records(&conn)?;
    if count != records.len() as i64 {
        bail!("Expected {} categories in database, found {}", records.len(), count);
    }
    println!("✓ Database contains {} categories", count);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let classifier = Classifier::new(config.case_mode);

    let mut app = ui::App::new(snapshot, classifier);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: categorizer classify <text>");
    std::process::exit(1);
}
