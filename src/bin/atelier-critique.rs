// Atelier Critique - staged art critique of a written description and optional image

use atelier::critique::{CritiqueConfig, CritiqueError, InMemoryKnowledgeBase, Orchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use termimad::{MadSkin, crossterm::style::Color};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn create_markdown_skin() -> MadSkin {
    let mut skin = MadSkin::default();

    skin.headers[0].set_fg(Color::Cyan);
    skin.headers[1].set_fg(Color::Blue);
    skin.headers[2].set_fg(Color::Green);

    skin.bold.set_fg(Color::White);
    skin.italic.set_fg(Color::Magenta);

    skin
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let description_path = PathBuf::from(&args[1]);
    if !description_path.exists() {
        eprintln!("Error: File not found: {}", description_path.display());
        return Ok(());
    }
    let description = std::fs::read_to_string(&description_path)?;
    let image = args.get(2).map(String::as_str);

    let config = CritiqueConfig::load()?;
    println!("Atelier v{} - Art Critique\n", env!("CARGO_PKG_VERSION"));
    println!("Text model:   {}", config.text_model);
    if image.is_some() {
        println!("Vision model: {}", config.vision_model);
    }
    println!();

    let knowledge = Arc::new(InMemoryKnowledgeBase::seeded());
    let orchestrator = Orchestrator::from_config(&config, knowledge)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    match orchestrator.analyze(description.trim(), image, &cancel).await {
        Ok(Some(critique)) => {
            let skin = create_markdown_skin();
            skin.print_text(&critique);
        }
        Ok(None) => {
            println!("No critique produced: the description yielded no usable analysis.");
        }
        Err(CritiqueError::Cancelled) => {
            eprintln!("Cancelled.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn print_usage() {
    println!("Atelier Critique - staged art critique");
    println!();
    println!("Usage: atelier-critique <description-file> [image]");
    println!();
    println!("The pipeline will:");
    println!("  1. Describe the image with the vision model (when given)");
    println!("  2. Extract title, artist, year, period, colors and mood from the description");
    println!("  3. Retrieve art-historical context and write an initial analysis");
    println!("  4. Gather period perspectives and synthesize a final critique");
    println!();
    println!("The image may be a file path, an http(s) URL or a data URI.");
    println!();
    println!("Configuration: <config dir>/atelier/config.toml");
    println!();
    println!("Environment variables:");
    println!("  OLLAMA_MODEL    - Text model override (default: llama3.1:8b)");
    println!("  RUST_LOG        - Log filter (default: info)");
    println!();
    println!("Examples:");
    println!("  atelier-critique harbor.txt");
    println!("  atelier-critique harbor.txt ./images/harbor.jpg");
}
