// ABOUTME: Main entry point for the deck-slides program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use deck::{
    Config, ConvertOptions, HttpCompleter, PaperContext, SlideRecord, SlideRenderer, SlideType,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a slides JSON file to Marp markdown
    Render(RenderArgs),

    /// Plan a presentation from paper JSON (Phase 1 only)
    Plan(PlanArgs),

    /// Generate a full presentation from paper JSON (plan, generate, render)
    Generate(GenerateArgs),

    /// Print content JSON schemas for the slide type catalog
    Schemas(SchemasArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Path to the slides JSON file (array of {"type", "content"} records)
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output markdown file
    #[arg(short, long)]
    output: PathBuf,

    /// Template directory (defaults to TEMPLATE_DIR or ./templates)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Skip content validation before rendering
    #[arg(long)]
    no_validate: bool,

    /// Omit the Marp front-matter block
    #[arg(long)]
    no_frontmatter: bool,
}

#[derive(Args)]
struct PlanArgs {
    /// Path to the paper JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output plan JSON (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of slides
    #[arg(short, long, default_value_t = 10)]
    slides: usize,

    /// Target language code (ko, en, ja, zh, es, fr, de)
    #[arg(short, long, default_value = "ko")]
    language: String,
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to the paper JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to output markdown file
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum number of slides
    #[arg(short, long, default_value_t = 10)]
    slides: usize,

    /// Target language code (ko, en, ja, zh, es, fr, de)
    #[arg(short, long, default_value = "ko")]
    language: String,

    /// Retry budget per slide on validation failure
    #[arg(long)]
    retries: Option<u32>,

    /// Template directory (defaults to TEMPLATE_DIR or ./templates)
    #[arg(long)]
    templates: Option<PathBuf>,
}

#[derive(Args)]
struct SchemasArgs {
    /// Print the schema for a single slide type tag
    #[arg(long)]
    slide_type: Option<String>,
}

fn load_json(path: &PathBuf) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON: {:?}", path))
}

fn cmd_render(args: &RenderArgs, config: &Config) -> anyhow::Result<()> {
    let template_dir = args.templates.clone().unwrap_or_else(|| config.template_dir.clone());
    let renderer = SlideRenderer::new(&template_dir)?;

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {:?}", args.input))?;
    let slides: Vec<SlideRecord> =
        serde_json::from_str(&raw).context("Input must be an array of slide records")?;

    let markdown =
        renderer.render_presentation(&slides, !args.no_validate, !args.no_frontmatter)?;

    deck::utils::ensure_parent_directory_exists(&args.output)?;
    fs::write(&args.output, markdown)
        .with_context(|| format!("Failed to write output file: {:?}", args.output))?;

    println!("Presentation rendered successfully: {:?}", args.output);
    Ok(())
}

async fn cmd_plan(args: &PlanArgs, config: &Config) -> anyhow::Result<()> {
    let paper_json = load_json(&args.input)?;
    let paper = PaperContext::from_value(&paper_json);
    let completer = HttpCompleter::new(config.llm_config()?)?;

    let plan = deck::plan_presentation(&completer, &paper, args.slides, &args.language).await?;
    let rendered = serde_json::to_string_pretty(&plan)?;

    match &args.output {
        Some(path) => {
            deck::utils::ensure_parent_directory_exists(path)?;
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            println!("Plan written to {:?}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

async fn cmd_generate(args: &GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let template_dir = args.templates.clone().unwrap_or_else(|| config.template_dir.clone());
    let renderer = SlideRenderer::new(&template_dir)?;
    let paper_json = load_json(&args.input)?;
    let completer = Arc::new(HttpCompleter::new(config.llm_config()?)?);

    let options = ConvertOptions {
        max_slides: args.slides,
        language: args.language.clone(),
        max_retries: args.retries.unwrap_or(config.max_retries),
    };

    let markdown = deck::convert_paper(&completer, &renderer, &paper_json, &options).await?;

    deck::utils::ensure_parent_directory_exists(&args.output)?;
    fs::write(&args.output, markdown)
        .with_context(|| format!("Failed to write output file: {:?}", args.output))?;

    println!("Presentation generated successfully: {:?}", args.output);
    println!("To view it: marp --theme custom-style.css {:?}", args.output);
    Ok(())
}

fn cmd_schemas(args: &SchemasArgs) -> anyhow::Result<()> {
    let catalog = match &args.slide_type {
        Some(tag) => {
            let slide_type = SlideType::parse_tag(tag)?;
            deck::schema::json_schema(slide_type)
        }
        None => deck::schema::schema_catalog(),
    };
    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match &cli.command {
        Some(Commands::Render(args)) => cmd_render(args, &config),
        Some(Commands::Plan(args)) => cmd_plan(args, &config).await,
        Some(Commands::Generate(args)) => cmd_generate(args, &config).await,
        Some(Commands::Schemas(args)) => cmd_schemas(args),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
