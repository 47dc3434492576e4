use std::io::Read;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use listing_extractor::carousel::{Direction, SlideIndex};
use listing_extractor::parser::segment::segment;
use listing_extractor::render::{render, Theme};
use listing_extractor::settings::Settings;
use listing_extractor::{db, process_message, Grammar, RawMessage, Role};

#[derive(Parser)]
#[command(
    name = "listing_extractor",
    about = "Extract product listings from assistant chat messages"
)]
struct Cli {
    /// Grammar name (storefront, labelled) or path to a grammar JSON file
    #[arg(short, long, global = true)]
    grammar: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    User,
    Assistant,
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::User => Role::User,
            RoleArg::Assistant => Role::Assistant,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print products and segmented text as JSON
    Extract {
        /// Message file (default: stdin)
        file: Option<String>,
        #[arg(short, long, value_enum, default_value = "assistant")]
        role: RoleArg,
    },
    /// Print only the before/after segmentation as JSON
    Segment {
        /// Message file (default: stdin)
        file: Option<String>,
    },
    /// Print a text layout of the message with its product carousel
    Render {
        /// Message file (default: stdin)
        file: Option<String>,
        /// Slide to show (0-based)
        #[arg(short, long, default_value = "0")]
        slide: usize,
        /// Theme: dark, light, minimal
        #[arg(short, long)]
        theme: Option<String>,
    },
    /// Replay navigation events: next, prev, goto:K, swipe:START:END
    Carousel {
        /// Number of products in the carousel
        #[arg(short = 'n', long)]
        count: usize,
        events: Vec<String>,
    },
    /// Extract a JSONL transcript into the database
    Batch {
        /// One {"role", "content"} object per line
        transcript: String,
        /// Max messages to process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show database statistics
    Stats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let grammar = Grammar::resolve(cli.grammar.as_deref().unwrap_or(&settings.grammar))?;

    match cli.command {
        Commands::Extract { file, role } => {
            let msg = RawMessage {
                role: role.into(),
                content: read_input(file.as_deref())?,
            };
            let out = process_message(&msg, &grammar);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Segment { file } => {
            let content = read_input(file.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&segment(&content, &grammar))?);
        }
        Commands::Render { file, slide, theme } => {
            let theme = Theme::by_name(theme.as_deref().unwrap_or(&settings.theme))?
                .with_currency(&settings.currency);
            let out = process_message(&RawMessage::assistant(read_input(file.as_deref())?), &grammar);
            let mut slides = SlideIndex::with_threshold(out.products.len(), settings.swipe_threshold);
            if let Some(s) = slides.as_mut() {
                s.go_to(slide);
            }
            println!("{}", render(&out.parsed, &out.products, slides.as_ref(), &theme));
        }
        Commands::Carousel { count, events } => {
            let Some(mut slides) = SlideIndex::with_threshold(count, settings.swipe_threshold) else {
                println!("No products, no carousel.");
                return Ok(());
            };
            println!("start -> {}", slides.current());
            for event in &events {
                apply_event(&mut slides, event)?;
                println!("{} -> {}", event, slides.current());
            }
        }
        Commands::Batch { transcript, limit } => {
            let messages = read_transcript(&transcript, limit)?;
            if messages.is_empty() {
                println!("Transcript is empty.");
                return Ok(());
            }
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            info!(messages = messages.len(), grammar = %grammar.name, "processing transcript");
            let products = process_batch(&conn, messages, &grammar)?;
            println!("Saved {} products.", products);
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Messages:      {}", s.messages);
            println!("Assistant:     {}", s.assistant);
            println!("With products: {}", s.with_products);
            println!("Products:      {}", s.products);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("done in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn read_transcript(path: &str, limit: Option<usize>) -> Result<Vec<RawMessage>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    parse_transcript(&text, limit).with_context(|| format!("parsing {}", path))
}

fn parse_transcript(text: &str, limit: Option<usize>) -> Result<Vec<RawMessage>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .take(limit.unwrap_or(usize::MAX))
        .map(|(i, l)| {
            serde_json::from_str(l).with_context(|| format!("line {}: not a message", i + 1))
        })
        .collect()
}

fn process_batch(
    conn: &rusqlite::Connection,
    messages: Vec<RawMessage>,
    grammar: &Grammar,
) -> Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(messages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut total = 0;
    for chunk in messages.chunks(500) {
        let rows: Vec<_> = chunk
            .par_iter()
            .map(|m| (m.clone(), process_message(m, grammar)))
            .collect();
        total += db::save_extracted(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(total)
}

fn apply_event(slides: &mut SlideIndex, event: &str) -> Result<()> {
    let parts: Vec<&str> = event.split(':').collect();
    match parts.as_slice() {
        ["next"] => slides.step(Direction::Next),
        ["prev"] | ["previous"] => slides.step(Direction::Previous),
        ["goto", k] => slides.go_to(k.parse().with_context(|| format!("bad index in {}", event))?),
        ["swipe", start, end] => {
            let start: f32 = start.parse().with_context(|| format!("bad start in {}", event))?;
            let end: f32 = end.parse().with_context(|| format!("bad end in {}", event))?;
            slides.swipe(start, end);
        }
        _ => bail!("unknown event '{}'", event),
    }
    Ok(())
}
