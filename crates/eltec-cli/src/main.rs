//! eltec-enrich - add Wikidata QIDs to ELTeC metadata
//!
//! Reads a TSV metadata file, resolves every author and work to a Wikidata
//! QID and writes the file back with two extra columns.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod config;

use config::FileConfig;

#[derive(Parser)]
#[command(name = "eltec-enrich")]
#[command(about = "Enrich ELTeC metadata with Wikidata IDs for authors and works")]
#[command(version)]
struct Cli {
    /// Input TSV file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output TSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path (default: ./eltec-enrich.toml or ~/.config/eltec-enrich/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SPARQL endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Language tag for title label matching
    #[arg(long)]
    lang: Option<String>,

    /// Milliseconds to pause after each request
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Resolve only the first N rows; the rest are written without QIDs
    #[arg(short = 'l', long)]
    limit: Option<usize>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// CLI flags win over the config file.
    fn apply(&self, config: &mut eltec_wikidata::Config) {
        if let Some(v) = &self.input {
            config.input = v.clone();
        }
        if let Some(v) = &self.output {
            config.output = v.clone();
        }
        if let Some(v) = &self.endpoint {
            config.endpoint = v.clone();
        }
        if let Some(v) = &self.lang {
            config.lang = v.clone();
        }
        if let Some(ms) = self.delay_ms {
            config.delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = eltec_core::ProgressContext::new();
    let multi = progress.is_tty().then(|| progress.multi());
    eltec_core::init_logging(cli.quiet, cli.debug, multi);

    let file = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::load()?,
    };
    let mut config = eltec_wikidata::Config::default();
    file.apply(&mut config);
    cli.apply(&mut config);

    if cli.show_config {
        print_config(&config);
        return Ok(());
    }

    let summary = eltec_wikidata::run(&config, &progress)?;

    println!();
    println!(
        "Authors matched: {}/{} ({:.1}%)",
        summary.authors_matched,
        summary.rows,
        summary.author_rate()
    );
    println!(
        "Works   matched: {}/{} ({:.1}%)",
        summary.works_matched,
        summary.rows,
        summary.work_rate()
    );
    Ok(())
}

fn print_config(config: &eltec_wikidata::Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Input", &config.input.display().to_string()]);
    table.add_row(vec!["Output", &config.output.display().to_string()]);
    table.add_row(vec!["Endpoint", &config.endpoint]);
    table.add_row(vec!["User-Agent", &config.user_agent]);
    table.add_row(vec!["Label language", &config.lang]);
    table.add_row(vec!["Work class", &config.work_class]);
    table.add_row(vec!["Delay", &format!("{}ms", config.delay.as_millis())]);
    table.add_row(vec!["Timeout", &format!("{}s", config.timeout.as_secs())]);
    table.add_row(vec![
        "Columns",
        &format!(
            "{}, {}, {}, {}",
            config.columns.author_name,
            config.columns.author_ids,
            config.columns.title,
            config.columns.title_ids
        ),
    ]);
    table.add_row(vec![
        "Row limit",
        &config.limit.map_or("none".to_string(), |n| n.to_string()),
    ]);

    eprintln!("\n{table}");
}
