//! CLI tool for extracting nested outlines from slide-deck PDFs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slidetree_core::{ExtractorConfig, OutlineFormatter, PageWords, SlideTreeExtractor};
use slidetree_pdf::PdftotextSource;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Turn slide-deck PDFs into nested bullet outlines.
#[derive(Parser, Debug)]
#[command(name = "slidetree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    engine: EngineArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the outline of every retained slide
    Extract {
        /// Input PDF
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(short, long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Separate the plan slide from the content slides
    Split {
        /// Input PDF
        input: PathBuf,

        /// Page number of the plan slide (default: search by keyword)
        #[arg(long, value_name = "N")]
        plan_slide: Option<usize>,

        /// Write to a file instead of stdout
        #[arg(short, long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Read a PDF holding only a plan as one merged outline
    Plan {
        /// Input PDF
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show how fragmented the words of one page are
    Fragmentation {
        /// Input PDF
        input: PathBuf,

        /// Page to inspect (1-based)
        #[arg(long, value_name = "N")]
        page: usize,
    },
    /// Show how the rows of one page are split into bullets
    Bullets {
        /// Input PDF
        input: PathBuf,

        /// Page to inspect (1-based)
        #[arg(long, value_name = "N")]
        page: usize,
    },
    /// Show the titles and keywords considered for the plan slide
    PlanReport {
        /// Input PDF
        input: PathBuf,
    },
    /// Summarize the structure of a deck
    Analyze {
        /// Input PDF
        input: PathBuf,

        /// Page number of the plan slide (default: search by keyword)
        #[arg(long, value_name = "N")]
        plan_slide: Option<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Text,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug)]
struct EngineArgs {
    /// JSON file with extractor settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Largest indent difference within one nesting level
    #[arg(long, global = true)]
    indent_tolerance: Option<f64>,

    /// Number of nesting levels kept per slide
    #[arg(long = "max-depth", global = true)]
    max_depth: Option<usize>,

    /// Share of short rows above which a page is fragmented
    #[arg(long, global = true)]
    fragmentation_threshold: Option<f64>,

    /// Pages to leave out, e.g. 2,5
    #[arg(long, global = true, value_delimiter = ',', value_name = "PAGES")]
    skip_pages: Vec<usize>,

    /// Rebuild fragmented pages instead of dropping them
    #[arg(long, global = true)]
    reconstruct_fragmented: bool,

    /// Keep fragmented pages as they are
    #[arg(long, global = true)]
    no_fragmentation_filter: bool,
}

impl EngineArgs {
    /// Load the config file, if any, then apply command-line overrides.
    fn to_config(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => ExtractorConfig::default(),
        };

        if let Some(tolerance) = self.indent_tolerance {
            config = config.with_indent_tolerance(tolerance);
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_tree_depth(depth);
        }
        if let Some(threshold) = self.fragmentation_threshold {
            config = config.with_fragmentation_threshold(threshold);
        }
        if !self.skip_pages.is_empty() {
            config = config.with_skip_pages(self.skip_pages.clone());
        }
        if self.reconstruct_fragmented {
            config = config.with_delete_fragmented_pages(false);
        }
        if self.no_fragmentation_filter {
            config = config.with_fragmentation_filter(false);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = cli.engine.to_config()?;
    let extractor = SlideTreeExtractor::new(config).context("Invalid extractor settings")?;
    let source = PdftotextSource::new();
    ensure_available(&source)?;

    match &cli.command {
        Command::Extract { input, format, out } => {
            let deck = extractor
                .extract_path(&source, input)
                .with_context(|| format!("Failed to extract {}", input.display()))?;
            log::info!("{}: {} slides", deck.filename, deck.len());

            let output = match format {
                Format::Json => to_json(&deck)?,
                Format::Text => OutlineFormatter::new().format_deck(&deck),
            };
            emit(&output, out.as_deref())
        }
        Command::Split {
            input,
            plan_slide,
            out,
        } => {
            let split = extractor
                .process_path(&source, input, *plan_slide)
                .with_context(|| format!("Failed to process {}", input.display()))?;
            emit(&to_json(&split)?, out.as_deref())
        }
        Command::Plan { input, out } => {
            let plan = extractor
                .extract_plan_path(&source, input)
                .with_context(|| format!("Failed to extract plan {}", input.display()))?;
            emit(&to_json(&plan)?, out.as_deref())
        }
        Command::Fragmentation { input, page } => {
            let pages = load(&extractor, &source, input)?;
            let stats = extractor.fragmentation_report(find_page(&pages, *page)?);
            emit(&to_json(&stats)?, None)
        }
        Command::Bullets { input, page } => {
            let pages = load(&extractor, &source, input)?;
            let trace = extractor.bullet_report(find_page(&pages, *page)?);
            emit(&to_json(&trace)?, None)
        }
        Command::PlanReport { input } => {
            let pages = load(&extractor, &source, input)?;
            emit(&to_json(&extractor.plan_report(&pages))?, None)
        }
        Command::Analyze { input, plan_slide } => {
            let pages = load(&extractor, &source, input)?;
            let analysis = extractor.analyze(&file_label(input), &pages, *plan_slide);
            emit(&to_json(&analysis)?, None)
        }
    }
}

/// Fail with install instructions when the text extractor is missing.
fn ensure_available(source: &PdftotextSource) -> Result<()> {
    if !source.is_available() {
        return Err(slidetree_core::Error::ToolNotFound(source.binary().to_string()).into());
    }
    Ok(())
}

fn load(
    extractor: &SlideTreeExtractor,
    source: &PdftotextSource,
    input: &Path,
) -> Result<Vec<PageWords>> {
    extractor
        .load_pages(source, input)
        .with_context(|| format!("Failed to read {}", input.display()))
}

/// Find a page by its 1-based number.
fn find_page(pages: &[PageWords], number: usize) -> Result<&PageWords> {
    pages
        .iter()
        .find(|p| p.number == number)
        .ok_or_else(|| anyhow::anyhow!("Page {} not found ({} pages)", number, pages.len()))
}

fn file_label(input: &Path) -> String {
    input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

/// Print the output, or write it to a file.
fn emit(content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            log::info!("Written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_engine_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "slidetree",
            "extract",
            "deck.pdf",
            "--max-depth",
            "2",
            "--skip-pages",
            "2,5",
            "--reconstruct-fragmented",
        ])
        .unwrap();
        let config = cli.engine.to_config().unwrap();

        assert_eq!(config.max_tree_depth, 2);
        assert_eq!(config.skip_pages, vec![2, 5]);
        assert!(!config.delete_fragmented_pages);
        assert!(config.filter_fragmented_pages);
        assert_eq!(config.indent_tolerance, 5.0);
    }

    #[test]
    fn test_subcommand_arguments() {
        let cli = Cli::try_parse_from(["slidetree", "split", "deck.pdf", "--plan-slide", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Split {
                plan_slide: Some(3),
                ..
            }
        ));

        let cli = Cli::try_parse_from(["slidetree", "extract", "deck.pdf", "-f", "text"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Extract {
                format: Format::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_find_page() {
        let pages = vec![PageWords::new(1, vec![]), PageWords::new(2, vec![])];
        assert_eq!(find_page(&pages, 2).unwrap().number, 2);
        assert!(find_page(&pages, 3).is_err());
    }

    #[test]
    fn test_missing_extractor_reported() {
        let source = PdftotextSource::new().with_binary("pdftotext-not-installed");
        let err = ensure_available(&source).unwrap_err();
        assert!(err.to_string().contains("pdftotext-not-installed not found"));
        assert!(err.to_string().contains("poppler"));
    }
}
