use clap::{Parser, Subcommand};
use simple_landing::event::{Interaction, PageEvent};
use simple_landing::page::Page;
use simple_landing::sections::SectionRegistry;
use simple_landing::store::FileSource;
use simple_landing::types::SectionName;
use simple_landing::{config, generate, output};
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; only called at startup.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-landing")]
#[command(about = "Content-driven single-page marketing site")]
#[command(long_about = "\
Content-driven single-page marketing site

Every word on the page comes from one content document. Sections load
independently behind placeholders, the about gallery rotates on its own
timer, and any section failing to render replaces the whole page with an
apology and a reload button.

Content structure:

  site/
  ├── config.toml        # Site config (optional)
  ├── content.yaml       # Content document (.yaml, .yml, .json or .toml)
  └── assets/            # Images and icons → copied to output/assets

Content document sections:
  navigation  hero  products  features  about  footer  brand  ui

Run 'simple-landing gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml and the content document
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compose the page and write the static site
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Compose the page without writing anything
    Check,
    /// Run the page on a virtual clock and print what happens
    Simulate {
        /// Milliseconds of page time to run
        #[arg(long, default_value_t = 15_000)]
        ms: u64,
        /// Pick a gallery image by hand: INDEX@MS (0-based index)
        #[arg(long = "select", value_name = "INDEX@MS")]
        selections: Vec<Selection>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// A manual gallery pick at a point in page time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    index: usize,
    at_ms: u64,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, at) = s
            .split_once('@')
            .ok_or_else(|| format!("expected INDEX@MS, got `{s}`"))?;
        let index = index
            .trim()
            .parse()
            .map_err(|e| format!("bad image index `{index}`: {e}"))?;
        let at_ms = at
            .trim()
            .parse()
            .map_err(|e| format!("bad time `{at}`: {e}"))?;
        Ok(Self { index, at_ms })
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("simple_landing={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { output: out_dir } => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                out_dir.display()
            );
            let summary = generate::generate(&cli.source, &out_dir)?;
            let content_file = config::load_config(&cli.source)?.content;
            output::print_generate_output(&summary, &content_file);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (config, document) = generate::load_inputs(&cli.source)?;
            let site = generate::render_site(&config, document, SectionRegistry::standard())?;
            output::print_check_output(&site, &config.content);
            println!("==> Content is valid");
        }
        Command::Simulate { ms, mut selections } => {
            // Fail early on a bad document; the page itself would only show
            // placeholders.
            let (config, _) = generate::load_inputs(&cli.source)?;
            let source = FileSource::new(cli.source.join(&config.content));
            let mut page = Page::mount(config, Rc::new(source), SectionRegistry::standard());

            selections.sort_by_key(|s| s.at_ms);
            let mut timeline: Vec<(u64, PageEvent)> = Vec::new();
            for selection in selections.into_iter().filter(|s| s.at_ms <= ms) {
                let wait = selection.at_ms.saturating_sub(page.now());
                timeline.extend(page.advance_timeline(wait));
                let select = Interaction::SelectImage(selection.index);
                match page.interact(SectionName::About, select) {
                    Ok(events) => timeline.extend(events.into_iter().map(|e| (page.now(), e))),
                    Err(e) => eprintln!(
                        "{:>7} ms  select {} ignored: {}",
                        page.now(),
                        selection.index,
                        e
                    ),
                }
            }
            timeline.extend(page.advance_timeline(ms.saturating_sub(page.now())));
            page.unmount();
            output::print_timeline(&timeline);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_index_at_ms() {
        assert_eq!(
            "2@1000".parse::<Selection>().unwrap(),
            Selection {
                index: 2,
                at_ms: 1000
            }
        );
        assert!("2".parse::<Selection>().is_err());
        assert!("x@10".parse::<Selection>().is_err());
        assert!("1@soon".parse::<Selection>().is_err());
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "simple-landing",
            "--source",
            "site",
            "simulate",
            "--ms",
            "12000",
            "--select",
            "2@1000",
        ])
        .unwrap();
        match cli.command {
            Command::Simulate { ms, selections } => {
                assert_eq!(ms, 12_000);
                assert_eq!(selections.len(), 1);
            }
            _ => panic!("expected simulate"),
        }
        assert_eq!(cli.source, PathBuf::from("site"));
    }
}
