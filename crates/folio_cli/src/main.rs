//! Folio CLI
//!
//! Render, simulate, and inspect the portfolio page.

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use folio_animation::RandomOffsets;
use folio_app::components::BlogIndex;
use folio_app::{IndexPage, PageRuntime};

mod config;
mod simulate;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Portfolio page renderer and animation simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file, or a directory containing folio.toml
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PageKind {
    /// The landing page
    Index,
    /// The blog post listing
    Blog,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page as it looks at a given time after mount
    Render {
        /// Which page to render
        #[arg(short, long, value_enum, default_value = "index")]
        page: PageKind,

        /// Virtual time after mount, in milliseconds
        #[arg(long, default_value = "0")]
        at: u64,

        /// Click the email link at this time
        #[arg(long)]
        click_email_at: Option<u64>,

        /// Move the pointer to this height right after mount
        #[arg(long)]
        pointer_y: Option<f32>,

        /// Seed for the trail offsets
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Year shown in the blog footer (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Emit a complete HTML document with styles
        #[arg(short, long)]
        document: bool,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Step the page timeline and print a snapshot per step
    Simulate {
        /// Total simulated time, in milliseconds
        #[arg(short, long, default_value = "3000")]
        duration: u64,

        /// Interval between snapshots, in milliseconds
        #[arg(short, long, default_value = "100")]
        step: u64,

        /// Click the email link at this time
        #[arg(long)]
        click_email_at: Option<u64>,

        /// Move the pointer to this height at t=0
        #[arg(long)]
        pointer_y: Option<f32>,

        /// Seed for the trail offsets
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print snapshots as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print vertical rhythm and type scale values
    Typography {
        /// Line counts to convert with rhythm()
        #[arg(long, value_delimiter = ',', default_value = "0.25,0.5,0.75,1,1.5,2.5,24")]
        lines: Vec<f32>,

        /// Scale steps to convert with scale()
        #[arg(long, value_delimiter = ',', default_value = "-0.2,0,0.4,0.8,1.2")]
        steps: Vec<f32>,

        /// Also print the generated CSS
        #[arg(long)]
        css: bool,
    },

    /// Write a default folio.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing folio.toml
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Render {
            page,
            at,
            click_email_at,
            pointer_y,
            seed,
            year,
            document,
            output,
        } => cmd_render(
            &cli.config,
            RenderOptions {
                page,
                at,
                click_email_at,
                pointer_y,
                seed,
                year,
                document,
            },
            output.as_deref(),
        ),

        Commands::Simulate {
            duration,
            step,
            click_email_at,
            pointer_y,
            seed,
            json,
        } => cmd_simulate(
            &cli.config,
            simulate::Plan {
                duration_ms: duration,
                step_ms: step,
                click_email_at_ms: click_email_at,
                pointer: pointer_y.map(|y| (0, y)),
                seed,
            },
            json,
        ),

        Commands::Typography { lines, steps, css } => cmd_typography(&cli.config, &lines, &steps, css),

        Commands::Init { dir, force } => cmd_init(&dir, force),
    }
}

struct RenderOptions {
    page: PageKind,
    at: u64,
    click_email_at: Option<u64>,
    pointer_y: Option<f32>,
    seed: u64,
    year: Option<i32>,
    document: bool,
}

fn cmd_render(config_path: &Path, options: RenderOptions, output: Option<&Path>) -> Result<()> {
    let config = config::load(config_path)?;

    let html = match options.page {
        PageKind::Blog => {
            let year = options.year.unwrap_or_else(current_year);
            BlogIndex {
                config: &config,
                year,
            }
            .render_html()
        }
        PageKind::Index => {
            let runtime = PageRuntime::manual();
            let page = IndexPage::mount(&runtime, &config, &mut RandomOffsets::seeded(options.seed));

            if let Some(y) = options.pointer_y {
                runtime.pointer_move(0.0, y);
            }

            match options.click_email_at {
                Some(click) if click <= options.at => {
                    runtime.advance(click);
                    page.click_email();
                    runtime.advance(options.at - click);
                }
                Some(click) => {
                    warn!("email click at {}ms is after render time {}ms, skipping", click, options.at);
                    runtime.advance(options.at);
                }
                None => {
                    runtime.advance(options.at);
                }
            }

            info!(
                "Rendered index at t={}ms (email {}, trail {})",
                runtime.now_ms(),
                page.email_state().stage().name(),
                if page.is_trail_settled() { "settled" } else { "moving" }
            );

            if options.document {
                page.render_document()
            } else {
                page.render_html()
            }
        }
    };

    match output {
        Some(path) => {
            fs::write(path, &html).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn cmd_simulate(config_path: &Path, plan: simulate::Plan, json: bool) -> Result<()> {
    let config = config::load(config_path)?;
    info!(
        "Simulating {}ms in {}ms steps",
        plan.duration_ms, plan.step_ms
    );

    let snapshots = simulate::run(&config, plan);
    if json {
        let text = serde_json::to_string_pretty(&snapshots).context("Failed to encode snapshots")?;
        println!("{}", text);
    } else {
        for snapshot in &snapshots {
            println!("{}", snapshot.summary());
        }
    }
    Ok(())
}

fn cmd_typography(config_path: &Path, lines: &[f32], steps: &[f32], css: bool) -> Result<()> {
    let config = config::load(config_path)?;
    let typography = config.theme.typography();
    let base = typography.config();

    println!(
        "base {}px, line height {}, scale ratio {}",
        base.base_font_size, base.base_line_height, base.scale_ratio
    );

    println!();
    println!("{:>8}  rhythm", "lines");
    for &n in lines {
        println!("{:>8}  {}", n, typography.rhythm(n));
    }

    println!();
    println!("{:>8}  {:>12}  {:>12}", "step", "font-size", "line-height");
    for &step in steps {
        let scale = typography.scale(step);
        println!(
            "{:>8}  {:>12}  {:>12}",
            step,
            scale.font_size.to_string(),
            scale.line_height.to_string()
        );
    }

    if css {
        println!();
        print!("{}", config.theme.global_css());
    }
    Ok(())
}

fn cmd_init(dir: &Path, force: bool) -> Result<()> {
    let path = config::write_default(dir, force)?;
    info!("Wrote default config to {}", path.display());
    info!("Run `folio render --document -o index.html` to render the page");
    Ok(())
}

/// Current year in UTC
fn current_year() -> i32 {
    Utc::now().year()
}
