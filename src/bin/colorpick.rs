use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use color_picker::{
    BarChartPng, ExtractOptions, HtmlPage, Render, TerminalText, analyze_image, load_image_file,
};
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

/// Extract the dominant colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image (JPEG or PNG)
    input: PathBuf,

    /// Number of dominant colors (1-10)
    #[arg(short = 'k', long, default_value_t = 5)]
    n_colors: usize,

    /// What to print on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write an HTML palette page here
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Also write a PNG bar chart of the palette here
    #[arg(long)]
    bar_out: Option<PathBuf>,

    /// JSON file with extraction options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// k-means seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Downsample so the longest side is at most this many pixels
    #[arg(long)]
    max_side: Option<u32>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_options(args: &Args) -> Result<ExtractOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ExtractOptions::default(),
    };
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if args.max_side.is_some() {
        options.max_side = args.max_side;
    }
    Ok(options)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    info!("saved {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let options = load_options(&args)?;
    let image = load_image_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let (palette, report) = analyze_image(&image, args.n_colors, &options)
        .context("palette extraction failed")?;
    let page = HtmlPage::default().with_source_image(image);

    match args.format {
        OutputFormat::Text => print!("{}", TerminalText.render(&palette, &report.style)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Html => print!("{}", page.render(&palette, &report.style)?),
    }

    if let Some(path) = &args.html_out {
        let html = page.render(&palette, &report.style)?;
        write_output(path, html.as_bytes())?;
    }
    if let Some(path) = &args.bar_out {
        let png = BarChartPng::default().render(&palette, &report.style)?;
        write_output(path, &png)?;
    }

    Ok(())
}
