//! whynot CLI
//!
//! Lays a document out at a width and renders one viewport of it to PNG,
//! the way a windowed host would draw one frame.
//!
//! - `whynot doc.json -o out.png` renders the top of the document
//! - `whynot doc.json --scroll 400 --scale 2` renders further down, at 2x
//! - `whynot doc.json --dump-boxes` prints the box tree instead

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use whynot_common::warning::{clear_warnings, warn_once};
use whynot_document::StyleTable;
use whynot_layout::{ApproximateFontMetrics, Block, Color, RenderingContext, layout};
use whynot_render::{
    FontdueFaceSelector, Viewport, layout_viewport, load_document, load_styles, render_viewport,
};

/// whynot: width-constrained document layout
#[derive(Parser, Debug)]
#[command(name = "whynot")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Render the first screen of a document
    whynot doc.json -o doc.png

    # Narrow window, scrolled down, on a 2x display
    whynot doc.json --width 480 --scroll 600 --scale 2 -o page.png

    # Print the box tree
    whynot doc.json --dump-boxes

    # Override styles
    whynot doc.json --styles light.json --background '#ffffff' -o doc.png
"#)]
struct Cli {
    /// Document tree as JSON
    #[arg(value_name = "DOCUMENT")]
    document: PathBuf,

    /// Viewport width in device pixels; also the layout width
    #[arg(long, default_value = "1024")]
    width: u32,

    /// Viewport height in device pixels
    #[arg(long, default_value = "768")]
    height: u32,

    /// Device pixels scrolled past the top of the document
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    scroll: i32,

    /// Device scale factor applied to fonts and margins
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Style table overrides as JSON
    #[arg(long, value_name = "FILE")]
    styles: Option<PathBuf>,

    /// Background color as #RRGGBB
    #[arg(long, default_value = "#000000", value_parser = parse_color)]
    background: Color,

    /// Write the rendered viewport to this PNG file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the laid-out box tree
    #[arg(long)]
    dump_boxes: bool,
}

fn parse_color(value: &str) -> Result<Color, String> {
    Color::from_hex(value).ok_or_else(|| format!("'{value}' is not a #RRGGBB color"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !(cli.scale.is_finite() && cli.scale > 0.0) {
        anyhow::bail!("--scale must be a positive number, got {}", cli.scale);
    }

    clear_warnings();
    let styles = match &cli.styles {
        Some(path) => load_styles(path)?,
        None => StyleTable::default(),
    };
    let block = load_document(&cli.document, styles)
        .with_context(|| format!("could not load '{}'", cli.document.display()))?;

    let viewport = Viewport {
        width: cli.width,
        height: cli.height,
        scroll_y: cli.scroll,
        scale: cli.scale,
        background: cli.background,
    };
    let mut faces = FontdueFaceSelector::new();

    if cli.dump_boxes {
        dump_boxes(&block, &mut faces, &viewport)?;
        if cli.output.is_none() {
            return Ok(());
        }
    }

    if !faces.has_fonts() {
        anyhow::bail!("no system font found; cannot render text");
    }
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("whynot.png"));
    let renderer = render_viewport(&block, &mut faces, &viewport)?;
    renderer.save(&output)?;
    println!(
        "{} {} ({}x{} at scroll {})",
        "Rendered".green().bold(),
        output.display(),
        viewport.width,
        viewport.height,
        viewport.scroll_y
    );
    Ok(())
}

/// Print the box tree at the viewport width, measuring with approximate
/// metrics when no system font is installed.
fn dump_boxes(
    block: &Block,
    faces: &mut FontdueFaceSelector,
    viewport: &Viewport,
) -> anyhow::Result<()> {
    let tree = if faces.has_fonts() {
        layout_viewport(block, faces, viewport)?.0
    } else {
        warn_once("fonts", "no system font found; using approximate metrics");
        let mut metrics = ApproximateFontMetrics::new();
        let mut ctx = RenderingContext::new(&mut metrics, viewport.scale);
        layout(block, &mut ctx, viewport.width as i32)?
    };
    println!(
        "{}",
        format!("=== Box Tree (width {}) ===", viewport.width).bold()
    );
    print!("{}", tree.describe());
    Ok(())
}
