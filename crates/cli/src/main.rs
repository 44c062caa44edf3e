use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;

use pdfblur_core::editing::display_transform::DisplayTransform;
use pdfblur_core::editing::region_editor::map_selection;
use pdfblur_core::session::redaction_session::RedactionSession;
use pdfblur_core::shared::constants::{
    DEFAULT_BLUR_RADIUS, DEFAULT_DPI, MAX_BLUR_RADIUS, MAX_DPI, MIN_BLUR_RADIUS, MIN_DPI,
};
use pdfblur_core::shared::geometry::Point;

/// Blur rectangular regions of PDF pages and write a flattened raster PDF.
#[derive(Parser)]
#[command(name = "pdfblur")]
struct Cli {
    /// Input PDF file.
    input: PathBuf,

    /// Output PDF file.
    output: PathBuf,

    /// Region to blur as PAGE:X,Y,W,H in points from the page's top-left
    /// corner (pages start at 1). Repeatable.
    #[arg(long = "region", value_name = "PAGE:X,Y,W,H")]
    regions: Vec<RegionArg>,

    /// Gaussian blur radius in pixels.
    #[arg(long, default_value_t = DEFAULT_BLUR_RADIUS)]
    radius: f32,

    /// Rasterization resolution.
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,
}

/// A region on one page, in PDF points.
#[derive(Clone, Debug, PartialEq)]
struct RegionArg {
    page: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl FromStr for RegionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (page, rect) = s
            .split_once(':')
            .ok_or_else(|| format!("expected PAGE:X,Y,W,H, got '{s}'"))?;
        let page: usize = page
            .trim()
            .parse()
            .map_err(|_| format!("invalid page number '{page}'"))?;
        if page == 0 {
            return Err("page numbers start at 1".into());
        }

        let values = rect
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| format!("invalid number '{v}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let [x, y, width, height] = values[..] else {
            return Err(format!("expected 4 values X,Y,W,H, got {}", values.len()));
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("region width and height must be positive, got {width}x{height}"));
        }

        Ok(Self {
            page,
            x,
            y,
            width,
            height,
        })
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let mut session = RedactionSession::with_defaults(cli.radius, cli.dpi)?;
    let page_count = session.open(&cli.input)?;

    for arg in &cli.regions {
        if arg.page > page_count {
            return Err(format!(
                "Region targets page {} but the document has {page_count} pages",
                arg.page
            )
            .into());
        }
        let index = arg.page - 1;
        let page = session.page(index)?;
        let transform = DisplayTransform::for_dpi(page.dpi());
        let anchor = Point::new(arg.x, arg.y);
        let corner = Point::new(arg.x + arg.width, arg.y + arg.height);

        match map_selection(anchor, corner, &transform, page.width(), page.height()) {
            Some(region) => {
                session.blur_region(index, region)?;
                log::info!("Blurred {region:?} on page {}", arg.page);
            }
            None => log::warn!("Region {arg:?} falls outside page {}, skipped", arg.page),
        }
    }

    session.export(&cli.output)?;
    println!(
        "Wrote {} pages to {}",
        session.page_count(),
        cli.output.display()
    );
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.input == cli.output {
        return Err("Output must differ from input".into());
    }
    if !(MIN_BLUR_RADIUS..=MAX_BLUR_RADIUS).contains(&cli.radius) {
        return Err(format!(
            "Radius must be between {MIN_BLUR_RADIUS} and {MAX_BLUR_RADIUS}, got {}",
            cli.radius
        )
        .into());
    }
    if !(MIN_DPI..=MAX_DPI).contains(&cli.dpi) {
        return Err(format!("DPI must be between {MIN_DPI} and {MAX_DPI}, got {}", cli.dpi).into());
    }
    Ok(())
}
