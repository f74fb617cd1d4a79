use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use radial_warp::{
    FalloffKind, PixelBuffer, Point, ViewportOffset, WarpSpec, WarpStats, WarpThreading, apply,
    apply_parallel, load_image, save_png,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "radial-warp", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Swirl an image and write the result as PNG.
    Apply(ApplyArgs),
    /// Print an example warp spec JSON.
    Spec,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Warp spec JSON; replaces the inline swirl flags below.
    #[arg(
        long,
        conflicts_with_all = [
            "center_x", "center_y", "angle_deg", "radius", "falloff", "copy_input", "left", "top",
        ]
    )]
    config: Option<PathBuf>,

    /// Swirl center x in input pixels (default: image center).
    #[arg(long)]
    center_x: Option<f64>,

    /// Swirl center y in input pixels (default: image center).
    #[arg(long)]
    center_y: Option<f64>,

    /// Swirl angle in degrees; negative swirls the other way.
    #[arg(long, default_value_t = 90.0, allow_hyphen_values = true)]
    angle_deg: f64,

    /// Swirl radius in pixels (default: half the shorter image side).
    #[arg(long)]
    radius: Option<f64>,

    /// Falloff curve: linear, quadratic, smooth or uniform.
    #[arg(long, default_value_t = FalloffKind::Linear)]
    falloff: FalloffKind,

    /// Copy the input into the output before warping.
    #[arg(long)]
    copy_input: bool,

    /// Viewport left offset into the input.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    left: i32,

    /// Viewport top offset into the input.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    top: i32,

    /// Output size as WIDTHxHEIGHT (default: input size).
    #[arg(long, value_parser = parse_size)]
    viewport: Option<(u32, u32)>,

    /// Split rows across worker threads.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Spec => cmd_spec(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad width '{w}': {e}"))?;
    let h = h
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok((w, h))
}

fn inline_spec(args: &ApplyArgs, src: &PixelBuffer) -> WarpSpec {
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    WarpSpec {
        center: Point::new(
            args.center_x.unwrap_or(w / 2.0),
            args.center_y.unwrap_or(h / 2.0),
        ),
        angle_deg: Some(args.angle_deg),
        angle_rad: None,
        radius_px: args.radius.unwrap_or(w.min(h) / 2.0),
        falloff: args.falloff,
        copy_input: args.copy_input,
        offset: ViewportOffset::new(args.left, args.top),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let src = load_image(&args.in_path)?;
    let spec = match &args.config {
        Some(path) => WarpSpec::from_path(path)?,
        None => {
            let spec = inline_spec(&args, &src);
            spec.validate()?;
            spec
        }
    };
    let config = spec.to_config()?;
    tracing::info!(
        input = %args.in_path.display(),
        width = src.width(),
        height = src.height(),
        falloff = %spec.falloff,
        "loaded input"
    );

    let (out_w, out_h) = args.viewport.unwrap_or((src.width(), src.height()));
    let mut dst = PixelBuffer::new(out_w, out_h)?;

    let stats = if args.parallel {
        let threading = WarpThreading {
            threads: args.threads,
        };
        apply_parallel(src.view(), dst.view_mut(), spec.offset, &config, &threading)?
    } else {
        apply(src.view(), dst.view_mut(), spec.offset, &config)
    };

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    save_png(&dst, &args.out)?;

    print_stats(&stats);
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn print_stats(stats: &WarpStats) {
    eprintln!(
        "pixels: {} total, {} warped, {} outside radius, {} sampled outside input",
        stats.pixels_total,
        stats.pixels_written,
        stats.pixels_out_of_radius,
        stats.pixels_out_of_bounds
    );
}

fn cmd_spec() -> anyhow::Result<()> {
    let example = WarpSpec {
        center: Point::new(128.0, 128.0),
        angle_deg: Some(180.0),
        angle_rad: None,
        radius_px: 96.0,
        falloff: FalloffKind::Linear,
        copy_input: true,
        offset: ViewportOffset::ZERO,
    };
    let text = serde_json::to_string_pretty(&example).context("serialize example spec")?;
    println!("{text}");
    Ok(())
}
