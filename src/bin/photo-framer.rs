use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use photo_framer::assets::load_frame_file;
use photo_framer::render::format;
use photo_framer::render::overlay::TextOverlay;
use photo_framer::share::{DirectoryDownload, ShareTarget};
use photo_framer::{
    CustomOverlayState, FrameSelection, FramerConfig, FramingSession, GestureEvent, TimeMs,
    TransformDelta,
};

#[derive(Parser, Debug)]
#[command(name = "photo-framer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the output formats.
    Formats,
    /// Compose a photo into a frame and write the PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo (PNG, JPEG, ...).
    #[arg(long)]
    photo: PathBuf,

    /// Frame image drawn on top (PNG or SVG).
    #[arg(long)]
    frame: Option<PathBuf>,

    /// Frame style, used in the output file name.
    #[arg(long, default_value = "custom")]
    style: String,

    /// Output format key.
    #[arg(long, default_value = "square")]
    format: String,

    /// Absolute photo scale. Defaults to the safe-area fit.
    #[arg(long)]
    scale: Option<f64>,

    /// Rotation in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotation_deg: f64,

    /// Horizontal offset from the canvas centre, in output pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    dx: f64,

    /// Vertical offset from the canvas centre, in output pixels.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    dy: f64,

    /// Caption text overlay.
    #[arg(long)]
    text: Option<String>,

    /// TTF/OTF font used for the caption.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    photo_framer::logging::init_logging("photo_framer=warn");
    let cli = Cli::parse();
    match cli.cmd {
        Command::Formats => cmd_formats(),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_formats() -> anyhow::Result<()> {
    for f in format::all() {
        println!("{}\t{}x{}\t{}", f.key, f.width, f.height, f.display_name);
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => FramerConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => FramerConfig::default(),
    };
    let mut session = FramingSession::new(&config, FrameSelection::new("custom", &args.style))?;
    if !session.set_output_format(&args.format, None) {
        let keys: Vec<_> = format::all().iter().map(|f| f.key).collect();
        anyhow::bail!("unknown format '{}' (expected one of {})", args.format, keys.join(", "));
    }

    let bytes = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    session
        .load_photo(&bytes, TimeMs(0))
        .with_context(|| format!("process photo '{}'", args.photo.display()))?;

    let out_format = session.output_format();
    if let Some(path) = &args.frame {
        let frame = load_frame_file(path, out_format.width, out_format.height)
            .with_context(|| format!("load frame '{}'", path.display()))?;
        session.set_frame_image(Some(Arc::new(frame)));
    }

    if let Some(scale) = args.scale {
        session.set_absolute_scale(scale);
    }
    session.set_absolute_rotation(args.rotation_deg.to_radians());
    let pan = GestureEvent::TransformUpdate(TransformDelta::pan(args.dx, args.dy));
    session.handle_events(&[pan], TimeMs(0));

    if let Some(text) = args.text {
        if let Some(path) = &args.font {
            let font = std::fs::read(path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            session.renderer_mut().set_font_bytes(font)?;
        }
        session.set_overlays(CustomOverlayState {
            text: Some(TextOverlay {
                content: text,
                ..TextOverlay::default()
            }),
            image: None,
        });
    }

    let exported = session.export_png(TimeMs(0))?;
    let mut download = DirectoryDownload::new(&args.out);
    let path = download.target_path(&exported.filename)?;
    let mut targets: [&mut dyn ShareTarget; 1] = [&mut download];
    session.share_export(&exported, None, &mut targets)?;
    session.teardown();

    eprintln!("wrote {}", path.display());
    Ok(())
}
