use std::{
    path::{Path, PathBuf},
    sync::{Arc, atomic::AtomicBool, mpsc},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use lcdcanvas::{
    Catalog, DirectorySink, FrameRGBA, KeyEcho, PlayerOpts, SensorSnapshot, SpriteLimits,
    ThemePlayer, Translate, render::export,
};

#[derive(Parser, Debug)]
#[command(name = "lcdcanvas", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a theme with one telemetry snapshot as a PNG or JPEG.
    Frame(FrameArgs),
    /// Pack an animated image into a sprite strip PNG plus JSON metadata.
    Sprite(SpriteArgs),
    /// Print the sensors a theme reads, one per line.
    Sensors(SensorsArgs),
    /// Run the repaint loop for a bounded time, writing numbered PNG frames.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct ThemeArgs {
    /// Theme document JSON.
    #[arg(long)]
    theme: PathBuf,

    /// Root for relative asset paths (defaults to the theme's directory).
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Font file used when a text family is not embedded in the theme.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Nested JSON message catalog for localized labels.
    #[arg(long)]
    messages: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    theme: ThemeArgs,

    /// Telemetry snapshot JSON (`{sensor: {attribute: value}}`).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output path; `.jpg`/`.jpeg` writes JPEG, anything else PNG.
    #[arg(long)]
    out: PathBuf,

    /// How long to wait for image loads before rendering.
    #[arg(long, default_value_t = 2000)]
    wait_ms: u64,
}

#[derive(Parser, Debug)]
struct SpriteArgs {
    /// Animated GIF/WebP/APNG input.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output strip PNG; metadata is written next to it as `.json`.
    #[arg(long)]
    out: PathBuf,

    /// Fit frames into this width.
    #[arg(long)]
    max_width: Option<u32>,

    /// Fit frames into this height.
    #[arg(long)]
    max_height: Option<u32>,

    /// Keep only frames within this total duration.
    #[arg(long)]
    max_duration_ms: Option<f64>,
}

#[derive(Parser, Debug)]
struct SensorsArgs {
    /// Theme document JSON.
    #[arg(long)]
    theme: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    theme: ThemeArgs,

    /// Telemetry snapshot JSON applied once at start.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output directory for `frame_<seq>.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Run time in seconds.
    #[arg(long, default_value_t = 3.0)]
    seconds: f64,

    /// Override the repaint interval.
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sprite(args) => cmd_sprite(args),
        Command::Sensors(args) => cmd_sensors(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn read_snapshot(path: Option<&Path>) -> anyhow::Result<SensorSnapshot> {
    match path {
        Some(p) => Ok(SensorSnapshot::from_json_str(&read_text(p)?)?),
        None => Ok(SensorSnapshot::new()),
    }
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn open_player(args: &ThemeArgs, opts: PlayerOpts) -> anyhow::Result<ThemePlayer> {
    let mut opts = opts;
    opts.assets_root = match &args.assets_root {
        Some(root) => root.clone(),
        None => args
            .theme
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    if let Some(font) = &args.font {
        opts.default_font = Some(font.clone());
    }

    let translator: Arc<dyn Translate> = match &args.messages {
        Some(path) => Arc::new(Catalog::from_json_str(&read_text(path)?)?),
        None => Arc::new(KeyEcho),
    };
    let mut player = ThemePlayer::new(opts, translator)?;
    player
        .load_document_str(&read_text(&args.theme)?)
        .with_context(|| format!("load theme '{}'", args.theme.display()))?;
    Ok(player)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = open_player(&args.theme, PlayerOpts::from_env())?;
    let wait = Duration::from_millis(args.wait_ms);
    player.wait_for_loads(wait);
    let report = player.apply_snapshot(&read_snapshot(args.snapshot.as_deref())?);
    if !report.loads.is_empty() {
        player.wait_for_loads(wait);
    }

    let is_jpeg = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let bytes = if is_jpeg {
        player.export_jpeg()?
    } else {
        player.export_png()?
    };

    create_parent(&args.out)?;
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sprite(args: SpriteArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let art = lcdcanvas::decode_sprite(
        &bytes,
        SpriteLimits {
            max_width: args.max_width,
            max_height: args.max_height,
            max_duration_ms: args.max_duration_ms,
        },
    )?;

    let strip = FrameRGBA {
        width: art.strip.width,
        height: art.strip.height,
        data: art.strip.rgba8_premul.as_ref().clone(),
        premultiplied: true,
    };
    create_parent(&args.out)?;
    std::fs::write(&args.out, export::export_png(&strip)?)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    let meta_path = args.out.with_extension("json");
    let meta = serde_json::json!({
        "frameWidth": art.frame_width,
        "frameHeight": art.frame_height,
        "frameCount": art.frame_count,
        "delayMs": art.delay_ms,
    });
    std::fs::write(&meta_path, serde_json::to_vec_pretty(&meta)?)
        .with_context(|| format!("write '{}'", meta_path.display()))?;

    eprintln!(
        "wrote {} ({} frames of {}x{}, {:.1} ms)",
        args.out.display(),
        art.frame_count,
        art.frame_width,
        art.frame_height,
        art.delay_ms
    );
    Ok(())
}

fn cmd_sensors(args: SensorsArgs) -> anyhow::Result<()> {
    let mut doc = lcdcanvas::SceneDocument::from_json_str(&read_text(&args.theme)?)?;
    lcdcanvas::scene::migrate::migrate_document(&mut doc);
    let loaded = lcdcanvas::scene::load::build_scene(&doc, &Default::default())
        .with_context(|| format!("load theme '{}'", args.theme.display()))?;
    for sensor in loaded.scene.theme_sensors() {
        println!("{sensor}");
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut opts = PlayerOpts::from_env();
    if let Some(ms) = args.interval_ms.filter(|&ms| ms > 0) {
        opts.repaint_interval = Duration::from_millis(ms);
    }
    let mut player = open_player(&args.theme, opts)?;

    let (tx, rx) = mpsc::channel();
    if args.snapshot.is_some() {
        tx.send(read_snapshot(args.snapshot.as_deref())?)
            .context("queue snapshot")?;
    }
    drop(tx);

    let mut sink = DirectorySink::new(&args.out_dir);
    let stop = AtomicBool::new(false);
    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds.max(0.0));
    let stats = lcdcanvas::run_player(&mut player, &rx, &mut sink, &stop, Some(deadline))?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames,
        args.out_dir.display()
    );
    Ok(())
}
