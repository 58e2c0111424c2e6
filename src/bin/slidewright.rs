use std::{
    io::{BufRead as _, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use slidewright::{
    DeckSession, ExportKind, Key, NavOutcome, PresentationData, SessionOpts,
    nav::navigator::WindowedHost,
    render::cpu::TextRendering,
    upstream::{parse_design_response, parse_slides_response, strip_code_fences},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slidewright", version)]
struct Cli {
    /// Design system JSON.
    #[arg(long, global = true)]
    design: Option<PathBuf>,

    /// Deck JSON: an array of slides, or an object with `topic` and `slides`.
    #[arg(long, global = true)]
    deck: Option<PathBuf>,

    /// Base directory for relative asset paths (defaults to the design file's directory).
    #[arg(long, global = true)]
    assets_root: Option<PathBuf>,

    /// Extra font directory; may be repeated.
    #[arg(long = "fonts-dir", global = true)]
    fonts_dirs: Vec<PathBuf>,

    /// Pin the title-slide date (YYYY-MM-DD).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the laid-out slides as JSON.
    Layout(LayoutArgs),
    /// Write the live markup of the deck or of one slide.
    View(ViewArgs),
    /// Present the deck, reading keys from stdin and rewriting the current slide's SVG.
    Present(PresentArgs),
    /// Export the deck as PDF or PPTX.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Only this slide (1-based).
    #[arg(long)]
    slide: Option<usize>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    /// Only this slide (1-based), as SVG. The whole deck is written as HTML otherwise.
    #[arg(long)]
    slide: Option<usize>,

    /// Output path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PresentArgs {
    /// SVG file rewritten after every key.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Pdf,
    Pptx,
}

impl From<Format> for ExportKind {
    fn from(f: Format) -> Self {
        match f {
            Format::Pdf => Self::Raster,
            Format::Pptx => Self::Native,
        }
    }
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Document format.
    #[arg(long, value_enum)]
    format: Format,

    /// Directory the document is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Render PDF pages one at a time.
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// Override rayon worker threads (PDF only).
    #[arg(long)]
    threads: Option<usize>,

    /// JPEG quality of PDF pages (1-100).
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// Paint PDF text as bars instead of glyphs; no fonts are needed.
    #[arg(long, default_value_t = false)]
    greeked: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = open_session(&cli)?;
    match cli.cmd {
        Command::Layout(args) => cmd_layout(&session, args),
        Command::View(args) => cmd_view(&session, args),
        Command::Present(args) => cmd_present(&mut session, args),
        Command::Export(args) => cmd_export(session, args),
    }
}

fn open_session(cli: &Cli) -> anyhow::Result<DeckSession> {
    let design_path = cli.design.as_deref().context("--design is required")?;
    let deck_path = cli.deck.as_deref().context("--deck is required")?;

    let design_text = std::fs::read_to_string(design_path)
        .with_context(|| format!("read design '{}'", design_path.display()))?;
    let design = parse_design_response(&design_text)
        .with_context(|| format!("parse design '{}'", design_path.display()))?;
    let deck = load_deck(deck_path)?;

    let mut opts = SessionOpts::from_env()?;
    opts.loader.root = match &cli.assets_root {
        Some(root) => root.clone(),
        None => design_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    opts.loader.font_dirs = cli.fonts_dirs.clone();
    opts.today = cli.today;
    if let Command::Export(args) = &cli.cmd {
        opts.raster.parallel = !args.serial;
        opts.raster.threads = args.threads;
        if let Some(q) = args.jpeg_quality {
            opts.raster.jpeg_quality = q;
        }
        if args.greeked {
            opts.raster.render.text = TextRendering::Greeked;
        }
    }

    Ok(DeckSession::new(design, deck, opts)?)
}

fn load_deck(path: &Path) -> anyhow::Result<PresentationData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read deck '{}'", path.display()))?;
    let slides =
        parse_slides_response(&text).with_context(|| format!("parse deck '{}'", path.display()))?;
    let topic = serde_json::from_str::<serde_json::Value>(strip_code_fences(&text))
        .ok()
        .and_then(|v| v.get("topic").and_then(|t| t.as_str()).map(str::to_owned))
        .unwrap_or_default();
    Ok(PresentationData::new(topic, slides))
}

fn slide_index(session: &DeckSession, slide: usize) -> anyhow::Result<usize> {
    let total = session.trees().len();
    if slide == 0 || slide > total {
        anyhow::bail!("slide {slide} is out of range (deck has {total} slides)");
    }
    Ok(slide - 1)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_layout(session: &DeckSession, args: LayoutArgs) -> anyhow::Result<()> {
    let json = match args.slide {
        Some(n) => {
            let i = slide_index(session, n)?;
            serde_json::to_string_pretty(&session.trees()[i])?
        }
        None => serde_json::to_string_pretty(session.trees())?,
    };
    match args.out {
        Some(out) => {
            write_output(&out, json.as_bytes())?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_view(session: &DeckSession, args: ViewArgs) -> anyhow::Result<()> {
    let markup = match args.slide {
        Some(n) => {
            let i = slide_index(session, n)?;
            session.slide_markup(i)?
        }
        None => session.deck_markup()?,
    };
    write_output(&args.out, markup.as_bytes())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_present(session: &mut DeckSession, args: PresentArgs) -> anyhow::Result<()> {
    let mut host = WindowedHost::default();
    write_output(&args.out, session.current_markup()?.as_bytes())?;
    announce(session)?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("read key from stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "q" | "quit") {
            break;
        }

        // Slide numbers are 1-based; the navigator clamps out-of-range jumps.
        let outcome = if let Ok(n) = input.parse::<usize>() {
            session.navigator_mut().jump_to(n.saturating_sub(1))
        } else {
            let key = match input {
                "n" | "next" => Key::ArrowRight,
                "p" | "prev" => Key::ArrowLeft,
                "f" | "fullscreen" => {
                    session.navigator_mut().toggle_fullscreen(&mut host);
                    announce(session)?;
                    continue;
                }
                other => Key::from_name(other),
            };
            session.handle_key(key, &mut host)
        };

        match outcome {
            NavOutcome::Moved(_) => {
                write_output(&args.out, session.current_markup()?.as_bytes())?;
                announce(session)?;
            }
            NavOutcome::CloseRequested => break,
            NavOutcome::ExitedFullscreen => announce(session)?,
            NavOutcome::Unchanged | NavOutcome::Ignored => {}
        }
    }
    Ok(())
}

fn announce(session: &DeckSession) -> anyhow::Result<()> {
    let nav = session.navigator();
    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{}/{}{}",
        nav.current() + 1,
        nav.total(),
        if nav.is_fullscreen() { " fullscreen" } else { "" }
    )?;
    out.flush()?;
    Ok(())
}

fn cmd_export(session: DeckSession, args: ExportArgs) -> anyhow::Result<()> {
    let kind = ExportKind::from(args.format);
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    let artifact = rt
        .block_on(session.export(kind))?
        .context("another export is already running")?;

    let out = args.out_dir.join(&artifact.file_name);
    write_output(&out, &artifact.bytes)?;
    eprintln!("wrote {} ({} pages)", out.display(), artifact.pages);
    Ok(())
}
