use std::{fs::File, io::stdout, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use vimg::event_source::TerminalEventSource;
use vimg::panic_handler::initialize_panic_handler;
use vimg::settings::load_settings;
use vimg::{App, RasterImage, run_app_with_event_source};

/// A simple terminal-based image viewer.
#[derive(Parser, Debug)]
#[command(name = "vimg", version, about)]
struct Args {
    /// Path of image to view.
    image_path: PathBuf,

    /// Settings file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let level = if args.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        WriteLogger::init(level, Config::default(), File::create(path)?)?;
    }

    if !args.image_path.exists() {
        eprintln!("{} does not exist.", args.image_path.display());
        std::process::exit(2);
    }

    info!("Starting vimg on {:?}", args.image_path);
    let settings = load_settings(args.config.as_deref());
    let image = RasterImage::open(&args.image_path)
        .with_context(|| format!("Failed to load {}", args.image_path.display()))?;
    let subtitle = args
        .image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    initialize_panic_handler();

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(image, subtitle, settings);
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut TerminalEventSource);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down vimg");
    Ok(())
}
