use anyhow::{Context, Result};
use clap::Parser;
use slateboard::config::Config;
use slateboard::export::{self, ExportFormat};
use slateboard::input::InputState;
use slateboard::script::Script;
use slateboard::session::{self, SessionMetadata};
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SLATEBOARD_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "slateboard")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Drawing board with a live vector overlay and per-page raster backing store"
)]
struct Cli {
    /// Replay board events from a TOML script
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Export the current page (PNG or JPEG by extension; a directory gets a
    /// generated name; no value saves into the configured export directory)
    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        num_args = 0..=1,
        requires = "script"
    )]
    output: Option<Option<PathBuf>>,

    /// Write session metadata JSON after the script ran
    #[arg(long, value_name = "FILE", requires = "script")]
    session: Option<PathBuf>,

    /// Use this config file instead of ~/.config/slateboard/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let Some(script_path) = cli.script.as_deref() else {
        print_usage();
        return Ok(());
    };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let script = Script::load(script_path)?;
    let mut settings = config.board_settings();
    script.apply_display(&mut settings);

    let mut board = InputState::new(settings).context("Failed to create board")?;
    let mut dialogs = script.dialogs()?;
    script.run(&mut board, &mut dialogs)?;
    log::info!("Script finished: {}", board.status);

    if let Some(output) = &cli.output {
        let saved = export_page(&board, output.as_deref())?;
        println!("Saved page to {}", saved.display());
    }

    if let Some(path) = cli.session.as_deref() {
        session::save_metadata(path, &SessionMetadata::from_input(&board))?;
        println!("Saved session to {}", path.display());
    }

    Ok(())
}

fn export_page(board: &InputState, output: Option<&Path>) -> Result<PathBuf> {
    let raster = board.current_page().raster();
    let Some(output) = output else {
        let directory = &board.export.directory;
        return export::save_to_directory(raster, &board.export, ExportFormat::Png)
            .with_context(|| format!("Failed to export page to {}", directory.display()));
    };
    let saved = if output.is_dir() {
        let mut settings = board.export.clone();
        settings.directory = output.to_path_buf();
        export::save_to_directory(raster, &settings, ExportFormat::Png)
    } else {
        export::save_raster(
            raster,
            output,
            ExportFormat::from_path(output),
            board.export.jpeg_quality,
        )
    };
    saved.with_context(|| format!("Failed to export page to {}", output.display()))
}

fn print_usage() {
    println!("slateboard: Drawing board with a live vector overlay and raster backing store");
    println!();
    println!("Usage:");
    println!("  slateboard --script board.toml --output page.png   Replay a script and export the page");
    println!("  slateboard --script board.toml --output            Export into the configured directory");
    println!("  slateboard --script board.toml --session meta.json Replay a script and save session metadata");
    println!("  slateboard --help                                  Show help");
    println!();
    println!("Config file: ~/.config/slateboard/config.toml (see dump_config_schema)");
}
