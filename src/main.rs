mod app;
mod config;
mod debounce;
mod input;
mod lyrics;
mod search;
mod suggest;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lyrics::LyricsFetcher;
use search::state::Query;
use suggest::{Field, SearchContext};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lyricfind", version, about = "Look up song lyrics by track and artist")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive search screen (default).
    Tui,
    /// Fetch lyrics and print them to stdout (headless).
    Lyrics { track: String, artist: String },
    /// Print name suggestions for partial input (headless).
    Suggest {
        kind: SuggestKind,
        query: String,
        /// Artist to scope track suggestions to.
        #[arg(long)]
        artist: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SuggestKind {
    Track,
    Artist,
}

impl From<SuggestKind> for Field {
    fn from(kind: SuggestKind) -> Self {
        match kind {
            SuggestKind::Track => Field::Track,
            SuggestKind::Artist => Field::Artist,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            // The terminal belongs to the UI; log to a file instead.
            if let Err(e) = init_file_logging(&cfg.paths.data_dir) {
                eprintln!("lyricfind: logging disabled: {e:#}");
            }
            let mut app = app::App::new(&cfg)?;
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Lyrics { track, artist } => {
            init_stderr_logging();
            let client = app::lyrics_client(&cfg)?;
            let result = client.fetch_lyrics(&Query::new(track, artist).trimmed()).await?;
            print_lyrics(&result);
        }
        Command::Suggest { kind, query, artist } => {
            init_stderr_logging();
            let provider = app::suggestion_provider(&cfg)?;
            let ctx = SearchContext { artist_name: artist };
            let names = provider.search(kind.into(), &query, &ctx).await;
            if names.is_empty() {
                eprintln!("No suggestions.");
            }
            for (i, name) in names.iter().enumerate() {
                println!("{:02}. {}", i + 1, name);
            }
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn init_file_logging(data_dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir).with_context(|| format!("create dir {}", data_dir.display()))?;
    let path = data_dir.join("lyricfind.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn print_lyrics(result: &lyrics::LyricsResult) {
    println!("{}", result.name);
    println!("by {}", result.artist_name);
    if let Some(album) = &result.album_name {
        println!("Album: {album}");
    }
    println!("{}", tui::widgets::lyrics::metadata_line(result));
    println!();
    match result.lyrics() {
        Some(body) => println!("{body}"),
        None => println!("No lyrics found for this song."),
    }
}
