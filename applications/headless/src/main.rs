/// Wavedeck - headless playback session runner
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wavedeck_core::RepeatMode;
use wavedeck_headless::{load_queue, AppConfig, Session};
use wavedeck_playback::{HistoryStore, JsonHistoryStore};

#[derive(Parser)]
#[command(name = "wavedeck")]
#[command(about = "Headless Wavedeck playback session", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./wavedeck.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a queue file with simulated backends
    Play {
        /// JSON array of tracks
        queue: PathBuf,
        /// Index of the first track
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Shuffle the queue (the start track keeps its place)
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode: none, all or one
        #[arg(short, long, value_parser = parse_repeat)]
        repeat: Option<RepeatMode>,
    },
    /// Print the recently played list
    History,
}

fn parse_repeat(value: &str) -> Result<RepeatMode, String> {
    RepeatMode::from_str(value).ok_or_else(|| format!("invalid repeat mode '{}' (use none, all or one)", value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavedeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play {
            queue,
            start,
            shuffle,
            repeat,
        } => {
            if shuffle {
                config.playback.shuffle = true;
            }
            if let Some(mode) = repeat {
                config.playback.repeat = mode;
            }
            play(config, &queue, start).await?;
        }
        Commands::History => {
            history(&config)?;
        }
    }

    Ok(())
}

async fn play(config: AppConfig, queue: &Path, start: usize) -> anyhow::Result<()> {
    let tracks = load_queue(queue)?;
    tracing::info!("Loaded {} tracks from {}", tracks.len(), queue.display());

    let history = JsonHistoryStore::new(config.history_path.clone());
    let mut session = Session::new(config, &tracks, Box::new(history));
    session.start(tracks, start)?;

    let summary = session
        .run(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await;

    println!(
        "{:?} after {} track(s)",
        summary.outcome, summary.tracks_started
    );
    Ok(())
}

fn history(config: &AppConfig) -> anyhow::Result<()> {
    let store = JsonHistoryStore::new(config.history_path.clone());
    let tracks = store.load()?;

    if tracks.is_empty() {
        println!("Nothing played yet");
        return Ok(());
    }

    println!("Recently played:");
    for (i, track) in tracks.iter().enumerate() {
        println!("  {:>2}. {} - {} ({})", i + 1, track.artist, track.title, track.id);
    }

    Ok(())
}
